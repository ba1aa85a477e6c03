use super::{Animation, FrameInput};
use crate::buffer::MeshBuffer;
use crate::color::Rgb;
use crate::graphics::{Material, Painter};
use crate::math::{fract, hash2, smoothstep, Transform, Vec3};
use crate::scene::NodeDescriptor;

/// Glyph lane sampled by the hash; columns are one glyph wide
const LANE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatrixConfig {
    pub width: f32,
    pub height: f32,
    /// Glyph cells stacked along the column
    pub cells: usize,
    /// Fall cycles per unit of column time
    pub fall_rate: f32,
    /// Glyph changes per unit of column time
    pub flicker: f32,
    /// World units per unit of pointer offset
    pub reach: f32,
    /// Distance at which the pointer glow fades out
    pub glow_radius: f32,
    pub glow: f32,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        MatrixConfig {
            width: 0.3,
            height: 20.0,
            cells: 40,
            fall_rate: 0.5,
            flicker: 10.0,
            reach: 10.0,
            glow_radius: 5.0,
            glow: 0.5,
        }
    }
}

impl MatrixConfig {
    /// Number of cells drawn; an empty column still gets one
    pub fn cell_count(&self) -> usize {
        self.cells.max(1)
    }

    /// Local Y of the center of a cell, cell 0 at the bottom
    pub fn cell_center(&self, cell: usize) -> f32 {
        -self.height / 2.0 + (cell as f32 + 0.5) * self.height / self.cell_count() as f32
    }

    /// Brightness of one cell at column time `t`, `pointer` given in column-local units
    pub fn brightness(&self, cell: usize, t: f32, pointer: [f32; 2]) -> f32 {
        let index = cell as f32;
        let fall = fract(index * 0.1 + t * self.fall_rate);
        let glyph = if hash2(LANE, index + (t * self.flicker).floor()) >= 0.5 {
            1.0
        } else {
            0.0
        };
        let fade = smoothstep(0.0, 0.2, fall) * smoothstep(1.0, 0.7, fall);
        let dx = pointer[0];
        let dy = pointer[1] - self.cell_center(cell);
        let glow = smoothstep(self.glow_radius, 0.0, (dx * dx + dy * dy).sqrt()) * self.glow;
        glyph * fade + glow
    }
}

struct Column {
    quads: MeshBuffer,
    brightness: Vec<f32>,
    colors: Vec<Rgb>,
}

/// One falling column of glyph cells
pub struct MatrixRain {
    name: String,
    transform: Transform,
    color: Rgb,
    speed: f32,
    config: MatrixConfig,
    column: Option<Column>,
}

impl MatrixRain {
    pub fn new(descriptor: &NodeDescriptor, config: MatrixConfig) -> Self {
        MatrixRain {
            name: descriptor.name.clone(),
            transform: descriptor.transform,
            color: descriptor.color,
            speed: descriptor.speed,
            config,
            column: None,
        }
    }

    pub fn brightness(&self) -> Option<&[f32]> {
        self.column.as_ref().map(|column| column.brightness.as_slice())
    }

    fn quads(&self) -> MeshBuffer {
        let cells = self.config.cell_count();
        let half = self.config.width / 2.0;
        let step = self.config.height / cells as f32;
        let mut positions = Vec::with_capacity(cells * 4);
        let mut triangles = Vec::with_capacity(cells * 2);
        for cell in 0..cells {
            let bottom = -self.config.height / 2.0 + cell as f32 * step;
            let base = positions.len() as u32;
            positions.extend([
                [-half, bottom, 0.0],
                [half, bottom, 0.0],
                [half, bottom + step, 0.0],
                [-half, bottom + step, 0.0],
            ]);
            triangles.push([base, base + 1, base + 2]);
            triangles.push([base, base + 2, base + 3]);
        }
        MeshBuffer::new(positions, triangles)
    }
}

impl Animation for MatrixRain {
    fn name(&self) -> &str {
        &self.name
    }

    fn reacts_to_pointer(&self) -> bool {
        true
    }

    fn mount(&mut self) {
        let quads = self.quads();
        let colors = vec![Rgb::BLACK; quads.len()];
        self.column = Some(Column {
            quads,
            brightness: vec![0.0; self.config.cell_count()],
            colors,
        });
    }

    fn unmount(&mut self) {
        self.column = None;
    }

    fn is_mounted(&self) -> bool {
        self.column.is_some()
    }

    fn update(&mut self, frame: &FrameInput) {
        let Some(column) = self.column.as_mut() else {
            return;
        };
        let t = frame.elapsed * self.speed;
        let origin = self.transform.position;
        let pointer = [
            frame.pointer.x * self.config.reach - origin[0],
            frame.pointer.y * self.config.reach - origin[1],
        ];
        for (cell, value) in column.brightness.iter_mut().enumerate() {
            *value = self.config.brightness(cell, t, pointer);
        }
        // Additive with alpha equal to brightness: the color lands squared
        for (corners, value) in column.colors.chunks_exact_mut(4).zip(&column.brightness) {
            corners.fill(self.color * (value * value));
        }
    }

    fn positions(&self) -> Option<&[Vec3]> {
        self.column.as_ref().map(|column| column.quads.positions())
    }

    fn draw(&self, painter: &mut Painter) {
        let Some(column) = self.column.as_ref() else {
            return;
        };
        let transform = self.transform.affine();
        let material = Material::additive(self.color, 1.0);
        let vertices = painter.project_mesh(&column.quads, &transform, &material, Some(&column.colors));
        painter.fill(&vertices, column.quads.triangles(), &material);
    }
}
