//! Procedurally displaced surfaces: wave planes, line grids and terrain

use super::motion::{Float3, Spin, Tilt};
use super::{Animation, FrameInput};
use crate::buffer::{LineBuffer, MeshBuffer};
use crate::color::Rgb;
use crate::geometry::{feature_edges, lattice_lines, line_grid, plane, terrain, wire_edges};
use crate::graphics::{Material, Painter};
use crate::math::{add, Transform, Vec3};
use crate::scene::NodeDescriptor;

/// Planar coordinate a wave term travels along
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveAxis {
    X,
    Y,
    /// `x + y`
    Diagonal,
    /// Distance from the local origin
    Radial,
}

/// `amplitude * sin(coordinate * frequency + t * speed + phase)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveTerm {
    pub axis: WaveAxis,
    pub frequency: f32,
    pub speed: f32,
    pub amplitude: f32,
    pub phase: f32,
}

impl WaveTerm {
    pub const fn sin(axis: WaveAxis, frequency: f32, speed: f32, amplitude: f32) -> Self {
        WaveTerm {
            axis,
            frequency,
            speed,
            amplitude,
            phase: 0.0,
        }
    }

    pub const fn cos(axis: WaveAxis, frequency: f32, speed: f32, amplitude: f32) -> Self {
        WaveTerm {
            phase: std::f32::consts::FRAC_PI_2,
            ..WaveTerm::sin(axis, frequency, speed, amplitude)
        }
    }

    pub fn sample(&self, x: f32, y: f32, t: f32) -> f32 {
        let coordinate = match self.axis {
            WaveAxis::X => x,
            WaveAxis::Y => y,
            WaveAxis::Diagonal => x + y,
            WaveAxis::Radial => (x * x + y * y).sqrt(),
        };
        self.amplitude * (coordinate * self.frequency + t * self.speed + self.phase).sin()
    }
}

/// Pointer-centered displacement, centered on `pointer * reach`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ripple {
    /// `sin(d * wavenumber - t * angular_speed) * exp(-d * decay) * amplitude`
    Wave {
        reach: f32,
        wavenumber: f32,
        angular_speed: f32,
        decay: f32,
        amplitude: f32,
    },
    /// `max(0, 1 - d / radius) * amplitude`
    Bump {
        reach: f32,
        radius: f32,
        amplitude: f32,
    },
}

impl Ripple {
    pub fn sample(&self, x: f32, y: f32, t: f32, pointer: [f32; 2]) -> f32 {
        let distance = |reach: f32| {
            let dx = x - pointer[0] * reach;
            let dy = y - pointer[1] * reach;
            (dx * dx + dy * dy).sqrt()
        };
        match *self {
            Ripple::Wave {
                reach,
                wavenumber,
                angular_speed,
                decay,
                amplitude,
            } => {
                let d = distance(reach);
                (d * wavenumber - t * angular_speed).sin() * (-d * decay).exp() * amplitude
            }
            Ripple::Bump {
                reach,
                radius,
                amplitude,
            } => (1.0 - distance(reach) / radius).max(0.0) * amplitude,
        }
    }
}

/// What the displaced surface is built from
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Topology {
    /// Triangulated plane
    Mesh {
        width: f32,
        height: f32,
        segments_x: usize,
        segments_y: usize,
    },
    /// Horizontal and vertical grid lines
    Lines {
        width: f32,
        height: f32,
        divisions_x: usize,
        divisions_y: usize,
        z: f32,
    },
    /// Each lattice point joined to its right and upper neighbour
    Lattice { min: i32, max: i32, step: i32, z: f32 },
    /// Mountain-shaped plane, filled and outlined
    Terrain { width: f32, segments: usize },
}

/// Per-vertex coloring of the surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    /// The node color
    Solid,
    /// `low` to `high` by `elevation * 2 + 0.5`
    Elevation { low: Rgb, high: Rgb },
    /// Pink, blue and cyan cycling with elevation and time
    Rainbow,
}

const RAINBOW: [Rgb; 3] = [
    Rgb::new(1.0, 0.0, 0.43),
    Rgb::new(0.22, 0.53, 1.0),
    Rgb::new(0.02, 1.0, 0.65),
];

impl Shading {
    pub fn color(&self, base: Rgb, elevation: f32, t: f32) -> Rgb {
        match *self {
            Shading::Solid => base,
            Shading::Elevation { low, high } => low.lerp(high, (elevation * 2.0 + 0.5).clamp(0.0, 1.0)),
            Shading::Rainbow => {
                let mix = elevation * 0.2 + 0.5;
                let color = RAINBOW[0].lerp(RAINBOW[1], (mix + t).sin() * 0.5 + 0.5);
                color.lerp(RAINBOW[2], (mix * 2.0 + t * 0.5).cos() * 0.5 + 0.5)
            }
        }
    }
}

/// Outline drawn over a filled surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceWire {
    pub color: Rgb,
    pub opacity: f32,
    /// Dihedral angle in degrees above which a mesh edge is drawn; `None` draws every edge
    pub threshold: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveConfig {
    pub topology: Topology,
    pub terms: Vec<WaveTerm>,
    pub ripple: Option<Ripple>,
    pub shading: Shading,
    pub opacity: f32,
    pub additive: bool,
    pub wire: Option<SurfaceWire>,
    pub tilt: Option<Tilt>,
    pub spin: Spin,
    /// Oscillation added on top of the rotation
    pub sway: Float3,
}

impl Default for WaveConfig {
    fn default() -> Self {
        WaveConfig {
            topology: Topology::Mesh {
                width: 40.0,
                height: 40.0,
                segments_x: 64,
                segments_y: 64,
            },
            terms: Vec::new(),
            ripple: None,
            shading: Shading::Solid,
            opacity: 1.0,
            additive: false,
            wire: None,
            tilt: None,
            spin: Spin::NONE,
            sway: Float3::NONE,
        }
    }
}

enum Surface {
    Mesh {
        mesh: MeshBuffer,
        edges: Vec<[u32; 2]>,
    },
    Lines(LineBuffer),
}

impl Surface {
    fn build(topology: &Topology, wire: Option<&SurfaceWire>) -> Surface {
        let outlined = |mesh: MeshBuffer| {
            let edges = match wire.map(|w| w.threshold) {
                None => Vec::new(),
                Some(None) => wire_edges(&mesh),
                Some(Some(threshold)) => feature_edges(&mesh, threshold),
            };
            Surface::Mesh { mesh, edges }
        };
        match *topology {
            Topology::Mesh {
                width,
                height,
                segments_x,
                segments_y,
            } => outlined(plane(width, height, segments_x, segments_y)),
            Topology::Terrain { width, segments } => outlined(terrain(width, segments)),
            Topology::Lines {
                width,
                height,
                divisions_x,
                divisions_y,
                z,
            } => Surface::Lines(line_grid(width, height, divisions_x, divisions_y, z)),
            Topology::Lattice { min, max, step, z } => Surface::Lines(lattice_lines(min, max, step, z)),
        }
    }

    fn vertex_count(&self) -> usize {
        match self {
            Surface::Mesh { mesh, .. } => mesh.len(),
            Surface::Lines(lines) => lines.len(),
        }
    }
}

struct WaveState {
    surface: Surface,
    colors: Vec<Rgb>,
    rotation: Vec3,
    sway: Vec3,
}

/// Plane, grid or terrain whose elevation is a closed-form function of position and time
pub struct WaveSurface {
    name: String,
    transform: Transform,
    color: Rgb,
    speed: f32,
    config: WaveConfig,
    state: Option<WaveState>,
}

impl WaveSurface {
    pub fn new(descriptor: &NodeDescriptor, config: WaveConfig) -> Self {
        WaveSurface {
            name: descriptor.name.clone(),
            transform: descriptor.transform,
            color: descriptor.color,
            speed: descriptor.speed,
            config,
            state: None,
        }
    }

    /// Elevation offset at a rest position
    pub fn elevation(&self, x: f32, y: f32, t: f32, pointer: [f32; 2]) -> f32 {
        let waves: f32 = self.config.terms.iter().map(|term| term.sample(x, y, t)).sum();
        let ripple = self
            .config
            .ripple
            .map_or(0.0, |ripple| ripple.sample(x, y, t, pointer));
        waves + ripple
    }

    pub fn mesh(&self) -> Option<&MeshBuffer> {
        match self.state.as_ref().map(|state| &state.surface) {
            Some(Surface::Mesh { mesh, .. }) => Some(mesh),
            _ => None,
        }
    }

    pub fn rotation(&self) -> Option<Vec3> {
        self.state.as_ref().map(|state| state.rotation)
    }
}

impl Animation for WaveSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn reacts_to_pointer(&self) -> bool {
        self.config.ripple.is_some() || self.config.tilt.is_some()
    }

    fn mount(&mut self) {
        let surface = Surface::build(&self.config.topology, self.config.wire.as_ref());
        let colors = vec![self.color; surface.vertex_count()];
        let rotation = self.config.tilt.map_or([0.0; 3], |tilt| tilt.rest);
        self.state = Some(WaveState {
            surface,
            colors,
            rotation,
            sway: [0.0; 3],
        });
    }

    fn unmount(&mut self) {
        self.state = None;
    }

    fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    fn update(&mut self, frame: &FrameInput) {
        if self.state.is_none() {
            return;
        }
        let t = frame.elapsed * self.speed;
        let pointer = [frame.pointer.x, frame.pointer.y];

        let elevations: Vec<(Vec3, f32)> = match self.state.as_ref().map(|state| &state.surface) {
            Some(Surface::Mesh { mesh, .. }) => mesh
                .rest()
                .iter()
                .map(|rest| (*rest, self.elevation(rest[0], rest[1], t, pointer)))
                .collect(),
            Some(Surface::Lines(lines)) => lines
                .rest()
                .iter()
                .map(|rest| (*rest, self.elevation(rest[0], rest[1], t, pointer)))
                .collect(),
            None => return,
        };

        let config = &self.config;
        let base = self.color;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let positions = match &mut state.surface {
            Surface::Mesh { mesh, .. } => mesh.positions_mut(),
            Surface::Lines(lines) => lines.positions_mut(),
        };
        for ((position, (rest, offset)), color) in positions.iter_mut().zip(&elevations).zip(&mut state.colors) {
            position[2] = rest[2] + offset;
            *color = config.shading.color(base, *offset, t);
        }
        if let Surface::Mesh { mesh, .. } = &mut state.surface {
            mesh.recompute_normals();
        }

        config.spin.advance(&mut state.rotation, t);
        if let Some(tilt) = config.tilt {
            tilt.ease(&mut state.rotation, pointer);
        }
        state.sway = config.sway.offset(&[0.0; 3], t);
    }

    fn positions(&self) -> Option<&[Vec3]> {
        self.state.as_ref().map(|state| match &state.surface {
            Surface::Mesh { mesh, .. } => mesh.positions(),
            Surface::Lines(lines) => lines.positions(),
        })
    }

    fn draw(&self, painter: &mut Painter) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let rotation = add(&add(&self.transform.rotation, &state.rotation), &state.sway);
        let transform = Transform {
            rotation,
            ..self.transform
        }
        .affine();
        let mut material = if self.config.additive {
            Material::additive(self.color, self.config.opacity)
        } else {
            Material::basic(self.color, self.config.opacity)
        };
        match &state.surface {
            Surface::Mesh { mesh, edges } => {
                let vertices = painter.project_mesh(mesh, &transform, &material, Some(&state.colors));
                painter.fill(&vertices, mesh.triangles(), &material);
                if let Some(wire) = self.config.wire {
                    material = Material::additive(wire.color, wire.opacity);
                    painter.outline(&vertices, edges, &material);
                }
            }
            Surface::Lines(lines) => {
                painter.lines(lines, &transform, &material, Some(&state.colors));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerState;
    use crate::scene::NodeKind;

    fn surface(config: WaveConfig) -> WaveSurface {
        let descriptor = NodeDescriptor::new("wave", NodeKind::Wave(config.clone()));
        WaveSurface::new(&descriptor, config)
    }

    fn small_mesh() -> Topology {
        Topology::Mesh {
            width: 4.0,
            height: 4.0,
            segments_x: 4,
            segments_y: 4,
        }
    }

    #[test]
    fn test_terms_at_zero_are_phase_values() {
        let sin = WaveTerm::sin(WaveAxis::X, 0.5, 1.0, 0.5);
        let cos = WaveTerm::cos(WaveAxis::Y, 0.5, 0.8, 0.5);
        assert_eq!(sin.sample(0.0, 3.0, 0.0), 0.0);
        assert!((cos.sample(3.0, 0.0, 0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bump_peaks_under_pointer() {
        let bump = Ripple::Bump {
            reach: 15.0,
            radius: 8.0,
            amplitude: 2.0,
        };
        assert_eq!(bump.sample(15.0, 15.0, 0.0, [1.0, 1.0]), 2.0);
        assert_eq!(bump.sample(-10.0, -10.0, 0.0, [1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_update_before_mount_is_noop() {
        let mut wave = surface(WaveConfig::default());
        wave.update(&FrameInput::new(1.0, 0.016, PointerState::default()));
        assert!(wave.positions().is_none());
    }

    #[test]
    fn test_displacement_is_relative_to_rest() {
        let mut wave = surface(WaveConfig {
            topology: Topology::Terrain {
                width: 24.0,
                segments: 8,
            },
            terms: vec![WaveTerm::sin(WaveAxis::X, 0.4, 0.5, 0.15)],
            ..WaveConfig::default()
        });
        wave.mount();
        let rest = wave.mesh().unwrap().rest().to_vec();
        // Repeating the same instant must not accumulate
        for _ in 0..5 {
            wave.update(&FrameInput::new(2.0, 0.016, PointerState::default()));
        }
        let positions = wave.positions().unwrap();
        for (p, r) in positions.iter().zip(&rest) {
            let expected = r[2] + 0.15 * (r[0] * 0.4 + 2.0 * 0.5).sin();
            assert!((p[2] - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_normals_follow_displacement() {
        let mut wave = surface(WaveConfig {
            topology: small_mesh(),
            terms: vec![WaveTerm::sin(WaveAxis::X, 1.0, 0.0, 1.0)],
            ..WaveConfig::default()
        });
        wave.mount();
        let flat = wave.mesh().unwrap().normals().to_vec();
        wave.update(&FrameInput::new(0.0, 0.016, PointerState::default()));
        assert_ne!(wave.mesh().unwrap().normals(), flat.as_slice());
    }

    #[test]
    fn test_line_lengths_are_invariant() {
        let mut wave = surface(WaveConfig {
            topology: Topology::Lattice {
                min: -10,
                max: 10,
                step: 2,
                z: -8.0,
            },
            ripple: Some(Ripple::Bump {
                reach: 15.0,
                radius: 8.0,
                amplitude: 2.0,
            }),
            ..WaveConfig::default()
        });
        wave.mount();
        let count = wave.positions().unwrap().len();
        for i in 0..30 {
            wave.update(&FrameInput::new(i as f32 * 0.1, 0.1, PointerState { x: 0.5, y: 0.5 }));
        }
        assert_eq!(wave.positions().unwrap().len(), count);
        assert!(wave.positions().unwrap().iter().any(|p| p[2] > -8.0));
    }

    #[test]
    fn test_tilt_starts_at_rest_and_eases() {
        let rest = -std::f32::consts::FRAC_PI_3;
        let mut wave = surface(WaveConfig {
            topology: small_mesh(),
            tilt: Some(Tilt {
                rest: [rest, 0.0, 0.0],
                pitch: 0.15,
                yaw: 0.2,
                roll: 0.0,
                factor: 0.02,
            }),
            ..WaveConfig::default()
        });
        wave.mount();
        assert_eq!(wave.rotation().unwrap()[0], rest);
        wave.update(&FrameInput::new(0.0, 0.016, PointerState { x: 1.0, y: 0.0 }));
        let rotation = wave.rotation().unwrap();
        assert!((rotation[1] - 0.004).abs() < 1e-6);
        assert_eq!(rotation[0], rest);
    }

    #[test]
    fn test_rainbow_stays_in_gamut() {
        for elevation in [-3.0, 0.0, 3.0] {
            let c = Shading::Rainbow.color(Rgb::WHITE, elevation, 1.3);
            assert!((0.0..=1.0).contains(&c.r) && (0.0..=1.0).contains(&c.g) && (0.0..=1.0).contains(&c.b));
        }
    }
}
