use crate::buffer::{LineBuffer, MeshBuffer};
use crate::camera::{Camera, Projector};
use crate::color::Rgb;
use crate::lighting::Lighting;
use crate::math::{edge_function, normalize, smoothstep, Affine, Vec3};
use crate::vertex::Vertex;

/// How a fragment combines with what is already on the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Adds color scaled by opacity; never occludes
    Additive,
    /// Mixes towards the color by opacity
    Alpha,
}

/// Surface appearance of a primitive
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub opacity: f32,
    pub blend: Blend,
    /// Whether scene lights affect the color
    pub lit: bool,
    /// Fraction of the base color added regardless of lighting
    pub emissive: f32,
}

impl Material {
    /// Unlit, alpha blended
    pub fn basic(color: Rgb, opacity: f32) -> Self {
        Material {
            color,
            opacity,
            blend: Blend::Alpha,
            lit: false,
            emissive: 0.0,
        }
    }

    /// Unlit, additively blended
    pub fn additive(color: Rgb, opacity: f32) -> Self {
        Material {
            blend: Blend::Additive,
            ..Material::basic(color, opacity)
        }
    }

    /// Lit, alpha blended, with an emissive floor
    pub fn standard(color: Rgb, opacity: f32, emissive: f32) -> Self {
        Material {
            lit: true,
            emissive,
            ..Material::basic(color, opacity)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Linear distance fog
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fraction of fog at the given view depth
    pub fn factor(&self, depth: f32) -> f32 {
        smoothstep(self.near, self.far, depth)
    }

    fn apply(&self, color: Rgb, depth: f32, blend: Blend) -> Rgb {
        let factor = self.factor(depth);
        match blend {
            Blend::Alpha => color.lerp(self.color, factor),
            Blend::Additive => color * (1.0 - factor),
        }
    }
}

/// RGB framebuffer with a depth buffer
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    depth: Vec<f32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
            depth: vec![f32::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, Rgb::BLACK);
        self.depth.resize(width * height, f32::INFINITY);
    }

    /// Fills the color buffer and resets the depth buffer
    pub fn clear(&mut self, background: Rgb) {
        self.pixels.fill(background);
        self.depth.fill(f32::INFINITY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Average color over the half-open pixel rectangle, clamped to the canvas
    pub fn block_average(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> Rgb {
        let (x1, y1) = (x1.min(self.width), y1.min(self.height));
        if x0 >= x1 || y0 >= y1 {
            return Rgb::BLACK;
        }
        let mut sum = Rgb::BLACK;
        for y in y0..y1 {
            for x in x0..x1 {
                sum += self.pixels[y * self.width + x];
            }
        }
        sum * (1.0 / ((x1 - x0) * (y1 - y0)) as f32)
    }

    /// Blends one fragment after a depth test
    pub fn blend(&mut self, x: usize, y: usize, depth: f32, color: Rgb, opacity: f32, blend: Blend) {
        let offset = y * self.width + x;
        if depth > self.depth[offset] {
            return;
        }
        match blend {
            Blend::Additive => self.pixels[offset] += color * opacity,
            Blend::Alpha => {
                self.pixels[offset] = self.pixels[offset].lerp(color, opacity.clamp(0.0, 1.0));
                // Mostly transparent surfaces do not occlude
                if opacity >= 0.5 {
                    self.depth[offset] = depth;
                }
            }
        }
    }
}

/// Draws a triangle with per-pixel lighting
pub fn draw_triangle(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    canvas: &mut Canvas,
    lighting: &Lighting,
    material: &Material,
    fog: Option<&Fog>,
) {
    if canvas.width == 0 || canvas.height == 0 {
        return;
    }

    // Compute bounding box of the triangle
    let min_x = v0.screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0);
    let max_x = v0.screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(canvas.width as f32 - 1.0);
    let min_y = v0.screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0);
    let max_y = v0.screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(canvas.height as f32 - 1.0);
    if min_x > max_x || min_y > max_y {
        return;
    }

    // Precompute area of the triangle; either winding is drawn
    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area.abs() < 1e-6 {
        return;
    }

    // For each pixel in the bounding box
    for y in min_y as usize..=max_y as usize {
        for x in min_x as usize..=max_x as usize {
            let p = [x as f32 + 0.5, y as f32 + 0.5];

            // Normalized barycentric coordinates
            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p) / area;
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p) / area;
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            let base = v0.color * w0 + v1.color * w1 + v2.color * w2;

            let mut color = if material.lit {
                // Interpolate position and normal
                let position = interpolate(&v0.position, &v1.position, &v2.position, w0, w1, w2);
                let normal = interpolate(&v0.normal, &v1.normal, &v2.normal, w0, w1, w2);
                let normal = normalize(&normal);
                lighting.shade(base, &normal, &position) + base * material.emissive
            } else {
                base
            };
            if let Some(fog) = fog {
                color = fog.apply(color, depth, material.blend);
            }
            canvas.blend(x, y, depth, color, material.opacity, material.blend);
        }
    }
}

fn interpolate(a: &Vec3, b: &Vec3, c: &Vec3, w0: f32, w1: f32, w2: f32) -> Vec3 {
    [
        a[0] * w0 + b[0] * w1 + c[0] * w2,
        a[1] * w0 + b[1] * w1 + c[1] * w2,
        a[2] * w0 + b[2] * w1 + c[2] * w2,
    ]
}

/// Clips the parametric segment to the canvas rectangle (Liang-Barsky)
fn clip_segment(p0: [f32; 2], p1: [f32; 2], width: f32, height: f32) -> Option<(f32, f32)> {
    let (dx, dy) = (p1[0] - p0[0], p1[1] - p0[1]);
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    let checks = [
        (-dx, p0[0]),
        (dx, width - 1.0 - p0[0]),
        (-dy, p0[1]),
        (dy, height - 1.0 - p0[1]),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Draws a line between two vertices using Bresenham's algorithm
pub fn draw_line(v0: &Vertex, v1: &Vertex, canvas: &mut Canvas, material: &Material, fog: Option<&Fog>) {
    if canvas.width == 0 || canvas.height == 0 {
        return;
    }
    let Some((t0, t1)) = clip_segment(
        v0.screen_position,
        v1.screen_position,
        canvas.width as f32,
        canvas.height as f32,
    ) else {
        return;
    };
    let at = |t: f32, a: f32, b: f32| a + (b - a) * t;
    let start = [
        at(t0, v0.screen_position[0], v1.screen_position[0]),
        at(t0, v0.screen_position[1], v1.screen_position[1]),
    ];
    let end = [
        at(t1, v0.screen_position[0], v1.screen_position[0]),
        at(t1, v0.screen_position[1], v1.screen_position[1]),
    ];
    let (depth0, depth1) = (at(t0, v0.depth, v1.depth), at(t1, v0.depth, v1.depth));
    let color0 = v0.color.lerp(v1.color, t0);
    let color1 = v0.color.lerp(v1.color, t1);

    let (mut x0, mut y0, x1, y1) = (
        start[0].round() as isize,
        start[1].round() as isize,
        end[0].round() as isize,
        end[1].round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy
    let steps = dx.max(-dy).max(1) as f32;
    let mut step = 0.0f32;

    loop {
        if x0 >= 0 && x0 < canvas.width as isize && y0 >= 0 && y0 < canvas.height as isize {
            let t = step / steps;
            let depth = depth0 + (depth1 - depth0) * t;
            let mut color = color0.lerp(color1, t);
            if let Some(fog) = fog {
                color = fog.apply(color, depth, material.blend);
            }
            canvas.blend(x0 as usize, y0 as usize, depth, color, material.opacity, material.blend);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
        step += 1.0;
    }
}

/// Draws a round point sprite; sprites under a pixel wide fade by coverage
pub fn draw_point(
    center: [f32; 2],
    depth: f32,
    diameter: f32,
    color: Rgb,
    material: &Material,
    canvas: &mut Canvas,
    fog: Option<&Fog>,
) {
    let coverage = diameter.min(1.0).powi(2);
    let radius = (diameter / 2.0).max(0.5);
    let min_x = (center[0] - radius).floor().max(0.0) as isize;
    let max_x = (center[0] + radius).ceil().min(canvas.width as f32) as isize;
    let min_y = (center[1] - radius).floor().max(0.0) as isize;
    let max_y = (center[1] + radius).ceil().min(canvas.height as f32) as isize;

    let color = match fog {
        Some(fog) => fog.apply(color, depth, material.blend),
        None => color,
    };
    let opacity = material.opacity * coverage;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f32 + 0.5 - center[0], y as f32 + 0.5 - center[1]);
            if px * px + py * py <= radius * radius {
                canvas.blend(x as usize, y as usize, depth, color, opacity, material.blend);
            }
        }
    }
}

/// Draws primitives into a canvas through one camera, light set and fog
pub struct Painter<'a> {
    canvas: &'a mut Canvas,
    projector: Projector,
    lighting: &'a Lighting,
    fog: Option<Fog>,
}

impl<'a> Painter<'a> {
    pub fn new(canvas: &'a mut Canvas, camera: &Camera, lighting: &'a Lighting, fog: Option<Fog>) -> Self {
        let projector = camera.projector(canvas.width(), canvas.height());
        Painter {
            canvas,
            projector,
            lighting,
            fog,
        }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Transforms and projects one vertex
    pub fn project(&self, point: &Vec3, normal: &Vec3, transform: &Affine, color: Rgb) -> Option<Vertex> {
        let position = transform.apply(point);
        let (screen_position, depth) = self.projector.project(&position)?;
        Some(Vertex {
            position,
            screen_position,
            depth,
            normal: transform.apply_normal(normal),
            color,
        })
    }

    /// Projects every mesh vertex; `colors` overrides the material color per vertex
    pub fn project_mesh(
        &self,
        mesh: &MeshBuffer,
        transform: &Affine,
        material: &Material,
        colors: Option<&[Rgb]>,
    ) -> Vec<Option<Vertex>> {
        mesh.positions()
            .iter()
            .zip(mesh.normals())
            .enumerate()
            .map(|(i, (point, normal))| {
                let color = colors
                    .and_then(|c| c.get(i).copied())
                    .unwrap_or(material.color);
                self.project(point, normal, transform, color)
            })
            .collect()
    }

    /// Fills triangles of already projected vertices
    pub fn fill(&mut self, vertices: &[Option<Vertex>], triangles: &[[u32; 3]], material: &Material) {
        for &[a, b, c] in triangles {
            let corners = (
                vertices.get(a as usize).copied().flatten(),
                vertices.get(b as usize).copied().flatten(),
                vertices.get(c as usize).copied().flatten(),
            );
            if let (Some(v0), Some(v1), Some(v2)) = corners {
                draw_triangle(&v0, &v1, &v2, self.canvas, self.lighting, material, self.fog.as_ref());
            }
        }
    }

    /// Strokes edges between already projected vertices
    pub fn outline(&mut self, vertices: &[Option<Vertex>], edges: &[[u32; 2]], material: &Material) {
        for &[a, b] in edges {
            let ends = (
                vertices.get(a as usize).copied().flatten(),
                vertices.get(b as usize).copied().flatten(),
            );
            if let (Some(mut v0), Some(mut v1)) = ends {
                v0.color = material.color;
                v1.color = material.color;
                draw_line(&v0, &v1, self.canvas, material, self.fog.as_ref());
            }
        }
    }

    /// Strokes every segment of a line buffer
    pub fn lines(&mut self, lines: &LineBuffer, transform: &Affine, material: &Material, colors: Option<&[Rgb]>) {
        let color_at = |i: usize| {
            colors
                .and_then(|c| c.get(i).copied())
                .unwrap_or(material.color)
        };
        let normal = [0.0, 0.0, 1.0];
        for (k, segment) in lines.positions().chunks_exact(2).enumerate() {
            let v0 = self.project(&segment[0], &normal, transform, color_at(k * 2));
            let v1 = self.project(&segment[1], &normal, transform, color_at(k * 2 + 1));
            if let (Some(v0), Some(v1)) = (v0, v1) {
                draw_line(&v0, &v1, self.canvas, material, self.fog.as_ref());
            }
        }
    }

    /// Draws a size-attenuated point sprite of `size` world units
    pub fn point(&mut self, position: &Vec3, transform: &Affine, size: f32, color: Rgb, material: &Material) {
        let world = transform.apply(position);
        if let Some((screen, depth)) = self.projector.project(&world) {
            let diameter = size * self.projector.pixels_per_unit(depth);
            draw_point(screen, depth, diameter, color, material, self.canvas, self.fog.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, color: Rgb) -> Vertex {
        Vertex {
            position: [x, y, 0.0],
            screen_position: [x, y],
            depth: 5.0,
            normal: [0.0, 0.0, 1.0],
            color,
        }
    }

    #[test]
    fn test_triangle_fills_both_windings() {
        let lighting = Lighting::default();
        let material = Material::basic(Rgb::WHITE, 1.0);
        for flip in [false, true] {
            let mut canvas = Canvas::new(10, 10);
            let (a, b, c) = (
                vertex(0.0, 0.0, Rgb::WHITE),
                vertex(10.0, 0.0, Rgb::WHITE),
                vertex(0.0, 10.0, Rgb::WHITE),
            );
            if flip {
                draw_triangle(&a, &c, &b, &mut canvas, &lighting, &material, None);
            } else {
                draw_triangle(&a, &b, &c, &mut canvas, &lighting, &material, None);
            }
            assert!(canvas.pixel(1, 1).g > 0.99);
            assert_eq!(canvas.pixel(9, 9), Rgb::BLACK);
        }
    }

    #[test]
    fn test_line_is_clipped() {
        let mut canvas = Canvas::new(8, 8);
        let material = Material::additive(Rgb::WHITE, 1.0);
        draw_line(
            &vertex(-100.0, 4.0, Rgb::WHITE),
            &vertex(100.0, 4.0, Rgb::WHITE),
            &mut canvas,
            &material,
            None,
        );
        for x in 0..8 {
            assert_eq!(canvas.pixel(x, 4), Rgb::WHITE);
        }
        assert_eq!(canvas.pixel(0, 3), Rgb::BLACK);
    }

    #[test]
    fn test_line_outside_is_skipped() {
        let mut canvas = Canvas::new(8, 8);
        let material = Material::additive(Rgb::WHITE, 1.0);
        draw_line(
            &vertex(-10.0, -10.0, Rgb::WHITE),
            &vertex(-1.0, -10.0, Rgb::WHITE),
            &mut canvas,
            &material,
            None,
        );
        assert!(canvas.pixels().iter().all(|&p| p == Rgb::BLACK));
    }

    #[test]
    fn test_depth_test_and_additive() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend(0, 0, 2.0, Rgb::WHITE, 1.0, Blend::Alpha);
        canvas.blend(0, 0, 3.0, Rgb::new(1.0, 0.0, 0.0), 1.0, Blend::Alpha);
        assert_eq!(canvas.pixel(0, 0), Rgb::WHITE);
        canvas.clear(Rgb::BLACK);
        canvas.blend(0, 0, 1.0, Rgb::new(0.2, 0.0, 0.0), 0.5, Blend::Additive);
        canvas.blend(0, 0, 1.0, Rgb::new(0.2, 0.0, 0.0), 0.5, Blend::Additive);
        assert!((canvas.pixel(0, 0).r - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_fog_fades_far_fragments() {
        let fog = Fog {
            color: Rgb::BLACK,
            near: 10.0,
            far: 20.0,
        };
        assert_eq!(fog.factor(5.0), 0.0);
        assert_eq!(fog.factor(25.0), 1.0);
        assert_eq!(fog.apply(Rgb::WHITE, 30.0, Blend::Additive), Rgb::BLACK);
    }

    #[test]
    fn test_block_average() {
        let mut canvas = Canvas::new(2, 2);
        canvas.pixels_mut()[0] = Rgb::WHITE;
        let average = canvas.block_average(0, 0, 2, 2);
        assert!((average.r - 0.25).abs() < 1e-6);
    }
}
