//! Single meshes that float, spin, pulse and respond to the pointer

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::motion::{approach, attract, Float3, Oscillator, Spin, Tilt};
use super::{Animation, FrameInput};
use crate::buffer::MeshBuffer;
use crate::color::Rgb;
use crate::geometry::{
    cone, dodecahedron, feature_edges, icosahedron, octahedron, tetrahedron, torus, uv_sphere, wire_edges,
};
use crate::graphics::{Material, Painter};
use crate::lighting::Light;
use crate::math::{add, Transform, Vec3};
use crate::scene::NodeDescriptor;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
    Sphere {
        radius: f32,
        width_segments: usize,
        height_segments: usize,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: usize,
        tubular_segments: usize,
    },
    Tetrahedron(f32),
    Octahedron(f32),
    Icosahedron(f32),
    Dodecahedron(f32),
    /// Low-poly cone with every vertex jittered from the node seed
    Cone {
        radius: f32,
        height: f32,
        radial_segments: usize,
        jitter: f32,
    },
}

impl ShapeKind {
    fn build(&self, seed: u64) -> MeshBuffer {
        match *self {
            ShapeKind::Sphere {
                radius,
                width_segments,
                height_segments,
            } => uv_sphere(radius, width_segments, height_segments),
            ShapeKind::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments, tubular_segments),
            ShapeKind::Tetrahedron(radius) => tetrahedron(radius),
            ShapeKind::Octahedron(radius) => octahedron(radius),
            ShapeKind::Icosahedron(radius) => icosahedron(radius),
            ShapeKind::Dodecahedron(radius) => dodecahedron(radius),
            ShapeKind::Cone {
                radius,
                height,
                radial_segments,
                jitter,
            } => {
                let mut rng = StdRng::seed_from_u64(seed);
                cone(radius, height, radial_segments, jitter, &mut rng)
            }
        }
    }
}

/// How a shape reacts to `pointer * reach`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerResponse {
    #[default]
    None,
    /// Pulled a fraction of the way to the target each frame
    Attract {
        reach: f32,
        factor: f32,
        radius: Option<f32>,
    },
    /// Pushed away from the target while near it, springing back otherwise
    Repel {
        reach: f32,
        radius: f32,
        push: f32,
        spring: f32,
    },
    Tilt(Tilt),
    /// Eases its scale towards `scale` while the target is near
    Hover {
        reach: f32,
        radius: f32,
        scale: f32,
        factor: f32,
    },
}

/// Surface fill of a shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    /// Lit, with an emissive floor
    Standard { opacity: f32, emissive: f32 },
    /// Unlit, alpha blended
    Basic { opacity: f32 },
    /// Three colors swirled by angle around Z, depth and time; additive
    Gradient { colors: [Rgb; 3], opacity: f32 },
}

/// Edge overlay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wireframe {
    /// Falls back to the node color
    pub color: Option<Rgb>,
    pub opacity: f32,
    /// Dihedral angle in degrees above which an edge is drawn; `None` draws every edge
    pub threshold: Option<f32>,
}

/// Larger translucent copy drawn behind the shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub scale: f32,
    pub opacity: f32,
}

/// Point light that travels with the shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeLight {
    pub intensity: f32,
    pub pulse: Oscillator,
    pub range: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeConfig {
    pub kind: ShapeKind,
    pub float: Float3,
    pub spin: Spin,
    /// Added to the node size to get the current scale
    pub pulse: Option<Oscillator>,
    pub response: PointerResponse,
    pub fill: Option<Fill>,
    pub wire: Option<Wireframe>,
    pub glow: Option<Glow>,
    pub light: Option<ShapeLight>,
}

impl ShapeConfig {
    pub fn new(kind: ShapeKind) -> Self {
        ShapeConfig {
            kind,
            float: Float3::NONE,
            spin: Spin::NONE,
            pulse: None,
            response: PointerResponse::None,
            fill: Some(Fill::Standard {
                opacity: 1.0,
                emissive: 0.0,
            }),
            wire: None,
            glow: None,
            light: None,
        }
    }
}

struct ShapeState {
    mesh: MeshBuffer,
    edges: Vec<[u32; 2]>,
    colors: Vec<Rgb>,
    position: Vec3,
    rotation: Vec3,
    /// Pulse-driven size
    size: f32,
    /// Pointer-driven multiplier on top of `size`
    hover: f32,
    light_intensity: f32,
}

pub struct FloatingShape {
    name: String,
    transform: Transform,
    color: Rgb,
    size: f32,
    speed: f32,
    seed: u64,
    config: ShapeConfig,
    state: Option<ShapeState>,
}

impl FloatingShape {
    pub fn new(descriptor: &NodeDescriptor, config: ShapeConfig) -> Self {
        FloatingShape {
            name: descriptor.name.clone(),
            transform: descriptor.transform,
            color: descriptor.color,
            size: descriptor.size,
            speed: descriptor.speed,
            seed: descriptor.seed,
            config,
            state: None,
        }
    }

    pub fn mesh(&self) -> Option<&MeshBuffer> {
        self.state.as_ref().map(|state| &state.mesh)
    }

    pub fn position(&self) -> Option<Vec3> {
        self.state.as_ref().map(|state| state.position)
    }

    pub fn rotation(&self) -> Option<Vec3> {
        self.state.as_ref().map(|state| state.rotation)
    }

    /// Current uniform scale, pulse and hover included
    pub fn scale(&self) -> Option<f32> {
        self.state.as_ref().map(|state| state.size * state.hover)
    }

    fn base(&self) -> Vec3 {
        self.transform.position
    }

    fn respond(&self, state: &mut ShapeState, pointer: [f32; 2]) {
        let base = self.base();
        match self.config.response {
            PointerResponse::None => {}
            PointerResponse::Attract { reach, factor, radius } => {
                attract(&mut state.position, [pointer[0] * reach, pointer[1] * reach], radius, factor);
            }
            PointerResponse::Repel {
                reach,
                radius,
                push,
                spring,
            } => {
                let dx = pointer[0] * reach - base[0];
                let dy = pointer[1] * reach - base[1];
                if (dx * dx + dy * dy).sqrt() < radius {
                    state.position[0] = base[0] - dx * push;
                    state.position[1] = base[1] - dy * push;
                } else {
                    state.position[0] = approach(state.position[0], base[0], spring);
                    state.position[1] = approach(state.position[1], base[1], spring);
                }
            }
            PointerResponse::Tilt(tilt) => tilt.ease(&mut state.rotation, pointer),
            PointerResponse::Hover {
                reach,
                radius,
                scale,
                factor,
            } => {
                let dx = pointer[0] * reach - base[0];
                let dy = pointer[1] * reach - base[1];
                let target = if (dx * dx + dy * dy).sqrt() < radius { scale } else { 1.0 };
                state.hover = approach(state.hover, target, factor);
            }
        }
    }

    fn world(&self, state: &ShapeState, extra_scale: f32) -> Transform {
        let scale = state.size * state.hover * extra_scale;
        Transform {
            position: state.position,
            rotation: add(&self.transform.rotation, &state.rotation),
            scale: [
                self.transform.scale[0] * scale,
                self.transform.scale[1] * scale,
                self.transform.scale[2] * scale,
            ],
        }
    }
}

/// Color of the swirling three-color gradient at a local vertex position
pub fn gradient_color(colors: &[Rgb; 3], local: &Vec3, t: f32) -> Rgb {
    let angle = local[1].atan2(local[0]);
    let swirl = (angle * 3.0 + t).sin() * 0.5 + 0.5;
    let depth = (local[2] * 2.0 + t * 0.5).cos() * 0.5 + 0.5;
    let brightness = 1.0 + (t * 2.0).sin() * 0.2;
    colors[0].lerp(colors[1], swirl).lerp(colors[2], depth) * brightness
}

impl Animation for FloatingShape {
    fn name(&self) -> &str {
        &self.name
    }

    fn reacts_to_pointer(&self) -> bool {
        self.config.response != PointerResponse::None
    }

    fn mount(&mut self) {
        let mesh = self.config.kind.build(self.seed);
        let edges = match self.config.wire.map(|wire| wire.threshold) {
            None => Vec::new(),
            Some(None) => wire_edges(&mesh),
            Some(Some(threshold)) => feature_edges(&mesh, threshold),
        };
        let colors = vec![self.color; mesh.len()];
        let rotation = match self.config.response {
            PointerResponse::Tilt(tilt) => tilt.rest,
            _ => [0.0; 3],
        };
        self.state = Some(ShapeState {
            mesh,
            edges,
            colors,
            position: self.config.float.offset(&self.base(), 0.0),
            rotation,
            size: self.size + self.config.pulse.map_or(0.0, |p| p.sample(0.0)),
            hover: 1.0,
            light_intensity: self.config.light.map_or(0.0, |l| l.intensity + l.pulse.sample(0.0)),
        });
    }

    fn unmount(&mut self) {
        self.state = None;
    }

    fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    fn update(&mut self, frame: &FrameInput) {
        let Some(mut state) = self.state.take() else {
            return;
        };
        let t = frame.elapsed * self.speed;
        let pointer = [frame.pointer.x, frame.pointer.y];

        // Oscillating axes are driven absolutely; the rest keep their state
        let floated = self.config.float.offset(&self.base(), t);
        let float = self.config.float;
        for (axis, oscillator) in [float.x, float.y, float.z].iter().enumerate() {
            if oscillator.is_some() {
                state.position[axis] = floated[axis];
            }
        }
        self.config.spin.advance(&mut state.rotation, t);
        if let Some(pulse) = self.config.pulse {
            state.size = self.size + pulse.sample(t);
        }
        self.respond(&mut state, pointer);

        if let Some(Fill::Gradient { colors, .. }) = self.config.fill {
            for (color, local) in state.colors.iter_mut().zip(state.mesh.positions()) {
                *color = gradient_color(&colors, local, t);
            }
        }
        if let Some(light) = self.config.light {
            state.light_intensity = light.intensity + light.pulse.sample(t);
        }
        self.state = Some(state);
    }

    fn positions(&self) -> Option<&[Vec3]> {
        self.mesh().map(MeshBuffer::positions)
    }

    fn draw(&self, painter: &mut Painter) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let transform = self.world(state, 1.0).affine();

        if let Some(glow) = self.config.glow {
            let shell = self.world(state, glow.scale).affine();
            let material = Material::basic(self.color, glow.opacity);
            let vertices = painter.project_mesh(&state.mesh, &shell, &material, None);
            painter.fill(&vertices, state.mesh.triangles(), &material);
        }

        let material = match self.config.fill {
            Some(Fill::Standard { opacity, emissive }) => Material::standard(self.color, opacity, emissive),
            Some(Fill::Basic { opacity }) => Material::basic(self.color, opacity),
            Some(Fill::Gradient { opacity, .. }) => Material::additive(self.color, opacity),
            None => Material::basic(self.color, 0.0),
        };
        let vertices = painter.project_mesh(&state.mesh, &transform, &material, Some(&state.colors));
        if self.config.fill.is_some() {
            painter.fill(&vertices, state.mesh.triangles(), &material);
        }
        if let Some(wire) = self.config.wire {
            let material = Material::additive(wire.color.unwrap_or(self.color), wire.opacity);
            painter.outline(&vertices, &state.edges, &material);
        }
    }

    fn lights(&self) -> Vec<Light> {
        match (self.config.light, self.state.as_ref()) {
            (Some(light), Some(state)) => {
                let mut point = Light::point(state.position, self.color, state.light_intensity);
                point.range = light.range;
                vec![point]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerState;
    use crate::scene::NodeKind;

    fn shape(position: Vec3, config: ShapeConfig) -> FloatingShape {
        let descriptor = NodeDescriptor::new("shape", NodeKind::Shape(config.clone())).at(position);
        FloatingShape::new(&descriptor, config)
    }

    fn frame(elapsed: f32, x: f32, y: f32) -> FrameInput {
        FrameInput::new(elapsed, 1.0 / 60.0, PointerState { x, y })
    }

    fn sphere() -> ShapeKind {
        ShapeKind::Sphere {
            radius: 1.0,
            width_segments: 8,
            height_segments: 6,
        }
    }

    #[test]
    fn test_float_at_zero_is_base_plus_phase() {
        let config = ShapeConfig {
            float: Float3 {
                x: Some(Oscillator::cosine(0.4, 0.3, 0.0)),
                y: Some(Oscillator::new(0.6, 0.5, 0.0)),
                z: None,
            },
            ..ShapeConfig::new(sphere())
        };
        let mut shape = shape([-5.0, 2.0, -4.0], config);
        shape.mount();
        shape.update(&frame(0.0, 0.0, 0.0));
        let position = shape.position().unwrap();
        assert!((position[0] + 4.6).abs() < 1e-5);
        assert!((position[1] - 2.0).abs() < 1e-6);
        assert_eq!(position[2], -4.0);
    }

    #[test]
    fn test_attraction_is_smoothed() {
        let config = ShapeConfig {
            response: PointerResponse::Attract {
                reach: 2.5,
                factor: 0.015,
                radius: None,
            },
            ..ShapeConfig::new(sphere())
        };
        let mut shape = shape([0.0, 0.0, -3.0], config);
        shape.mount();
        shape.update(&frame(0.0, 1.0, 1.0));
        let position = shape.position().unwrap();
        assert!((position[0] - 2.5 * 0.015).abs() < 1e-6);
        assert!((position[1] - 2.5 * 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_repel_and_spring_back() {
        let config = ShapeConfig {
            response: PointerResponse::Repel {
                reach: 5.0,
                radius: 4.0,
                push: 0.08,
                spring: 0.05,
            },
            ..ShapeConfig::new(ShapeKind::Icosahedron(0.6))
        };
        let mut shape = shape([4.0, 4.0, 0.0], config);
        shape.mount();
        shape.update(&frame(0.0, 1.0, 1.0));
        let pushed = shape.position().unwrap();
        assert!((pushed[0] - (4.0 - 0.08)).abs() < 1e-6);

        shape.update(&frame(0.1, -1.0, -1.0));
        let back = shape.position().unwrap();
        assert!(back[0] > pushed[0] && back[0] < 4.0);
    }

    #[test]
    fn test_hover_eases_scale() {
        let config = ShapeConfig {
            response: PointerResponse::Hover {
                reach: 5.0,
                radius: 4.0,
                scale: 1.15,
                factor: 0.05,
            },
            ..ShapeConfig::new(ShapeKind::Octahedron(1.0))
        };
        let mut shape = shape([5.0, 5.0, 0.0], config);
        shape.mount();
        for i in 0..200 {
            shape.update(&frame(i as f32 / 60.0, 1.0, 1.0));
        }
        assert!((shape.scale().unwrap() - 1.15).abs() < 1e-3);
    }

    #[test]
    fn test_pulse_and_spin() {
        let config = ShapeConfig {
            pulse: Some(Oscillator::new(0.06, 0.5, 0.0)),
            spin: Spin::PerFrame([0.001, 0.003, 0.0]),
            ..ShapeConfig::new(sphere())
        };
        let mut shape = shape([0.0; 3], config);
        shape.mount();
        assert_eq!(shape.scale(), Some(1.0));
        shape.update(&frame(std::f32::consts::PI, 0.0, 0.0));
        assert!((shape.scale().unwrap() - 1.06).abs() < 1e-5);
        assert!((shape.rotation().unwrap()[1] - 0.003).abs() < 1e-7);
    }

    #[test]
    fn test_cone_is_reproducible() {
        let config = ShapeConfig::new(ShapeKind::Cone {
            radius: 1.5,
            height: 2.5,
            radial_segments: 6,
            jitter: 0.2,
        });
        let mut shape = shape([0.0; 3], config);
        shape.mount();
        let first = shape.mesh().unwrap().clone();
        shape.unmount();
        assert!(shape.mesh().is_none());
        shape.mount();
        assert_eq!(shape.mesh().unwrap(), &first);
    }

    #[test]
    fn test_light_follows_shape() {
        let config = ShapeConfig {
            light: Some(ShapeLight {
                intensity: 2.0,
                pulse: Oscillator::new(0.5, 0.5, 0.0),
                range: None,
            }),
            ..ShapeConfig::new(sphere())
        };
        let mut shape = shape([1.0, 2.0, 3.0], config);
        assert!(shape.lights().is_empty());
        shape.mount();
        let lights = shape.lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(lights[0].intensity, 2.0);
    }
}
