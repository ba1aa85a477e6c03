use super::motion::approach;
use super::{Animation, FrameInput};
use crate::buffer::{MeshBuffer, Particle, ParticleBuffer};
use crate::color::Rgb;
use crate::geometry::ring;
use crate::graphics::{Material, Painter};
use crate::math::{Affine, Transform, Vec3};
use crate::scene::NodeDescriptor;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: usize,
    /// World units per unit of pointer offset, per axis
    pub reach: [f32; 2],
    pub smoothing: f32,
    /// Radians added to the ring's Z rotation each frame
    pub spin: f32,
    pub opacity: f32,
    pub trail_length: usize,
    /// Depth step between consecutive trail points
    pub trail_spacing: f32,
    pub trail_size: f32,
    pub trail_opacity: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig {
            inner_radius: 0.3,
            outer_radius: 0.5,
            segments: 32,
            reach: [10.0, 8.0],
            smoothing: 0.1,
            spin: 0.05,
            opacity: 0.8,
            trail_length: 50,
            trail_spacing: 0.05,
            trail_size: 0.1,
            trail_opacity: 0.6,
        }
    }
}

struct CursorState {
    ring: MeshBuffer,
    /// Most recent position first
    trail: ParticleBuffer,
    position: Vec3,
    spin: f32,
}

/// Ring that chases the pointer, leaving a fading trail of points
pub struct CursorTrail {
    name: String,
    transform: Transform,
    color: Rgb,
    config: CursorConfig,
    state: Option<CursorState>,
}

impl CursorTrail {
    pub fn new(descriptor: &NodeDescriptor, config: CursorConfig) -> Self {
        CursorTrail {
            name: descriptor.name.clone(),
            transform: descriptor.transform,
            color: descriptor.color,
            config,
            state: None,
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        self.state.as_ref().map(|state| state.position)
    }

    pub fn trail(&self) -> Option<&[Vec3]> {
        self.state.as_ref().map(|state| state.trail.positions())
    }
}

impl Animation for CursorTrail {
    fn name(&self) -> &str {
        &self.name
    }

    fn reacts_to_pointer(&self) -> bool {
        true
    }

    fn mount(&mut self) {
        let start = self.transform.position;
        let size = self.config.trail_size;
        let color = self.color;
        self.state = Some(CursorState {
            ring: ring(self.config.inner_radius, self.config.outer_radius, self.config.segments),
            trail: ParticleBuffer::from_fn(self.config.trail_length, |_| Particle {
                position: start,
                color,
                size,
            }),
            position: start,
            spin: 0.0,
        });
    }

    fn unmount(&mut self) {
        self.state = None;
    }

    fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    fn update(&mut self, frame: &FrameInput) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let target = [
            frame.pointer.x * self.config.reach[0],
            frame.pointer.y * self.config.reach[1],
        ];
        state.position[0] = approach(state.position[0], target[0], self.config.smoothing);
        state.position[1] = approach(state.position[1], target[1], self.config.smoothing);
        state.position[2] = self.transform.position[2];
        state.spin += self.config.spin;

        let trail = state.trail.positions_mut();
        if !trail.is_empty() {
            trail.rotate_right(1);
            trail[0] = state.position;
        }
    }

    fn positions(&self) -> Option<&[Vec3]> {
        self.trail()
    }

    fn draw(&self, painter: &mut Painter) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let transform = Transform {
            position: state.position,
            rotation: [0.0, 0.0, state.spin],
            ..self.transform
        }
        .affine();
        let material = Material::basic(self.color, self.config.opacity);
        let vertices = painter.project_mesh(&state.ring, &transform, &material, None);
        painter.fill(&vertices, state.ring.triangles(), &material);

        let material = Material::additive(self.color, self.config.trail_opacity);
        for (i, (point, size)) in state
            .trail
            .positions()
            .iter()
            .zip(state.trail.sizes())
            .enumerate()
        {
            let position = [point[0], point[1], point[2] - i as f32 * self.config.trail_spacing];
            painter.point(&position, &Affine::IDENTITY, *size, self.color, &material);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerState;
    use crate::scene::NodeKind;

    fn cursor() -> CursorTrail {
        let config = CursorConfig::default();
        let descriptor = NodeDescriptor::new("cursor", NodeKind::Cursor(config)).at([0.0, 0.0, 2.0]);
        CursorTrail::new(&descriptor, config)
    }

    #[test]
    fn test_follows_pointer_with_smoothing() {
        let mut cursor = cursor();
        cursor.mount();
        cursor.update(&FrameInput::new(0.0, 0.016, PointerState { x: 1.0, y: 1.0 }));
        let position = cursor.position().unwrap();
        assert!((position[0] - 1.0).abs() < 1e-6);
        assert!((position[1] - 0.8).abs() < 1e-6);
        assert_eq!(position[2], 2.0);
    }

    #[test]
    fn test_trail_has_fixed_length() {
        let mut cursor = cursor();
        cursor.mount();
        for i in 0..120 {
            let x = (i as f32 * 0.1).sin();
            cursor.update(&FrameInput::new(i as f32 / 60.0, 1.0 / 60.0, PointerState { x, y: 0.0 }));
        }
        let trail = cursor.trail().unwrap();
        assert_eq!(trail.len(), 50);
        assert_eq!(trail[0], cursor.position().unwrap());
    }

    #[test]
    fn test_unmounted_cursor_ignores_updates() {
        let mut cursor = cursor();
        cursor.update(&FrameInput::default());
        assert!(cursor.position().is_none());
        cursor.mount();
        cursor.unmount();
        cursor.update(&FrameInput::new(1.0, 1.0, PointerState { x: 1.0, y: 1.0 }));
        assert!(cursor.trail().is_none());
    }
}
