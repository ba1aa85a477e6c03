use super::motion::Tilt;
use super::{Animation, FrameInput};
use crate::buffer::{LineBuffer, Particle, ParticleBuffer};
use crate::color::Rgb;
use crate::geometry::{fibonacci_sphere, proximity_links};
use crate::graphics::{Material, Painter};
use crate::math::{add, Transform, Vec3};
use crate::scene::NodeDescriptor;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobeConfig {
    pub radius: f32,
    pub points: usize,
    /// Points closer than this are joined by a line
    pub link_distance: f32,
    pub line_color: Rgb,
    /// Point color at the south pole, blending to `line_color` at the north pole
    pub point_color: Rgb,
    pub point_size: f32,
    pub line_opacity: f32,
    pub point_opacity: f32,
    /// Radians per second about the Y axis
    pub spin_rate: f32,
    /// Turn towards the pointer, eased on top of the spin
    pub tilt: Tilt,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        GlobeConfig {
            radius: 6.0,
            points: 240,
            link_distance: 1.6,
            line_color: Rgb::WHITE,
            point_color: Rgb::WHITE,
            point_size: 0.12,
            line_opacity: 0.35,
            point_opacity: 0.9,
            spin_rate: 0.1,
            tilt: Tilt {
                rest: [0.0; 3],
                pitch: -0.3,
                yaw: 0.5,
                roll: 0.0,
                factor: 0.05,
            },
        }
    }
}

struct GlobeState {
    points: ParticleBuffer,
    links: LineBuffer,
    spin: f32,
    turn: Vec3,
}

/// Sphere of points joined to their neighbours, slowly spinning and turning to face the pointer
pub struct Globe {
    name: String,
    transform: Transform,
    speed: f32,
    config: GlobeConfig,
    state: Option<GlobeState>,
}

impl Globe {
    pub fn new(descriptor: &NodeDescriptor, config: GlobeConfig) -> Self {
        Globe {
            name: descriptor.name.clone(),
            transform: descriptor.transform,
            speed: descriptor.speed,
            config,
            state: None,
        }
    }

    pub fn links(&self) -> Option<&LineBuffer> {
        self.state.as_ref().map(|state| &state.links)
    }

    /// Rotation added to the node transform: spin about Y plus the pointer turn
    pub fn rotation(&self) -> Option<Vec3> {
        self.state
            .as_ref()
            .map(|state| [state.turn[0], state.spin + state.turn[1], state.turn[2]])
    }
}

impl Animation for Globe {
    fn name(&self) -> &str {
        &self.name
    }

    fn reacts_to_pointer(&self) -> bool {
        true
    }

    fn mount(&mut self) {
        let config = &self.config;
        let sphere = fibonacci_sphere(config.points, config.radius);
        let links = proximity_links(&sphere, config.link_distance);
        let radius = config.radius.max(f32::EPSILON);
        let points = ParticleBuffer::from_fn(sphere.len(), |i| {
            let height = (sphere[i][1] / radius + 1.0) / 2.0;
            Particle {
                position: sphere[i],
                color: config.point_color.lerp(config.line_color, height),
                size: config.point_size,
            }
        });
        self.state = Some(GlobeState {
            points,
            links,
            spin: 0.0,
            turn: self.config.tilt.rest,
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
        state.spin = self.config.spin_rate * frame.elapsed * self.speed;
        self.config
            .tilt
            .ease(&mut state.turn, [frame.pointer.x, frame.pointer.y]);
    }

    fn positions(&self) -> Option<&[Vec3]> {
        self.state.as_ref().map(|state| state.points.positions())
    }

    fn draw(&self, painter: &mut Painter) {
        let (Some(state), Some(rotation)) = (self.state.as_ref(), self.rotation()) else {
            return;
        };
        let transform = Transform {
            rotation: add(&self.transform.rotation, &rotation),
            ..self.transform
        }
        .affine();

        let lines = Material::additive(self.config.line_color, self.config.line_opacity);
        painter.lines(&state.links, &transform, &lines, None);

        let dots = Material::additive(Rgb::WHITE, self.config.point_opacity);
        let points = &state.points;
        for ((position, color), size) in points.positions().iter().zip(points.colors()).zip(points.sizes()) {
            painter.point(position, &transform, *size, *color, &dots);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerState;
    use crate::scene::NodeKind;

    fn globe() -> Globe {
        let config = GlobeConfig::default();
        let descriptor = NodeDescriptor::new("globe", NodeKind::Globe(config));
        Globe::new(&descriptor, config)
    }

    #[test]
    fn test_update_before_mount_is_noop() {
        let mut globe = globe();
        globe.update(&FrameInput::new(1.0, 0.016, PointerState { x: 1.0, y: 1.0 }));
        assert!(globe.positions().is_none());
        assert!(globe.rotation().is_none());
    }

    #[test]
    fn test_mount_builds_sphere_and_links() {
        let mut globe = globe();
        globe.mount();
        assert_eq!(globe.positions().unwrap().len(), 240);
        assert!(globe.links().unwrap().segment_count() > 0);
    }

    #[test]
    fn test_spin_follows_elapsed_time() {
        let mut globe = globe();
        globe.mount();
        globe.update(&FrameInput::untracked(10.0, 0.016));
        let rotation = globe.rotation().unwrap();
        assert!((rotation[1] - 1.0).abs() < 1e-6);
        assert_eq!(rotation[0], 0.0);
    }

    #[test]
    fn test_turns_towards_pointer() {
        let mut globe = globe();
        globe.mount();
        for _ in 0..200 {
            globe.update(&FrameInput::new(0.0, 0.016, PointerState { x: 1.0, y: 1.0 }));
        }
        let rotation = globe.rotation().unwrap();
        assert!((rotation[1] - 0.5).abs() < 1e-3);
        assert!((rotation[0] + 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_remount_is_identical() {
        let mut globe = globe();
        globe.mount();
        let fresh = globe.positions().unwrap().to_vec();
        for i in 0..30 {
            globe.update(&FrameInput::new(i as f32 / 60.0, 1.0 / 60.0, PointerState { x: -0.4, y: 0.6 }));
        }
        globe.unmount();
        globe.mount();
        assert_eq!(globe.positions().unwrap(), fresh.as_slice());
        assert_eq!(globe.rotation(), Some([0.0; 3]));
    }
}
