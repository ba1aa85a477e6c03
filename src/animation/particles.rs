use rand::rngs::StdRng;
use rand::SeedableRng;

use super::motion::{attract, attract_falloff, contain, rotate_planar};
use super::{Animation, FrameInput};
use crate::buffer::ParticleBuffer;
use crate::color::Rgb;
use crate::geometry::{scatter_particles, Coloring};
use crate::graphics::{Material, Painter};
use crate::math::{add, Transform, Vec3};
use crate::scene::NodeDescriptor;

/// Z offset around each particle's rest depth
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jitter {
    pub amplitude: f32,
    pub frequency: f32,
}

/// How strongly attracted particles move
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pull {
    /// Fixed fraction of the remaining distance per frame
    Fraction(f32),
    /// `(1 - d / radius) * strength` of the remaining distance; needs a radius
    Falloff(f32),
}

/// Pointer attraction towards `pointer * reach` in the field's local plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attraction {
    pub reach: f32,
    /// Only particles closer than this to the target move
    pub radius: Option<f32>,
    pub pull: Pull,
}

impl Attraction {
    pub fn target(&self, x: f32, y: f32) -> [f32; 2] {
        [x * self.reach, y * self.reach]
    }
}

/// Damps X and Y once they leave `[-bound, bound]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Containment {
    pub bound: f32,
    pub damping: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub count: usize,
    /// Size of the box particles are scattered in
    pub extent: Vec3,
    pub palette: Vec<Rgb>,
    pub coloring: Coloring,
    pub size_range: (f32, f32),
    pub opacity: f32,
    /// Radians per second about the local Z axis
    pub spin_rate: f32,
    pub jitter: Option<Jitter>,
    pub attraction: Option<Attraction>,
    pub containment: Option<Containment>,
    /// Whole-field rotation per second of elapsed time
    pub field_spin: Vec3,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            count: 1000,
            extent: [30.0, 30.0, 20.0],
            palette: vec![Rgb::WHITE],
            coloring: Coloring::Pick,
            size_range: (1.0, 1.0),
            opacity: 0.6,
            spin_rate: 0.0,
            jitter: None,
            attraction: None,
            containment: None,
            field_spin: [0.0; 3],
        }
    }
}

struct FieldState {
    particles: ParticleBuffer,
    rest_depth: Vec<f32>,
    rotation: Vec3,
}

/// Free-roaming point cloud
pub struct ParticleField {
    name: String,
    transform: Transform,
    size: f32,
    speed: f32,
    seed: u64,
    config: ParticleConfig,
    state: Option<FieldState>,
}

impl ParticleField {
    pub fn new(descriptor: &NodeDescriptor, config: ParticleConfig) -> Self {
        ParticleField {
            name: descriptor.name.clone(),
            transform: descriptor.transform,
            size: descriptor.size,
            speed: descriptor.speed,
            seed: descriptor.seed,
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn particles(&self) -> Option<&ParticleBuffer> {
        self.state.as_ref().map(|state| &state.particles)
    }

    /// Rest depth of every particle, the center of its Z jitter
    pub fn rest_depth(&self) -> Option<&[f32]> {
        self.state.as_ref().map(|state| state.rest_depth.as_slice())
    }
}

impl Animation for ParticleField {
    fn name(&self) -> &str {
        &self.name
    }

    fn reacts_to_pointer(&self) -> bool {
        self.config.attraction.is_some()
    }

    fn mount(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let particles = scatter_particles(
            self.config.count,
            self.config.extent,
            &self.config.palette,
            self.config.coloring,
            self.config.size_range,
            &mut rng,
        );
        let rest_depth = particles.positions().iter().map(|p| p[2]).collect();
        self.state = Some(FieldState {
            particles,
            rest_depth,
            rotation: [0.0; 3],
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
        let config = &self.config;
        let time = frame.elapsed * self.speed;
        let angle = config.spin_rate * frame.delta * self.speed;
        // No pull before the pointer has been seen
        let target = config
            .attraction
            .filter(|_| frame.tracking)
            .map(|a| a.target(frame.pointer.x, frame.pointer.y));

        for (i, (position, rest)) in state
            .particles
            .positions_mut()
            .iter_mut()
            .zip(&state.rest_depth)
            .enumerate()
        {
            if angle != 0.0 {
                *position = rotate_planar(position, angle);
            }
            if let Some(jitter) = config.jitter {
                position[2] = rest + jitter.amplitude * (time * jitter.frequency + i as f32).sin();
            }
            if let (Some(attraction), Some(target)) = (config.attraction, target) {
                match attraction.pull {
                    Pull::Fraction(factor) => {
                        attract(position, target, attraction.radius, factor);
                    }
                    Pull::Falloff(strength) => {
                        if let Some(radius) = attraction.radius {
                            attract_falloff(position, target, radius, strength);
                        }
                    }
                }
            }
            if let Some(containment) = config.containment {
                position[0] = contain(position[0], containment.bound, containment.damping);
                position[1] = contain(position[1], containment.bound, containment.damping);
            }
        }

        for axis in 0..3 {
            state.rotation[axis] = config.field_spin[axis] * time;
        }
    }

    fn positions(&self) -> Option<&[Vec3]> {
        self.particles().map(ParticleBuffer::positions)
    }

    fn draw(&self, painter: &mut Painter) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let transform = Transform {
            rotation: add(&self.transform.rotation, &state.rotation),
            ..self.transform
        }
        .affine();
        let material = Material::additive(Rgb::WHITE, self.config.opacity);
        let particles = &state.particles;
        for ((position, color), size) in particles
            .positions()
            .iter()
            .zip(particles.colors())
            .zip(particles.sizes())
        {
            painter.point(position, &transform, size * self.size, *color, &material);
        }
    }
}
