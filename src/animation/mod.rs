//! Per-frame updaters
//!
//! Every visual element of a scene is an [`Animation`]: it owns its buffers,
//! builds them on [`Animation::mount`], mutates them in place on
//! [`Animation::update`] and rasterizes them on [`Animation::draw`]. Before
//! mount (or after unmount) the buffers are absent and `update` does nothing.

pub mod cursor;
pub mod globe;
pub mod matrix;
pub mod motion;
pub mod particles;
pub mod shape;
pub mod wave;

pub use cursor::{CursorConfig, CursorTrail};
pub use globe::{Globe, GlobeConfig};
pub use matrix::{MatrixConfig, MatrixRain};
pub use particles::{Attraction, Containment, Jitter, ParticleConfig, ParticleField, Pull};
pub use shape::{Fill, FloatingShape, Glow, PointerResponse, ShapeConfig, ShapeKind, ShapeLight, Wireframe};
pub use wave::{Ripple, Shading, SurfaceWire, Topology, WaveAxis, WaveConfig, WaveSurface, WaveTerm};

use crate::graphics::Painter;
use crate::lighting::Light;
use crate::math::Vec3;
use crate::pointer::PointerState;

/// Everything an updater reads for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the surface started running
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
    pub pointer: PointerState,
    /// False until the pointer has moved over the surface
    pub tracking: bool,
}

impl FrameInput {
    pub fn new(elapsed: f32, delta: f32, pointer: PointerState) -> Self {
        FrameInput {
            elapsed,
            delta,
            pointer,
            tracking: true,
        }
    }

    /// Frame with the pointer resting at the center, never moved
    pub fn untracked(elapsed: f32, delta: f32) -> Self {
        FrameInput {
            elapsed,
            delta,
            pointer: PointerState::default(),
            tracking: false,
        }
    }
}

pub trait Animation {
    fn name(&self) -> &str;

    /// Whether the node needs its own pointer listener
    fn reacts_to_pointer(&self) -> bool;

    /// Builds the buffers; mounting twice rebuilds them from scratch
    fn mount(&mut self);

    /// Releases the buffers
    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;

    /// Advances the buffers by one frame; a no-op while unmounted
    fn update(&mut self, frame: &FrameInput);

    fn draw(&self, painter: &mut Painter);

    /// Local positions of the node's main vertex buffer, if mounted
    fn positions(&self) -> Option<&[Vec3]>;

    /// Lights carried by the node, in world space
    fn lights(&self) -> Vec<Light> {
        Vec::new()
    }
}
