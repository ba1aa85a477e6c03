//! Pointer-reactive 3D background animations
//!
//! Scenes are declared once as a [`SceneDescriptor`] tree, instantiated into a
//! [`Scene`] of mounted [`Animation`]s and driven frame by frame by a
//! [`RenderSurface`]. The surface rasterizes into a [`Canvas`] and hands it to
//! a [`DrawContext`]: the terminal, or an in-memory context for tests and
//! headless runs.

pub mod animation;
pub mod buffer;
pub mod camera;
pub mod clock;
pub mod color;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod lighting;
pub mod math;
pub mod pointer;
pub mod postfx;
pub mod presets;
pub mod scene;
pub mod state;
pub mod surface;
pub mod terminal;
pub mod vertex;

pub use animation::{Animation, FrameInput};
pub use camera::Camera;
pub use color::Rgb;
pub use error::{BackdropError, Result};
pub use graphics::{Canvas, Fog};
pub use lighting::{Light, Lighting};
pub use pointer::{normalize, PointerHub, PointerListener, PointerState, Viewport};
pub use postfx::Effect;
pub use presets::Preset;
pub use scene::{NodeDescriptor, NodeKind, Scene, SceneDescriptor};
pub use state::{Command, ViewerState};
pub use surface::{DrawContext, HeadlessContext, Lifecycle, RenderSurface};
pub use terminal::{cell_to_pixel, TerminalContext};
