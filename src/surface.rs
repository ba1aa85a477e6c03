//! Render surface: owns the drawing context, the clock and the running scene
//!
//! A surface moves through `Unmounted -> Mounting -> Running -> Unmounting ->
//! Unmounted`. Unmounting always runs before the surface settles back in
//! `Unmounted`, including when the drawing context cannot be created and when
//! presenting a frame fails. Dropping a surface unmounts it.

use std::time::Duration;

use log::{debug, info, warn};

use crate::camera::Camera;
use crate::clock::Clock;
use crate::error::{BackdropError, Result};
use crate::graphics::Canvas;
use crate::pointer::{PointerHub, Viewport};
use crate::scene::{Scene, SceneDescriptor};

/// Lifecycle states of a render surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    /// Context and listeners being created
    Mounting,
    /// Frames are being produced
    Running,
    /// Listeners removed and context released
    Unmounting,
}

/// Something a finished frame can be shown on
pub trait DrawContext {
    /// Current size in device pixels
    fn viewport(&self) -> Viewport;

    /// Shows a finished frame
    fn present(&mut self, canvas: &Canvas) -> Result<()>;
}

/// Clamps a device pixel ratio into the supported range
pub fn clamp_pixel_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() {
        ratio.clamp(1.0, 2.0)
    } else {
        1.0
    }
}

pub struct RenderSurface<C: DrawContext> {
    descriptor: SceneDescriptor,
    camera: Camera,
    pixel_ratio: f32,
    clock: Clock,
    frames: u64,
    state: Lifecycle,
    hub: PointerHub,
    scene: Option<Scene>,
    context: Option<C>,
    canvas: Canvas,
}

impl<C: DrawContext> RenderSurface<C> {
    pub fn new(descriptor: SceneDescriptor) -> Self {
        RenderSurface {
            camera: descriptor.camera,
            descriptor,
            pixel_ratio: 1.0,
            clock: Clock::new(),
            frames: 0,
            state: Lifecycle::Unmounted,
            hub: PointerHub::new(),
            scene: None,
            context: None,
            canvas: Canvas::new(0, 0),
        }
    }

    /// Sets the supersampling factor, clamped into [1, 2]
    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = clamp_pixel_ratio(ratio);
        self
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn hub(&self) -> &PointerHub {
        &self.hub
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.context.as_mut()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Seconds of scene time since the last mount
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Frames presented since the last mount
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Creates the drawing context and starts the scene.
    ///
    /// Returns whether the surface is running afterwards. A failing factory or
    /// an empty viewport is logged and leaves the surface `Unmounted`.
    pub fn mount<F>(&mut self, factory: F) -> bool
    where
        F: FnOnce() -> Result<C>,
    {
        match self.state {
            Lifecycle::Running => return true,
            Lifecycle::Unmounted => {}
            Lifecycle::Mounting | Lifecycle::Unmounting => return false,
        }
        self.state = Lifecycle::Mounting;
        debug!("Mounting surface for scene '{}'", self.descriptor.name);

        let context = match factory() {
            Ok(context) => context,
            Err(error) => {
                warn!("Drawing context unavailable, rendering nothing: {}", error);
                self.unmount();
                return false;
            }
        };
        let viewport = context.viewport();
        self.context = Some(context);
        if viewport.is_empty() {
            let error = BackdropError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            };
            warn!("Drawing context unusable, rendering nothing: {}", error);
            self.unmount();
            return false;
        }

        self.fit_canvas(viewport);
        self.clock = Clock::new();
        self.frames = 0;
        self.scene = Some(Scene::instantiate(&self.descriptor, &self.hub));
        self.state = Lifecycle::Running;
        info!(
            "Surface running scene '{}' at {}x{} pixels",
            self.descriptor.name,
            self.canvas.width(),
            self.canvas.height()
        );
        true
    }

    /// Advances the clock by `delta`, updates every node once and presents a frame.
    ///
    /// Does nothing unless the surface is running. A present failure unmounts
    /// the surface before the error is returned.
    pub fn frame(&mut self, delta: Duration) -> Result<()> {
        self.render(Some(delta))
    }

    /// Presents the current state again without advancing time
    pub fn redraw(&mut self) -> Result<()> {
        self.render(None)
    }

    fn render(&mut self, step: Option<Duration>) -> Result<()> {
        if self.state != Lifecycle::Running {
            return Ok(());
        }
        let (Some(scene), Some(context)) = (self.scene.as_mut(), self.context.as_mut()) else {
            return Ok(());
        };

        let viewport = context.viewport();
        let (width, height) = canvas_size(viewport, self.pixel_ratio);
        if (width, height) != (self.canvas.width(), self.canvas.height()) {
            self.canvas.resize(width, height);
        }

        if let Some(step) = step {
            self.clock.advance(step);
            scene.update(self.clock.elapsed(), self.clock.delta());
        }
        scene.render(&mut self.canvas, &self.camera);

        if let Err(error) = context.present(&self.canvas) {
            self.unmount();
            return Err(error);
        }
        self.frames += 1;
        Ok(())
    }

    /// Replaces the scene while keeping the drawing context.
    ///
    /// The old scene is unmounted before the new one subscribes its listeners,
    /// and the clock restarts. Returns whether the new scene is running; a
    /// surface that is not running only keeps the descriptor for its next mount.
    pub fn switch_scene(&mut self, descriptor: SceneDescriptor) -> bool {
        let previous = std::mem::replace(&mut self.descriptor, descriptor);
        self.camera = self.descriptor.camera;
        if self.state != Lifecycle::Running {
            return false;
        }
        if let Some(mut scene) = self.scene.take() {
            scene.unmount();
        }
        self.clock = Clock::new();
        self.frames = 0;
        self.scene = Some(Scene::instantiate(&self.descriptor, &self.hub));
        info!("Switched scene '{}' to '{}'", previous.name, self.descriptor.name);
        true
    }

    /// Forwards a pointer move in device pixels to every listening node
    pub fn pointer_moved(&self, client_x: f32, client_y: f32) {
        if let Some(context) = self.context.as_ref() {
            self.hub.dispatch(client_x, client_y, context.viewport());
        }
    }

    /// Stops the scene, removing its listeners and releasing the context.
    ///
    /// Safe to call in any state; an unmounted surface stays unmounted.
    pub fn unmount(&mut self) {
        if self.state == Lifecycle::Unmounted && self.scene.is_none() && self.context.is_none() {
            return;
        }
        self.state = Lifecycle::Unmounting;
        if let Some(mut scene) = self.scene.take() {
            scene.unmount();
        }
        self.context = None;
        self.state = Lifecycle::Unmounted;
        info!(
            "Surface for scene '{}' unmounted after {} frames",
            self.descriptor.name, self.frames
        );
    }

    fn fit_canvas(&mut self, viewport: Viewport) {
        let (width, height) = canvas_size(viewport, self.pixel_ratio);
        self.canvas.resize(width, height);
    }
}

impl<C: DrawContext> Drop for RenderSurface<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn canvas_size(viewport: Viewport, pixel_ratio: f32) -> (usize, usize) {
    let scale = |v: u16| (v as f32 * pixel_ratio).round() as usize;
    (scale(viewport.width), scale(viewport.height))
}

/// In-memory drawing context that keeps the last frame
#[derive(Debug)]
pub struct HeadlessContext {
    viewport: Viewport,
    presents: usize,
    last: Option<Canvas>,
}

impl HeadlessContext {
    pub fn new(width: u16, height: u16) -> Self {
        HeadlessContext {
            viewport: Viewport::new(width, height),
            presents: 0,
            last: None,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn last_frame(&self) -> Option<&Canvas> {
        self.last.as_ref()
    }
}

impl DrawContext for HeadlessContext {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.presents += 1;
        match self.last.as_mut() {
            Some(last) => last.clone_from(canvas),
            None => self.last = Some(canvas.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{CursorConfig, ParticleConfig};
    use crate::color::Rgb;
    use crate::scene::{NodeDescriptor, NodeKind};

    const STEP: Duration = Duration::from_millis(16);

    fn descriptor() -> SceneDescriptor {
        let mut scene = SceneDescriptor::new("surface", Camera::default());
        scene.background = Rgb::new(0.0, 0.0, 0.2);
        scene.nodes.push(
            NodeDescriptor::new(
                "field",
                NodeKind::Particles(ParticleConfig {
                    count: 50,
                    spin_rate: 1.0,
                    ..ParticleConfig::default()
                }),
            )
            .with_size(0.2),
        );
        scene
            .nodes
            .push(NodeDescriptor::new("cursor", NodeKind::Cursor(CursorConfig::default())));
        scene
    }

    /// Fails every present after the first `limit`
    struct FlakyContext {
        limit: usize,
        presents: usize,
    }

    impl DrawContext for FlakyContext {
        fn viewport(&self) -> Viewport {
            Viewport::new(16, 8)
        }

        fn present(&mut self, _canvas: &Canvas) -> Result<()> {
            if self.presents >= self.limit {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into());
            }
            self.presents += 1;
            Ok(())
        }
    }

    #[test]
    fn test_mount_runs_and_presents() {
        let mut surface = RenderSurface::new(descriptor());
        assert_eq!(surface.state(), Lifecycle::Unmounted);
        assert!(surface.mount(|| Ok(HeadlessContext::new(40, 20))));
        assert_eq!(surface.state(), Lifecycle::Running);
        assert_eq!(surface.hub().listener_count(), 1);
        for _ in 0..3 {
            surface.frame(STEP).unwrap();
        }
        assert_eq!(surface.frames(), 3);
        assert_eq!(surface.context().unwrap().presents(), 3);
        assert!((surface.elapsed() - 0.048).abs() < 1e-5);
        let frame = surface.context().unwrap().last_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (40, 20));
    }

    #[test]
    fn test_factory_failure_stays_unmounted() {
        let mut surface: RenderSurface<HeadlessContext> = RenderSurface::new(descriptor());
        let mounted = surface.mount(|| Err(BackdropError::ContextUnavailable("no display".to_string())));
        assert!(!mounted);
        assert_eq!(surface.state(), Lifecycle::Unmounted);
        assert!(surface.scene().is_none());
        assert_eq!(surface.hub().listener_count(), 0);
        surface.frame(STEP).unwrap();
        assert_eq!(surface.frames(), 0);
    }

    #[test]
    fn test_empty_viewport_stays_unmounted() {
        let mut surface = RenderSurface::new(descriptor());
        assert!(!surface.mount(|| Ok(HeadlessContext::new(0, 10))));
        assert_eq!(surface.state(), Lifecycle::Unmounted);
        assert!(surface.context().is_none());
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut surface = RenderSurface::new(descriptor());
        surface.mount(|| Ok(HeadlessContext::new(10, 10)));
        surface.unmount();
        surface.unmount();
        assert_eq!(surface.state(), Lifecycle::Unmounted);
        assert_eq!(surface.hub().listener_count(), 0);
        assert!(surface.context().is_none());
    }

    #[test]
    fn test_present_failure_unmounts() {
        let mut surface = RenderSurface::new(descriptor());
        assert!(surface.mount(|| Ok(FlakyContext { limit: 2, presents: 0 })));
        surface.frame(STEP).unwrap();
        surface.frame(STEP).unwrap();
        assert!(surface.frame(STEP).is_err());
        assert_eq!(surface.state(), Lifecycle::Unmounted);
        assert_eq!(surface.hub().listener_count(), 0);
    }

    #[test]
    fn test_pixel_ratio_is_clamped() {
        let surface: RenderSurface<HeadlessContext> = RenderSurface::new(descriptor()).with_pixel_ratio(3.0);
        assert_eq!(surface.pixel_ratio(), 2.0);
        assert_eq!(clamp_pixel_ratio(0.5), 1.0);
        assert_eq!(clamp_pixel_ratio(f32::NAN), 1.0);
    }

    #[test]
    fn test_canvas_follows_viewport() {
        let mut surface = RenderSurface::new(descriptor()).with_pixel_ratio(2.0);
        surface.mount(|| Ok(HeadlessContext::new(10, 6)));
        assert_eq!((surface.canvas().width(), surface.canvas().height()), (20, 12));
        surface.context_mut().unwrap().resize(12, 4);
        surface.frame(STEP).unwrap();
        assert_eq!((surface.canvas().width(), surface.canvas().height()), (24, 8));
    }

    #[test]
    fn test_redraw_keeps_time() {
        let mut surface = RenderSurface::new(descriptor());
        surface.mount(|| Ok(HeadlessContext::new(10, 10)));
        surface.frame(Duration::from_millis(500)).unwrap();
        let positions = surface.scene().unwrap().node("field").unwrap().positions().unwrap().to_vec();
        surface.redraw().unwrap();
        assert_eq!(surface.elapsed(), 0.5);
        assert_eq!(surface.context().unwrap().presents(), 2);
        assert_eq!(surface.scene().unwrap().node("field").unwrap().positions().unwrap(), positions.as_slice());
    }

    fn cursors(count: usize) -> SceneDescriptor {
        let mut scene = SceneDescriptor::new("cursors", Camera::default());
        for i in 0..count {
            scene.nodes.push(NodeDescriptor::new(
                format!("cursor-{}", i),
                NodeKind::Cursor(CursorConfig::default()),
            ));
        }
        scene
    }

    #[test]
    fn test_switch_scene_keeps_context() {
        let mut surface = RenderSurface::new(descriptor());
        surface.mount(|| Ok(HeadlessContext::new(20, 10)));
        surface.frame(STEP).unwrap();
        surface.frame(STEP).unwrap();

        assert!(surface.switch_scene(cursors(3)));
        assert_eq!(surface.state(), Lifecycle::Running);
        assert_eq!(surface.scene().unwrap().name(), "cursors");
        assert_eq!(surface.hub().listener_count(), 3);
        assert_eq!(surface.elapsed(), 0.0);

        surface.frame(STEP).unwrap();
        assert_eq!(surface.context().unwrap().presents(), 3);

        assert!(surface.switch_scene(descriptor()));
        assert_eq!(surface.hub().listener_count(), 1);
        assert!(surface.scene().unwrap().node("field").is_some());
    }

    #[test]
    fn test_switch_scene_while_unmounted_waits_for_mount() {
        let mut surface = RenderSurface::new(descriptor());
        assert!(!surface.switch_scene(cursors(2)));
        assert!(surface.scene().is_none());
        assert_eq!(surface.hub().listener_count(), 0);

        assert!(surface.mount(|| Ok(HeadlessContext::new(8, 8))));
        assert_eq!(surface.scene().unwrap().name(), "cursors");
        assert_eq!(surface.hub().listener_count(), 2);
    }

    #[test]
    fn test_remount_restarts_clock() {
        let mut surface = RenderSurface::new(descriptor());
        surface.mount(|| Ok(HeadlessContext::new(10, 10)));
        surface.frame(Duration::from_secs(1)).unwrap();
        surface.unmount();
        assert!(surface.mount(|| Ok(HeadlessContext::new(10, 10))));
        assert_eq!(surface.elapsed(), 0.0);
        assert_eq!(surface.frames(), 0);
    }
}
