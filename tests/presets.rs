use std::time::Duration;

use backdrop3d::{HeadlessContext, Lifecycle, Preset, RenderSurface};

#[test]
fn every_preset_renders_headless() {
    for preset in Preset::ALL {
        let mut surface = RenderSurface::new(preset.descriptor(1)).with_pixel_ratio(1.5);
        assert!(surface.mount(|| Ok(HeadlessContext::new(48, 24))), "{} failed to mount", preset);
        for i in 0..4 {
            surface.pointer_moved(6.0 * i as f32, 3.0 * i as f32);
            surface.frame(Duration::from_millis(16)).unwrap();
        }
        let context = surface.context().unwrap();
        assert_eq!(context.presents(), 4);
        let frame = context.last_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (72, 36));
        assert!(frame.pixels().iter().all(|p| p.r.is_finite() && p.g.is_finite() && p.b.is_finite()));
        surface.unmount();
        assert_eq!(surface.state(), Lifecycle::Unmounted);
        assert_eq!(surface.hub().listener_count(), 0);
    }
}

#[test]
fn scenes_draw_something() {
    for preset in Preset::ALL {
        let descriptor = preset.descriptor(1);
        let background = descriptor.background;
        let mut surface = RenderSurface::new(descriptor);
        surface.mount(|| Ok(HeadlessContext::new(64, 32)));
        for _ in 0..3 {
            surface.frame(Duration::from_millis(16)).unwrap();
        }
        let frame = surface.context().unwrap().last_frame().unwrap();
        assert!(
            frame.pixels().iter().any(|p| *p != background),
            "{} drew only background",
            preset
        );
    }
}

#[test]
fn particle_override_applies_to_particle_scenes() {
    let descriptor = Preset::Professional.descriptor(0).with_particle_count(64);
    let mut surface = RenderSurface::new(descriptor);
    surface.mount(|| Ok(HeadlessContext::new(16, 16)));
    let particles = surface.scene().unwrap().node("particles").unwrap();
    assert_eq!(particles.positions().unwrap().len(), 64);
}

#[test]
fn next_scene_cycles_without_leaking_listeners() {
    let mut preset = Preset::Globe;
    let mut surface = RenderSurface::new(preset.descriptor(2));
    assert!(surface.mount(|| Ok(HeadlessContext::new(32, 16))));
    for _ in 0..Preset::ALL.len() {
        surface.pointer_moved(20.0, 4.0);
        surface.frame(Duration::from_millis(16)).unwrap();

        preset = preset.next();
        assert!(surface.switch_scene(preset.descriptor(2)));
        let scene = surface.scene().unwrap();
        assert_eq!(scene.name(), preset.name());
        let listening = scene.nodes().iter().filter(|node| node.is_listening()).count();
        assert_eq!(surface.hub().listener_count(), listening, "{} leaked listeners", preset);
    }
    assert_eq!(preset, Preset::Globe);
    assert_eq!(surface.context().unwrap().presents(), Preset::ALL.len());
    surface.unmount();
    assert_eq!(surface.hub().listener_count(), 0);
}
