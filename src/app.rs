//! Event loop driving a render surface from the terminal or a simulated clock

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use log::{debug, info};

use backdrop3d::{
    cell_to_pixel, Command, HeadlessContext, Preset, Result, RenderSurface, SceneDescriptor, TerminalContext,
    ViewerState,
};

/// Maps a key press to a viewer command
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::ToggleDebug),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::NextScene),
        _ => None,
    }
}

/// Runs `preset` in the terminal until the user quits; `n` moves on to the next preset
pub fn run_terminal<F>(preset: Preset, build: F, fps: u32, pixel_ratio: f32, debug: bool) -> Result<()>
where
    F: Fn(Preset) -> SceneDescriptor,
{
    let frame_time = Duration::from_secs(1) / fps;
    let mut preset = preset;
    let mut surface = RenderSurface::new(build(preset)).with_pixel_ratio(pixel_ratio);
    if !surface.mount(TerminalContext::new) {
        return Ok(());
    }

    let mut state = ViewerState::new(debug, Instant::now());
    let mut last_frame = Instant::now();
    'running: loop {
        let deadline = last_frame + frame_time;
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if let Some(command) = command_for(&key) {
                        debug!("Command {:?}", command);
                        if !state.apply(command) {
                            break 'running;
                        }
                        if command == Command::NextScene {
                            preset = preset.next();
                            surface.switch_scene(build(preset));
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                        let (x, y) = cell_to_pixel(mouse.column, mouse.row);
                        surface.pointer_moved(x, y);
                    }
                }
                Event::Resize(columns, rows) => {
                    if let Some(context) = surface.context_mut() {
                        context.resize(columns, rows);
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let step = now.duration_since(last_frame);
        last_frame = now;

        let overlay = surface
            .scene()
            .and_then(|scene| state.overlay(scene.name(), surface.elapsed()));
        if let Some(context) = surface.context_mut() {
            context.set_overlay(overlay);
        }
        if state.paused {
            surface.redraw()?;
        } else {
            surface.frame(step)?;
        }
        state.frame_presented(now);
    }
    surface.unmount();
    Ok(())
}

/// Totals reported after a headless run
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub scene: String,
    pub frames: u64,
    pub elapsed: f32,
    pub nodes: usize,
    pub listeners: usize,
    pub mean_luminance: f32,
}

/// Simulates `frames` steps at `fps` without a terminal
pub fn run_headless(descriptor: SceneDescriptor, fps: u32, pixel_ratio: f32, frames: u64) -> Result<Summary> {
    let step = Duration::from_secs(1) / fps;
    let mut surface = RenderSurface::new(descriptor).with_pixel_ratio(pixel_ratio);
    surface.mount(|| Ok(HeadlessContext::new(160, 90)));

    // Sweep the pointer across the viewport so reactive nodes have something to follow
    for frame in 0..frames {
        let phase = frame as f32 / frames.max(1) as f32 * std::f32::consts::TAU;
        surface.pointer_moved(80.0 + 60.0 * phase.cos(), 45.0 + 30.0 * phase.sin());
        surface.frame(step)?;
    }

    let mean_luminance = surface
        .context()
        .and_then(HeadlessContext::last_frame)
        .map(|canvas| {
            let pixels = canvas.pixels();
            pixels.iter().map(|p| p.luminance()).sum::<f32>() / pixels.len().max(1) as f32
        })
        .unwrap_or(0.0);
    let summary = Summary {
        scene: surface.scene().map(|scene| scene.name().to_string()).unwrap_or_default(),
        frames: surface.frames(),
        elapsed: surface.elapsed(),
        nodes: surface.scene().map_or(0, |scene| scene.nodes().len()),
        listeners: surface.hub().listener_count(),
        mean_luminance,
    };
    surface.unmount();
    info!("Headless run finished: {:?}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(command_for(&press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for(&press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(command_for(&press(KeyCode::Char('p'))), Some(Command::TogglePause));
        assert_eq!(command_for(&press(KeyCode::Char('D'))), Some(Command::ToggleDebug));
        assert_eq!(command_for(&press(KeyCode::Char('n'))), Some(Command::NextScene));
        assert_eq!(command_for(&press(KeyCode::Char('x'))), None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for(&ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn test_headless_summary() {
        let descriptor = Preset::Matrix.descriptor(3);
        let summary = run_headless(descriptor, 30, 1.0, 10).unwrap();
        assert_eq!(summary.scene, "matrix");
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.nodes, 32);
        assert!(summary.listeners > 0);
        assert!((summary.elapsed - 10.0 / 30.0).abs() < 1e-4);
    }
}
