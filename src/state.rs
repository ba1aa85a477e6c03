use std::time::{Duration, Instant};

/// Viewer state toggled from the keyboard
#[derive(Clone, Debug)]
pub struct ViewerState {
    /// Show the debug overlay
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    fps: FpsCounter,
}

/// Keyboard commands understood by the viewer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
    ToggleDebug,
    /// Swap the running scene for the next preset
    NextScene,
}

impl ViewerState {
    pub fn new(debug: bool, now: Instant) -> Self {
        ViewerState {
            debug,
            paused: false,
            fps: FpsCounter::new(now),
        }
    }

    /// Applies a command; returns false once the viewer should stop
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::TogglePause => self.paused = !self.paused,
            Command::ToggleDebug => self.debug = !self.debug,
            // Handled by the event loop, which owns the surface
            Command::NextScene => {}
        }
        true
    }

    /// Counts a presented frame
    pub fn frame_presented(&mut self, now: Instant) {
        self.fps.tick(now);
    }

    pub fn fps(&self) -> f64 {
        self.fps.fps
    }

    /// One-line overlay text, or `None` while the overlay is off
    pub fn overlay(&self, scene: &str, elapsed: f32) -> Option<String> {
        self.debug.then(|| {
            format!(
                " {} | FPS: {:.2} | t={:.1}s{} ",
                scene,
                self.fps(),
                elapsed,
                if self.paused { " | paused" } else { "" }
            )
        })
    }
}

/// Frames per second, recomputed about once a second
#[derive(Clone, Debug)]
struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: now,
            fps: 0.0,
        }
    }

    fn tick(&mut self, now: Instant) {
        self.frames_since_last_update += 1;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration >= Duration::from_secs(1) {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_after_one_second() {
        let start = Instant::now();
        let mut state = ViewerState::new(false, start);
        for i in 1..=30 {
            state.frame_presented(start + Duration::from_millis(i * 1000 / 30));
        }
        assert!((state.fps() - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_commands_toggle() {
        let mut state = ViewerState::new(false, Instant::now());
        assert!(state.apply(Command::TogglePause));
        assert!(state.paused);
        assert!(state.apply(Command::ToggleDebug));
        assert!(state.debug);
        assert!(state.apply(Command::NextScene));
        assert!(state.paused && state.debug);
        assert!(!state.apply(Command::Quit));
    }

    #[test]
    fn test_overlay_only_in_debug() {
        let mut state = ViewerState::new(false, Instant::now());
        assert!(state.overlay("matrix", 1.0).is_none());
        state.apply(Command::ToggleDebug);
        let text = state.overlay("matrix", 1.0).unwrap();
        assert!(text.contains("matrix"));
        assert!(text.contains("FPS: 0.00"));
    }
}
