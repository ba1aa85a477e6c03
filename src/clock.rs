use std::time::Duration;

/// Monotonic elapsed-time clock owned by a render surface
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    elapsed: f32,
    delta: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by one frame step
    pub fn advance(&mut self, step: Duration) {
        self.delta = step.as_secs_f32();
        self.elapsed += self.delta;
    }

    /// Seconds since the clock started
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Length of the most recent step in seconds
    pub fn delta(&self) -> f32 {
        self.delta
    }
}
