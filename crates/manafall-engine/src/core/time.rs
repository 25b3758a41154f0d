/// Fixed-tick clock.
/// The simulation is tuned in ticks (1/60 s); hosts feed variable frame time
/// and run however many whole ticks have accumulated.
pub struct TickClock {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
    ticks: u64,
}

impl TickClock {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
            ticks: 0,
        }
    }

    /// Build from a tick rate in Hz.
    pub fn from_rate(ticks_per_second: f32, max_steps: u32) -> Self {
        Self::new(1.0 / ticks_per_second.max(1.0), max_steps)
    }

    /// Add frame time and return the number of ticks to run this frame.
    /// Backlog beyond `max_steps` ticks is dropped.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.ticks += steps as u64;
        steps
    }

    /// Total ticks handed out since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}
