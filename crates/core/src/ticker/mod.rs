use std::time::Duration;

/// Default length of one progress sweep.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// Linear progress clock that sweeps from 0 to 1 over `period` and then
/// starts over, indefinitely.
#[derive(Debug, Clone)]
pub struct RepeatingProgress {
    period: Duration,
    elapsed: Duration,
    repeats: u64,
}

impl Default for RepeatingProgress {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

impl RepeatingProgress {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
            repeats: 0,
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.repeats = 0;
    }

    /// Moves the clock forward and returns the progress within the current
    /// sweep.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        if self.period.is_zero() {
            self.repeats += 1;
            return 1.0;
        }

        self.elapsed += delta;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            self.repeats += 1;
        }
        self.progress()
    }

    pub fn progress(&self) -> f32 {
        if self.period.is_zero() {
            return 1.0;
        }
        self.elapsed.as_secs_f32() / self.period.as_secs_f32()
    }

    /// Number of sweeps completed since the last reset.
    pub fn repeats(&self) -> u64 {
        self.repeats
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Timer resource owned by the animation controller and driven by the host's
/// refresh loop.
///
/// Semantics follow a repeating property animator: `pause` only affects a
/// started ticker, `resume` only affects a paused one, and `cancel` returns it
/// to the never-started state.
pub trait Ticker {
    fn start(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
    fn is_started(&self) -> bool;
    fn is_paused(&self) -> bool;

    /// Called once per host frame with the time since the previous frame.
    /// Yields the interpolated progress when the ticker is live.
    fn poll(&mut self, delta: Duration) -> Option<f32>;
}

/// [`Ticker`] backed by a [`RepeatingProgress`] clock.
#[derive(Debug, Clone, Default)]
pub struct FrameTicker {
    clock: RepeatingProgress,
    started: bool,
    paused: bool,
}

impl FrameTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            clock: RepeatingProgress::new(period),
            started: false,
            paused: false,
        }
    }

    pub fn clock(&self) -> &RepeatingProgress {
        &self.clock
    }
}

impl Ticker for FrameTicker {
    fn start(&mut self) {
        self.clock.reset();
        self.started = true;
        self.paused = false;
    }

    fn pause(&mut self) {
        if self.started {
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn cancel(&mut self) {
        self.clock.reset();
        self.started = false;
        self.paused = false;
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn poll(&mut self, delta: Duration) -> Option<f32> {
        if !self.started || self.paused {
            return None;
        }
        Some(self.clock.advance(delta))
    }
}
