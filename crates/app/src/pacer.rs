use std::time::{Duration, Instant};

/// Fixed-rate frame clock standing in for the display refresh signal.
pub struct Pacer {
    next_deadline: Instant,
    last_frame: Instant,
    frame: Duration,
}

impl Pacer {
    pub fn new(frame: Duration) -> Self {
        let now = Instant::now();
        Self {
            next_deadline: now + frame,
            last_frame: now,
            frame,
        }
    }

    /// Sleeps until the next frame is due and returns the time elapsed since
    /// the previous one. A late frame reschedules from now instead of trying
    /// to catch up.
    pub fn wait(&mut self) -> Duration {
        let now = Instant::now();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.frame;
        } else {
            self.next_deadline = now + self.frame;
        }

        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_roughly_one_frame() {
        let mut pacer = Pacer::new(Duration::from_millis(5));
        let delta = pacer.wait();
        assert!(delta >= Duration::from_millis(4));
    }
}
