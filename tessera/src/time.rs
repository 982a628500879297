use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const SAMPLES: usize = 10;

/// Frame timer with an optional frame-rate cap.
#[derive(Debug)]
pub struct Clock {
    last: Instant,
    samples: VecDeque<Duration>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            samples: VecDeque::with_capacity(SAMPLES),
        }
    }

    /// Marks the end of a frame, first sleeping as long as needed to stay
    /// under `limit_fps`. Returns the time since the previous tick.
    pub fn tick(&mut self, limit_fps: Option<u32>) -> Duration {
        if let Some(limit) = limit_fps.filter(|&l| l > 0) {
            let budget = Duration::from_secs(1) / limit;
            let spent = self.last.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }

        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        self.record(elapsed);

        elapsed
    }

    fn record(&mut self, elapsed: Duration) {
        if self.samples.len() == SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(elapsed);
    }

    /// Average frame rate over the last few ticks, if any time has passed.
    pub fn fps(&self) -> Option<f32> {
        let total: Duration = self.samples.iter().sum();
        if total.is_zero() {
            return None;
        }

        Some(self.samples.len() as f32 / total.as_secs_f32())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_fps_before_first_tick() {
        assert_eq!(None, Clock::new().fps());
    }

    #[test]
    fn fps_averages_recent_frames() {
        let mut clock = Clock::new();
        for _ in 0..4 {
            clock.record(Duration::from_millis(20));
        }
        let fps = clock.fps().unwrap();
        assert!((fps - 50.0).abs() < 0.01, "{fps}");

        // Old samples age out.
        for _ in 0..SAMPLES {
            clock.record(Duration::from_millis(10));
        }
        let fps = clock.fps().unwrap();
        assert!((fps - 100.0).abs() < 0.01, "{fps}");
    }

    #[test]
    fn tick_respects_frame_cap() {
        let mut clock = Clock::new();
        let elapsed = clock.tick(Some(100));
        assert!(elapsed >= Duration::from_millis(10), "{elapsed:?}");
    }
}
