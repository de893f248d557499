//! Frame pacing
//!
//! Spins on a clock until the target frame time has passed since the
//! previous sync. The clock is injected so pacing can be tested without
//! a window; the game passes `macroquad::time::get_time`.

/// Fixed-rate frame limiter
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    /// Target frame time in seconds (None = unlocked)
    target: Option<f64>,
    /// Clock reading at the end of the last sync
    previous: Option<f64>,
    /// Duration of the last complete frame, seconds
    frame_time: f64,
}

impl FrameLimiter {
    pub fn new(fps: i32) -> Self {
        let mut limiter = Self { target: None, previous: None, frame_time: 0.0 };
        limiter.set_target_fps(fps);
        limiter
    }

    /// Set the frame rate; anything below 1 disables pacing
    pub fn set_target_fps(&mut self, fps: i32) {
        self.target = if fps < 1 { None } else { Some(1.0 / fps as f64) };
        match self.target {
            Some(t) => tracing::info!("Target time per frame: {:.3} milliseconds", t * 1000.0),
            None => tracing::info!("Frame pacing disabled"),
        }
    }

    /// Seconds the last frame took, including any wait
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    pub fn fps(&self) -> f64 {
        if self.frame_time > 0.0 { 1.0 / self.frame_time } else { 0.0 }
    }

    /// Busy-wait until the target frame time has elapsed since the
    /// previous call. The first call only records the clock.
    pub fn sync<C: FnMut() -> f64>(&mut self, mut clock: C) {
        let mut now = clock();
        if let Some(previous) = self.previous {
            if let Some(target) = self.target {
                while now - previous < target {
                    std::hint::spin_loop();
                    now = clock();
                }
            }
            self.frame_time = now - previous;
        }
        self.previous = Some(now);
    }
}
