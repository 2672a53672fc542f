use web_time::{Duration, Instant};

/// Per-frame delta tracking with a smoothed FPS readout and an optional
/// frame-rate cap.
pub struct FrameTiming {
    /// Minimum spacing between frames (zero = uncapped).
    min_frame: Duration,
    last_frame: Instant,
    /// Exponential moving average of the instantaneous FPS.
    smoothed_fps: f32,
    frames: u64,
}

impl FrameTiming {
    /// Weight of the newest sample in the FPS average.
    const SMOOTHING: f32 = 0.05;

    /// Timer capped at `target_fps` (0 = uncapped).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        Self {
            min_frame,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            frames: 0,
        }
    }

    /// Whether enough time has passed since the last frame to draw again.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.last_frame.elapsed() >= self.min_frame
    }

    /// Close the current frame; returns its duration.
    pub fn end_frame(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let secs = elapsed.as_secs_f32();
        if secs > 0.0 {
            self.smoothed_fps = self.smoothed_fps * (1.0 - Self::SMOOTHING)
                + (1.0 / secs) * Self::SMOOTHING;
        }
        elapsed
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames closed so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_timer_always_renders() {
        let timing = FrameTiming::new(0);
        assert!(timing.should_render());
    }

    #[test]
    fn end_frame_counts_frames() {
        let mut timing = FrameTiming::new(0);
        let _ = timing.end_frame();
        let _ = timing.end_frame();
        assert_eq!(timing.frames(), 2);
        assert!(timing.fps() > 0.0);
    }
}
