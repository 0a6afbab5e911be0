use std::time::{Duration, Instant};

use crate::config::Config;

/// Fixed-rate frame throttle.
///
/// Every query adds the time elapsed since the previous query to an
/// accumulator. Once the accumulator reaches the frame interval the query
/// returns `true` and the accumulator starts over at zero, so frames that
/// arrive late are not made up later.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_time: Duration,
    accumulator: Duration,
    last: Instant,
    delta: Duration,
    frames: u64,
}

impl FrameClock {
    /// Creates a clock targeting `framerate` frames per second (at least 1).
    pub fn new(framerate: u32) -> Self {
        Self::starting_at(framerate, Instant::now())
    }

    /// Creates a clock targeting `config.target_framerate`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.target_framerate)
    }

    fn starting_at(framerate: u32, start: Instant) -> Self {
        Self {
            frame_time: Self::interval(framerate),
            accumulator: Duration::ZERO,
            last: start,
            delta: Duration::ZERO,
            frames: 0,
        }
    }

    fn interval(framerate: u32) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(framerate.max(1)))
    }

    /// Changes the target frame rate. Accumulated time is kept.
    pub fn set_framerate(&mut self, framerate: u32) {
        self.frame_time = Self::interval(framerate);
    }

    /// Resets the baseline and drops accumulated time.
    ///
    /// Useful after the loop was suspended (minimized window, debugger).
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.accumulator = Duration::ZERO;
        self.delta = Duration::ZERO;
    }

    /// Returns `true` when a frame interval has elapsed since the last
    /// rendered frame.
    pub fn should_render(&mut self) -> bool {
        self.should_render_at(Instant::now())
    }

    /// Same as [`should_render`](Self::should_render) with an explicit
    /// timestamp. Timestamps earlier than the previous one count as zero.
    pub fn should_render_at(&mut self, now: Instant) -> bool {
        self.delta = now.saturating_duration_since(self.last);
        self.last = now;
        self.accumulator += self.delta;

        if self.accumulator >= self.frame_time {
            self.accumulator = Duration::ZERO;
            self.frames = self.frames.wrapping_add(1);
            true
        } else {
            false
        }
    }

    /// Time between the two most recent queries
    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Number of queries that returned `true`
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
#[path = "frame_clock_tests.rs"]
mod tests;
