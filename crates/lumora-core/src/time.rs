use std::time::{Duration, Instant};

use crate::profiling::profile_function;

/// Frame timing handed to `Material::update` in `lumora-render`.
///
/// Tracks delta time, elapsed time and the frame count. Delta time is capped
/// so a long stall (debugger, window drag) does not produce one huge step.
#[derive(Debug, Clone)]
pub struct Time {
    elapsed: Duration,
    delta: Duration,
    frame_count: u64,
    /// Maximum delta time (default: 0.1s)
    max_delta: Duration,
    last_frame_time: Instant,
}

impl Time {
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            max_delta: Duration::from_millis(100),
            last_frame_time: Instant::now(),
        }
    }

    /// Updates the time for a new frame from the wall clock.
    ///
    /// Should be called once per frame.
    pub fn update(&mut self) {
        profile_function!();
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(raw_delta);
    }

    /// Advances by an explicit delta. Used for fixed-step and replay loops.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta.min(self.max_delta);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Sum of all (capped) deltas since creation.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    pub fn set_max_delta(&mut self, max_delta: Duration) {
        self.max_delta = max_delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_creation() {
        let time = Time::new();
        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.elapsed(), Duration::ZERO);
        assert_eq!(time.delta(), Duration::ZERO);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();

        thread::sleep(Duration::from_millis(10));
        time.update();

        assert_eq!(time.frame_count(), 1);
        assert!(time.delta() > Duration::ZERO);
        assert!(time.delta_seconds() > 0.0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut time = Time::new();
        for _ in 0..4 {
            time.advance(Duration::from_millis(25));
        }

        assert_eq!(time.frame_count(), 4);
        assert_eq!(time.elapsed(), Duration::from_millis(100));
        assert_eq!(time.delta(), Duration::from_millis(25));
    }

    #[test]
    fn test_max_delta() {
        let mut time = Time::new();
        time.set_max_delta(Duration::from_millis(50));

        time.advance(Duration::from_millis(400));

        assert_eq!(time.delta(), Duration::from_millis(50));
        assert_eq!(time.elapsed(), Duration::from_millis(50));
    }
}
