use std::time::Instant;

/// Wall-clock frame timing used to scale camera motion to real seconds.
///
/// The first delta is measured from the moment the clock was created.
/// Deltas are not clamped: a long stall moves the camera a long way.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_frame: Instant,
    delta: f32,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self {
            last_frame: start,
            delta: 0.0,
        }
    }

    /// Advance to `now` and return seconds since the previous tick.
    pub fn tick(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn last_frame(&self) -> Instant {
        self.last_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_tick_measures_from_start() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        assert_eq!(clock.delta(), 0.0);
        let dt = clock.tick(start + Duration::from_millis(250));
        assert!((dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn ticks_are_relative_to_previous_frame() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        clock.tick(start + Duration::from_secs(1));
        let dt = clock.tick(start + Duration::from_millis(1016));
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.last_frame(), start + Duration::from_millis(1016));
    }

    #[test]
    fn long_stalls_are_not_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        assert!((clock.tick(start + Duration::from_secs(3)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn time_never_runs_backwards() {
        let start = Instant::now() + Duration::from_secs(5);
        let mut clock = FrameClock::new(start);
        assert_eq!(clock.tick(start - Duration::from_secs(1)), 0.0);
    }
}
