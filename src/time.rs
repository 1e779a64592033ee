//! Fixed-step clock for the update phase.

/// Splits variable frame times into whole fixed steps.
///
/// Feed [`advance`](Self::advance) the current time in seconds since start;
/// it returns how many steps are due. Each due step moves the internal clock
/// forward by exactly one step, so leftover time carries into the next frame.
///
/// ```
/// use flatland::FixedTimestep;
///
/// let mut clock = FixedTimestep::new(30);
/// assert_eq!(clock.advance(0.01), 0);
/// assert_eq!(clock.advance(0.11), 3);
/// assert!((clock.previous() - 0.1).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTimestep {
    step: f64,
    previous: f64,
    /// `previous` before the latest `advance`, i.e. the start of that batch.
    batch_start: f64,
    max_steps: u32,
}

impl FixedTimestep {
    /// Default cap on steps run in a single frame.
    pub const DEFAULT_MAX_STEPS: u32 = 8;

    /// A clock ticking `steps_per_second` times per second, starting at 0.
    ///
    /// A rate of zero is treated as one step per second.
    pub fn new(steps_per_second: u32) -> Self {
        Self {
            step: 1.0 / f64::from(steps_per_second.max(1)),
            previous: 0.0,
            batch_start: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    /// Caps the steps one call to [`advance`](Self::advance) may return.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Step length in seconds.
    pub fn dt(&self) -> f32 {
        self.step as f32
    }

    /// Time of the last completed step.
    pub fn previous(&self) -> f64 {
        self.previous
    }

    /// Returns the number of steps due at `now`.
    ///
    /// A step is due while `now > previous + step`. When more than the cap
    /// are due, the cap is returned and the remaining backlog is dropped so a
    /// long stall does not snowball into ever longer frames.
    pub fn advance(&mut self, now: f64) -> u32 {
        self.batch_start = self.previous;
        let mut steps = 0;
        while now > self.previous + self.step {
            if steps == self.max_steps {
                let behind = now - self.previous;
                log::warn!(
                    "update loop is {behind:.3}s behind after {steps} steps, skipping ahead"
                );
                self.previous = now - (now - self.previous) % self.step;
                break;
            }
            self.previous += self.step;
            steps += 1;
        }
        if steps > 1 {
            log::trace!("caught up {steps} fixed steps");
        }
        steps
    }

    /// Clock time of step `index` (0-based) of the latest [`advance`](Self::advance).
    ///
    /// Stays correct when the backlog was dropped, since skipping only moves
    /// the clock after the last step that ran.
    pub fn step_time(&self, index: u32) -> f64 {
        self.batch_start + self.step * f64::from(index + 1)
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_hertz_step() {
        let clock = FixedTimestep::new(30);
        assert!((clock.dt() - 1.0 / 30.0).abs() < 1e-7);
        assert_eq!(FixedTimestep::default(), clock);
    }

    #[test]
    fn no_step_before_one_interval() {
        let mut clock = FixedTimestep::new(10);
        assert_eq!(clock.advance(0.0), 0);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1001), 1);
    }

    #[test]
    fn remainder_carries_over() {
        let mut clock = FixedTimestep::new(10);
        assert_eq!(clock.advance(0.15), 1);
        assert_eq!(clock.advance(0.21), 1);
        assert!((clock.previous() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn time_standing_still_runs_nothing() {
        let mut clock = FixedTimestep::new(10);
        assert_eq!(clock.advance(0.35), 3);
        assert_eq!(clock.advance(0.35), 0);
    }

    #[test]
    fn backlog_is_clamped_and_dropped() {
        let mut clock = FixedTimestep::new(10).with_max_steps(4);
        assert_eq!(clock.advance(10.05), 4);
        // Skipped ahead to the last whole step, so only normal pacing remains.
        assert_eq!(clock.advance(10.12), 1);
        assert_eq!(clock.advance(10.13), 0);
    }

    #[test]
    fn each_caught_up_step_has_its_own_time() {
        let mut clock = FixedTimestep::new(10);
        assert_eq!(clock.advance(0.15), 1);
        assert_eq!(clock.advance(0.45), 3);
        let times: Vec<f64> = (0..3).map(|i| clock.step_time(i)).collect();
        for (time, expected) in times.iter().zip([0.2, 0.3, 0.4]) {
            assert!((time - expected).abs() < 1e-9, "{times:?}");
        }
        assert!((clock.step_time(2) - clock.previous()).abs() < 1e-12);
    }

    #[test]
    fn step_times_before_a_dropped_backlog() {
        let mut clock = FixedTimestep::new(10).with_max_steps(2);
        assert_eq!(clock.advance(5.05), 2);
        assert!((clock.step_time(0) - 0.1).abs() < 1e-9);
        assert!((clock.step_time(1) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn zero_rate_falls_back_to_one_hertz() {
        let clock = FixedTimestep::new(0);
        assert_eq!(clock.dt(), 1.0);
    }
}
