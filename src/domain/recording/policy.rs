//! Duration policy: publish gating, countdown window and forced stop

use crate::domain::error::PolicyError;

use super::duration::Duration;

/// Validated recording limits, all in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    min_duration: u32,
    max_duration: u32,
    countdown_window: u32,
}

impl DurationPolicy {
    /// Build a policy. Requires `min < max`, `max > 0` and `window <= max`.
    pub fn new(min: Duration, max: Duration, countdown_window: Duration) -> Result<Self, PolicyError> {
        let (min, max, window) = (min.as_secs(), max.as_secs(), countdown_window.as_secs());

        if max == 0 {
            return Err(PolicyError::ZeroMax);
        }
        if min >= max {
            return Err(PolicyError::MinNotBelowMax { min, max });
        }
        if window > max {
            return Err(PolicyError::WindowTooLarge { window, max });
        }

        Ok(Self {
            min_duration: min,
            max_duration: max,
            countdown_window: window,
        })
    }

    pub fn min_duration(&self) -> u32 {
        self.min_duration
    }

    pub fn max_duration(&self) -> u32 {
        self.max_duration
    }

    pub fn countdown_window(&self) -> u32 {
        self.countdown_window
    }

    /// True iff `max - window <= elapsed < max`.
    pub fn show_countdown_warning(&self, elapsed: u32) -> bool {
        let window_start = self.max_duration - self.countdown_window;
        elapsed >= window_start && elapsed < self.max_duration
    }

    /// Publishing is only allowed once the minimum has been reached.
    pub fn can_publish(&self, elapsed: u32) -> bool {
        elapsed >= self.min_duration
    }

    pub fn is_timed_out(&self, elapsed: u32) -> bool {
        elapsed >= self.max_duration
    }

    /// Seconds left before the forced stop
    pub fn remaining(&self, elapsed: u32) -> u32 {
        self.max_duration.saturating_sub(elapsed)
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            min_duration: Duration::default_min().as_secs(),
            max_duration: Duration::default_max().as_secs(),
            countdown_window: Duration::default_countdown_window().as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(min: u32, max: u32, window: u32) -> DurationPolicy {
        DurationPolicy::new(
            Duration::from_secs(min),
            Duration::from_secs(max),
            Duration::from_secs(window),
        )
        .unwrap()
    }

    #[test]
    fn rejects_min_not_below_max() {
        let err = DurationPolicy::new(
            Duration::from_secs(59),
            Duration::from_secs(59),
            Duration::from_secs(10),
        )
        .unwrap_err();
        assert_eq!(err, PolicyError::MinNotBelowMax { min: 59, max: 59 });
    }

    #[test]
    fn rejects_window_larger_than_max() {
        let err = DurationPolicy::new(
            Duration::from_secs(1),
            Duration::from_secs(5),
            Duration::from_secs(6),
        )
        .unwrap_err();
        assert_eq!(err, PolicyError::WindowTooLarge { window: 6, max: 5 });
    }

    #[test]
    fn countdown_boundaries() {
        let p = policy(16, 59, 10);
        assert!(!p.show_countdown_warning(0));
        assert!(!p.show_countdown_warning(48));
        assert!(p.show_countdown_warning(49));
        assert!(p.show_countdown_warning(58));
        assert!(!p.show_countdown_warning(59));
        assert!(!p.show_countdown_warning(60));
    }

    #[test]
    fn countdown_holds_for_every_elapsed_value() {
        let p = policy(16, 59, 10);
        for elapsed in 0..=70 {
            let expected = (49..59).contains(&elapsed);
            assert_eq!(p.show_countdown_warning(elapsed), expected, "elapsed={elapsed}");
        }
    }

    #[test]
    fn zero_window_never_warns() {
        let p = policy(1, 5, 0);
        assert!((0..10).all(|e| !p.show_countdown_warning(e)));
    }

    #[test]
    fn publish_gating() {
        let p = policy(16, 59, 10);
        assert!(!p.can_publish(15));
        assert!(p.can_publish(16));
        assert!(p.can_publish(40));
    }

    #[test]
    fn timeout_and_remaining() {
        let p = policy(16, 59, 10);
        assert!(!p.is_timed_out(58));
        assert!(p.is_timed_out(59));
        assert_eq!(p.remaining(50), 9);
        assert_eq!(p.remaining(80), 0);
    }

    #[test]
    fn default_policy() {
        let p = DurationPolicy::default();
        assert_eq!(p.min_duration(), 11);
        assert_eq!(p.max_duration(), 59);
        assert_eq!(p.countdown_window(), 10);
    }
}
