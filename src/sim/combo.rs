//! Combo tracking
//!
//! Consecutive reveals inside a rolling timeout window step up a score
//! multiplier. A bomb or a lapse in the window resets it.

use serde::{Deserialize, Serialize};

/// Tracks consecutive reveals and the resulting score multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboTracker {
    count: u32,
    /// `None` until the first reveal, so the first hit can never be read as
    /// "within the window" of a phantom hit at t=0.
    last_hit: Option<f64>,
    timeout: f64,
}

impl ComboTracker {
    pub fn new(timeout: f64) -> Self {
        Self {
            count: 0,
            last_hit: None,
            timeout,
        }
    }

    /// Current combo length
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Step multiplier: 1x (0-1 hits), 2x (2-3), 3x (4-5), 4x (6+)
    pub fn multiplier(&self) -> u32 {
        match self.count {
            0..=1 => 1,
            2..=3 => 2,
            4..=5 => 3,
            _ => 4,
        }
    }

    /// Register a successful reveal at `now`.
    pub fn register_hit(&mut self, now: f64) {
        match self.last_hit {
            Some(last) if now - last < self.timeout => self.count += 1,
            _ => self.count = 1,
        }
        self.last_hit = Some(now);
    }

    /// Lapse the combo if the window has expired. Returns true exactly when
    /// the combo just timed out; side-effect-free otherwise.
    pub fn check_timeout(&mut self, now: f64) -> bool {
        if self.count > 0
            && let Some(last) = self.last_hit
            && now - last > self.timeout
        {
            self.count = 0;
            return true;
        }
        false
    }

    /// Hard reset (bomb reveal).
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_step_function() {
        let mut combo = ComboTracker::new(2.0);
        let expected = [
            (0, 1),
            (1, 1),
            (2, 2),
            (3, 2),
            (4, 3),
            (5, 3),
            (6, 4),
            (100, 4),
        ];
        for (count, mult) in expected {
            combo.count = count;
            assert_eq!(combo.multiplier(), mult, "count={count}");
        }
    }

    #[test]
    fn test_hits_within_window_accumulate() {
        let mut combo = ComboTracker::new(2.0);
        combo.register_hit(10.0);
        combo.register_hit(11.0);
        combo.register_hit(12.5);
        assert_eq!(combo.count(), 3);
    }

    #[test]
    fn test_first_hit_is_not_within_phantom_window() {
        // A first hit at t=0.0 must start the combo at 1, not continue from
        // an uninitialized zero timestamp.
        let mut combo = ComboTracker::new(2.0);
        combo.register_hit(0.0);
        assert_eq!(combo.count(), 1);
    }

    #[test]
    fn test_timeout_fires_once_and_restarts_at_one() {
        let mut combo = ComboTracker::new(2.0);
        combo.register_hit(1.0);
        combo.register_hit(1.5);
        assert_eq!(combo.count(), 2);

        assert!(!combo.check_timeout(3.0));
        assert_eq!(combo.count(), 2);

        assert!(combo.check_timeout(4.0));
        assert_eq!(combo.count(), 0);
        // Already lapsed: must not report again
        assert!(!combo.check_timeout(5.0));

        // A hit right after a lapse restarts at 1, not 2
        combo.register_hit(4.1);
        assert_eq!(combo.count(), 1);
    }

    #[test]
    fn test_reset_clears_count() {
        let mut combo = ComboTracker::new(2.0);
        combo.register_hit(1.0);
        combo.register_hit(1.1);
        combo.reset();
        assert_eq!(combo.count(), 0);
        assert_eq!(combo.multiplier(), 1);
    }
}
