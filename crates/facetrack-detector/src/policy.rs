//! When to send a submission.
//!
//! A send fires only when the number of detected faces changes between ticks
//! and the new count is non-zero. Movement while the count is stable is never
//! sent.

/// Debounce on the detected face count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendPolicy {
    previous_count: usize,
}

impl SendPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count remembered from the last change.
    pub fn previous_count(&self) -> usize {
        self.previous_count
    }

    /// Observe this tick's count and report whether to send.
    ///
    /// The remembered count follows every change, including drops to zero,
    /// even when no send results.
    pub fn observe(&mut self, face_count: usize, has_face_data: bool) -> bool {
        if face_count == self.previous_count {
            return false;
        }

        self.previous_count = face_count;
        face_count > 0 && has_face_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sends_on_first_face() {
        let mut policy = SendPolicy::new();
        assert!(policy.observe(1, true));
        assert_eq!(policy.previous_count(), 1);
    }

    #[test]
    fn test_stable_count_never_sends() {
        let mut policy = SendPolicy::new();
        assert!(policy.observe(1, true));
        for _ in 0..10 {
            assert!(!policy.observe(1, true));
        }
    }

    #[test]
    fn test_drop_to_zero_resets_without_sending() {
        let mut policy = SendPolicy::new();
        assert!(policy.observe(2, true));
        assert!(!policy.observe(0, false));
        assert_eq!(policy.previous_count(), 0);
        assert!(policy.observe(1, true));
    }

    #[test]
    fn test_count_change_without_face_data_is_consumed() {
        let mut policy = SendPolicy::new();
        assert!(!policy.observe(1, false));
        // The change was already seen, so data arriving later does not send
        assert!(!policy.observe(1, true));
        assert!(policy.observe(2, true));
    }
}
