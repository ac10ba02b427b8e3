//! Per-operation persistence budget.

use std::time::{Duration, Instant};

use crate::store::StoreError;

/// Budget shared by every persistence step of one workflow call.
///
/// Checked before each step; a step that would start after the budget is
/// spent fails with [`StoreError::Timeout`] and takes the normal rollback path.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.started.elapsed() >= self.budget
    }

    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_expired() {
            Err(StoreError::Timeout(self.budget))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deadline_passes() {
        let d = Deadline::start(Duration::from_secs(8));
        assert!(d.check().is_ok());
        assert!(!d.is_expired());
    }

    #[test]
    fn zero_budget_is_already_expired() {
        let d = Deadline::start(Duration::ZERO);
        assert_eq!(d.check(), Err(StoreError::Timeout(Duration::ZERO)));
        assert!(d.is_expired());
    }
}
