//! Compensation Framework: an explicit log of applied stock steps, replayed
//! in reverse when a later step of the same operation fails.
//!
//! The log is built incrementally as steps succeed. On failure the caller
//! hands the primary error to [`CompensationLog::fail`], which runs every
//! reversal before returning that same error. A reversal that fails is logged
//! as a persistence error and skipped; it never replaces the primary error.

use stockline_core::{DomainError, DomainResult};
use stockline_inventory::StockMutation;

/// Something that can apply the inverse of an applied step.
pub trait Compensator: Send + Sync {
    fn reverse(&self, step: &StockMutation) -> DomainResult<()>;
}

impl<C> Compensator for std::sync::Arc<C>
where
    C: Compensator + ?Sized,
{
    fn reverse(&self, step: &StockMutation) -> DomainResult<()> {
        (**self).reverse(step)
    }
}

/// What a rollback achieved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollbackReport {
    pub reversed: usize,
    /// Steps whose reversal failed, with the persistence error raised.
    pub failed: Vec<(StockMutation, DomainError)>,
}

impl RollbackReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[must_use = "a compensation log must be committed or failed"]
pub struct CompensationLog<'a, C: ?Sized> {
    compensator: &'a C,
    operation: &'static str,
    applied: Vec<StockMutation>,
}

impl<'a, C> CompensationLog<'a, C>
where
    C: Compensator + ?Sized,
{
    pub fn new(compensator: &'a C, operation: &'static str) -> Self {
        Self {
            compensator,
            operation,
            applied: Vec::new(),
        }
    }

    pub fn record(&mut self, step: StockMutation) {
        self.applied.push(step);
    }

    pub fn applied(&self) -> &[StockMutation] {
        &self.applied
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// The operation completed; nothing will be undone.
    pub fn commit(self) -> Vec<StockMutation> {
        self.applied
    }

    /// Reverse every applied step, newest first.
    pub fn rollback(self, cause: &DomainError) -> RollbackReport {
        let mut report = RollbackReport::default();

        for step in self.applied.iter().rev() {
            match self.compensator.reverse(step) {
                Ok(()) => {
                    report.reversed += 1;
                    tracing::debug!(
                        operation = self.operation,
                        branch_id = %step.branch_id(),
                        product_id = %step.product_id(),
                        qty = %step.qty(),
                        "compensated stock step"
                    );
                }
                Err(e) => {
                    let err = DomainError::persistence(format!(
                        "{} rollback failed for {step:?}: {e}",
                        self.operation
                    ));
                    tracing::error!(
                        operation = self.operation,
                        branch_id = %step.branch_id(),
                        product_id = %step.product_id(),
                        qty = %step.qty(),
                        error = %err,
                        cause = %cause,
                        "compensation failed; stock may have drifted"
                    );
                    report.failed.push((*step, err));
                }
            }
        }

        if !report.is_clean() || report.reversed > 0 {
            tracing::warn!(
                operation = self.operation,
                reversed = report.reversed,
                failed = report.failed.len(),
                cause = %cause,
                "operation rolled back"
            );
        }
        report
    }

    /// Roll back, then hand the primary error back to the caller unchanged.
    pub fn fail(self, cause: DomainError) -> DomainError {
        let _ = self.rollback(&cause);
        cause
    }
}
