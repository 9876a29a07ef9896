//! Expense requests and recorded expenses.

use crate::amount::Amount;
use crate::participant::Participant;
use crate::split::{Split, SplitRequest, Strategy};
use std::sync::Arc;

/// A raw request to record an expense, as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRequest {
    pub strategy: Strategy,
    pub total: Amount,
    pub payer_id: String,
    pub splits: Vec<SplitRequest>,
    pub label: String,
}

/// A validated, immutable expense.
///
/// # Invariants
///
/// - `total > 0` and `splits` is non-empty
/// - every split's share matches `strategy`
/// - the split amounts sum to `total` within [`Amount::TOLERANCE`], relative
///   to the total for amounts above one
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    id: usize,
    label: String,
    strategy: Strategy,
    total: Amount,
    payer: Arc<Participant>,
    splits: Vec<Split>,
}

impl Expense {
    /// Wraps splits produced by [`crate::split::resolve`].
    pub(crate) fn new(
        id: usize,
        label: String,
        strategy: Strategy,
        total: Amount,
        payer: Arc<Participant>,
        splits: Vec<Split>,
    ) -> Self {
        let expense = Expense {
            id,
            label,
            strategy,
            total,
            payer,
            splits,
        };
        debug_assert!(expense.check_invariant());
        expense
    }

    /// Position of this expense in the ledger history, starting at 1.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn payer(&self) -> &Arc<Participant> {
        &self.payer
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Verifies the expense invariants.
    pub fn check_invariant(&self) -> bool {
        let sum: Amount = self.splits.iter().map(Split::amount).sum();

        self.total.value() > 0.0
            && !self.splits.is_empty()
            && self
                .splits
                .iter()
                .all(|s| s.share().strategy() == self.strategy)
            && (sum - self.total).abs().value() <= Amount::TOLERANCE * self.total.value().max(1.0)
    }
}
