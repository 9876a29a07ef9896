//! Pairwise balance ledger.
//!
//! `balance(A, B)` is the net amount B owes A; a negative value means A owes
//! B. Each unordered pair lives in exactly one cell keyed by participant
//! indices `(lo, hi)` with `lo < hi`, so `balance(A, B) == -balance(B, A)`
//! holds by construction and an update touches a single cell.

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::expense::Expense;
use crate::participant::Participant;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A participant's net position against one counterpart.
///
/// Positive: the counterpart owes the participant. Negative: the participant
/// owes the counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub counterpart: String,
    pub amount: Amount,
}

/// Net position of an unordered pair, reported once.
///
/// `amount` is `balance(first, second)`: positive when `second` owes `first`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairBalance {
    pub first: String,
    pub second: String,
    pub amount: Amount,
}

impl PairBalance {
    /// Returns `(debtor_id, creditor_id, magnitude)`.
    pub fn direction(&self) -> (&str, &str, Amount) {
        if self.amount.is_negative() {
            (self.first.as_str(), self.second.as_str(), self.amount.abs())
        } else {
            (self.second.as_str(), self.first.as_str(), self.amount)
        }
    }
}

/// A debt ready for presentation: `debtor owes creditor: amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct Debt {
    pub debtor: Arc<Participant>,
    pub creditor: Arc<Participant>,
    pub amount: Amount,
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {}: {}", self.debtor, self.creditor, self.amount)
    }
}

/// Sparse anti-symmetric matrix of net balances.
///
/// # Invariants
///
/// - every cell key `(lo, hi)` satisfies `lo < hi < ids.len()`
/// - `balance(A, A)` is never stored
/// - the ledger equals the sum of every applied expense's contributions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceLedger {
    /// Participant ids by index, in row-opening order.
    ids: Vec<String>,

    index: HashMap<String, usize>,

    /// `balance(ids[lo], ids[hi])` keyed by `(lo, hi)`.
    cells: BTreeMap<(usize, usize), Amount>,
}

impl BalanceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row for a participant. Returns `false` if it already exists.
    pub fn open_row(&mut self, id: &str) -> bool {
        if self.index.contains_key(id) {
            return false;
        }

        self.index.insert(id.to_string(), self.ids.len());
        self.ids.push(id.to_string());
        true
    }

    /// Returns `balance(a, b)`: what `b` owes `a`.
    ///
    /// `None` if either id is unknown or both are the same participant.
    pub fn balance(&self, a: &str, b: &str) -> Option<Amount> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        if i == j {
            return None;
        }
        Some(self.cell(i, j))
    }

    /// Applies every split of an expense: each participant other than the
    /// payer now owes the payer its split amount.
    ///
    /// All participants are checked before any cell changes.
    pub fn apply_expense(&mut self, expense: &Expense) -> Result<()> {
        let payer = self.row_of(&expense.payer().id)?;
        let debtors = expense
            .splits()
            .iter()
            .map(|split| Ok((self.row_of(&split.participant().id)?, split.amount())))
            .collect::<Result<Vec<_>>>()?;

        for (debtor, amount) in debtors {
            self.credit(payer, debtor, amount);
        }

        Ok(())
    }

    /// Non-zero balances of one participant against every counterpart, in
    /// row order. An empty vec means nothing is outstanding.
    pub fn query_participant(&self, id: &str) -> Result<Vec<Balance>> {
        let row = self.row_of(id)?;

        Ok((0..self.ids.len())
            .filter(|&other| other != row)
            .map(|other| Balance {
                counterpart: self.ids[other].clone(),
                amount: self.cell(row, other),
            })
            .filter(|b| !b.amount.is_zero())
            .collect())
    }

    /// Every non-zero pair exactly once, the earlier-opened participant first.
    pub fn query_all(&self) -> Vec<PairBalance> {
        self.cells
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(&(lo, hi), &amount)| PairBalance {
                first: self.ids[lo].clone(),
                second: self.ids[hi].clone(),
                amount,
            })
            .collect()
    }

    /// Sum of `balance(id, x)` over all counterparts: positive when the
    /// participant is owed money overall.
    pub fn net_position(&self, id: &str) -> Result<Amount> {
        let row = self.row_of(id)?;
        Ok((0..self.ids.len())
            .filter(|&other| other != row)
            .map(|other| self.cell(row, other))
            .sum())
    }

    /// Verifies the cell-key invariant.
    pub fn check_invariant(&self) -> bool {
        self.cells
            .keys()
            .all(|&(lo, hi)| lo < hi && hi < self.ids.len())
            && self.ids.len() == self.index.len()
    }

    fn row_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| LedgerError::unknown_participant(id))
    }

    fn cell(&self, i: usize, j: usize) -> Amount {
        if i < j {
            self.cells.get(&(i, j)).copied().unwrap_or_default()
        } else {
            -self.cells.get(&(j, i)).copied().unwrap_or_default()
        }
    }

    /// Records that `debtor` owes `creditor` an additional `amount`.
    fn credit(&mut self, creditor: usize, debtor: usize, amount: Amount) {
        if creditor == debtor {
            return;
        }

        if creditor < debtor {
            *self.cells.entry((creditor, debtor)).or_default() += amount;
        } else {
            *self.cells.entry((debtor, creditor)).or_default() -= amount;
        }
    }
}
