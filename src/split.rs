//! Splitting strategies and the engine that resolves owed amounts.
//!
//! [`resolve`] turns an expense total plus one batch of pending splits into
//! resolved [`Split`]s. It is all-or-nothing: either every split in the batch
//! gets an amount, or a [`SplitError`] explains why none did.

use crate::amount::Amount;
use crate::error::SplitError;
use crate::participant::Participant;
use std::fmt;
use std::sync::Arc;

/// Rule used to divide one expense among its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Total divided evenly among all splits.
    Equal,

    /// Each split declares the exact amount owed.
    Exact,

    /// Each split declares a percentage of the total.
    Percent,
}

impl Strategy {
    /// Parses a strategy name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "equal" => Some(Strategy::Equal),
            "exact" => Some(Strategy::Exact),
            "percent" => Some(Strategy::Percent),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Equal => "EQUAL",
            Strategy::Exact => "EXACT",
            Strategy::Percent => "PERCENT",
        };
        f.write_str(name)
    }
}

/// The share a participant declared, tagged by strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Share {
    Equal,
    Exact(Amount),
    /// Percentage of the total, `0..=100`.
    Percent(f64),
}

impl Share {
    pub fn strategy(&self) -> Strategy {
        match self {
            Share::Equal => Strategy::Equal,
            Share::Exact(_) => Strategy::Exact,
            Share::Percent(_) => Strategy::Percent,
        }
    }
}

/// A split as supplied by the caller, before participant lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRequest {
    pub participant_id: String,

    /// Exact amount or percentage; unused for equal splits.
    pub value: Option<f64>,
}

impl SplitRequest {
    /// A split with no declared value, for equal expenses.
    pub fn new(participant_id: impl Into<String>) -> Self {
        SplitRequest {
            participant_id: participant_id.into(),
            value: None,
        }
    }

    pub fn with_value(participant_id: impl Into<String>, value: f64) -> Self {
        SplitRequest {
            participant_id: participant_id.into(),
            value: Some(value),
        }
    }
}

/// A split whose participant has been looked up but whose amount is unknown.
#[derive(Debug, Clone)]
pub struct PendingSplit {
    pub participant: Arc<Participant>,
    pub value: Option<f64>,
}

/// One participant's resolved share of an expense.
///
/// Only [`resolve`] creates splits, so the amount is always non-negative and
/// finite and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    participant: Arc<Participant>,
    share: Share,
    amount: Amount,
}

impl Split {
    pub fn participant(&self) -> &Arc<Participant> {
        &self.participant
    }

    pub fn share(&self) -> Share {
        self.share
    }

    /// Amount this participant owes towards the expense.
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Computes every split's owed amount for `strategy` and validates the batch.
///
/// - Equal: `total / n` each, with no remainder correction. Declared values
///   are ignored.
/// - Exact: the declared amounts, which must sum to `total`.
/// - Percent: `total * percent / 100`, percentages must sum to 100.
///
/// Sums are compared within [`Amount::TOLERANCE`]. A batch that resolves to a
/// non-finite amount is rejected.
pub fn resolve(
    strategy: Strategy,
    total: Amount,
    pending: &[PendingSplit],
) -> Result<Vec<Split>, SplitError> {
    if !total.is_finite() || total.value() <= 0.0 {
        return Err(SplitError::NonPositiveTotal(total.value()));
    }
    if pending.is_empty() {
        return Err(SplitError::NoSplits);
    }

    let splits: Vec<Split> = match strategy {
        Strategy::Equal => {
            let each = Amount::new(total.value() / pending.len() as f64);
            pending
                .iter()
                .map(|p| Split {
                    participant: Arc::clone(&p.participant),
                    share: Share::Equal,
                    amount: each,
                })
                .collect()
        }
        Strategy::Exact => {
            let values = declared_values(pending)?;
            check_sum(total.value(), values.iter().sum())?;

            pending
                .iter()
                .zip(values)
                .map(|(p, value)| Split {
                    participant: Arc::clone(&p.participant),
                    share: Share::Exact(Amount::new(value)),
                    amount: Amount::new(value),
                })
                .collect()
        }
        Strategy::Percent => {
            let percents = declared_values(pending)?;
            check_sum(100.0, percents.iter().sum())?;

            pending
                .iter()
                .zip(percents)
                .map(|(p, percent)| Split {
                    participant: Arc::clone(&p.participant),
                    share: Share::Percent(percent),
                    amount: Amount::new(total.value() * (percent / 100.0)),
                })
                .collect()
        }
    };

    if let Some(split) = splits.iter().find(|s| !s.amount.is_finite()) {
        return Err(SplitError::NonFiniteAmount {
            participant: split.participant.id.clone(),
        });
    }

    Ok(splits)
}

/// Collects declared values, rejecting missing, negative or non-finite ones.
fn declared_values(pending: &[PendingSplit]) -> Result<Vec<f64>, SplitError> {
    pending
        .iter()
        .map(|p| match p.value {
            None => Err(SplitError::MissingValue {
                participant: p.participant.id.clone(),
            }),
            Some(value) if !value.is_finite() || value < 0.0 => Err(SplitError::InvalidValue {
                participant: p.participant.id.clone(),
                value,
            }),
            Some(value) => Ok(value),
        })
        .collect()
}

fn check_sum(expected: f64, actual: f64) -> Result<(), SplitError> {
    if Amount::new(actual).approx_eq(Amount::new(expected)) {
        Ok(())
    } else {
        Err(SplitError::SumMismatch { expected, actual })
    }
}
