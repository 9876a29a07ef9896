//! CSV input records and their conversion into ledger commands.
//!
//! Input header: `type,participant,label,amount,splits`.
//!
//! - `participant,<id>,<name>,,` registers a participant
//! - `<strategy>,<payer-id>,<label>,<total>,<splits>` records an expense,
//!   where `<splits>` is a `;`-separated list of `id` or `id:value` entries

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::expense::ExpenseRequest;
use crate::split::{SplitRequest, Strategy};
use serde::Deserialize;
use std::str::FromStr;

/// Raw row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct LedgerRecord {
    /// `participant`, or a strategy name: equal, exact, percent
    #[serde(rename = "type")]
    pub record_type: String,

    /// Participant id to register, or the payer id of an expense
    pub participant: String,

    /// Display name for participants, description for expenses
    #[serde(default)]
    pub label: Option<String>,

    /// Expense total (absent for participant rows)
    #[serde(default)]
    pub amount: Option<String>,

    /// Split list (absent for participant rows)
    #[serde(default)]
    pub splits: Option<String>,
}

/// A parsed row ready for the ledger service.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Register { id: String, name: String },
    Expense(ExpenseRequest),
}

impl LedgerRecord {
    /// Parses the raw CSV record into a command.
    ///
    /// `row` is only used for error reporting.
    pub fn parse(&self, row: usize) -> Result<LedgerCommand> {
        let record_type = self.record_type.trim().to_lowercase();
        let participant = self.participant.trim();
        if participant.is_empty() {
            return Err(invalid(row, "missing participant id"));
        }

        if record_type == "participant" {
            let name = non_empty(&self.label)
                .ok_or_else(|| invalid(row, "missing participant name"))?;
            return Ok(LedgerCommand::Register {
                id: participant.to_string(),
                name: name.to_string(),
            });
        }

        let strategy = Strategy::from_name(&record_type)
            .ok_or_else(|| invalid(row, format!("unknown record type '{}'", record_type)))?;

        let amount = non_empty(&self.amount).ok_or_else(|| invalid(row, "missing amount"))?;
        let total = Amount::from_str(amount)
            .map_err(|e| invalid(row, format!("invalid amount '{}': {}", amount, e)))?;

        let splits = non_empty(&self.splits)
            .map(|s| parse_splits(s, row))
            .transpose()?
            .unwrap_or_default();

        Ok(LedgerCommand::Expense(ExpenseRequest {
            strategy,
            total,
            payer_id: participant.to_string(),
            splits,
            label: non_empty(&self.label).unwrap_or_default().to_string(),
        }))
    }
}

/// Parses `id` / `id:value` entries separated by `;`.
fn parse_splits(field: &str, row: usize) -> Result<Vec<SplitRequest>> {
    field
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            None => Ok(SplitRequest::new(entry)),
            Some((id, value)) => {
                let id = id.trim();
                if id.is_empty() {
                    return Err(invalid(row, format!("split '{}' has no participant", entry)));
                }
                let value = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| invalid(row, format!("invalid split value in '{}': {}", entry, e)))?;
                Ok(SplitRequest::with_value(id, value))
            }
        })
        .collect()
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn invalid(row: usize, message: impl Into<String>) -> LedgerError {
    LedgerError::InvalidRecord {
        row,
        message: message.into(),
    }
}
