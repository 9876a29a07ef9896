//! Ledger service: the orchestrator that records expenses.
//!
//! Each expense request either becomes a recorded [`Expense`] applied to the
//! [`BalanceLedger`], or is rejected with no effect. The service never prints;
//! callers query balances after each recorded expense if they want a summary.

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::expense::{Expense, ExpenseRequest};
use crate::ledger::{Balance, BalanceLedger, Debt, PairBalance};
use crate::participant::{Participant, ParticipantRegistry};
use crate::record::{LedgerCommand, LedgerRecord};
use crate::split::{self, PendingSplit, SplitRequest, Strategy};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use serde::Serialize;
use std::io::{Read, Write};
use std::sync::Arc;

/// Owns the participant registry, the expense history and the balance ledger.
///
/// # Output Ordering
///
/// Reports follow participant registration order, so output is
/// deterministic for a given input.
#[derive(Debug, Default)]
pub struct LedgerService {
    registry: ParticipantRegistry,

    /// Recorded expenses, oldest first.
    expenses: Vec<Expense>,

    ledger: BalanceLedger,
}

/// Output row for the settlement CSV.
#[derive(Debug, Serialize)]
struct DebtRow<'a> {
    debtor: &'a str,
    creditor: &'a str,
    amount: Amount,
}

impl LedgerService {
    /// Creates an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a participant and opens its ledger row.
    ///
    /// Re-registering an existing id keeps the original record.
    pub fn register_participant(&mut self, id: &str, name: &str) -> Arc<Participant> {
        if let Some(existing) = self.registry.get(id) {
            warn!(
                "Participant {} already registered as {}, ignoring",
                id, existing.name
            );
            return Arc::clone(existing);
        }

        self.ledger.open_row(id);
        debug!("Registered participant {} ({})", id, name);
        self.registry.insert(Participant::new(id, name))
    }

    /// Validates and records one expense.
    ///
    /// Fails with [`LedgerError::UnknownParticipant`] if the payer or any split
    /// participant is unregistered, or [`LedgerError::InvalidSplit`] if the
    /// splits do not satisfy the strategy. Failures change nothing.
    pub fn record_expense(
        &mut self,
        strategy: Strategy,
        total: impl Into<Amount>,
        payer_id: &str,
        splits: &[SplitRequest],
        label: &str,
    ) -> Result<&Expense> {
        let total = total.into();
        let payer = self.lookup(payer_id)?;
        let pending = splits
            .iter()
            .map(|s| {
                Ok(PendingSplit {
                    participant: self.lookup(&s.participant_id)?,
                    value: s.value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let resolved = split::resolve(strategy, total, &pending)
            .map_err(|source| LedgerError::InvalidSplit { strategy, source })?;

        let expense = Expense::new(
            self.expenses.len() + 1,
            label.to_string(),
            strategy,
            total,
            payer,
            resolved,
        );
        self.ledger.apply_expense(&expense)?;

        debug!(
            "Recorded {} expense #{} '{}' of {} paid by {}",
            strategy,
            expense.id(),
            expense.label(),
            total,
            payer_id
        );

        let idx = self.expenses.len();
        self.expenses.push(expense);
        Ok(&self.expenses[idx])
    }

    /// Records an expense from a parsed request.
    pub fn record(&mut self, request: &ExpenseRequest) -> Result<&Expense> {
        self.record_expense(
            request.strategy,
            request.total,
            &request.payer_id,
            &request.splits,
            &request.label,
        )
    }

    /// Non-zero balances of one participant. Empty means nothing outstanding.
    pub fn query_participant(&self, id: &str) -> Result<Vec<Balance>> {
        self.ledger.query_participant(id)
    }

    /// Every non-zero pairwise balance, each pair once.
    pub fn query_all(&self) -> Vec<PairBalance> {
        self.ledger.query_all()
    }

    /// Settlement summary as debts between named participants.
    pub fn settlement_summary(&self) -> Vec<Debt> {
        self.query_all()
            .iter()
            .filter_map(|pair| {
                let (debtor, creditor, amount) = pair.direction();
                self.debt(debtor, creditor, amount)
            })
            .collect()
    }

    /// Debts involving one participant, in either direction.
    pub fn participant_debts(&self, id: &str) -> Result<Vec<Debt>> {
        Ok(self
            .query_participant(id)?
            .iter()
            .filter_map(|b| {
                if b.amount.is_negative() {
                    self.debt(id, &b.counterpart, b.amount.abs())
                } else {
                    self.debt(&b.counterpart, id, b.amount)
                }
            })
            .collect())
    }

    /// Rebuilds a ledger from scratch by replaying the expense history.
    pub fn replay(&self) -> Result<BalanceLedger> {
        let mut ledger = BalanceLedger::new();
        for participant in self.registry.iter() {
            ledger.open_row(&participant.id);
        }
        for expense in &self.expenses {
            ledger.apply_expense(expense)?;
        }
        Ok(ledger)
    }

    /// Recorded expenses, oldest first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn participants(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Processes participant and expense rows from a CSV reader in order.
    ///
    /// Malformed rows and rejected expenses are logged at warn level and
    /// skipped. After each recorded expense the current settlement summary is
    /// logged at debug level.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<LedgerRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                    continue;
                }
            };

            match record.parse(row_num) {
                Ok(LedgerCommand::Register { id, name }) => {
                    self.register_participant(&id, &name);
                }
                Ok(LedgerCommand::Expense(request)) => match self.record(&request).map(|_| ()) {
                    Ok(()) => self.log_event_summary(&request.label),
                    Err(e) => warn!("Row {}: Rejected expense '{}': {}", row_num, request.label, e),
                },
                Err(e) => warn!("{}", e),
            }
        }

        if self.registry.is_empty() {
            warn!("No participants registered");
        }

        Ok(())
    }

    /// Writes the settlement summary as CSV.
    pub fn write_summary<W: Write>(&self, writer: W) -> Result<()> {
        write_debts(writer, &self.settlement_summary())
    }

    /// Writes one participant's debts as CSV.
    pub fn write_participant_summary<W: Write>(&self, id: &str, writer: W) -> Result<()> {
        write_debts(writer, &self.participant_debts(id)?)
    }

    fn lookup(&self, id: &str) -> Result<Arc<Participant>> {
        self.registry
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::unknown_participant(id))
    }

    fn debt(&self, debtor: &str, creditor: &str, amount: Amount) -> Option<Debt> {
        Some(Debt {
            debtor: Arc::clone(self.registry.get(debtor)?),
            creditor: Arc::clone(self.registry.get(creditor)?),
            amount,
        })
    }

    fn log_event_summary(&self, label: &str) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }

        debug!("Summary of bill settlement for {}:", label);
        for debt in self.settlement_summary() {
            debug!("  {}", debt);
        }
    }
}

/// Writes `debtor,creditor,amount` rows. The header is always present.
fn write_debts<W: Write>(writer: W, debts: &[Debt]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(["debtor", "creditor", "amount"])?;
    for debt in debts {
        csv_writer.serialize(DebtRow {
            debtor: &debt.debtor.name,
            creditor: &debt.creditor.name,
            amount: debt.amount,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
