//! # Expense Ledger
//!
//! Splits shared expenses among participants and keeps a pairwise balance
//! ledger of who owes whom.
//!
//! ## Design Principles
//!
//! - **Closed strategies**: equal, exact and percent splits are one enum,
//!   resolved by a single function
//! - **All-or-nothing recording**: a rejected expense leaves history and
//!   balances untouched
//! - **Anti-symmetric ledger**: each pair is stored once, so
//!   `balance(A, B) == -balance(B, A)` always holds
//! - **Deterministic output**: reports follow registration order
//!
//! ## Example
//!
//! ```
//! use expense_ledger::{LedgerService, SplitRequest, Strategy};
//!
//! let mut service = LedgerService::new();
//! service.register_participant("1", "Alice");
//! service.register_participant("2", "Bob");
//!
//! let splits = [SplitRequest::new("1"), SplitRequest::new("2")];
//! service
//!     .record_expense(Strategy::Equal, 60.0, "1", &splits, "Lunch")
//!     .unwrap();
//!
//! let summary: Vec<String> = service
//!     .settlement_summary()
//!     .iter()
//!     .map(|debt| debt.to_string())
//!     .collect();
//! assert_eq!(summary, vec!["Bob owes Alice: 30.00"]);
//! ```

pub mod amount;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod participant;
pub mod record;
pub mod service;
pub mod split;

pub use amount::Amount;
pub use error::{LedgerError, Result, SplitError};
pub use expense::{Expense, ExpenseRequest};
pub use ledger::{Balance, BalanceLedger, Debt, PairBalance};
pub use participant::{Participant, ParticipantRegistry};
pub use record::{LedgerCommand, LedgerRecord};
pub use service::LedgerService;
pub use split::{resolve, PendingSplit, Share, Split, SplitRequest, Strategy};
