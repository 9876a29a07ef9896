//! Expense Ledger CLI
//!
//! Reads participants and expenses from CSV and prints who owes whom.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- expenses.csv > settlement.csv
//! cargo run -- expenses.csv 2 > bob.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` for per-expense summaries or `warn` to see
//!   rejected rows

use expense_ledger::{LedgerError, LedgerService, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut service = LedgerService::new();
    service.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    match args.get(2) {
        Some(participant) => service.write_participant_summary(participant, handle)?,
        None => service.write_summary(handle)?,
    }

    Ok(())
}
