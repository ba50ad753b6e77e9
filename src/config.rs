//! Startup configuration: cash pool, timeouts, fees and the account list.
//!
//! The defaults describe the four demo accounts the simulator ships with.
//! A CSV file with an `account_id,pin,balance` header can replace them.

use crate::error::{AtmError, Result};
use crate::money::Money;
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;
use std::time::Duration;

/// Idle time after which a session is no longer honored.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(120);

/// Raw account row as read from CSV.
///
/// Fields are kept as strings so a bad balance can be reported with its row.
#[derive(Debug, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    pub pin: String,
    pub balance: String,
}

/// A validated account to seed both stores with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSeed {
    pub account_id: String,
    pub pin: String,
    pub balance: Money,
}

impl AccountSeed {
    pub fn new(account_id: &str, pin: &str, balance: Money) -> Self {
        AccountSeed {
            account_id: account_id.to_string(),
            pin: pin.to_string(),
            balance,
        }
    }
}

/// Everything needed to build an [`Atm`](crate::Atm).
#[derive(Debug, Clone)]
pub struct AtmConfig {
    /// Physical cash loaded into the machine.
    pub cash_pool: Money,

    /// Inactivity window for a session.
    pub session_timeout: Duration,

    /// Flat fee charged when a withdrawal overdraws an account.
    pub overdraft_fee: Money,

    pub accounts: Vec<AccountSeed>,
}

impl Default for AtmConfig {
    fn default() -> Self {
        AtmConfig {
            cash_pool: Money::from_dollars(10_000),
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            overdraft_fee: Money::from_dollars(5),
            accounts: vec![
                AccountSeed::new("2859459814", "7386", Money::from_cents(1_024)),
                AccountSeed::new("1434597300", "4557", Money::from_cents(9_000_055)),
                AccountSeed::new("7089382418", "0075", Money::ZERO),
                AccountSeed::new("2001377812", "5950", Money::from_dollars(60)),
            ],
        }
    }
}

impl AtmConfig {
    /// Replaces the account list with the rows of a CSV document.
    ///
    /// Unlike command input, a bad accounts file is fatal: every row must
    /// parse, ids must be unique and at least one account must be present.
    pub fn load_accounts_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut accounts = Vec::new();
        let mut seen = HashSet::new();

        for (row_idx, result) in csv_reader.deserialize::<AccountRecord>().enumerate() {
            let row = row_idx + 2; // 1-indexed, accounting for header row
            let record = result?;
            let seed = record.parse(row)?;

            if !seen.insert(seed.account_id.clone()) {
                return Err(AtmError::DuplicateAccount {
                    account_id: seed.account_id,
                    row,
                });
            }

            debug!("Row {}: Loaded account {}", row, seed.account_id);
            accounts.push(seed);
        }

        if accounts.is_empty() {
            return Err(AtmError::InvalidAccountRecord {
                row: 1,
                message: "no accounts defined".to_string(),
            });
        }

        self.accounts = accounts;
        Ok(())
    }
}

impl AccountRecord {
    /// Validates the raw row into an [`AccountSeed`].
    pub fn parse(&self, row: usize) -> Result<AccountSeed> {
        let invalid = |message: &str| AtmError::InvalidAccountRecord {
            row,
            message: message.to_string(),
        };

        let account_id = self.account_id.trim();
        if account_id.is_empty() {
            return Err(invalid("empty account id"));
        }

        let pin = self.pin.trim();
        if pin.is_empty() {
            return Err(invalid("empty pin"));
        }

        let balance = Money::from_str(&self.balance)
            .map_err(|e| invalid(&format!("bad balance {:?}: {}", self.balance, e)))?;

        Ok(AccountSeed::new(account_id, pin, balance))
    }
}
