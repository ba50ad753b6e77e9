//! Command dispatcher tying authorization and the ledger together.
//!
//! Commands arrive as a name plus raw string arguments. `authorize` and
//! `logout` are always allowed; everything else needs a live session, which
//! is refreshed before the command runs.

use crate::auth::AuthorizationStore;
use crate::clock::{Clock, SystemClock};
use crate::config::AtmConfig;
use crate::error::{AtmError, Result};
use crate::ledger::{HistoryEntry, LedgerStore, Withdrawal};
use crate::money::Money;
use log::{debug, warn};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Successful outcome of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Authorized(String),
    LoggedOut(String),
    NothingToLogOut,
    Withdrawn(Withdrawal),
    Deposited { balance: Money },
    Balance(Money),

    /// Newest first; never empty.
    History(Vec<HistoryEntry>),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Authorized(account_id) => {
                write!(f, "{} successfully authorized.", account_id)
            }
            Response::LoggedOut(account_id) => write!(f, "Account {} logged out.", account_id),
            Response::NothingToLogOut => write!(f, "No account is currently authorized."),
            Response::Withdrawn(w) => {
                if w.is_partial() {
                    writeln!(f, "Unable to dispense full amount requested at this time.")?;
                }
                writeln!(f, "Amount dispensed: ${}.", w.dispensed)?;
                if let Some(fee) = w.overdraft_fee {
                    write!(f, "You have been charged an overdraft fee of ${}. ", fee)?;
                }
                write!(f, "Current balance: ${}.", w.balance)
            }
            Response::Deposited { balance } | Response::Balance(balance) => {
                write!(f, "Current balance: ${}.", balance)
            }
            Response::History(entries) => {
                let lines: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
                write!(f, "{}", lines.join("\n"))
            }
        }
    }
}

/// The one ATM instance: owns both stores, built from a single account list
/// so they always know the same accounts.
pub struct Atm {
    auth: AuthorizationStore,
    ledger: LedgerStore,
}

impl Atm {
    /// Builds an ATM on the system clock.
    pub fn new(config: &AtmConfig) -> Self {
        Self::with_clock(config, Rc::new(SystemClock))
    }

    pub fn with_clock(config: &AtmConfig, clock: Rc<dyn Clock>) -> Self {
        Atm {
            auth: AuthorizationStore::new(&config.accounts, config.session_timeout, clock.clone()),
            ledger: LedgerStore::new(
                &config.accounts,
                config.cash_pool,
                config.overdraft_fee,
                clock,
            ),
        }
    }

    pub fn auth(&self) -> &AuthorizationStore {
        &self.auth
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Parses a raw input line and returns the text to show the user.
    ///
    /// Blank lines yield an empty string.
    pub fn handle_line(&mut self, line: &str) -> String {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return String::new();
        };
        let args: Vec<&str> = parts.collect();

        match self.execute(command, &args) {
            Ok(response) => response.to_string(),
            Err(e) => e.to_string(),
        }
    }

    /// Runs one command. The name is matched case-insensitively.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<Response> {
        let command = command.to_lowercase();
        debug!("Command {} with {} argument(s)", command, args.len());

        match command.as_str() {
            "authorize" => {
                let (Some(account_id), Some(pin)) = (args.first(), args.get(1)) else {
                    warn!("Authorize called without account id and pin");
                    return Err(AtmError::AuthFailure);
                };
                return self.auth.authorize(account_id, pin).map(Response::Authorized);
            }
            "logout" => {
                return Ok(match self.auth.logout() {
                    Some(account_id) => Response::LoggedOut(account_id),
                    None => Response::NothingToLogOut,
                });
            }
            _ => {}
        }

        let account_id = self.require_session()?;

        match command.as_str() {
            "withdraw" => {
                let amount = parse_amount::<u32>(args)?;
                self.ledger
                    .withdraw(&account_id, amount)
                    .map(Response::Withdrawn)
            }
            "deposit" => {
                let amount = parse_amount::<Money>(args)?;
                self.ledger
                    .deposit(&account_id, amount)
                    .map(|balance| Response::Deposited { balance })
            }
            "balance" => self.ledger.get_balance(&account_id).map(Response::Balance),
            "history" => self.ledger.get_history(&account_id).map(Response::History),
            _ => {
                debug!("Unrecognized command {}", command);
                Err(AtmError::UnknownCommand(command.clone()))
            }
        }
    }

    /// Returns the logged-in account after refreshing its activity, evicting
    /// the session first if it has gone idle.
    fn require_session(&mut self) -> Result<String> {
        let account_id = self
            .auth
            .get_active_account_id()
            .map(str::to_string)
            .ok_or(AtmError::SessionRequired)?;

        if !self.auth.is_session_active() {
            self.auth.expire_session();
            return Err(AtmError::SessionExpired);
        }

        self.auth.refresh_activity(&account_id);
        Ok(account_id)
    }
}

/// Coerces the first argument, mapping any failure to a validation error.
fn parse_amount<T: FromStr>(args: &[&str]) -> Result<T> {
    let raw = args.first().copied().unwrap_or_default();
    raw.trim().parse::<T>().map_err(|_| {
        warn!("Invalid amount argument {:?}", raw);
        AtmError::InvalidAmount(raw.to_string())
    })
}
