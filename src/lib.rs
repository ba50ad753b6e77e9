//! # ATM Simulator
//!
//! An interactive, single-user ATM: PIN authorization with an inactivity
//! timeout, and withdraw / deposit / balance / history commands against
//! in-memory balances and a shared cash pool.
//!
//! ## Design Principles
//!
//! - **Fixed-point money**: 2 decimal places via `rust_decimal`
//! - **One session**: authorizing always logs out whoever was logged in
//! - **No globals**: one [`Atm`] owns both stores and is passed around explicitly
//! - **Tagged results**: commands return [`Response`] or an [`AtmError`] with an [`ErrorKind`]
//!
//! ## Example
//!
//! ```
//! use atm_simulator::{Atm, AtmConfig};
//!
//! let mut atm = Atm::new(&AtmConfig::default());
//! assert_eq!(atm.handle_line("authorize 2001377812 5950"), "2001377812 successfully authorized.");
//! assert_eq!(atm.handle_line("withdraw 40"), "Amount dispensed: $40.00.\nCurrent balance: $20.00.");
//! ```

pub mod atm;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod money;

pub use atm::{Atm, Response};
pub use auth::{AuthorizationStore, Session};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AccountSeed, AtmConfig};
pub use error::{AtmError, ErrorKind, Result};
pub use ledger::{HistoryEntry, LedgerStore, Withdrawal};
pub use money::{Money, ParseMoneyError};
