//! Account balances, the ATM cash pool and per-account history.
//!
//! Every balance change writes one [`HistoryEntry`] at the head of the
//! account's history, so history is always newest-first.

use crate::clock::Clock;
use crate::config::AccountSeed;
use crate::error::{AtmError, Result};
use crate::money::Money;
use chrono::{NaiveDate, NaiveTime};
use log::{debug, info, warn};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

/// Withdrawals must be whole multiples of this many dollars.
pub const WITHDRAWAL_STEP: u32 = 20;

/// Largest amount accepted in a single deposit, in dollars.
pub const MAX_DEPOSIT_DOLLARS: u32 = 1_000_000;

/// One balance-changing event. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,

    /// Signed change: negative for dispenses and fees.
    pub amount: Money,

    /// Balance right after this change.
    pub balance: Money,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.time.format("%H:%M:%S"),
            self.amount,
            self.balance
        )
    }
}

/// What a successful withdrawal actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    pub requested: Money,

    /// Less than `requested` when the cash pool ran short.
    pub dispensed: Money,

    /// Set when the dispense left the account below zero.
    pub overdraft_fee: Option<Money>,

    /// Balance after the dispense and any fee.
    pub balance: Money,
}

impl Withdrawal {
    pub fn is_partial(&self) -> bool {
        self.dispensed < self.requested
    }
}

#[derive(Debug)]
struct LedgerAccount {
    balance: Money,
    history: VecDeque<HistoryEntry>,
}

/// Owns every account balance and the shared cash pool.
pub struct LedgerStore {
    accounts: HashMap<String, LedgerAccount>,
    cash_pool: Money,
    overdraft_fee: Money,
    clock: Rc<dyn Clock>,
}

impl LedgerStore {
    pub fn new(
        seeds: &[AccountSeed],
        cash_pool: Money,
        overdraft_fee: Money,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let accounts = seeds
            .iter()
            .map(|seed| {
                (
                    seed.account_id.clone(),
                    LedgerAccount {
                        balance: seed.balance,
                        history: VecDeque::new(),
                    },
                )
            })
            .collect();

        LedgerStore {
            accounts,
            cash_pool,
            overdraft_fee,
            clock,
        }
    }

    /// Cash left in the machine.
    pub fn cash_pool(&self) -> Money {
        self.cash_pool
    }

    /// Dispenses cash from the pool and debits the account.
    ///
    /// Checks run in this order, each rejection leaving all state untouched:
    /// overdrawn account, empty cash pool, amount not a positive multiple of
    /// $20. Then the dispense is capped at the cash left in the pool. If the
    /// debit leaves the account negative, the overdraft fee is charged as a
    /// separate history entry.
    pub fn withdraw(&mut self, account_id: &str, amount: u32) -> Result<Withdrawal> {
        let balance = self.get_balance(account_id)?;

        if balance.is_negative() {
            warn!("Withdrawal blocked: account {} already overdrawn", account_id);
            return Err(AtmError::AccountOverdrawn);
        }

        if !self.cash_pool.is_positive() {
            warn!("Withdrawal blocked: ATM is out of cash (account {})", account_id);
            return Err(AtmError::CashUnavailable);
        }

        if amount == 0 || amount % WITHDRAWAL_STEP != 0 {
            warn!(
                "Withdrawal of {} rejected for account {}: not a multiple of {}",
                amount, account_id, WITHDRAWAL_STEP
            );
            return Err(AtmError::NotMultipleOfTwenty);
        }

        let requested = Money::from_dollars(amount);
        let dispensed = requested.min(self.cash_pool);
        let remaining_pool = self
            .cash_pool
            .checked_sub(dispensed)
            .ok_or(AtmError::CashUnavailable)?;

        let mut balance = self.post(account_id, -dispensed)?;
        self.cash_pool = remaining_pool;
        info!(
            "Dispensed {} of {} requested to account {}, balance {}",
            dispensed, requested, account_id, balance
        );

        let mut overdraft_fee = None;
        if balance.is_negative() && self.overdraft_fee.is_positive() {
            let fee = self.overdraft_fee;
            balance = self.post(account_id, -fee)?;
            overdraft_fee = Some(fee);
            info!(
                "Overdraft fee {} charged to account {}, balance {}",
                fee, account_id, balance
            );
        }

        debug!("Cash pool now {}", self.cash_pool);

        Ok(Withdrawal {
            requested,
            dispensed,
            overdraft_fee,
            balance,
        })
    }

    /// Credits the account and returns the new balance.
    pub fn deposit(&mut self, account_id: &str, amount: Money) -> Result<Money> {
        if !amount.is_positive() {
            warn!(
                "Deposit of {} rejected for account {}: not positive",
                amount, account_id
            );
            return Err(AtmError::NonPositiveDeposit);
        }

        if amount > Money::from_dollars(MAX_DEPOSIT_DOLLARS) {
            warn!(
                "Deposit of {} rejected for account {}: above limit",
                amount, account_id
            );
            return Err(AtmError::DepositLimitExceeded(MAX_DEPOSIT_DOLLARS));
        }

        let balance = self.post(account_id, amount)?;
        info!(
            "Deposited {} to account {}, balance {}",
            amount, account_id, balance
        );
        Ok(balance)
    }

    pub fn get_balance(&self, account_id: &str) -> Result<Money> {
        self.accounts
            .get(account_id)
            .map(|account| account.balance)
            .ok_or(AtmError::AccountNotFound)
    }

    /// Returns the account's history, newest first.
    ///
    /// An unknown account and an account with no history both yield
    /// [`AtmError::NoHistory`].
    pub fn get_history(&self, account_id: &str) -> Result<Vec<HistoryEntry>> {
        match self.accounts.get(account_id) {
            Some(account) if !account.history.is_empty() => {
                Ok(account.history.iter().cloned().collect())
            }
            _ => Err(AtmError::NoHistory),
        }
    }

    /// Applies a signed change to the balance and records it.
    ///
    /// A change that would overflow the balance is refused untouched.
    fn post(&mut self, account_id: &str, delta: Money) -> Result<Money> {
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or(AtmError::AccountNotFound)?;
        let balance = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| AtmError::InvalidAmount(delta.to_string()))?;
        account.balance = balance;

        self.write_history(account_id, delta, balance);
        Ok(balance)
    }

    /// Prepends a history entry stamped with the current date and time.
    fn write_history(&mut self, account_id: &str, amount: Money, balance: Money) {
        let now = self.clock.now();
        if let Some(account) = self.accounts.get_mut(account_id) {
            account.history.push_front(HistoryEntry {
                date: now.date(),
                time: now.time(),
                amount,
                balance,
            });
        }
    }
}
