//! PIN authorization and the single active session.
//!
//! States are `NoSession` and `ActiveSession(account, last_activity)`.
//! Authorizing always evicts the current session first, so at most one
//! account is ever logged in.

use crate::clock::Clock;
use crate::config::AccountSeed;
use crate::error::{AtmError, Result};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// The logged-in account and when it last did something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub account_id: String,
    pub last_activity: NaiveDateTime,
}

/// Owns the account→PIN mapping and the current session.
pub struct AuthorizationStore {
    pins: HashMap<String, String>,
    session: Option<Session>,
    timeout: Duration,
    clock: Rc<dyn Clock>,
}

impl AuthorizationStore {
    pub fn new(seeds: &[AccountSeed], timeout: Duration, clock: Rc<dyn Clock>) -> Self {
        let pins = seeds
            .iter()
            .map(|seed| (seed.account_id.clone(), seed.pin.clone()))
            .collect();

        AuthorizationStore {
            pins,
            session: None,
            timeout,
            clock,
        }
    }

    /// Logs `account_id` in if `pin` matches.
    ///
    /// Whoever was logged in before is logged out first, even when this
    /// attempt fails. Unknown accounts and wrong PINs produce the same error.
    pub fn authorize(&mut self, account_id: &str, pin: &str) -> Result<String> {
        self.logout();

        match self.pins.get(account_id) {
            None => {
                warn!("Bad auth: unknown account");
                return Err(AtmError::AuthFailure);
            }
            Some(expected) if expected != pin => {
                warn!("Bad auth: wrong pin for account {}", account_id);
                return Err(AtmError::AuthFailure);
            }
            Some(_) => {}
        }

        self.session = Some(Session {
            account_id: account_id.to_string(),
            last_activity: self.clock.now(),
        });
        info!("Account {} authorized", account_id);

        Ok(account_id.to_string())
    }

    /// Ends the current session, returning the account that was logged out.
    pub fn logout(&mut self) -> Option<String> {
        let session = self.session.take()?;
        info!("Account {} logged out", session.account_id);
        Some(session.account_id)
    }

    pub fn get_active_account_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.account_id.as_str())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns `true` if a session exists and has been idle no longer than
    /// the timeout.
    ///
    /// This never mutates; an expired session stays in place until
    /// [`expire_session`](Self::expire_session) is called.
    pub fn is_session_active(&self) -> bool {
        match &self.session {
            None => false,
            Some(session) => self.idle_time(session) <= self.timeout,
        }
    }

    /// Evicts the session if it has timed out, returning the evicted account.
    ///
    /// Idempotent: does nothing when there is no session or it is still live.
    pub fn expire_session(&mut self) -> Option<String> {
        if self.session.is_none() || self.is_session_active() {
            return None;
        }

        let account_id = self.logout()?;
        info!("Account {} timed out after inactivity", account_id);
        Some(account_id)
    }

    /// Stamps the current session with the current time.
    ///
    /// The account id is not checked against the session; callers pass the
    /// id they just got from [`get_active_account_id`](Self::get_active_account_id).
    pub fn refresh_activity(&mut self, account_id: &str) {
        let now = self.clock.now();
        match self.session.as_mut() {
            Some(session) => {
                session.last_activity = now;
                debug!("Refreshed activity for account {}", account_id);
            }
            None => debug!("No session to refresh for account {}", account_id),
        }
    }

    /// A clock that moved backwards counts as no idle time.
    fn idle_time(&self, session: &Session) -> Duration {
        self.clock
            .now()
            .signed_duration_since(session.last_activity)
            .to_std()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::money::Money;
    use chrono::NaiveDate;

    fn setup() -> (AuthorizationStore, Rc<ManualClock>) {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let clock = Rc::new(ManualClock::new(start));
        let seeds = vec![
            AccountSeed::new("A", "1111", Money::ZERO),
            AccountSeed::new("B", "2222", Money::ZERO),
        ];
        let store = AuthorizationStore::new(&seeds, Duration::from_secs(120), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_authorize_success() {
        let (mut store, _) = setup();
        assert_eq!(store.authorize("A", "1111").unwrap(), "A");
        assert_eq!(store.get_active_account_id(), Some("A"));
        assert!(store.is_session_active());
    }

    #[test]
    fn test_wrong_pin_and_unknown_account_look_the_same() {
        let (mut store, _) = setup();
        let wrong_pin = store.authorize("A", "9999").unwrap_err();
        let unknown = store.authorize("Z", "1111").unwrap_err();

        assert_eq!(wrong_pin.to_string(), "Authorization failed.");
        assert_eq!(wrong_pin.to_string(), unknown.to_string());
        assert_eq!(store.get_active_account_id(), None);
    }

    #[test]
    fn test_authorize_evicts_previous_session_even_on_failure() {
        let (mut store, _) = setup();
        store.authorize("A", "1111").unwrap();

        assert!(store.authorize("B", "0000").is_err());
        assert_eq!(store.get_active_account_id(), None);
    }

    #[test]
    fn test_authorize_replaces_session() {
        let (mut store, _) = setup();
        store.authorize("A", "1111").unwrap();
        store.authorize("B", "2222").unwrap();
        assert_eq!(store.get_active_account_id(), Some("B"));
    }

    #[test]
    fn test_logout() {
        let (mut store, _) = setup();
        assert_eq!(store.logout(), None);

        store.authorize("A", "1111").unwrap();
        assert_eq!(store.logout(), Some("A".to_string()));
        assert_eq!(store.get_active_account_id(), None);
        assert_eq!(store.logout(), None);
    }

    #[test]
    fn test_timeout_boundary() {
        let (mut store, clock) = setup();
        store.authorize("A", "1111").unwrap();

        clock.advance_secs(120);
        assert!(store.is_session_active());

        clock.advance_secs(1);
        assert!(!store.is_session_active());
    }

    #[test]
    fn test_liveness_check_does_not_evict() {
        let (mut store, clock) = setup();
        store.authorize("A", "1111").unwrap();
        clock.advance_secs(500);

        assert!(!store.is_session_active());
        assert_eq!(store.get_active_account_id(), Some("A"));

        assert_eq!(store.expire_session(), Some("A".to_string()));
        assert_eq!(store.get_active_account_id(), None);
        assert_eq!(store.expire_session(), None);
    }

    #[test]
    fn test_expire_session_leaves_live_session_alone() {
        let (mut store, clock) = setup();
        store.authorize("A", "1111").unwrap();
        clock.advance_secs(60);

        assert_eq!(store.expire_session(), None);
        assert_eq!(store.get_active_account_id(), Some("A"));
    }

    #[test]
    fn test_refresh_extends_session() {
        let (mut store, clock) = setup();
        store.authorize("A", "1111").unwrap();

        clock.advance_secs(100);
        store.refresh_activity("A");
        clock.advance_secs(100);
        assert!(store.is_session_active());

        clock.advance_secs(50);
        assert!(!store.is_session_active());
    }

    #[test]
    fn test_refresh_without_session_is_noop() {
        let (mut store, _) = setup();
        store.refresh_activity("A");
        assert!(store.session().is_none());
    }
}
