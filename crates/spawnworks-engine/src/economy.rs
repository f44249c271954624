//! Economy collaborator trait
//!
//! Consumed only by the purchase entry points (upgrades, limit increases),
//! never by the tick core. A failing backend degrades to "feature
//! unavailable": errors are reported to the caller as a rejection, they do
//! not propagate into the scheduler.

use spawnworks_core::OwnerId;
use thiserror::Error;

/// The economy backend failed or is not installed
#[derive(Debug, Error)]
#[error("economy backend unavailable: {0}")]
pub struct EconomyError(pub String);

/// Funds interface implemented by surrounding code
pub trait EconomyProvider: Send + Sync {
    fn has_funds(&self, owner: &OwnerId, amount: f64) -> std::result::Result<bool, EconomyError>;

    /// Withdraw must only be called after a successful `has_funds`
    fn withdraw(&self, owner: &OwnerId, amount: f64) -> std::result::Result<(), EconomyError>;

    /// Human-readable cost, for reject reasons surfaced to callers
    fn format_cost(&self, amount: f64) -> String {
        format!("{amount:.2}")
    }
}

/// Free-mode economy: everything is affordable, nothing is withdrawn
///
/// Used when no economy backend is installed, matching the behavior of
/// charging nothing rather than blocking upgrades.
pub struct NoEconomy;

impl EconomyProvider for NoEconomy {
    fn has_funds(&self, _owner: &OwnerId, _amount: f64) -> std::result::Result<bool, EconomyError> {
        Ok(true)
    }

    fn withdraw(&self, _owner: &OwnerId, _amount: f64) -> std::result::Result<(), EconomyError> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Economy with a fixed balance, optionally failing every call
    pub struct MockEconomy {
        pub balance: Mutex<f64>,
        pub fail: bool,
    }

    impl MockEconomy {
        pub fn with_balance(balance: f64) -> Self {
            Self {
                balance: Mutex::new(balance),
                fail: false,
            }
        }

        pub fn unavailable() -> Self {
            Self {
                balance: Mutex::new(0.0),
                fail: true,
            }
        }
    }

    impl EconomyProvider for MockEconomy {
        fn has_funds(&self, _owner: &OwnerId, amount: f64) -> Result<bool, EconomyError> {
            if self.fail {
                return Err(EconomyError("backend offline".to_string()));
            }
            Ok(*self.balance.lock().unwrap() >= amount)
        }

        fn withdraw(&self, _owner: &OwnerId, amount: f64) -> Result<(), EconomyError> {
            if self.fail {
                return Err(EconomyError("backend offline".to_string()));
            }
            *self.balance.lock().unwrap() -= amount;
            Ok(())
        }
    }
}
