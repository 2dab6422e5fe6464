//! Optimistic wallet updates for purchase and reward flows.
//!
//! `BalanceUpdater` is the entry point flows should call for instant feedback.
//! It never fails outward: rejected requests are logged and kept in a short
//! diagnostics log instead of being returned as errors.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::PreloadCache;

/// Number of rejected updates remembered by the updater.
const MAX_DIAGNOSTICS: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("No user is loaded")]
    NoUser,

    #[error("Insufficient balance: have {balance}, need {amount}")]
    Insufficient { balance: u64, amount: u64 },

    #[error("Balance overflow: {balance} + {amount}")]
    Overflow { balance: u64, amount: u64 },
}

/// Validate a requested delta and convert it to an unsigned amount.
pub(crate) fn positive_amount(amount: i64) -> Result<u64, BalanceError> {
    if amount <= 0 {
        return Err(BalanceError::NonPositiveAmount(amount));
    }
    Ok(amount.unsigned_abs())
}

/// Facade over the cache's local balance operations.
#[derive(Clone)]
pub struct BalanceUpdater {
    cache: PreloadCache,
    diagnostics: Arc<Mutex<VecDeque<BalanceError>>>,
}

impl BalanceUpdater {
    pub fn new(cache: PreloadCache) -> Self {
        Self {
            cache,
            diagnostics: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_DIAGNOSTICS))),
        }
    }

    /// Credit the cached wallet, e.g. after selling an item or a reward.
    pub fn increase_balance(&self, amount: i64) {
        if let Err(err) = positive_amount(amount) {
            warn!(amount, "Ignoring balance increase with non-positive amount");
            self.record(err);
            return;
        }
        match self.cache.update_balance_locally(amount) {
            Ok(balance) => debug!(amount, balance, "Balance increased locally"),
            Err(err) => self.record(err),
        }
    }

    /// Debit the cached wallet, e.g. right after a purchase request is sent.
    pub fn decrease_balance(&self, amount: i64) {
        if let Err(err) = positive_amount(amount) {
            warn!(amount, "Ignoring balance decrease with non-positive amount");
            self.record(err);
            return;
        }
        match self.cache.decrease_balance_locally(amount) {
            Ok(balance) => debug!(amount, balance, "Balance decreased locally"),
            Err(err) => self.record(err),
        }
    }

    /// Rejected updates, oldest first.
    pub fn diagnostics(&self) -> Vec<BalanceError> {
        self.lock().iter().cloned().collect()
    }

    pub fn last_diagnostic(&self) -> Option<BalanceError> {
        self.lock().back().cloned()
    }

    fn record(&self, err: BalanceError) {
        let mut log = self.lock();
        if log.len() == MAX_DIAGNOSTICS {
            log.pop_front();
        }
        log.push_back(err);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<BalanceError>> {
        self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
