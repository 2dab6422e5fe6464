use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ErrorKind, FetchError, StoreBackend};
use crate::balance::{positive_amount, BalanceError};
use crate::models::{Banner, CatalogItem, User};

use super::state::{AuthStatus, CacheState, Domain, DomainState};

/// Session-wide cache of the user, catalog and banner domains.
///
/// Create one per session and hand clones to every consumer; clones share the
/// same state. All writes go through `watch::Sender::send_modify`, so each
/// update is published as one whole snapshot.
#[derive(Clone)]
pub struct PreloadCache {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<CacheState>,
    backend: Arc<dyn StoreBackend>,
}

impl PreloadCache {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        let (state, _) = watch::channel(CacheState::default());
        Self {
            inner: Arc::new(Inner { state, backend }),
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Fetch every domain that has no data yet and no fetch outstanding.
    ///
    /// Domains are claimed before the first await, so overlapping callers never
    /// start a second fetch for the same domain. Claimed fetches run
    /// concurrently and a failure in one does not affect the others. A domain
    /// whose earlier attempts all failed is tried again; a domain that has
    /// loaded once is left alone, even if a later refresh failed.
    pub async fn preload(&self) {
        let mut claimed = [false; 3];
        self.inner.state.send_if_modified(|state| {
            for (slot, domain) in claimed.iter_mut().zip(Domain::ALL) {
                *slot = state.claim(domain);
            }
            claimed.iter().any(|c| *c)
        });

        let [user, cases, banners] = claimed;
        if !(user || cases || banners) {
            debug!("Preload skipped, all domains loaded or loading");
            return;
        }
        info!(user, cases, banners, "Preloading storefront data");

        tokio::join!(
            async {
                if user {
                    self.fetch_user().await;
                }
            },
            async {
                if cases {
                    self.fetch_cases().await;
                }
            },
            async {
                if banners {
                    self.fetch_banners().await;
                }
            },
        );
    }

    /// Run `preload` on the current tokio runtime without waiting for it.
    pub fn spawn_preload(&self) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move { cache.preload().await })
    }

    pub async fn refresh_user(&self) {
        self.begin(Domain::User);
        self.fetch_user().await;
    }

    pub async fn refresh_cases(&self) {
        self.begin(Domain::Cases);
        self.fetch_cases().await;
    }

    pub async fn refresh_banners(&self) {
        self.begin(Domain::Banners);
        self.fetch_banners().await;
    }

    fn begin(&self, domain: Domain) {
        debug!(%domain, "Fetch started");
        self.inner.state.send_modify(|state| state.begin(domain));
    }

    // Each backend call runs in its own task so that dropping the caller's
    // future never leaves a started fetch unsettled.

    async fn fetch_user(&self) {
        let inner = Arc::clone(&self.inner);
        join_fetch(tokio::spawn(async move {
            let guard = SettleGuard::new(&inner, Domain::User);
            let result = inner.backend.fetch_user().await.map_err(FetchError::from);
            log_settled(Domain::User, &result);
            guard.disarm();
            inner.state.send_modify(|state| state.settle_user(result));
        }))
        .await;
    }

    async fn fetch_cases(&self) {
        let inner = Arc::clone(&self.inner);
        join_fetch(tokio::spawn(async move {
            let guard = SettleGuard::new(&inner, Domain::Cases);
            let result = inner.backend.fetch_cases().await.map_err(FetchError::from);
            log_settled(Domain::Cases, &result);
            guard.disarm();
            inner.state.send_modify(|state| state.cases.settle(result));
        }))
        .await;
    }

    async fn fetch_banners(&self) {
        let inner = Arc::clone(&self.inner);
        join_fetch(tokio::spawn(async move {
            let guard = SettleGuard::new(&inner, Domain::Banners);
            let result = inner.backend.fetch_banners().await.map_err(FetchError::from);
            log_settled(Domain::Banners, &result);
            guard.disarm();
            inner.state.send_modify(|state| state.banners.settle(result));
        }))
        .await;
    }

    // =========================================================================
    // Optimistic balance
    // =========================================================================

    /// Credit the cached user's balance in place. No network call is made; the
    /// next successful `refresh_user` replaces the user and this change with it.
    pub fn update_balance_locally(&self, amount: i64) -> Result<u64, BalanceError> {
        let result = positive_amount(amount).and_then(|amount| {
            self.mutate_balance(|balance| {
                balance
                    .checked_add(amount)
                    .ok_or(BalanceError::Overflow { balance, amount })
            })
        });
        if let Err(ref err) = result {
            warn!(amount, error = %err, "Local balance increase rejected");
        }
        result
    }

    /// Debit the cached user's balance in place. A debit that would go below
    /// zero is rejected rather than clamped.
    pub fn decrease_balance_locally(&self, amount: i64) -> Result<u64, BalanceError> {
        let result = positive_amount(amount).and_then(|amount| {
            self.mutate_balance(|balance| {
                balance
                    .checked_sub(amount)
                    .ok_or(BalanceError::Insufficient { balance, amount })
            })
        });
        if let Err(ref err) = result {
            warn!(amount, error = %err, "Local balance decrease rejected");
        }
        result
    }

    fn mutate_balance(
        &self,
        op: impl FnOnce(u64) -> Result<u64, BalanceError>,
    ) -> Result<u64, BalanceError> {
        let mut outcome = Err(BalanceError::NoUser);
        self.inner.state.send_if_modified(|state| {
            let Some(user) = state.user.value.as_mut() else {
                return false;
            };
            outcome = op(user.balance);
            match outcome {
                Ok(balance) => {
                    user.balance = balance;
                    true
                }
                Err(_) => false,
            }
        });
        outcome
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Run `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&CacheState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    pub fn snapshot(&self) -> CacheState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.inner.state.subscribe()
    }

    pub fn user(&self) -> DomainState<Option<User>> {
        self.read(|state| state.user.clone())
    }

    pub fn cases(&self) -> DomainState<Vec<CatalogItem>> {
        self.read(|state| state.cases.clone())
    }

    pub fn banners(&self) -> DomainState<Vec<Banner>> {
        self.read(|state| state.banners.clone())
    }

    pub fn auth_status(&self) -> AuthStatus {
        self.read(|state| state.auth)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.is_authenticated())
    }

    pub fn balance(&self) -> Option<u64> {
        self.read(|state| state.user.value.as_ref().map(|u| u.balance))
    }

    pub fn find_case(&self, id: i64) -> Option<CatalogItem> {
        self.read(|state| state.cases.value.iter().find(|c| c.id == id).cloned())
    }
}

/// Settles its domain with an error if the fetch task ends without reaching
/// its own settlement (panic in the backend, runtime shutdown).
struct SettleGuard<'a> {
    inner: &'a Inner,
    domain: Domain,
    armed: bool,
}

impl<'a> SettleGuard<'a> {
    fn new(inner: &'a Inner, domain: Domain) -> Self {
        Self {
            inner,
            domain,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(domain = %self.domain, "Fetch ended without a response");
        let domain = self.domain;
        self.inner.state.send_modify(|state| {
            state.fail(
                domain,
                FetchError::new(ErrorKind::Transport, "fetch ended without a response"),
            )
        });
    }
}

async fn join_fetch(task: JoinHandle<()>) {
    if let Err(err) = task.await {
        warn!(error = %err, "Fetch task did not complete");
    }
}

fn log_settled<T>(domain: Domain, result: &Result<T, FetchError>) {
    match result {
        Ok(_) => debug!(%domain, "Fetch settled"),
        Err(err) => warn!(%domain, error = %err, "Fetch failed, keeping cached value"),
    }
}

// ============================================================================
// Tests
// ============================================================================
