use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::FetchError;
use crate::models::{Banner, CatalogItem, User};

/// The three independently fetched data categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    User,
    Cases,
    Banners,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::User, Domain::Cases, Domain::Banners];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::User => "user",
            Domain::Cases => "cases",
            Domain::Banners => "banners",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a domain is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FetchPhase {
    #[default]
    NotStarted,
    InFlight,
    Settled,
}

/// Authentication as learned from the most recent user fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated,
    Anonymous,
}

impl AuthStatus {
    /// Next status after a user fetch settles. Failures other than
    /// "unauthenticated" say nothing about the session and keep the old status.
    pub fn after_fetch(self, error: Option<&FetchError>) -> AuthStatus {
        match error {
            None => AuthStatus::Authenticated,
            Some(err) if err.is_unauthenticated() => AuthStatus::Anonymous,
            Some(_) => self,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        *self == AuthStatus::Authenticated
    }
}

/// One domain's `(value, loading, error)` triple plus fetch bookkeeping.
///
/// Always mutated as a unit inside a single state update, so readers never see
/// `loading` and `value` from different fetches.
#[derive(Debug, Clone, Serialize)]
pub struct DomainState<T> {
    pub value: T,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub updated_at: Option<DateTime<Utc>>,
    phase: FetchPhase,
    in_flight: u32,
}

impl<T: Default> Default for DomainState<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            loading: false,
            error: None,
            updated_at: None,
            phase: FetchPhase::NotStarted,
            in_flight: 0,
        }
    }
}

impl<T> DomainState<T> {
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    /// Nothing outstanding and no successful fetch yet: either never tried,
    /// or every attempt so far failed.
    pub fn needs_preload(&self) -> bool {
        self.in_flight == 0 && self.updated_at.is_none()
    }

    /// Mark a fetch as started: loading on, previous error cleared.
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.loading = true;
        self.error = None;
        self.phase = FetchPhase::InFlight;
    }

    /// Record a settled fetch. Success replaces the value wholesale; failure
    /// keeps the stale value and records the error. `loading` stays on while
    /// another fetch for this domain is still outstanding.
    pub fn settle(&mut self, result: Result<T, FetchError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
        self.phase = if self.loading {
            FetchPhase::InFlight
        } else {
            FetchPhase::Settled
        };
        match result {
            Ok(value) => {
                self.value = value;
                self.error = None;
                self.updated_at = Some(Utc::now());
            }
            Err(err) => {
                self.error = Some(err);
            }
        }
    }

    pub fn age_minutes(&self) -> Option<i64> {
        self.updated_at
            .map(|at| (Utc::now() - at).num_minutes())
    }

    pub fn age_display(&self) -> String {
        let minutes = match self.age_minutes() {
            Some(minutes) => minutes,
            None => return "never".to_string(),
        };
        if minutes < 1 {
            // Negative covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Everything the preload cache holds for one session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheState {
    pub user: DomainState<Option<User>>,
    pub cases: DomainState<Vec<CatalogItem>>,
    pub banners: DomainState<Vec<Banner>>,
    pub auth: AuthStatus,
}

impl CacheState {
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn phase(&self, domain: Domain) -> FetchPhase {
        match domain {
            Domain::User => self.user.phase,
            Domain::Cases => self.cases.phase,
            Domain::Banners => self.banners.phase,
        }
    }

    pub fn is_loading(&self, domain: Domain) -> bool {
        match domain {
            Domain::User => self.user.loading,
            Domain::Cases => self.cases.loading,
            Domain::Banners => self.banners.loading,
        }
    }

    /// Start a fetch for `domain` unless one is outstanding or data has
    /// already been loaded. Returns whether the caller now owns that fetch.
    pub(crate) fn claim(&mut self, domain: Domain) -> bool {
        let needed = match domain {
            Domain::User => self.user.needs_preload(),
            Domain::Cases => self.cases.needs_preload(),
            Domain::Banners => self.banners.needs_preload(),
        };
        if !needed {
            return false;
        }
        self.begin(domain);
        true
    }

    pub(crate) fn begin(&mut self, domain: Domain) {
        match domain {
            Domain::User => self.user.begin(),
            Domain::Cases => self.cases.begin(),
            Domain::Banners => self.banners.begin(),
        }
    }

    pub(crate) fn settle_user(&mut self, result: Result<User, FetchError>) {
        self.auth = self.auth.after_fetch(result.as_ref().err());
        self.user.settle(result.map(Some));
    }

    /// Settle `domain` with a failure that did not come from the backend.
    pub(crate) fn fail(&mut self, domain: Domain, err: FetchError) {
        match domain {
            Domain::User => self.settle_user(Err(err)),
            Domain::Cases => self.cases.settle(Err(err)),
            Domain::Banners => self.banners.settle(Err(err)),
        }
    }
}
