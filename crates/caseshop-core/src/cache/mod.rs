//! Session-wide preload cache for storefront data.
//!
//! `PreloadCache` holds the three domains the storefront needs on every page:
//! - the signed-in user (profile, wallet balance, inventory)
//! - the case catalog
//! - promotional banners
//!
//! Data lives in memory for the session only. Each domain is fetched once by
//! `preload` and re-fetched only on an explicit refresh. The user's balance
//! can be adjusted locally before the server confirms a purchase or reward.

pub mod preload;
pub mod state;

pub use preload::PreloadCache;
pub use state::{AuthStatus, CacheState, Domain, DomainState, FetchPhase};
