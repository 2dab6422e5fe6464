//! caseshop-core - client-side data layer for the case storefront.
//!
//! The storefront shows the same three pieces of data on nearly every page:
//! the signed-in user with their wallet, the case catalog and the promo
//! banners. This crate fetches each of them once per session into a shared
//! `PreloadCache`, serves per-domain views to the UI, and lets purchase and
//! reward flows adjust the wallet balance locally through `BalanceUpdater`
//! before the server has confirmed anything.

pub mod adapters;
pub mod api;
pub mod balance;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError, ErrorKind, FetchError, StoreBackend};
pub use balance::{BalanceError, BalanceUpdater};
pub use cache::{AuthStatus, CacheState, Domain, DomainState, PreloadCache};
pub use config::Config;
