//! REST API module for the storefront service.
//!
//! `StoreBackend` is the seam between the cache and the network: one
//! one-shot fetch per domain. `ApiClient` implements it over HTTP; tests and
//! embedders can supply their own.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::{Banner, CatalogItem, User};

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind, FetchError};

/// Domain fetchers. Each call issues one request and never retries on its own
/// behalf beyond transport-level rate limiting.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn fetch_user(&self) -> Result<User, ApiError>;

    async fn fetch_cases(&self) -> Result<Vec<CatalogItem>, ApiError>;

    async fn fetch_banners(&self) -> Result<Vec<Banner>, ApiError>;
}
