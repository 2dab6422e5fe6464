//! Per-domain read views in the shape the storefront UI already consumes.
//!
//! Each domain has one capability trait. `Cached*` adapters project the shared
//! `PreloadCache`; `Direct*` adapters fetch on their own through a
//! `StoreBackend`. Callers hold a `dyn UserSource` (etc.) and do not care which
//! one backs them.

pub mod cached;
pub mod direct;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::FetchError;
use crate::models::{Banner, CatalogItem, User};

pub use cached::{CachedBanners, CachedCases, CachedUser};
pub use direct::{DirectBanners, DirectCases, DirectUser};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserView {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CasesView {
    pub cases: Vec<CatalogItem>,
    pub loading: bool,
    pub error: Option<FetchError>,
    /// Pagination was removed server-side; always false.
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BannersView {
    pub banners: Vec<Banner>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

#[async_trait]
pub trait UserSource: Send + Sync {
    fn view(&self) -> UserView;

    async fn refresh(&self);
}

#[async_trait]
pub trait CasesSource: Send + Sync {
    fn view(&self) -> CasesView;

    async fn refresh(&self);

    /// Kept for callers of the paginated catalog; there is never more to load.
    fn load_more(&self) {}
}

#[async_trait]
pub trait BannersSource: Send + Sync {
    fn view(&self) -> BannersView;

    async fn refresh(&self);
}
