//! Views backed by the shared preload cache. They hold no state of their own.

use async_trait::async_trait;

use crate::cache::PreloadCache;

use super::{BannersSource, BannersView, CasesSource, CasesView, UserSource, UserView};

#[derive(Clone)]
pub struct CachedUser {
    cache: PreloadCache,
}

impl CachedUser {
    pub fn new(cache: PreloadCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl UserSource for CachedUser {
    fn view(&self) -> UserView {
        self.cache.read(|state| UserView {
            user: state.user.value.clone(),
            loading: state.user.loading,
            error: state.user.error.clone(),
            is_authenticated: state.is_authenticated(),
        })
    }

    async fn refresh(&self) {
        self.cache.refresh_user().await;
    }
}

#[derive(Clone)]
pub struct CachedCases {
    cache: PreloadCache,
}

impl CachedCases {
    pub fn new(cache: PreloadCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl CasesSource for CachedCases {
    fn view(&self) -> CasesView {
        self.cache.read(|state| CasesView {
            cases: state.cases.value.clone(),
            loading: state.cases.loading,
            error: state.cases.error.clone(),
            has_more: false,
        })
    }

    async fn refresh(&self) {
        self.cache.refresh_cases().await;
    }
}

#[derive(Clone)]
pub struct CachedBanners {
    cache: PreloadCache,
}

impl CachedBanners {
    pub fn new(cache: PreloadCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl BannersSource for CachedBanners {
    fn view(&self) -> BannersView {
        self.cache.read(|state| BannersView {
            banners: state.banners.value.clone(),
            loading: state.banners.loading,
            error: state.banners.error.clone(),
        })
    }

    async fn refresh(&self) {
        self.cache.refresh_banners().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::balance::BalanceUpdater;
    use crate::testing::{sample_banner, sample_case, sample_user, ScriptedBackend};

    #[tokio::test]
    async fn test_views_share_one_cache() {
        let backend = ScriptedBackend::new();
        backend.user.ready(Ok(sample_user(200)));
        backend.cases.ready(Ok(vec![sample_case(1, 100)]));
        backend.banners.ready(Ok(vec![sample_banner(1), sample_banner(2)]));

        let cache = PreloadCache::new(backend.clone());
        cache.preload().await;

        let header = CachedUser::new(cache.clone());
        let profile = CachedUser::new(cache.clone());
        BalanceUpdater::new(cache.clone()).decrease_balance(100);

        assert_eq!(header.view(), profile.view());
        assert_eq!(header.view().user.map(|u| u.balance), Some(100));
        assert!(header.view().is_authenticated);

        let banners = CachedBanners::new(cache.clone());
        assert_eq!(banners.view().banners.len(), 2);
    }

    #[tokio::test]
    async fn test_cases_view_pagination_is_disabled() {
        let backend = ScriptedBackend::new();
        backend.cases.ready(Ok(vec![sample_case(1, 10), sample_case(2, 20)]));
        let cache = PreloadCache::new(backend.clone());
        let cases = CachedCases::new(cache);

        cases.refresh().await;
        let before = cases.view();
        cases.load_more();
        let after = cases.view();

        assert!(!after.has_more);
        assert_eq!(before, after);
        assert_eq!(backend.cases.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_through_trait_object() {
        let backend = ScriptedBackend::new();
        backend.user.ready(Err(ApiError::Unauthorized));
        let cache = PreloadCache::new(backend.clone());
        let source: Box<dyn UserSource> = Box::new(CachedUser::new(cache));

        source.refresh().await;
        let view = source.view();
        assert!(!view.is_authenticated);
        assert!(view.user.is_none());
        assert!(view.error.is_some());
        assert!(!view.loading);
    }
}
