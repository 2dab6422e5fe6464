//! Legacy views that fetch straight from the backend, one instance per
//! consumer. Each keeps its own copy of the domain, so two instances can
//! disagree; prefer the `Cached*` adapters for anything that must stay in sync
//! with optimistic balance updates.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::api::{FetchError, StoreBackend};
use crate::cache::{AuthStatus, DomainState};
use crate::models::{Banner, CatalogItem, User};

use super::{BannersSource, BannersView, CasesSource, CasesView, UserSource, UserView};

#[derive(Clone)]
pub struct DirectUser {
    backend: Arc<dyn StoreBackend>,
    state: Arc<watch::Sender<(DomainState<Option<User>>, AuthStatus)>>,
}

impl DirectUser {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        let (state, _) = watch::channel(Default::default());
        Self {
            backend,
            state: Arc::new(state),
        }
    }
}

#[async_trait]
impl UserSource for DirectUser {
    fn view(&self) -> UserView {
        let state = self.state.borrow();
        let (slot, auth) = &*state;
        UserView {
            user: slot.value.clone(),
            loading: slot.loading,
            error: slot.error.clone(),
            is_authenticated: auth.is_authenticated(),
        }
    }

    async fn refresh(&self) {
        self.state.send_modify(|(slot, _)| slot.begin());
        let result = self.backend.fetch_user().await.map_err(FetchError::from);
        self.state.send_modify(|(slot, auth)| {
            *auth = auth.after_fetch(result.as_ref().err());
            slot.settle(result.map(Some));
        });
    }
}

#[derive(Clone)]
pub struct DirectCases {
    backend: Arc<dyn StoreBackend>,
    state: Arc<watch::Sender<DomainState<Vec<CatalogItem>>>>,
}

impl DirectCases {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        let (state, _) = watch::channel(DomainState::default());
        Self {
            backend,
            state: Arc::new(state),
        }
    }
}

#[async_trait]
impl CasesSource for DirectCases {
    fn view(&self) -> CasesView {
        let slot = self.state.borrow();
        CasesView {
            cases: slot.value.clone(),
            loading: slot.loading,
            error: slot.error.clone(),
            has_more: false,
        }
    }

    async fn refresh(&self) {
        self.state.send_modify(DomainState::begin);
        let result = self.backend.fetch_cases().await.map_err(FetchError::from);
        self.state.send_modify(|slot| slot.settle(result));
    }
}

#[derive(Clone)]
pub struct DirectBanners {
    backend: Arc<dyn StoreBackend>,
    state: Arc<watch::Sender<DomainState<Vec<Banner>>>>,
}

impl DirectBanners {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        let (state, _) = watch::channel(DomainState::default());
        Self {
            backend,
            state: Arc::new(state),
        }
    }
}

#[async_trait]
impl BannersSource for DirectBanners {
    fn view(&self) -> BannersView {
        let slot = self.state.borrow();
        BannersView {
            banners: slot.value.clone(),
            loading: slot.loading,
            error: slot.error.clone(),
        }
    }

    async fn refresh(&self) {
        self.state.send_modify(DomainState::begin);
        let result = self.backend.fetch_banners().await.map_err(FetchError::from);
        self.state.send_modify(|slot| slot.settle(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CachedUser;
    use crate::api::ApiError;
    use crate::cache::PreloadCache;
    use crate::testing::{sample_banner, sample_case, sample_user, ScriptedBackend};

    #[tokio::test]
    async fn test_direct_and_cached_user_have_same_shape() {
        let backend = ScriptedBackend::new();
        backend.user.ready(Ok(sample_user(30)));
        backend.user.ready(Ok(sample_user(30)));

        let sources: Vec<Box<dyn UserSource>> = vec![
            Box::new(DirectUser::new(backend.clone())),
            Box::new(CachedUser::new(PreloadCache::new(backend.clone()))),
        ];
        for source in &sources {
            assert_eq!(source.view(), UserView::default());
            source.refresh().await;
        }
        assert_eq!(sources[0].view(), sources[1].view());
        assert_eq!(backend.user.calls(), 2);
    }

    #[tokio::test]
    async fn test_direct_cases_keeps_stale_value_on_error() {
        let backend = ScriptedBackend::new();
        backend.cases.ready(Ok(vec![sample_case(3, 30)]));
        backend.cases.ready(Err(ApiError::ServerError("down".into())));

        let cases = DirectCases::new(backend.clone());
        cases.refresh().await;
        cases.refresh().await;

        let view = cases.view();
        assert_eq!(view.cases, vec![sample_case(3, 30)]);
        assert!(view.error.is_some());
        assert!(!view.has_more);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_direct_banners() {
        let backend = ScriptedBackend::new();
        backend.banners.ready(Ok(vec![sample_banner(5)]));

        let banners = DirectBanners::new(backend.clone());
        banners.refresh().await;
        assert_eq!(banners.view().banners, vec![sample_banner(5)]);
    }
}
