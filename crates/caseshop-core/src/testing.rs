//! Scripted backend and fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::api::{ApiError, StoreBackend};
use crate::models::{Banner, CatalogItem, Level, Role, User};

type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

/// Queue of responses for one domain, handed out in call order.
pub(crate) struct Script<T> {
    queue: Mutex<VecDeque<oneshot::Receiver<Result<T, ApiError>>>>,
    calls: AtomicUsize,
}

impl<T> Script<T> {
    fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a response the test settles later through the returned sender.
    pub(crate) fn pending(&self) -> Reply<T> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().unwrap().push_back(rx);
        tx
    }

    /// Queue a response that is available immediately.
    pub(crate) fn ready(&self, result: Result<T, ApiError>) {
        let _ = self.pending().send(result);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::ServerError("scripted reply dropped".into()))),
            None => Err(ApiError::ServerError("no scripted reply".into())),
        }
    }
}

pub(crate) struct ScriptedBackend {
    pub user: Script<User>,
    pub cases: Script<Vec<CatalogItem>>,
    pub banners: Script<Vec<Banner>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            user: Script::new(),
            cases: Script::new(),
            banners: Script::new(),
        })
    }
}

#[async_trait]
impl StoreBackend for ScriptedBackend {
    async fn fetch_user(&self) -> Result<User, ApiError> {
        self.user.next().await
    }

    async fn fetch_cases(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.cases.next().await
    }

    async fn fetch_banners(&self) -> Result<Vec<Banner>, ApiError> {
        self.banners.next().await
    }
}

pub(crate) fn sample_user(balance: u64) -> User {
    User {
        id: 42,
        username: "tester".to_string(),
        balance,
        level: Level::Plain(3),
        avatar: None,
        role: Role::User,
        inventory: None,
    }
}

pub(crate) fn sample_case(id: i64, price: u64) -> CatalogItem {
    CatalogItem {
        id,
        name: format!("Case {}", id),
        description: None,
        image: None,
        price,
    }
}

pub(crate) fn sample_banner(id: i64) -> Banner {
    Banner {
        id,
        title: format!("Banner {}", id),
        image: None,
        link: None,
    }
}
