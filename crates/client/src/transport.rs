use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::page::PageError;
use crate::protocol::GroupAction;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx status; `body` is the server's human-readable explanation.
    #[error("{body}")]
    Server { status: u16, body: String },
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Abstraction over the categorization endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs one action. The success body is ignored.
    async fn submit(&self, action: &GroupAction) -> Result<(), TransportError>;

    /// GETs the categorization page holding the embedded payloads.
    async fn fetch_page(&self) -> Result<String, TransportError>;
}

pub fn endpoint_url(server_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        server_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// ── HTTP transport ────────────────────────────────────────────────────────────

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await?;
    warn!(status = status.as_u16(), %body, "categorization endpoint rejected request");
    Err(TransportError::Server {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, action: &GroupAction) -> Result<(), TransportError> {
        debug!(endpoint = %self.endpoint, action = action.name(), group = action.group_name(), "POST");
        let response = self.client.post(&self.endpoint).json(action).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_page(&self) -> Result<String, TransportError> {
        debug!(endpoint = %self.endpoint, "GET");
        let response = self.client.get(&self.endpoint).send().await?;
        Ok(ensure_success(response).await?.text().await?)
    }
}

// ── Mock transport (used for tests) ───────────────────────────────────────────

enum MockFailure {
    Server { status: u16, body: String },
    Unreachable,
}

/// Records every submitted action and serves a fixed page, without a server.
#[derive(Default)]
pub struct MockTransport {
    page: Mutex<String>,
    submitted: Mutex<Vec<GroupAction>>,
    failure: Option<MockFailure>,
    fetches: AtomicUsize,
}

// reqwest::Error has no public constructor; a URL without a host fails
// inside the request builder before any I/O.
fn network_error() -> TransportError {
    match reqwest::Client::new().get("http://").build() {
        Err(e) => TransportError::Network(e),
        Ok(_) => TransportError::Server {
            status: 503,
            body: "unreachable".to_string(),
        },
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: Mutex::new(page.into()),
            ..Self::default()
        }
    }

    /// Every submit answers with this status and body.
    pub fn failing(mut self, status: u16, body: impl Into<String>) -> Self {
        self.failure = Some(MockFailure::Server {
            status,
            body: body.into(),
        });
        self
    }

    /// Every submit fails with a network error; pages are still served.
    pub fn unreachable(mut self) -> Self {
        self.failure = Some(MockFailure::Unreachable);
        self
    }

    pub fn set_page(&self, page: impl Into<String>) {
        *lock(&self.page) = page.into();
    }

    pub fn submitted(&self) -> Vec<GroupAction> {
        lock(&self.submitted).clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn submit(&self, action: &GroupAction) -> Result<(), TransportError> {
        lock(&self.submitted).push(action.clone());
        match &self.failure {
            Some(MockFailure::Server { status, body }) => Err(TransportError::Server {
                status: *status,
                body: body.clone(),
            }),
            Some(MockFailure::Unreachable) => Err(network_error()),
            None => Ok(()),
        }
    }

    async fn fetch_page(&self) -> Result<String, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.page).clone())
    }
}
