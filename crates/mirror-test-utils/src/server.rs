//! Fake release host.
//!
//! Serves `/<owner>/<repo>/releases/latest/download/<name>` for GET and HEAD
//! from an in-memory table of [`FixtureAsset`]s. Unknown names answer 404.
//! The server runs on the current Tokio runtime and stops when dropped.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::files::http_date;

/// What the server returns for one asset name.
#[derive(Debug, Clone)]
pub struct FixtureAsset {
    body: Vec<u8>,
    last_modified: Option<String>,
    status: StatusCode,
    broken_after: Option<usize>,
}

impl FixtureAsset {
    /// A 200 response with `body` and no `Last-Modified`.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            last_modified: None,
            status: StatusCode::OK,
            broken_after: None,
        }
    }

    /// Send `Last-Modified` for `time`.
    pub fn modified_at(mut self, time: SystemTime) -> Self {
        self.last_modified = Some(http_date(time));
        self
    }

    /// Send `value` verbatim as `Last-Modified`.
    pub fn raw_last_modified(mut self, value: impl Into<String>) -> Self {
        self.last_modified = Some(value.into());
        self
    }

    /// Answer with `status` instead of 200.
    ///
    /// # Panics
    /// Panics if `status` is not a valid HTTP status code.
    pub fn status(mut self, status: u16) -> Self {
        self.status = StatusCode::from_u16(status)
            .unwrap_or_else(|e| panic!("FixtureAsset::status: invalid status {status}: {e}"));
        self
    }

    /// Send the first `bytes` of the body, then abort the transfer.
    pub fn broken_after(mut self, bytes: usize) -> Self {
        self.broken_after = Some(bytes);
        self
    }
}

#[derive(Debug, Default)]
struct Inner {
    assets: HashMap<String, FixtureAsset>,
    gets: HashMap<String, usize>,
    heads: HashMap<String, usize>,
}

type Shared = Arc<Mutex<Inner>>;

/// A running fake release host.
pub struct ReleaseServer {
    addr: SocketAddr,
    inner: Shared,
    task: JoinHandle<()>,
}

impl ReleaseServer {
    /// Bind to an ephemeral localhost port and start serving.
    ///
    /// # Panics
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("ReleaseServer::start: failed to bind: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("ReleaseServer::start: no local address: {e}"));

        let inner = Shared::default();
        let app = Router::new()
            .route("/:owner/:repo/releases/latest/download/:name", get(serve_asset))
            .with_state(Arc::clone(&inner));

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, inner, task }
    }

    /// Base URL to hand to the code under test (`http://127.0.0.1:<port>`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of `name` under `owner/repo`.
    pub fn asset_url(&self, owner: &str, repo: &str, name: &str) -> String {
        format!(
            "{}/{owner}/{repo}/releases/latest/download/{name}",
            self.base_url()
        )
    }

    /// Serve `asset` for `name`, replacing any earlier fixture.
    pub fn publish(&self, name: &str, asset: FixtureAsset) {
        self.lock().assets.insert(name.to_string(), asset);
    }

    /// GET requests received for `name`.
    pub fn get_count(&self, name: &str) -> usize {
        self.lock().gets.get(name).copied().unwrap_or(0)
    }

    /// HEAD requests received for `name`.
    pub fn head_count(&self, name: &str) -> usize {
        self.lock().heads.get(name).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|e| panic!("ReleaseServer: state lock poisoned: {e}"))
    }
}

impl Drop for ReleaseServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_asset(
    State(inner): State<Shared>,
    method: Method,
    Path((_owner, _repo, name)): Path<(String, String, String)>,
) -> Response {
    let asset = {
        let mut inner = inner
            .lock()
            .unwrap_or_else(|e| panic!("serve_asset: state lock poisoned: {e}"));
        let counter = if method == Method::HEAD {
            &mut inner.heads
        } else {
            &mut inner.gets
        };
        *counter.entry(name.clone()).or_default() += 1;
        inner.assets.get(&name).cloned()
    };

    let Some(asset) = asset else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let body = match asset.broken_after {
        None => Body::from(asset.body),
        Some(limit) => {
            let sent = asset.body[..limit.min(asset.body.len())].to_vec();
            let chunks: Vec<Result<Bytes, io::Error>> = vec![
                Ok(Bytes::from(sent)),
                Err(io::Error::other("transfer aborted by fixture")),
            ];
            Body::from_stream(futures::stream::iter(chunks))
        }
    };

    let mut response = Response::builder().status(asset.status);
    if let Some(value) = &asset.last_modified {
        response = response.header(header::LAST_MODIFIED, value);
    }
    response
        .body(body)
        .unwrap_or_else(|e| panic!("serve_asset: invalid response: {e}"))
}
