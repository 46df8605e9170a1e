//! # API Module
//!
//! HTTP endpoints of the co-authors service. Every handler follows the same
//! contract: resolve the caller, run the authorization gate, validate and
//! sanitize parameters, delegate to the injected [`CoauthorsService`], and
//! shape the result as JSON.
//!
//! ## Endpoints
//!
//! All routes live under a versioned namespace (`coauthors/v1` by default).
//!
//! ### Authors
//!
//! - [`authors::search`] - `GET /authors/` searches users and guest authors
//!   that may be attributed to posts. Requires the capability to set authors
//!   on any post.
//!
//! ### Posts
//!
//! - [`posts::get`] - `GET /posts/{id}/authors` lists the co-authors of a post.
//! - [`posts::update`] - `PUT /posts/{id}/authors` replaces or appends co-authors.
//! - [`posts::remove`] - `DELETE /posts/{id}/authors/{author_id}` detaches one.
//!
//! ### Guest authors
//!
//! - [`guests::search`], [`guests::create`], [`guests::get`],
//!   [`guests::update`], [`guests::delete`] - CRUD on guest authors, restricted
//!   to callers that can list users.
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`, outside the namespace.
//!
//! ## Errors
//!
//! Failures are returned as [`RestError`], serialized as
//! `{"code": ..., "message": ..., "data": {"status": ...}}`. A denied
//! authorization gate always answers 403 `rest_forbidden` before any
//! parameter is looked at.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use coauthors::{api, management::Directory};
//!
//! let state = api::AppState::new(Arc::new(Directory::new()));
//! let app = api::routes("coauthors/v1", state);
//! ```

mod auth;
pub mod authors;
mod error;
pub mod guests;
mod health;
mod params;
pub mod posts;

use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    routing::{delete, get},
};
use tokio::sync::Mutex;

use crate::{
    management::{CoauthorsService, Directory},
    types::AuthorRecord,
    warning,
};

pub use authors::{CoauthorData, CoauthorsResponse};
pub use error::RestError;
pub use health::health;
pub use params::Params;

/// Post-search hook applied to author search results before shaping.
pub type AuthorFilter = Arc<dyn Fn(Vec<AuthorRecord>) -> Vec<AuthorRecord> + Send + Sync>;

/// Shared handler state: the host collaborator plus optional hooks.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn CoauthorsService>,
    pub author_filter: AuthorFilter,
    snapshot: Option<Snapshot>,
}

/// Snapshot target. The lock orders writers so the file always ends up
/// holding the latest state.
#[derive(Clone)]
struct Snapshot {
    directory: Arc<Directory>,
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(service: Arc<dyn CoauthorsService>) -> Self {
        Self {
            service,
            author_filter: Arc::new(|authors: Vec<AuthorRecord>| authors),
            snapshot: None,
        }
    }

    pub fn with_author_filter(
        mut self,
        filter: impl Fn(Vec<AuthorRecord>) -> Vec<AuthorRecord> + Send + Sync + 'static,
    ) -> Self {
        self.author_filter = Arc::new(filter);
        self
    }

    /// Writes the directory to `path` after every successful mutation.
    pub fn with_snapshot(mut self, directory: Arc<Directory>, path: PathBuf) -> Self {
        self.snapshot = Some(Snapshot {
            directory,
            path,
            lock: Arc::new(Mutex::new(())),
        });
        self
    }

    pub(crate) async fn persist(&self) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };

        let _guard = snapshot.lock.lock().await;
        if let Err(e) = snapshot.directory.persist(&snapshot.path).await {
            warning!("Failed to write {}. Err: {}", snapshot.path.display(), e);
        }
    }
}

/// Registers every route under `namespace` (without surrounding slashes).
pub fn routes(namespace: &str, state: AppState) -> Router {
    let ns = format!("/{}", namespace.trim_matches('/'));

    Router::new()
        .route("/health", get(health))
        .route(&format!("{ns}/authors"), get(authors::search))
        .route(&format!("{ns}/authors/"), get(authors::search))
        .route(
            &format!("{ns}/posts/{{id}}/authors"),
            get(posts::get).put(posts::update),
        )
        .route(
            &format!("{ns}/posts/{{id}}/authors/{{author_id}}"),
            delete(posts::remove),
        )
        .route(
            &format!("{ns}/guests"),
            get(guests::search).post(guests::create),
        )
        .route(
            &format!("{ns}/guests/{{id}}"),
            get(guests::get).put(guests::update).delete(guests::delete),
        )
        .fallback(no_route)
        .with_state(state)
}

async fn no_route() -> RestError {
    RestError::no_route()
}
