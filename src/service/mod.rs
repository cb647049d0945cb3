//! # Query Service
//!
//! JSON endpoints over the roster. Each request loads the workbook again so answers
//! always reflect the file on disk; the dashboard routes share the same state but
//! keep a cached table.
pub mod handlers;
pub mod response;

use crate::dashboard;
use crate::dashboard::cache::TableCache;
use crate::roster::Loader;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared request state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub(crate) loader: Arc<Loader>,
    pub(crate) data_file: Arc<PathBuf>,
    pub(crate) cache: Arc<TableCache>,
    pub(crate) title: Arc<str>,
}

pub const DEFAULT_TITLE: &str = "Dashboard Atlet Disabilitas DKI Jakarta 2024";

impl AppState {
    pub fn new(loader: Loader, data_file: PathBuf) -> Self {
        Self {
            loader: Arc::new(loader),
            data_file: Arc::new(data_file),
            cache: Arc::new(TableCache::new()),
            title: Arc::from(DEFAULT_TITLE),
        }
    }

    /// Heading shown on the dashboard page.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Arc::from(title);
        self
    }

    pub fn data_file(&self) -> &std::path::Path {
        &self.data_file
    }
}

/// Any origin, method and header is allowed. Credentials are allowed too, so the
/// request's own origin is echoed back instead of `*`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/atlet", get(handlers::athletes_handler))
        .route("/atlet/{row_id}", get(handlers::athlete_handler))
        .route("/jeniskelamin", get(handlers::genders_handler))
        .route("/wilayah", get(handlers::regions_handler))
        .route("/cabor", get(handlers::sports_handler))
        .route("/periode", get(handlers::periods_handler))
        .route("/periode/count", get(handlers::period_counts_handler))
        .route("/dashboard", get(dashboard::dashboard_handler))
        .route("/dashboard/reload", post(dashboard::reload_handler))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
