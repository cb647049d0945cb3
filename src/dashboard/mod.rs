//! # Dashboard
//!
//! Server-rendered HTML view of the roster. Unlike the JSON endpoints the dashboard
//! keeps the loaded table in a [`cache::TableCache`] until the file changes or a
//! reload is requested.
pub mod cache;
pub mod chart;
pub mod filter;
pub mod page;
pub mod view;

use crate::dashboard::filter::Selection;
use crate::dashboard::view::DashboardView;
use crate::roster::RosterError;
use crate::service::AppState;
use axum::body::Body;
use axum::extract::Query;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::response::Response;
use std::sync::Arc;
use tracing::warn;

fn html_response(status: StatusCode, html: String) -> Response {
    let mut response = Response::new(Body::from(html));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

/// Banner text for a failed load; a missing file gets the short message.
fn load_failure_message(error: &RosterError, file_name: &str) -> String {
    match error {
        RosterError::DataSource { path, .. } if !path.exists() => {
            format!("File '{file_name}' tidak ditemukan.")
        }
        _ => format!("Gagal memuat data: {error}"),
    }
}

pub(crate) async fn dashboard_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let selection = Selection::from_query(&pairs);
    let title = Arc::clone(&state.title);
    let fallback_title = Arc::clone(&state.title);
    let file_name = state
        .data_file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| state.data_file.display().to_string());

    let rendered = tokio::task::spawn_blocking(move || {
        state
            .cache
            .get_or_load(&state.loader, &state.data_file)
            .map(|table| page::render(&title, &file_name, &DashboardView::build(&table, selection)))
            .map_err(|error| {
                warn!(error = %error, "Dashboard load failed");
                page::render_error(&title, &load_failure_message(&error, &file_name))
            })
    })
    .await;

    match rendered {
        Ok(Ok(html)) => html_response(StatusCode::OK, html),
        Ok(Err(html)) => html_response(StatusCode::INTERNAL_SERVER_ERROR, html),
        Err(error) => {
            warn!(error = %error, "Dashboard render task failed");
            html_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                page::render_error(&fallback_title, &error.to_string()),
            )
        }
    }
}

/// Drops the cached table and sends the browser back to the dashboard.
pub(crate) async fn reload_handler(State(state): State<AppState>) -> Redirect {
    state.cache.invalidate();
    Redirect::to("/dashboard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    #[test]
    fn missing_file_has_its_own_message() {
        let error = RosterError::DataSource {
            path: PathBuf::from("/no/such/atlet.xlsx"),
            message: std::io::Error::from(ErrorKind::NotFound).to_string(),
        };
        assert_eq!(load_failure_message(&error, "atlet.xlsx"), "File 'atlet.xlsx' tidak ditemukan.");

        let error = RosterError::Schema("x".to_string());
        assert!(load_failure_message(&error, "atlet.xlsx").starts_with("Gagal memuat data"));
    }
}
