use crate::roster::aggregate::count_by_year;
use crate::roster::aggregate::distinct_values;
use crate::roster::aggregate::distinct_years;
use crate::roster::aggregate::YearCount;
use crate::roster::AthleteTable;
use crate::roster::RosterSchema;
use crate::service::response::ApiError;
use crate::service::AppState;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;
use std::sync::Arc;

/// Reads the roster on the blocking pool. Every request gets a fresh table.
async fn load_table(state: &AppState) -> Result<AthleteTable, ApiError> {
    let loader = Arc::clone(&state.loader);
    let path = Arc::clone(&state.data_file);
    let table = tokio::task::spawn_blocking(move || loader.load(&path))
        .await
        .map_err(|error| ApiError::internal(error.to_string()))??;
    Ok(table)
}

pub(crate) async fn root_handler() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "API Atlet Disabilitas aktif" }))
}

pub(crate) async fn athletes_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let table = load_table(&state).await?;
    Ok(Json(table).into_response())
}

pub(crate) async fn athlete_handler(
    State(state): State<AppState>,
    Path(row_id): Path<String>,
) -> Result<Response, ApiError> {
    let position = row_id.trim().parse::<i64>().map_err(|_| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("ID '{row_id}' harus berupa bilangan bulat"),
        )
    })?;
    let table = load_table(&state).await?;
    let row = table.row(position)?;
    Ok(Json(row).into_response())
}

/// Sorted distinct values of one categorical column, wrapped as `{key: [...]}`.
async fn distinct_response(
    state: &AppState,
    key: &str,
    column: fn(&RosterSchema) -> &str,
) -> Result<Json<Value>, ApiError> {
    let table = load_table(state).await?;
    let values = distinct_values(&table, column(table.schema()))?;
    let mut body = Map::new();
    body.insert(key.to_string(), json!(values));
    Ok(Json(Value::Object(body)))
}

pub(crate) async fn genders_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    distinct_response(&state, "jk", RosterSchema::gender_column).await
}

pub(crate) async fn regions_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    distinct_response(&state, "wilayah", RosterSchema::region_column).await
}

pub(crate) async fn sports_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    distinct_response(&state, "cabang_olahraga", RosterSchema::sport_column).await
}

pub(crate) async fn periods_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let table = load_table(&state).await?;
    let years = distinct_years(&table)?;
    Ok(Json(json!({ "periode_data": years })))
}

pub(crate) async fn period_counts_handler(State(state): State<AppState>) -> Result<Json<Vec<YearCount>>, ApiError> {
    let table = load_table(&state).await?;
    Ok(Json(count_by_year(&table)?))
}
