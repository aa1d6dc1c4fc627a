// handlers/protected/movies.rs - GET /movies, GET /movies/:id, GET /series

use axum::extract::{rejection::PathRejection, Path, State};
use serde_json::{json, Value};

use crate::database::models::Movie;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Standalone movies, as `{"movie": [...]}`
pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Value> {
    let movies = state.movies.select_movies().await?;
    Ok(ApiResponse::success(json!({ "movie": movies })))
}

/// Series episodes, as `{"series": [...]}`
pub async fn list_series(State(state): State<AppState>) -> ApiResult<Value> {
    let series = state.movies.select_series().await?;
    Ok(ApiResponse::success(json!({ "series": series })))
}

pub async fn get(State(state): State<AppState>, path: Result<Path<i64>, PathRejection>) -> ApiResult<Movie> {
    let Path(id) = path?;
    let movie = state.movies.select_404(id).await?;
    Ok(ApiResponse::success(movie))
}
