// handlers/elevated/movies.rs - POST /movies, DELETE /movies/:id

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::{Movie, NewMovie};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Adds a catalog entry. `season` (or `saison`) above zero makes it a series episode.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewMovie>, JsonRejection>,
) -> ApiResult<Movie> {
    let Json(mut movie) = payload?;
    movie.title = movie.title.trim().to_string();

    if movie.title.is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }
    if movie.season < 0 || movie.episode < 0 {
        return Err(ApiError::bad_request("season and episode must not be negative"));
    }

    let created = state.movies.create(&movie).await?;
    info!("Movie {} created: {}", created.id, created.title);
    Ok(ApiResponse::created(created))
}

pub async fn delete(State(state): State<AppState>, path: Result<Path<i64>, PathRejection>) -> ApiResult<Value> {
    let Path(id) = path?;
    state.movies.delete(id).await?;

    info!("Movie {} deleted", id);
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
