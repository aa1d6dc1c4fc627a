// handlers/protected/favorites.rs - POST /favorites, GET /favorites/:userId,
// DELETE /favorites/:userId/:favoriteId
//
// Responses expose the stored form: `{"userid": 4, "moviesid": "#7|#12|"}`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::Principal;
use crate::database::models::FavoriteRow;
use crate::error::ApiError;
use crate::middleware::{ensure_can_act_for, ApiResponse, ApiResult};
use crate::state::AppState;

/// Movie id sent either as a JSON number or as a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MovieRef {
    Id(i64),
    Text(String),
}

impl MovieRef {
    pub fn movie_id(&self) -> Result<i64, ApiError> {
        match self {
            MovieRef::Id(id) => Ok(*id),
            MovieRef::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ApiError::bad_request(format!("moviesid {:?} is not a movie id", text))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub userid: i64,
    pub moviesid: MovieRef,
}

pub async fn add(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> ApiResult<FavoriteRow> {
    let Json(request) = payload?;
    let movie_id = request.moviesid.movie_id()?;
    ensure_can_act_for(&principal, request.userid, state.admin_role())?;

    if !state.movies.exists(movie_id).await? {
        return Err(ApiError::not_found(format!("movie {} not found", movie_id)));
    }

    let set = state.relations.add_favorite(request.userid, movie_id).await?;
    Ok(ApiResponse::success(FavoriteRow {
        user_id: request.userid,
        movie_ids: set.encode(),
    }))
}

/// Empty `moviesid` when the user never saved a favorite
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<FavoriteRow> {
    let Path(user_id) = path?;
    ensure_can_act_for(&principal, user_id, state.admin_role())?;

    let row = state.relations.favorite_row(user_id).await?;
    Ok(ApiResponse::success(row))
}

/// Removing a movie that is not a favorite succeeds and changes nothing
pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> ApiResult<FavoriteRow> {
    let Path((user_id, movie_id)) = path?;
    ensure_can_act_for(&principal, user_id, state.admin_role())?;

    let set = state.relations.remove_favorite(user_id, movie_id).await?;
    Ok(ApiResponse::success(FavoriteRow {
        user_id,
        movie_ids: set.encode(),
    }))
}
