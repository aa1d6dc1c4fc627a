// handlers/protected/ratings.rs - POST /ratings, GET /ratings/:userId

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::auth::Principal;
use crate::database::models::Rating;
use crate::error::ApiError;
use crate::middleware::{ensure_can_act_for, ApiResponse, ApiResult};
use crate::services::relation_service::{RelationError, STARS_RANGE};
use crate::state::AppState;

/// Creates or overwrites the caller's stars for one movie.
///
/// ```json
/// { "movieid": 3, "userid": 9, "stars": 4 }
/// ```
pub async fn save(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<Rating>, JsonRejection>,
) -> ApiResult<Rating> {
    let Json(rating) = payload?;
    if !STARS_RANGE.contains(&rating.stars) {
        return Err(RelationError::InvalidStars(rating.stars).into());
    }
    ensure_can_act_for(&principal, rating.user_id, state.admin_role())?;

    if !state.movies.exists(rating.movie_id).await? {
        return Err(ApiError::not_found(format!("movie {} not found", rating.movie_id)));
    }

    let saved = state.relations.save_rating(rating).await?;
    Ok(ApiResponse::success(saved))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Vec<Rating>> {
    let Path(user_id) = path?;
    ensure_can_act_for(&principal, user_id, state.admin_role())?;

    let ratings = state.relations.ratings_for_user(user_id).await?;
    Ok(ApiResponse::success(ratings))
}
