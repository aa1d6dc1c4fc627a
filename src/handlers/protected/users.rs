// handlers/protected/users.rs - GET/PUT/DELETE /users/:id

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::{json, Value};

use crate::auth::Principal;
use crate::database::models::User;
use crate::handlers::public::auth::UserPayload;
use crate::middleware::{ensure_can_act_for, ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<User> {
    let Path(id) = path?;
    ensure_can_act_for(&principal, id, state.admin_role())?;

    let user = state.users.select_404(id).await?;
    Ok(ApiResponse::success(user))
}

/// Replaces the user. `account` is honored only for administrators.
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<User> {
    let Path(id) = path?;
    ensure_can_act_for(&principal, id, state.admin_role())?;
    let Json(request) = payload?;

    let user = state.accounts.update_user(&principal, id, request.into()).await?;
    Ok(ApiResponse::success(user))
}

/// Favorites and ratings of the user are left in place
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    ensure_can_act_for(&principal, id, state.admin_role())?;

    state.accounts.delete_user(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
