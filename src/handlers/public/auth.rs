// handlers/public/auth.rs - POST /login, POST /users

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::auth::IssuedToken;
use crate::database::models::{User, UserInfo};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AccountInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user: String,
    pub pswd: String,
}

/// Account fields as sent by clients, for both registration and `PUT /users/:id`
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub user: String,
    pub pswd: String,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default, alias = "Info")]
    pub info: UserInfo,
}

impl From<UserPayload> for AccountInput {
    fn from(payload: UserPayload) -> Self {
        AccountInput {
            username: payload.user,
            password: payload.pswd,
            account: payload.account,
            info: payload.info,
        }
    }
}

/// POST /login - exchange `{user, pswd}` for a signed session token
///
/// ```json
/// { "success": true, "data": { "token": "eyJhbGciOiJIUzI1NiI...", "expires_at": 1767225600 } }
/// ```
///
/// Unknown user and wrong password both answer 401 `invalid credentials`.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<IssuedToken> {
    let Json(request) = payload?;
    let issued = state.accounts.login(&request.user, &request.pswd).await?;
    Ok(ApiResponse::success(issued))
}

/// POST /users - self-registration. The new account always gets the ordinary role.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> ApiResult<User> {
    let Json(request) = payload?;
    let user = state.accounts.register(request.into()).await?;
    Ok(ApiResponse::created(user))
}
