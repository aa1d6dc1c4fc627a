use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::state::AppState;

/// Validates the request token and attaches the resulting [`Principal`] to the request.
pub async fn require_authenticated(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Same as [`require_authenticated`], then refuses any role but the administrator's.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(&state, request.headers())?;

    if !principal.has_role(state.admin_role()) {
        warn!(
            "Principal {} with role {:?} refused on {} {}",
            principal.id,
            principal.role,
            request.method(),
            request.uri().path()
        );
        return Err(ApiError::unauthorized("admin only"));
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Non-admins may only act on their own user id
pub fn ensure_can_act_for(principal: &Principal, user_id: i64, admin_role: &str) -> Result<(), ApiError> {
    if principal.id == user_id || principal.has_role(admin_role) {
        return Ok(());
    }

    warn!("Principal {} refused access to user {}", principal.id, user_id);
    Err(ApiError::forbidden("not allowed to act for this user"))
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = extract_token(headers)?;

    state.tokens.validate(token, state.clock.now()).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::unauthorized("invalid token")
    })
}

/// The raw token from `Authorization`. A leading `Bearer ` is tolerated.
fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) => value,
        None => return Err(ApiError::unauthorized("missing token")),
    };

    let raw = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid token"))?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized("missing token"));
    }
    Ok(token)
}
