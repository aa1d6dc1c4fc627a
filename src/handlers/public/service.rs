// handlers/public/service.rs - GET /, GET /health

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Reel API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Movie catalog with per-user ratings and favorites",
            "endpoints": {
                "public": "/login, POST /users, /health",
                "users": "/users/:id (authenticated, own id unless admin)",
                "catalog": "/movies, /movies/:id, /series (authenticated)",
                "ratings": "/ratings, /ratings/:userId (authenticated)",
                "favorites": "/favorites, /favorites/:userId[/:favoriteId] (authenticated)",
                "admin": "POST /movies, DELETE /movies/:id (admin only)",
            }
        }
    }))
}

/// 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.db.health_check().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("database unavailable"));
    }

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
