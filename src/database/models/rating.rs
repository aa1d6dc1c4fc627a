use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stars one user gave one movie. At most one per (movie, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Rating {
    #[serde(rename = "movieid")]
    pub movie_id: i64,
    #[serde(rename = "userid")]
    pub user_id: i64,
    pub stars: i64,
}
