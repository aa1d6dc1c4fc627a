use serde::Serialize;
use sqlx::FromRow;

/// Raw favorites row as stored; `movie_ids` is the encoded set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct FavoriteRow {
    #[serde(rename = "userid")]
    pub user_id: i64,
    #[serde(rename = "moviesid")]
    pub movie_ids: String,
}
