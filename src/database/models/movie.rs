use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog entry. `season == 0` is a movie, anything above is a series episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub actors: String,
    pub rating: i64,
    pub details: String,
    pub genre: String,
    pub season: i64,
    pub episode: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMovie {
    pub title: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default, alias = "saison")]
    pub season: i64,
    #[serde(default)]
    pub episode: i64,
}

impl Movie {
    pub fn is_series(&self) -> bool {
        self.season > 0
    }
}
