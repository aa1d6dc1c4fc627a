use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::database::manager::{is_unique_violation, DatabaseError};
use crate::database::models::{FavoriteRow, Rating};
use crate::services::favorites::{FavoriteDecodeError, FavoriteSet};

/// Accepted range for `Rating::stars`
pub const STARS_RANGE: std::ops::RangeInclusive<i64> = 0..=5;

/// Compare-and-swap attempts before a favorites write gives up
const MAX_WRITE_ATTEMPTS: usize = 16;

#[derive(Debug, Error)]
pub enum RelationError {
    #[error("stars must be between 0 and 5 (got {0})")]
    InvalidStars(i64),

    #[error("movie id must be positive (got {0})")]
    InvalidMovieId(i64),

    #[error("stored favorites for user {user_id} are unreadable")]
    CorruptFavorites {
        user_id: i64,
        #[source]
        source: FavoriteDecodeError,
    },

    #[error("favorites for user {user_id} kept changing during the write")]
    Contention { user_id: i64 },

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl From<sqlx::Error> for RelationError {
    fn from(err: sqlx::Error) -> Self {
        RelationError::Storage(DatabaseError::Sqlx(err))
    }
}

/// Persistence for the user↔favorite-movie and user↔rating relations.
///
/// Favorites live in one row per user holding the encoded [`FavoriteSet`].
/// Every favorites mutation is read → modify → compare-and-swap, retried when
/// another writer got in between, and additionally serialized per process by
/// `write_lock`. Ratings are a single atomic upsert keyed on (movie, user).
#[derive(Clone, Debug)]
pub struct RelationStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl RelationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // * * * FAVORITES * * *

    /// `None` when the user never had a favorites row, `Some(empty)` when it was emptied
    pub async fn favorites(&self, user_id: i64) -> Result<Option<FavoriteSet>, RelationError> {
        match self.load_raw(user_id).await? {
            Some(raw) => Ok(Some(decode_for(user_id, &raw)?)),
            None => Ok(None),
        }
    }

    /// Stored row as-is, or an empty row for a user without favorites
    pub async fn favorite_row(&self, user_id: i64) -> Result<FavoriteRow, RelationError> {
        let set = self.favorites(user_id).await?.unwrap_or_default();
        Ok(FavoriteRow {
            user_id,
            movie_ids: set.encode(),
        })
    }

    /// Movie ids must be positive
    pub async fn add_favorite(&self, user_id: i64, movie_id: i64) -> Result<FavoriteSet, RelationError> {
        if movie_id <= 0 {
            return Err(RelationError::InvalidMovieId(movie_id));
        }

        let set = self.mutate_favorites(user_id, |set| set.insert(movie_id)).await?;
        debug!("Favorite {} saved for user {}", movie_id, user_id);
        Ok(set)
    }

    /// Removing a non-member is a no-op. The row is kept even when it becomes empty.
    pub async fn remove_favorite(&self, user_id: i64, movie_id: i64) -> Result<FavoriteSet, RelationError> {
        let set = self
            .mutate_favorites(user_id, |set| {
                set.remove(movie_id);
            })
            .await?;
        debug!("Favorite {} removed for user {}", movie_id, user_id);
        Ok(set)
    }

    async fn mutate_favorites<F>(&self, user_id: i64, mutate: F) -> Result<FavoriteSet, RelationError>
    where
        F: Fn(&mut FavoriteSet),
    {
        let _guard = self.write_lock.lock().await;

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let current = self.load_raw(user_id).await?;
            let mut set = match &current {
                Some(raw) => decode_for(user_id, raw)?,
                None => FavoriteSet::new(),
            };
            mutate(&mut set);
            let encoded = set.encode();

            let written = match current.as_deref() {
                None if set.is_empty() => true,
                Some(raw) if raw == encoded => true,
                None => self.insert_if_absent(user_id, &encoded).await?,
                Some(raw) => self.compare_and_swap(user_id, raw, &encoded).await?,
            };

            if written {
                return Ok(set);
            }
            debug!(
                "Favorites for user {} changed during write, retrying (attempt {}/{})",
                user_id, attempt, MAX_WRITE_ATTEMPTS
            );
        }

        warn!("Giving up on favorites write for user {} after {} attempts", user_id, MAX_WRITE_ATTEMPTS);
        Err(RelationError::Contention { user_id })
    }

    async fn load_raw(&self, user_id: i64) -> Result<Option<String>, RelationError> {
        Ok(sqlx::query_scalar::<_, String>("SELECT movie_ids FROM favorites WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// False when a row appeared since it was read as absent
    async fn insert_if_absent(&self, user_id: i64, encoded: &str) -> Result<bool, RelationError> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, movie_ids) VALUES (?, ?)
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(encoded)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// False when the stored value no longer equals `expected`
    async fn compare_and_swap(&self, user_id: i64, expected: &str, encoded: &str) -> Result<bool, RelationError> {
        let result = sqlx::query("UPDATE favorites SET movie_ids = ? WHERE user_id = ? AND movie_ids = ?")
            .bind(encoded)
            .bind(user_id)
            .bind(expected)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    // * * * RATINGS * * *

    /// Creates the (movie, user) rating or overwrites its stars
    pub async fn save_rating(&self, rating: Rating) -> Result<Rating, RelationError> {
        if !STARS_RANGE.contains(&rating.stars) {
            return Err(RelationError::InvalidStars(rating.stars));
        }

        let upsert = || {
            sqlx::query(
                "INSERT INTO ratings (movie_id, user_id, stars) VALUES (?, ?, ?)
                 ON CONFLICT(movie_id, user_id) DO UPDATE SET stars = excluded.stars",
            )
            .bind(rating.movie_id)
            .bind(rating.user_id)
            .bind(rating.stars)
            .execute(&self.pool)
        };

        match upsert().await {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Rating upsert for movie {} user {} hit a uniqueness error, retrying once",
                    rating.movie_id, rating.user_id
                );
                upsert().await?;
            }
            Err(e) => return Err(e.into()),
        }

        debug!("Rating saved: movie {} user {} stars {}", rating.movie_id, rating.user_id, rating.stars);
        Ok(rating)
    }

    pub async fn rating(&self, movie_id: i64, user_id: i64) -> Result<Option<Rating>, RelationError> {
        Ok(sqlx::query_as::<_, Rating>(
            "SELECT movie_id, user_id, stars FROM ratings WHERE movie_id = ? AND user_id = ?",
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn ratings_for_user(&self, user_id: i64) -> Result<Vec<Rating>, RelationError> {
        Ok(sqlx::query_as::<_, Rating>(
            "SELECT movie_id, user_id, stars FROM ratings WHERE user_id = ? ORDER BY movie_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

fn decode_for(user_id: i64, raw: &str) -> Result<FavoriteSet, RelationError> {
    FavoriteSet::decode(raw).map_err(|source| RelationError::CorruptFavorites { user_id, source })
}
