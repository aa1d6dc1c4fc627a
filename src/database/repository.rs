use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Movie, NewMovie, NewUser, User};

const USER_COLUMNS: &str = "id, username, password_digest, account, name, firstname, mail, cell, address";
const MOVIE_COLUMNS: &str = "id, title, actors, rating, details, genre, season, episode";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, password_digest, account, name, firstname, mail, cell, address)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_digest)
            .bind(&user.account)
            .bind(&user.info.name)
            .bind(&user.info.firstname)
            .bind(&user.info.mail)
            .bind(user.info.cell)
            .bind(&user.info.address)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "user"))
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn select_404(&self, id: i64) -> Result<User, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {} not found", id)))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Replaces every mutable column of user `id`
    pub async fn update(&self, id: i64, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users
             SET username = ?, password_digest = ?, account = ?, name = ?, firstname = ?, mail = ?, cell = ?, address = ?
             WHERE id = ?
             RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_digest)
            .bind(&user.account)
            .bind(&user.info.name)
            .bind(&user.info.firstname)
            .bind(&user.info.mail)
            .bind(user.info.cell)
            .bind(&user.info.address)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "user"))?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() != 1 {
            return Err(DatabaseError::NotFound(format!("user {} not found", id)));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct MovieRepository {
    pool: SqlitePool,
}

impl MovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Standalone movies (season 0)
    pub async fn select_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        let sql = format!("SELECT {} FROM movies WHERE season = 0 ORDER BY id", MOVIE_COLUMNS);
        Ok(sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?)
    }

    /// Series episodes (season > 0)
    pub async fn select_series(&self) -> Result<Vec<Movie>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM movies WHERE season > 0 ORDER BY title, season, episode",
            MOVIE_COLUMNS
        );
        Ok(sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_404(&self, id: i64) -> Result<Movie, DatabaseError> {
        let sql = format!("SELECT {} FROM movies WHERE id = ?", MOVIE_COLUMNS);
        sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("movie {} not found", id)))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, movie: &NewMovie) -> Result<Movie, DatabaseError> {
        let sql = format!(
            "INSERT INTO movies (title, actors, rating, details, genre, season, episode)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            MOVIE_COLUMNS
        );

        sqlx::query_as::<_, Movie>(&sql)
            .bind(&movie.title)
            .bind(&movie.actors)
            .bind(movie.rating)
            .bind(&movie.details)
            .bind(&movie.genre)
            .bind(movie.season)
            .bind(movie.episode)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "movie"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() != 1 {
            return Err(DatabaseError::NotFound(format!("movie {} not found", id)));
        }
        Ok(())
    }
}

impl From<&User> for NewUser {
    fn from(user: &User) -> Self {
        NewUser {
            username: user.username.clone(),
            password_digest: user.password_digest.clone(),
            account: user.account.clone(),
            info: user.info.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserInfo;
    use crate::database::Database;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_digest: "$argon2id$stub".to_string(),
            account: "user".to_string(),
            info: UserInfo {
                mail: Some(format!("{}@example.com", username)),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn user_crud() {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());

        let created = users.create(new_user("ripley")).await.unwrap();
        assert_eq!(created.username, "ripley");
        assert_eq!(created.info.mail.as_deref(), Some("ripley@example.com"));

        let found = users.find_by_username("ripley").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        let mut changed = new_user("ellen");
        changed.account = "admin".to_string();
        let updated = users.update(created.id, changed).await.unwrap();
        assert_eq!(updated.username, "ellen");
        assert_eq!(updated.account, "admin");

        users.delete(created.id).await.unwrap();
        assert!(users.select_one(created.id).await.unwrap().is_none());
        assert!(matches!(users.delete(created.id).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());

        users.create(new_user("dallas")).await.unwrap();
        let mut again = new_user("dallas");
        again.info.mail = None;
        assert!(matches!(users.create(again).await, Err(DatabaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn movies_and_series_are_listed_separately() {
        let db = Database::in_memory().await.unwrap();
        let movies = MovieRepository::new(db.pool().clone());

        let alien = movies
            .create(&NewMovie { title: "Alien".to_string(), ..Default::default() })
            .await
            .unwrap();
        movies
            .create(&NewMovie {
                title: "Firefly 1x01".to_string(),
                season: 1,
                episode: 1,
                ..Default::default()
            })
            .await
            .unwrap();

        let listed = movies.select_movies().await.unwrap();
        assert_eq!(listed, vec![alien.clone()]);

        let series = movies.select_series().await.unwrap();
        assert_eq!(series.len(), 1);
        assert!(series[0].is_series());

        assert!(movies.exists(alien.id).await.unwrap());
        movies.delete(alien.id).await.unwrap();
        assert!(!movies.exists(alien.id).await.unwrap());
        assert!(matches!(movies.select_404(alien.id).await, Err(DatabaseError::NotFound(_))));
    }
}
