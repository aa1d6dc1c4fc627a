pub const CREATE_TABLE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_digest TEXT NOT NULL,
        account TEXT NOT NULL,
        name TEXT,
        firstname TEXT,
        mail TEXT UNIQUE,
        cell INTEGER UNIQUE,
        address TEXT
    )
"#;

pub const CREATE_TABLE_MOVIES: &str = r#"
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        actors TEXT NOT NULL DEFAULT '',
        rating INTEGER NOT NULL DEFAULT 0,
        details TEXT NOT NULL DEFAULT '',
        genre TEXT NOT NULL DEFAULT '',
        season INTEGER NOT NULL DEFAULT 0,
        episode INTEGER NOT NULL DEFAULT 0
    )
"#;

/// One row per user; `movie_ids` holds the whole encoded favorite set
pub const CREATE_TABLE_FAVORITES: &str = r#"
    CREATE TABLE IF NOT EXISTS favorites (
        user_id INTEGER PRIMARY KEY,
        movie_ids TEXT NOT NULL DEFAULT ''
    )
"#;

/// Keyed on the (movie, user) pair: one stars value per user per movie
pub const CREATE_TABLE_RATINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS ratings (
        movie_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        stars INTEGER NOT NULL,
        PRIMARY KEY (movie_id, user_id)
    )
"#;

pub const TABLES: [(&str, &str); 4] = [
    ("users", CREATE_TABLE_USERS),
    ("movies", CREATE_TABLE_MOVIES),
    ("favorites", CREATE_TABLE_FAVORITES),
    ("ratings", CREATE_TABLE_RATINGS),
];
