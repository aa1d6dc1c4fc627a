use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored user. The password digest is never serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    #[serde(rename = "user")]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub account: String,
    #[sqlx(flatten)]
    pub info: UserInfo,
}

/// Optional profile details attached to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub cell: Option<i64>,
    #[serde(default, alias = "adress")]
    pub address: Option<String>,
}

/// Everything needed to write a user row, digest already computed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_digest: String,
    pub account: String,
    pub info: UserInfo,
}
