use std::sync::Arc;

use crate::auth::{Clock, CredentialVerifier, PasswordError, TokenCodec};
use crate::config::AppConfig;
use crate::database::{Database, MovieRepository, UserRepository};
use crate::services::{AccountService, RelationStore};

/// Everything a handler needs, built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub users: UserRepository,
    pub movies: MovieRepository,
    pub relations: RelationStore,
    pub accounts: AccountService,
    pub tokens: TokenCodec,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database, clock: Arc<dyn Clock>) -> Result<Self, PasswordError> {
        let pool = db.pool().clone();
        let users = UserRepository::new(pool.clone());
        let tokens = TokenCodec::from_config(&config.security);
        let accounts = AccountService::new(
            users.clone(),
            CredentialVerifier::new()?,
            tokens.clone(),
            clock.clone(),
            config.security.admin_role.clone(),
        );

        Ok(Self {
            users,
            movies: MovieRepository::new(pool.clone()),
            relations: RelationStore::new(pool),
            accounts,
            tokens,
            clock,
            db,
            config: Arc::new(config),
        })
    }

    pub fn admin_role(&self) -> &str {
        &self.config.security.admin_role
    }
}
