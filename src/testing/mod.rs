use std::sync::Arc;

use crate::auth::{ManualClock, TokenCodec};
use crate::config::AppConfig;
use crate::database::{Database, MovieRepository, UserRepository};
use crate::services::{AccountService, RelationStore};
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-signing-secret-with-at-least-32-bytes";

/// In-memory database, a manual clock and every service wired to them
pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub users: UserRepository,
    pub movies: MovieRepository,
    pub relations: RelationStore,
    pub accounts: AccountService,
    pub tokens: TokenCodec,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::with_secret(TEST_SECRET)?;
        let db = Database::in_memory().await?;
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::new(config, db, clock.clone())?;

        Ok(Self {
            clock,
            users: state.users.clone(),
            movies: state.movies.clone(),
            relations: state.relations.clone(),
            accounts: state.accounts.clone(),
            tokens: state.tokens.clone(),
            state,
        })
    }

    /// Token for an arbitrary principal, issued at the context's current time
    pub fn token_for(&self, id: i64, role: &str) -> String {
        use crate::auth::Clock;

        match self.tokens.issue(id, role, self.clock.now()) {
            Ok(issued) => issued.token,
            Err(e) => panic!("failed to issue test token: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Clock;

    #[tokio::test]
    async fn context_tokens_validate_against_its_clock() {
        let ctx = TestContext::new().await.unwrap();
        let token = ctx.token_for(2, "user");

        let principal = ctx.tokens.validate(&token, ctx.clock.now()).unwrap();
        assert_eq!(principal.id, 2);
        assert!(ctx.state.db.health_check().await.is_ok());
    }
}
