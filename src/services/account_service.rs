use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{Clock, CredentialVerifier, IssuedToken, PasswordError, Principal, TokenCodec, TokenError};
use crate::database::models::{NewUser, User, UserInfo};
use crate::database::{DatabaseError, UserRepository};

/// Role given to every self-registered account
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Incoming account fields, password still in clear
#[derive(Debug, Clone)]
pub struct AccountInput {
    pub username: String,
    pub password: String,
    pub account: Option<String>,
    pub info: UserInfo,
}

impl AccountInput {
    fn validate(&self) -> Result<(), AccountError> {
        if self.username.trim().is_empty() {
            return Err(AccountError::Validation("user must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(AccountError::Validation("pswd must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Registration, login and profile updates
#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    verifier: CredentialVerifier,
    tokens: TokenCodec,
    clock: Arc<dyn Clock>,
    admin_role: String,
}

impl AccountService {
    pub fn new(
        users: UserRepository,
        verifier: CredentialVerifier,
        tokens: TokenCodec,
        clock: Arc<dyn Clock>,
        admin_role: impl Into<String>,
    ) -> Self {
        Self {
            users,
            verifier,
            tokens,
            clock,
            admin_role: admin_role.into(),
        }
    }

    /// Self-registration. The requested `account` is ignored; new users always get [`DEFAULT_ROLE`].
    pub async fn register(&self, input: AccountInput) -> Result<User, AccountError> {
        input.validate()?;

        let user = self
            .users
            .create(NewUser {
                username: input.username.trim().to_string(),
                password_digest: self.verifier.hash(&input.password)?,
                account: DEFAULT_ROLE.to_string(),
                info: input.info,
            })
            .await?;

        info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Unknown user and wrong password fail identically, after comparable work.
    /// The username is trimmed the same way registration stores it.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AccountError> {
        let user = match self.users.find_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                self.verifier.verify_decoy(password);
                warn!("Failed login attempt");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !self.verifier.verify(password, &user.password_digest) {
            warn!("Failed login attempt");
            return Err(AccountError::InvalidCredentials);
        }

        let issued = self.tokens.issue(user.id, &user.account, self.clock.now())?;
        info!("User {} logged in", user.id);
        Ok(issued)
    }

    /// Replaces user `id`. Only an administrator may change the stored role.
    pub async fn update_user(&self, actor: &Principal, id: i64, input: AccountInput) -> Result<User, AccountError> {
        input.validate()?;
        let existing = self.users.select_404(id).await?;

        let account = match input.account {
            Some(requested) if actor.has_role(&self.admin_role) && !requested.trim().is_empty() => {
                requested.trim().to_string()
            }
            _ => existing.account,
        };

        let user = self
            .users
            .update(
                id,
                NewUser {
                    username: input.username.trim().to_string(),
                    password_digest: self.verifier.hash(&input.password)?,
                    account,
                    info: input.info,
                },
            )
            .await?;

        info!("User {} updated by principal {}", id, actor.id);
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AccountError> {
        self.users.delete(id).await?;
        info!("User {} deleted", id);
        Ok(())
    }

    /// Creates an administrator, or promotes and re-keys an existing user of that name.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let input = AccountInput {
            username: username.to_string(),
            password: password.to_string(),
            account: Some(self.admin_role.clone()),
            info: UserInfo::default(),
        };
        input.validate()?;

        let digest = self.verifier.hash(password)?;
        let user = match self.users.find_by_username(username.trim()).await? {
            Some(existing) => {
                let mut promoted = NewUser::from(&existing);
                promoted.password_digest = digest;
                promoted.account = self.admin_role.clone();
                self.users.update(existing.id, promoted).await?
            }
            None => {
                self.users
                    .create(NewUser {
                        username: username.trim().to_string(),
                        password_digest: digest,
                        account: self.admin_role.clone(),
                        info: input.info,
                    })
                    .await?
            }
        };

        info!("User {} ({}) holds role {}", user.id, user.username, user.account);
        Ok(user)
    }
}
