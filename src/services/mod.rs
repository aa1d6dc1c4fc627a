pub mod account_service;
pub mod favorites;
pub mod relation_service;

pub use account_service::{AccountError, AccountInput, AccountService};
pub use favorites::{FavoriteDecodeError, FavoriteSet};
pub use relation_service::{RelationError, RelationStore};
