// handlers/public/mod.rs - endpoints reachable without a token
//
// Token acquisition (login), self-registration, banner and health.
pub mod auth;
pub mod service;

pub use auth::{login, register};
pub use service::{health, root};
