// handlers/protected/mod.rs - endpoints behind require_authenticated
//
// Handlers receive the caller as `Extension<Principal>`. Per-user resources
// (profile, ratings, favorites) additionally check ownership.
pub mod favorites;
pub mod movies;
pub mod ratings;
pub mod users;
