// handlers/mod.rs - three security tiers
//
// Public (no token) → Protected (any valid token) → Elevated (administrator token).
// Which gate applies is decided in routes.rs when the groups are assembled.
pub mod elevated;
pub mod protected;
pub mod public;
