// handlers/elevated/mod.rs - endpoints behind require_admin
//
// Catalog maintenance. The gate has already refused every non-administrator.
pub mod movies;
