//! YaMDb domain core.
//!
//! Pure domain logic shared by the database and API crates: identifiers,
//! validation rules, the role/permission policy table, and rating
//! aggregation. Nothing in this crate performs I/O.

pub mod error;
pub mod permissions;
pub mod rating;
pub mod roles;
pub mod types;
pub mod validation;
