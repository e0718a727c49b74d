//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access tokens plus opaque refresh and reset tokens.

pub mod jwt;
pub mod password;
