//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in the initial
//! migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLINICIAN: &str = "clinician";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CLINICIAN];
