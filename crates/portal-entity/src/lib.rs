//! # portal-entity
//!
//! Domain models for the support portal: the user record held by the
//! directory, the closed set of roles, and the constant role hierarchy
//! table that maps each role to its level and authorities.

pub mod user;
