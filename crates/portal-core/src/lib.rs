//! # portal-core
//!
//! Core crate for the support portal. Contains the collaborator traits
//! (user directory, credential verifier), configuration schemas, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other portal crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
