//! Role-based access control.
//!
//! The hierarchy table itself lives with the [`Role`] entity; this module
//! re-exports its lookups next to the engine that consumes them.

pub mod engine;

pub use engine::AuthorizationEngine;
pub use portal_entity::user::hierarchy::{
    RoleGrant, authorities_of, authority, has_authority, level_of, role_from_name, role_table,
};
pub use portal_entity::user::Role;
