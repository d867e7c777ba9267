//! User domain entities.

pub mod hierarchy;
pub mod model;
pub mod role;

pub use hierarchy::{authorities_of, has_authority, level_of, role_from_name};
pub use model::User;
pub use role::Role;
