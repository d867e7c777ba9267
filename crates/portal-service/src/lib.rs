//! # portal-service
//!
//! Application services for the support portal. Each service takes its
//! collaborators as `Arc` references at construction time and receives the
//! acting user explicitly as a [`RequestContext`].

pub mod context;
pub mod seed;
pub mod state;
pub mod user;

pub use context::RequestContext;
pub use seed::ensure_super_admin;
pub use state::PortalState;
pub use user::{NewUserRequest, ProvisionedUser, UpdateUserRequest, UserService};
