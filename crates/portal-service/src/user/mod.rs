//! Account management on behalf of an authenticated actor.

pub mod service;

pub use service::{NewUserRequest, ProvisionedUser, UpdateUserRequest, UserService};
