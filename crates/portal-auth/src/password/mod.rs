//! Password hashing, verification, and generated credentials.

pub mod generator;
pub mod hasher;

pub use generator::{generate_password, generate_user_id};
pub use hasher::PasswordHasher;
