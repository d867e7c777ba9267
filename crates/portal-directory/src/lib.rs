//! # portal-directory
//!
//! Implementations of [`portal_core::traits::UserDirectory`] for
//! [`portal_entity::user::User`]. Only the in-memory directory ships here;
//! persistent stores plug in behind the same trait.

pub mod memory;

pub use memory::MemoryUserDirectory;
