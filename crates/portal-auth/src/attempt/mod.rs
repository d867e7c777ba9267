//! Failed-login bookkeeping for account lockout.

pub mod cache;

pub use cache::LoginAttemptCache;
