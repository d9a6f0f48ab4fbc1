//! Outbound adapters implementing the domain ports.

pub mod bcrypt;
pub mod memory;
pub mod persistence;

pub use bcrypt::BcryptPasswordHasher;
