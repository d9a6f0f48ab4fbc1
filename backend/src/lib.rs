//! Session-authenticated job-application tracker.
//!
//! Hexagonal layout: `domain` holds entities, validated value types, and
//! use-case services behind ports; `inbound::http` adapts Actix requests
//! onto the domain; `outbound` implements the ports against PostgreSQL,
//! bcrypt, and in-memory fallbacks; `server` wires the single
//! consolidated middleware pipeline.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::{RequireAuth, Trace};
