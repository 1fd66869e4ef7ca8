//! Outbound adapters implementing the driven ports.
//!
//! - [`persistence`]: PostgreSQL repositories via Diesel.
//! - [`memory`]: an in-process store implementing every repository, used
//!   when no database is configured and by the HTTP tests.
//! - [`security`]: bcrypt password hashing.
//! - [`media`]: recipe image files below a media root.

pub mod media;
pub mod memory;
pub mod persistence;
pub mod security;
