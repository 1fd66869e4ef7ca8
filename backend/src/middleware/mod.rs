//! Request middleware.
//!
//! Purpose: define middleware for request lifecycle concerns such as trace
//! identifiers and request logging.

pub mod trace;

pub use trace::Trace;
