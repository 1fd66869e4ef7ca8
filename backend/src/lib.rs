//! Foodgram backend library: a recipe-sharing REST API.
//!
//! The crate follows a hexagonal layout. [`domain`] holds entities, ports and
//! services; [`inbound`] adapts HTTP requests onto the driving ports; and
//! [`outbound`] implements the driven ports over PostgreSQL, memory, the
//! filesystem and bcrypt.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
