//! Carhub: a car inventory CRUD service.
//!
//! The crate follows a hexagonal layout. `domain` holds the car aggregate,
//! validation, and the storage port; `inbound::http` adapts the domain to
//! REST; `outbound` implements the storage port against PostgreSQL, MongoDB,
//! and an in-memory store; `server` wires a configured backend to the HTTP
//! surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
