//! Driven port for car storage.
//!
//! [`CarStore`] is the single storage-capability interface behind the HTTP
//! surface. Each backend implements it once: the relational adapter with
//! find-or-create lookup semantics and an audit-log cascade, the document
//! adapter with reject-unknown lookup semantics and plain single-document
//! removal. Adapters map their driver failures into [`CarStoreError`]
//! variants instead of leaking driver types into the domain.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::car::{CarChanges, CarDraft, CarId, CarRecord, LookupEntry, LookupId, Page};

/// Which lookup table a reference error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Transmission,
    FuelType,
}

impl LookupKind {
    /// Wire-level field name for error details.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Transmission => "transmission",
            Self::FuelType => "fuelType",
        }
    }
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transmission => f.write_str("transmission type"),
            Self::FuelType => f.write_str("fuel type"),
        }
    }
}

/// Errors surfaced by car storage adapters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CarStoreError {
    /// Storage backend could not be reached or a connection checkout failed.
    #[error("car store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("car store query failed: {message}")]
    Query { message: String },
    /// No car exists with the given identifier.
    #[error("no car with id {id}")]
    MissingCar { id: String },
    /// The identifier cannot be parsed into this backend's key type.
    #[error("'{value}' is not a valid car id for this backend")]
    MalformedId { value: String },
    /// A reference name did not match any lookup entry (reject-unknown
    /// backends only; find-or-create backends never return this).
    #[error("unknown {kind} '{name}'")]
    UnknownReference {
        kind: LookupKind,
        name: String,
        valid: Vec<String>,
    },
}

impl CarStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a missing-car error for the given identifier.
    pub fn missing_car(id: impl Into<String>) -> Self {
        Self::MissingCar { id: id.into() }
    }

    /// Create a malformed-id error for the given raw value.
    pub fn malformed_id(value: impl Into<String>) -> Self {
        Self::MalformedId {
            value: value.into(),
        }
    }

    /// Create an unknown-reference error carrying the valid names.
    pub fn unknown_reference(
        kind: LookupKind,
        name: impl Into<String>,
        valid: Vec<String>,
    ) -> Self {
        Self::UnknownReference {
            kind,
            name: name.into(),
            valid,
        }
    }
}

/// Storage-capability port shared by all backends.
///
/// Write methods are atomic per call: a failed insert, update, or delete
/// leaves no partial state behind. `resolve_*` methods implement the
/// backend's lookup policy and may insert a lookup row (find-or-create
/// backends only).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Fetch one car by identifier, or `None` when absent.
    async fn find_car(&self, id: &CarId) -> Result<Option<CarRecord>, CarStoreError>;

    /// Return a page of cars in insertion order.
    async fn list_cars(&self, page: Page) -> Result<Vec<CarRecord>, CarStoreError>;

    /// Insert a normalised car and return the stored record with its
    /// assigned identifier.
    async fn insert_car(&self, draft: CarDraft) -> Result<CarRecord, CarStoreError>;

    /// Apply a partial update and return the refreshed record. Fields absent
    /// from `changes` are left untouched.
    async fn update_car(&self, id: &CarId, changes: CarChanges)
        -> Result<CarRecord, CarStoreError>;

    /// Delete one car. Backends with an audit trail remove dependent log
    /// rows in the same transaction.
    async fn delete_car(&self, id: &CarId) -> Result<(), CarStoreError>;

    /// Resolve a transmission name to its lookup id, case-insensitively.
    async fn resolve_transmission(&self, name: &str) -> Result<LookupId, CarStoreError>;

    /// Resolve a fuel-type name to its lookup id, case-insensitively.
    async fn resolve_fuel_type(&self, name: &str) -> Result<LookupId, CarStoreError>;

    /// List every transmission lookup entry.
    async fn list_transmissions(&self) -> Result<Vec<LookupEntry>, CarStoreError>;

    /// List every fuel-type lookup entry.
    async fn list_fuel_types(&self) -> Result<Vec<LookupEntry>, CarStoreError>;
}
