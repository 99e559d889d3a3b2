//! Domain types, services, and ports.
//!
//! Everything in here is transport and storage agnostic: the HTTP adapter
//! lives under `inbound`, the storage adapters under `outbound`, and they
//! meet at the port traits in [`ports`].

pub mod car;
pub mod error;
pub mod inventory;
pub mod ports;

pub use self::car::{
    CarAction, CarChanges, CarDraft, CarId, CarIdValidationError, CarPatch, CarRecord,
    CarValidationError, LookupEntry, LookupId, NewCar, Page, PageValidationError,
};
pub use self::error::{Error, ErrorCode};
pub use self::inventory::CarInventoryService;

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;

#[cfg(test)]
mod inventory_tests;
