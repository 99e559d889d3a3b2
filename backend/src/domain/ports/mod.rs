//! Domain ports for the hexagonal boundary.
//!
//! Driven side: [`CarStore`], the storage-capability interface implemented
//! once per backend. Driving side: [`CarsQuery`] and [`CarsCommand`],
//! consumed by the HTTP adapter. [`MemoryCarStore`] is the in-process
//! implementation used by tests and as the no-database fallback.

mod car_store;
mod cars_command;
mod cars_query;
mod memory;

#[cfg(test)]
pub use car_store::MockCarStore;
pub use car_store::{CarStore, CarStoreError, LookupKind};
pub use cars_command::CarsCommand;
pub use cars_query::CarsQuery;
pub use memory::MemoryCarStore;
