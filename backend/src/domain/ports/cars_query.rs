//! Driving port for car read paths.
//!
//! Inbound adapters (HTTP handlers) use this port to read cars and lookup
//! entries without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::car::{CarId, CarRecord, LookupEntry, Page};
use crate::domain::error::Error;

/// Domain use-case port for car and lookup queries.
#[async_trait]
pub trait CarsQuery: Send + Sync {
    /// Fetch one car by identifier.
    async fn car(&self, id: &CarId) -> Result<CarRecord, Error>;

    /// Return a page of cars in insertion order.
    async fn cars(&self, page: Page) -> Result<Vec<CarRecord>, Error>;

    /// List all transmission types.
    async fn transmissions(&self) -> Result<Vec<LookupEntry>, Error>;

    /// List all fuel types.
    async fn fuel_types(&self) -> Result<Vec<LookupEntry>, Error>;
}
