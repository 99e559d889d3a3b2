//! Driving port for car write paths.

use async_trait::async_trait;

use crate::domain::car::{CarId, CarPatch, CarRecord, NewCar};
use crate::domain::error::Error;

/// Domain use-case port for creating, updating, and deleting cars.
#[async_trait]
pub trait CarsCommand: Send + Sync {
    /// Validate, normalise references, insert, and return the stored car.
    async fn create(&self, new_car: NewCar) -> Result<CarRecord, Error>;

    /// Apply a partial update and return the refreshed car. An empty patch
    /// is rejected before any storage interaction.
    async fn update(&self, id: &CarId, patch: CarPatch) -> Result<CarRecord, Error>;

    /// Delete one car.
    async fn delete(&self, id: &CarId) -> Result<(), Error>;
}
