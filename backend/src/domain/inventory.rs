//! Car inventory domain service.
//!
//! Implements the driving ports on top of a [`CarStore`]. This is where the
//! lookup-and-normalise write path lives: reference names from requests are
//! resolved to lookup ids through the store's policy before any car write,
//! and store failures are mapped onto the domain error taxonomy.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::car::{
    CarChanges, CarDraft, CarId, CarPatch, CarRecord, CarValidationError, LookupEntry, LookupId,
    NewCar, Page,
};
use crate::domain::error::Error;
use crate::domain::ports::{CarStore, CarStoreError, CarsCommand, CarsQuery};

/// Car inventory service implementing the driving ports.
#[derive(Clone)]
pub struct CarInventoryService<S> {
    store: Arc<S>,
}

impl<S> CarInventoryService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: CarStore> CarInventoryService<S> {
    fn map_store_error(error: CarStoreError) -> Error {
        match error {
            CarStoreError::Connection { message } => {
                Error::service_unavailable(format!("car store unavailable: {message}"))
            }
            CarStoreError::Query { message } => {
                Error::internal(format!("car store error: {message}"))
            }
            CarStoreError::MissingCar { id } => Error::not_found(format!("no car with id {id}")),
            CarStoreError::MalformedId { value } => {
                Error::invalid_request(format!("'{value}' is not a valid car id"))
                    .with_details(json!({ "field": "id", "value": value, "code": "malformed_id" }))
            }
            CarStoreError::UnknownReference { kind, name, valid } => {
                Error::not_found(format!("unknown {kind} '{name}'")).with_details(json!({
                    "field": kind.field_name(),
                    "value": name,
                    "validNames": valid,
                    "code": "unknown_reference",
                }))
            }
        }
    }

    fn map_validation_error(error: CarValidationError) -> Error {
        let code = match error {
            CarValidationError::Empty { .. } => "empty_field",
            CarValidationError::OutOfRange { .. } => "out_of_range",
        };
        let field = error.field();
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": field, "code": code }))
    }

    /// Resolve `(transmission name, fuel-type name)` to lookup ids via the
    /// store's policy.
    async fn normalise(
        &self,
        transmission: &str,
        fuel_type: &str,
    ) -> Result<(LookupId, LookupId), Error> {
        let transmission_id = self
            .store
            .resolve_transmission(transmission)
            .await
            .map_err(Self::map_store_error)?;
        let fuel_type_id = self
            .store
            .resolve_fuel_type(fuel_type)
            .await
            .map_err(Self::map_store_error)?;
        debug!(transmission_id, fuel_type_id, "resolved reference names");
        Ok((transmission_id, fuel_type_id))
    }

    async fn changes_from_patch(&self, patch: CarPatch) -> Result<CarChanges, Error> {
        let transmission_id = match &patch.transmission {
            Some(name) => Some(
                self.store
                    .resolve_transmission(name)
                    .await
                    .map_err(Self::map_store_error)?,
            ),
            None => None,
        };
        let fuel_type_id = match &patch.fuel_type {
            Some(name) => Some(
                self.store
                    .resolve_fuel_type(name)
                    .await
                    .map_err(Self::map_store_error)?,
            ),
            None => None,
        };
        Ok(CarChanges {
            model: patch.model,
            year: patch.year,
            price: patch.price,
            mileage: patch.mileage,
            tax: patch.tax,
            mpg: patch.mpg,
            engine_size: patch.engine_size,
            transmission_id,
            fuel_type_id,
        })
    }
}

#[async_trait]
impl<S: CarStore> CarsQuery for CarInventoryService<S> {
    async fn car(&self, id: &CarId) -> Result<CarRecord, Error> {
        self.store
            .find_car(id)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found(format!("no car with id {id}")))
    }

    async fn cars(&self, page: Page) -> Result<Vec<CarRecord>, Error> {
        self.store
            .list_cars(page)
            .await
            .map_err(Self::map_store_error)
    }

    async fn transmissions(&self) -> Result<Vec<LookupEntry>, Error> {
        self.store
            .list_transmissions()
            .await
            .map_err(Self::map_store_error)
    }

    async fn fuel_types(&self) -> Result<Vec<LookupEntry>, Error> {
        self.store
            .list_fuel_types()
            .await
            .map_err(Self::map_store_error)
    }
}

#[async_trait]
impl<S: CarStore> CarsCommand for CarInventoryService<S> {
    async fn create(&self, new_car: NewCar) -> Result<CarRecord, Error> {
        new_car.validate().map_err(Self::map_validation_error)?;
        let (transmission_id, fuel_type_id) = self
            .normalise(&new_car.transmission, &new_car.fuel_type)
            .await?;
        let draft = CarDraft::from_new_car(new_car, transmission_id, fuel_type_id);
        let record = self
            .store
            .insert_car(draft)
            .await
            .map_err(Self::map_store_error)?;
        info!(car_id = %record.id, model = %record.model, "car created");
        Ok(record)
    }

    async fn update(&self, id: &CarId, patch: CarPatch) -> Result<CarRecord, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request(
                "update must provide at least one field",
            ));
        }
        patch.validate().map_err(Self::map_validation_error)?;

        // Existence check first so a missing car reports 404 rather than a
        // reference failure from the patch contents.
        if self
            .store
            .find_car(id)
            .await
            .map_err(Self::map_store_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("no car with id {id}")));
        }

        let changes = self.changes_from_patch(patch).await?;
        let record = self
            .store
            .update_car(id, changes)
            .await
            .map_err(Self::map_store_error)?;
        info!(car_id = %record.id, "car updated");
        Ok(record)
    }

    async fn delete(&self, id: &CarId) -> Result<(), Error> {
        self.store
            .delete_car(id)
            .await
            .map_err(Self::map_store_error)?;
        info!(car_id = %id, "car deleted");
        Ok(())
    }
}
