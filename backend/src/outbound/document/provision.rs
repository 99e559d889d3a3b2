//! Idempotent provisioning for the document backend.
//!
//! Creates the three collections when missing and seeds the lookup
//! collections plus a single starter car. Existing data is never touched,
//! so the routine is safe to run on every startup.

use mongodb::Database;
use mongodb::bson::doc;
use tracing::info;

use crate::domain::ports::CarStoreError;

use super::mongo_car_store::{CarDocument, LookupDocument};

const COLLECTIONS: &[&str] = &["transmissions", "fueltypes", "cars"];

const TRANSMISSION_SEEDS: &[&str] = &["Automatic", "Manual", "Semi-Automatic"];
const FUEL_TYPE_SEEDS: &[&str] = &["Petrol", "Diesel", "Electric", "Hybrid"];

fn seed_documents(names: &[&str]) -> Vec<LookupDocument> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| LookupDocument {
            id: None,
            lookup_id: i32::try_from(index).unwrap_or_default() + 1,
            name: (*name).to_string(),
        })
        .collect()
}

/// Create missing collections and seed reference data.
pub async fn provision(db: &Database) -> Result<(), CarStoreError> {
    let existing = db
        .list_collection_names()
        .await
        .map_err(|err| CarStoreError::connection(err.to_string()))?;
    for name in COLLECTIONS {
        if !existing.iter().any(|collection| collection == name) {
            db.create_collection(*name)
                .await
                .map_err(|err| CarStoreError::query(err.to_string()))?;
        }
    }

    let transmissions = db.collection::<LookupDocument>("transmissions");
    if transmissions
        .count_documents(doc! {})
        .await
        .map_err(|err| CarStoreError::query(err.to_string()))?
        == 0
    {
        transmissions
            .insert_many(seed_documents(TRANSMISSION_SEEDS))
            .await
            .map_err(|err| CarStoreError::query(err.to_string()))?;
    }

    let fuel_types = db.collection::<LookupDocument>("fueltypes");
    if fuel_types
        .count_documents(doc! {})
        .await
        .map_err(|err| CarStoreError::query(err.to_string()))?
        == 0
    {
        fuel_types
            .insert_many(seed_documents(FUEL_TYPE_SEEDS))
            .await
            .map_err(|err| CarStoreError::query(err.to_string()))?;
    }

    let cars = db.collection::<CarDocument>("cars");
    if cars
        .count_documents(doc! {})
        .await
        .map_err(|err| CarStoreError::query(err.to_string()))?
        == 0
    {
        // Sample record referencing the first seeded lookup entries.
        cars.insert_one(CarDocument {
            id: None,
            model: "Civic".into(),
            year: 2018,
            price: 15500.0,
            mileage: 21000,
            tax: 145,
            mpg: 55.4,
            engine_size: 1.5,
            transmission_id: 1,
            fuel_type_id: 1,
        })
        .await
        .map_err(|err| CarStoreError::query(err.to_string()))?;
    }

    info!("document collections provisioned");
    Ok(())
}
