//! MongoDB-backed [`CarStore`] implementation.
//!
//! Lookup policy is reject-unknown: reference names must match a seeded
//! lookup document (case-insensitively) or the write fails with the list of
//! valid names. Cars live in one collection keyed by ObjectId; there is no
//! audit trail in this backend.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::car::{CarChanges, CarDraft, CarId, CarRecord, LookupEntry, LookupId, Page};
use crate::domain::ports::{CarStore, CarStoreError, LookupKind};

/// Database used when the connection string does not name one.
const DEFAULT_DATABASE: &str = "carhub";

const CARS_COLLECTION: &str = "cars";
const TRANSMISSIONS_COLLECTION: &str = "transmissions";
const FUEL_TYPES_COLLECTION: &str = "fueltypes";

/// A car document as stored in the `cars` collection.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CarDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: i64,
    pub tax: i32,
    pub mpg: f64,
    #[serde(rename = "enginesize")]
    pub engine_size: f64,
    #[serde(rename = "transmissionid")]
    pub transmission_id: i32,
    #[serde(rename = "fueltypeid")]
    pub fuel_type_id: i32,
}

/// A lookup document; `lookupid` carries the small integer id shared with
/// the relational schema so records stay comparable across backends.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LookupDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "lookupid")]
    pub lookup_id: i32,
    pub name: String,
}

/// Document car store backed by a MongoDB database handle.
#[derive(Clone)]
pub struct MongoCarStore {
    db: Database,
    cars: Collection<CarDocument>,
    transmissions: Collection<LookupDocument>,
    fuel_types: Collection<LookupDocument>,
}

impl MongoCarStore {
    /// Connect with a MongoDB connection string. The database comes from the
    /// connection string path, falling back to `carhub`.
    pub async fn connect(uri: &str) -> Result<Self, CarStoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|err| CarStoreError::connection(err.to_string()))?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        Ok(Self::new(db))
    }

    /// Wrap an existing database handle.
    pub fn new(db: Database) -> Self {
        Self {
            cars: db.collection(CARS_COLLECTION),
            transmissions: db.collection(TRANSMISSIONS_COLLECTION),
            fuel_types: db.collection(FUEL_TYPES_COLLECTION),
            db,
        }
    }

    /// The underlying database, used by provisioning.
    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn load_lookup(
        &self,
        collection: &Collection<LookupDocument>,
    ) -> Result<Vec<LookupDocument>, CarStoreError> {
        let mut cursor = collection
            .find(doc! {})
            .sort(doc! { "lookupid": 1 })
            .await
            .map_err(map_driver_error)?;
        let mut entries = Vec::new();
        while let Some(entry) = cursor.try_next().await.map_err(map_driver_error)? {
            entries.push(entry);
        }
        Ok(entries)
    }

    async fn resolve_lookup(
        &self,
        collection: &Collection<LookupDocument>,
        kind: LookupKind,
        name: &str,
    ) -> Result<LookupId, CarStoreError> {
        let entries = self.load_lookup(collection).await?;
        match entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
        {
            Some(entry) => Ok(entry.lookup_id),
            None => {
                let valid = entries.into_iter().map(|entry| entry.name).collect();
                Err(CarStoreError::unknown_reference(kind, name, valid))
            }
        }
    }
}

fn map_driver_error(err: mongodb::error::Error) -> CarStoreError {
    use mongodb::error::ErrorKind;
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
            CarStoreError::connection(err.to_string())
        }
        _ => CarStoreError::query(err.to_string()),
    }
}

/// Parse the opaque identifier into the ObjectId this backend uses.
pub(crate) fn parse_object_id(id: &CarId) -> Result<ObjectId, CarStoreError> {
    ObjectId::parse_str(id.as_str()).map_err(|_| CarStoreError::malformed_id(id.as_str()))
}

pub(crate) fn document_to_record(document: CarDocument) -> Result<CarRecord, CarStoreError> {
    let Some(object_id) = document.id else {
        return Err(CarStoreError::query("car document has no _id"));
    };
    let id = CarId::new(object_id.to_hex())
        .map_err(|err| CarStoreError::query(err.to_string()))?;
    Ok(CarRecord {
        id,
        model: document.model,
        year: document.year,
        price: document.price,
        mileage: document.mileage,
        tax: document.tax,
        mpg: document.mpg,
        engine_size: document.engine_size,
        transmission_id: document.transmission_id,
        fuel_type_id: document.fuel_type_id,
    })
}

fn draft_to_document(draft: CarDraft) -> CarDocument {
    CarDocument {
        id: None,
        model: draft.model,
        year: draft.year,
        price: draft.price,
        mileage: draft.mileage,
        tax: draft.tax,
        mpg: draft.mpg,
        engine_size: draft.engine_size,
        transmission_id: draft.transmission_id,
        fuel_type_id: draft.fuel_type_id,
    }
}

/// Build the `$set` document for a partial update. Absent fields do not
/// appear, so stored values survive the write.
pub(crate) fn set_document(changes: &CarChanges) -> Document {
    let mut set = Document::new();
    if let Some(model) = &changes.model {
        set.insert("model", model.clone());
    }
    if let Some(year) = changes.year {
        set.insert("year", year);
    }
    if let Some(price) = changes.price {
        set.insert("price", price);
    }
    if let Some(mileage) = changes.mileage {
        set.insert("mileage", mileage);
    }
    if let Some(tax) = changes.tax {
        set.insert("tax", tax);
    }
    if let Some(mpg) = changes.mpg {
        set.insert("mpg", mpg);
    }
    if let Some(engine_size) = changes.engine_size {
        set.insert("enginesize", engine_size);
    }
    if let Some(transmission_id) = changes.transmission_id {
        set.insert("transmissionid", transmission_id);
    }
    if let Some(fuel_type_id) = changes.fuel_type_id {
        set.insert("fueltypeid", fuel_type_id);
    }
    set
}

#[async_trait]
impl CarStore for MongoCarStore {
    async fn find_car(&self, id: &CarId) -> Result<Option<CarRecord>, CarStoreError> {
        let object_id = parse_object_id(id)?;
        let document = self
            .cars
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(map_driver_error)?;
        document.map(document_to_record).transpose()
    }

    async fn list_cars(&self, page: Page) -> Result<Vec<CarRecord>, CarStoreError> {
        let skip = u64::try_from(page.skip()).unwrap_or_default();
        let mut cursor = self
            .cars
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .skip(skip)
            .limit(page.limit())
            .await
            .map_err(map_driver_error)?;
        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(map_driver_error)? {
            records.push(document_to_record(document)?);
        }
        Ok(records)
    }

    async fn insert_car(&self, draft: CarDraft) -> Result<CarRecord, CarStoreError> {
        let document = draft_to_document(draft);
        let result = self
            .cars
            .insert_one(&document)
            .await
            .map_err(map_driver_error)?;
        let Bson::ObjectId(object_id) = result.inserted_id else {
            return Err(CarStoreError::query("insert returned a non-ObjectId key"));
        };
        debug!(car_id = %object_id, "inserted car document");
        let stored = CarDocument {
            id: Some(object_id),
            ..document
        };
        document_to_record(stored)
    }

    async fn update_car(
        &self,
        id: &CarId,
        changes: CarChanges,
    ) -> Result<CarRecord, CarStoreError> {
        let object_id = parse_object_id(id)?;
        let filter = doc! { "_id": object_id };
        let result = self
            .cars
            .update_one(filter.clone(), doc! { "$set": set_document(&changes) })
            .await
            .map_err(map_driver_error)?;
        if result.matched_count == 0 {
            return Err(CarStoreError::missing_car(id.as_str()));
        }
        let document = self
            .cars
            .find_one(filter)
            .await
            .map_err(map_driver_error)?
            .ok_or_else(|| CarStoreError::query("updated car vanished before read-back"))?;
        document_to_record(document)
    }

    async fn delete_car(&self, id: &CarId) -> Result<(), CarStoreError> {
        let object_id = parse_object_id(id)?;
        let result = self
            .cars
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(map_driver_error)?;
        if result.deleted_count == 0 {
            return Err(CarStoreError::missing_car(id.as_str()));
        }
        Ok(())
    }

    async fn resolve_transmission(&self, name: &str) -> Result<LookupId, CarStoreError> {
        self.resolve_lookup(&self.transmissions, LookupKind::Transmission, name)
            .await
    }

    async fn resolve_fuel_type(&self, name: &str) -> Result<LookupId, CarStoreError> {
        self.resolve_lookup(&self.fuel_types, LookupKind::FuelType, name)
            .await
    }

    async fn list_transmissions(&self) -> Result<Vec<LookupEntry>, CarStoreError> {
        let entries = self.load_lookup(&self.transmissions).await?;
        Ok(entries
            .into_iter()
            .map(|entry| LookupEntry {
                id: entry.lookup_id,
                name: entry.name,
            })
            .collect())
    }

    async fn list_fuel_types(&self) -> Result<Vec<LookupEntry>, CarStoreError> {
        let entries = self.load_lookup(&self.fuel_types).await?;
        Ok(entries
            .into_iter()
            .map(|entry| LookupEntry {
                id: entry.lookup_id,
                name: entry.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("64f1c9b2a7e4d3001f8e9a10", true)]
    #[case("64F1C9B2A7E4D3001F8E9A10", true)]
    #[case("12", false)]
    #[case("not-an-object-id", false)]
    fn identifier_parsing(#[case] raw: &str, #[case] ok: bool) {
        let id = CarId::new(raw).expect("well-formed id");
        assert_eq!(parse_object_id(&id).is_ok(), ok);
    }

    #[test]
    fn set_document_contains_only_provided_fields() {
        let changes = CarChanges {
            tax: Some(150),
            model: Some("Focus".into()),
            ..CarChanges::default()
        };
        let set = set_document(&changes);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_i32("tax").expect("tax"), 150);
        assert_eq!(set.get_str("model").expect("model"), "Focus");
        assert!(set.get("year").is_none());
    }

    #[test]
    fn document_round_trips_to_record() {
        let object_id = ObjectId::new();
        let document = CarDocument {
            id: Some(object_id),
            model: "Fiesta".into(),
            year: 2019,
            price: 16500.0,
            mileage: 1482,
            tax: 145,
            mpg: 48.7,
            engine_size: 1.0,
            transmission_id: 1,
            fuel_type_id: 2,
        };
        let record = document_to_record(document).expect("record");
        assert_eq!(record.id.as_str(), object_id.to_hex());
        assert_eq!(record.engine_size, 1.0);
    }

    #[test]
    fn document_without_id_is_a_query_error() {
        let document = CarDocument {
            id: None,
            model: "Fiesta".into(),
            year: 2019,
            price: 16500.0,
            mileage: 1482,
            tax: 145,
            mpg: 48.7,
            engine_size: 1.0,
            transmission_id: 1,
            fuel_type_id: 2,
        };
        assert!(matches!(
            document_to_record(document),
            Err(CarStoreError::Query { .. })
        ));
    }
}
