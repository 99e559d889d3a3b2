//! In-memory [`CarStore`] implementation.
//!
//! Serves as the deterministic fixture for handler and service tests and as
//! the fallback backend when the server starts without a database
//! configured. It models the relational policy: find-or-create lookups and
//! an audit log that is removed together with its car.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::car::{
    CarAction, CarChanges, CarDraft, CarId, CarRecord, LookupEntry, LookupId, Page,
};
use crate::domain::ports::car_store::{CarStore, CarStoreError};

#[derive(Debug, Clone)]
struct StoredCar {
    model: String,
    year: i32,
    price: f64,
    mileage: i64,
    tax: i32,
    mpg: f64,
    engine_size: f64,
    transmission_id: LookupId,
    fuel_type_id: LookupId,
}

#[derive(Debug, Clone)]
struct StoredLog {
    car_id: i32,
    action: &'static str,
}

#[derive(Debug, Default)]
struct Inner {
    cars: BTreeMap<i32, StoredCar>,
    next_car_id: i32,
    transmissions: Vec<LookupEntry>,
    next_transmission_id: LookupId,
    fuel_types: Vec<LookupEntry>,
    next_fuel_type_id: LookupId,
    logs: Vec<StoredLog>,
}

/// In-memory car store with relational semantics.
#[derive(Debug, Default)]
pub struct MemoryCarStore {
    inner: Mutex<Inner>,
}

impl MemoryCarStore {
    /// Create an empty store with no lookup entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-provisioned with the standard lookup values, the
    /// same set the real backends seed at startup.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for name in ["Automatic", "Manual", "Semi-Automatic"] {
                let id = inner.alloc_transmission_id();
                inner.transmissions.push(LookupEntry {
                    id,
                    name: name.into(),
                });
            }
            for name in ["Petrol", "Diesel", "Electric", "Hybrid"] {
                let id = inner.alloc_fuel_type_id();
                inner.fuel_types.push(LookupEntry {
                    id,
                    name: name.into(),
                });
            }
        }
        store
    }

    /// Audit-trail actions recorded for a car, oldest first. Test hook for
    /// the delete-cascade behaviour.
    pub fn log_actions(&self, id: &CarId) -> Vec<&'static str> {
        let Ok(car_id) = id.as_str().parse::<i32>() else {
            return Vec::new();
        };
        self.lock()
            .logs
            .iter()
            .filter(|log| log.car_id == car_id)
            .map(|log| log.action)
            .collect()
    }

    /// Number of stored cars. Test hook for no-partial-state assertions.
    pub fn car_count(&self) -> usize {
        self.lock().cars.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn alloc_car_id(&mut self) -> i32 {
        self.next_car_id += 1;
        self.next_car_id
    }

    fn alloc_transmission_id(&mut self) -> LookupId {
        self.next_transmission_id += 1;
        self.next_transmission_id
    }

    fn alloc_fuel_type_id(&mut self) -> LookupId {
        self.next_fuel_type_id += 1;
        self.next_fuel_type_id
    }

    fn record(&self, car_id: i32, car: &StoredCar) -> CarRecord {
        CarRecord {
            id: CarId::from(car_id),
            model: car.model.clone(),
            year: car.year,
            price: car.price,
            mileage: car.mileage,
            tax: car.tax,
            mpg: car.mpg,
            engine_size: car.engine_size,
            transmission_id: car.transmission_id,
            fuel_type_id: car.fuel_type_id,
        }
    }

    fn log(&mut self, car_id: i32, action: CarAction) {
        self.logs.push(StoredLog {
            car_id,
            action: action.as_str(),
        });
    }
}

fn parse_id(id: &CarId) -> Result<i32, CarStoreError> {
    id.as_str()
        .parse::<i32>()
        .map_err(|_| CarStoreError::malformed_id(id.as_str()))
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn find_car(&self, id: &CarId) -> Result<Option<CarRecord>, CarStoreError> {
        let car_id = parse_id(id)?;
        let inner = self.lock();
        Ok(inner.cars.get(&car_id).map(|car| inner.record(car_id, car)))
    }

    async fn list_cars(&self, page: Page) -> Result<Vec<CarRecord>, CarStoreError> {
        let inner = self.lock();
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(inner
            .cars
            .iter()
            .skip(skip)
            .take(limit)
            .map(|(car_id, car)| inner.record(*car_id, car))
            .collect())
    }

    async fn insert_car(&self, draft: CarDraft) -> Result<CarRecord, CarStoreError> {
        let mut inner = self.lock();
        let car_id = inner.alloc_car_id();
        let stored = StoredCar {
            model: draft.model,
            year: draft.year,
            price: draft.price,
            mileage: draft.mileage,
            tax: draft.tax,
            mpg: draft.mpg,
            engine_size: draft.engine_size,
            transmission_id: draft.transmission_id,
            fuel_type_id: draft.fuel_type_id,
        };
        inner.cars.insert(car_id, stored);
        inner.log(car_id, CarAction::Created);
        let car = &inner.cars[&car_id];
        Ok(inner.record(car_id, car))
    }

    async fn update_car(
        &self,
        id: &CarId,
        changes: CarChanges,
    ) -> Result<CarRecord, CarStoreError> {
        let car_id = parse_id(id)?;
        let mut inner = self.lock();
        let Some(car) = inner.cars.get_mut(&car_id) else {
            return Err(CarStoreError::missing_car(id.as_str()));
        };
        if let Some(model) = changes.model {
            car.model = model;
        }
        if let Some(year) = changes.year {
            car.year = year;
        }
        if let Some(price) = changes.price {
            car.price = price;
        }
        if let Some(mileage) = changes.mileage {
            car.mileage = mileage;
        }
        if let Some(tax) = changes.tax {
            car.tax = tax;
        }
        if let Some(mpg) = changes.mpg {
            car.mpg = mpg;
        }
        if let Some(engine_size) = changes.engine_size {
            car.engine_size = engine_size;
        }
        if let Some(transmission_id) = changes.transmission_id {
            car.transmission_id = transmission_id;
        }
        if let Some(fuel_type_id) = changes.fuel_type_id {
            car.fuel_type_id = fuel_type_id;
        }
        inner.log(car_id, CarAction::Updated);
        let car = &inner.cars[&car_id];
        Ok(inner.record(car_id, car))
    }

    async fn delete_car(&self, id: &CarId) -> Result<(), CarStoreError> {
        let car_id = parse_id(id)?;
        let mut inner = self.lock();
        if inner.cars.remove(&car_id).is_none() {
            return Err(CarStoreError::missing_car(id.as_str()));
        }
        inner.logs.retain(|log| log.car_id != car_id);
        Ok(())
    }

    async fn resolve_transmission(&self, name: &str) -> Result<LookupId, CarStoreError> {
        let mut inner = self.lock();
        if let Some(entry) = inner
            .transmissions
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
        {
            return Ok(entry.id);
        }
        let id = inner.alloc_transmission_id();
        inner.transmissions.push(LookupEntry {
            id,
            name: name.to_owned(),
        });
        Ok(id)
    }

    async fn resolve_fuel_type(&self, name: &str) -> Result<LookupId, CarStoreError> {
        let mut inner = self.lock();
        if let Some(entry) = inner
            .fuel_types
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
        {
            return Ok(entry.id);
        }
        let id = inner.alloc_fuel_type_id();
        inner.fuel_types.push(LookupEntry {
            id,
            name: name.to_owned(),
        });
        Ok(id)
    }

    async fn list_transmissions(&self) -> Result<Vec<LookupEntry>, CarStoreError> {
        Ok(self.lock().transmissions.clone())
    }

    async fn list_fuel_types(&self) -> Result<Vec<LookupEntry>, CarStoreError> {
        Ok(self.lock().fuel_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(model: &str) -> CarDraft {
        CarDraft {
            model: model.into(),
            year: 2018,
            price: 16000.0,
            mileage: 15000,
            tax: 130,
            mpg: 38.2,
            engine_size: 2.0,
            transmission_id: 1,
            fuel_type_id: 1,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_logs_creation() {
        let store = MemoryCarStore::seeded();
        let first = store.insert_car(draft("Civic")).await.expect("insert");
        let second = store.insert_car(draft("Fiesta")).await.expect("insert");
        assert_eq!(first.id.as_str(), "1");
        assert_eq!(second.id.as_str(), "2");
        assert_eq!(store.log_actions(&first.id), vec!["created"]);
    }

    #[tokio::test]
    async fn list_respects_skip_limit_and_insertion_order() {
        let store = MemoryCarStore::seeded();
        for model in ["A", "B", "C"] {
            store.insert_car(draft(model)).await.expect("insert");
        }
        let page = Page::new(0, 2).expect("page");
        let cars = store.list_cars(page).await.expect("list");
        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0].model, "A");
        assert_eq!(cars[1].model, "B");

        let rest = store
            .list_cars(Page::new(2, 2).expect("page"))
            .await
            .expect("list");
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].model, "C");
    }

    #[tokio::test]
    async fn resolve_is_case_insensitive_and_creates_missing_names() {
        let store = MemoryCarStore::seeded();
        let automatic = store
            .resolve_transmission("automatic")
            .await
            .expect("resolve");
        assert_eq!(automatic, 1);

        let lpg = store.resolve_fuel_type("LPG").await.expect("resolve");
        let again = store.resolve_fuel_type("lpg").await.expect("resolve");
        assert_eq!(lpg, again);
        let names: Vec<String> = store
            .list_fuel_types()
            .await
            .expect("list")
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert!(names.contains(&"LPG".to_owned()));
    }

    #[tokio::test]
    async fn delete_removes_car_and_its_logs() {
        let store = MemoryCarStore::seeded();
        let car = store.insert_car(draft("Civic")).await.expect("insert");
        store
            .update_car(
                &car.id,
                CarChanges {
                    tax: Some(150),
                    ..CarChanges::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(store.log_actions(&car.id), vec!["created", "updated"]);

        store.delete_car(&car.id).await.expect("delete");
        assert!(store.log_actions(&car.id).is_empty());
        assert_eq!(store.car_count(), 0);
    }

    #[tokio::test]
    async fn delete_missing_car_reports_missing() {
        let store = MemoryCarStore::seeded();
        let id = CarId::new("99").expect("id");
        let err = store.delete_car(&id).await.expect_err("missing");
        assert_eq!(err, CarStoreError::missing_car("99"));
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let store = MemoryCarStore::seeded();
        let id = CarId::new("not-a-number").expect("id");
        let err = store.find_car(&id).await.expect_err("malformed");
        assert!(matches!(err, CarStoreError::MalformedId { .. }));
    }

    #[tokio::test]
    async fn update_missing_car_reports_missing() {
        let store = MemoryCarStore::seeded();
        let id = CarId::new("7").expect("id");
        let err = store
            .update_car(
                &id,
                CarChanges {
                    model: Some("Focus".into()),
                    ..CarChanges::default()
                },
            )
            .await
            .expect_err("missing");
        assert!(matches!(err, CarStoreError::MissingCar { .. }));
    }
}
