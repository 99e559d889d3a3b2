//! Tests for the car inventory service.

use std::sync::Arc;

use crate::domain::car::{CarChanges, CarId, CarPatch, CarRecord, NewCar, Page};
use crate::domain::error::ErrorCode;
use crate::domain::inventory::CarInventoryService;
use crate::domain::ports::{CarStoreError, CarsCommand, CarsQuery, LookupKind, MockCarStore};

fn make_service(store: MockCarStore) -> CarInventoryService<MockCarStore> {
    CarInventoryService::new(Arc::new(store))
}

fn sample_new_car() -> NewCar {
    NewCar {
        model: "Fiesta".into(),
        year: 2019,
        price: 16500.0,
        mileage: 1482,
        tax: 145,
        mpg: 48.7,
        engine_size: 1.0,
        transmission: "Automatic".into(),
        fuel_type: "Petrol".into(),
    }
}

fn stored_record(id: i32) -> CarRecord {
    CarRecord {
        id: CarId::from(id),
        model: "Fiesta".into(),
        year: 2019,
        price: 16500.0,
        mileage: 1482,
        tax: 145,
        mpg: 48.7,
        engine_size: 1.0,
        transmission_id: 1,
        fuel_type_id: 2,
    }
}

#[tokio::test]
async fn create_resolves_names_before_insert() {
    let mut store = MockCarStore::new();
    store
        .expect_resolve_transmission()
        .withf(|name| name == "Automatic")
        .times(1)
        .returning(|_| Ok(1));
    store
        .expect_resolve_fuel_type()
        .withf(|name| name == "Petrol")
        .times(1)
        .returning(|_| Ok(2));
    store
        .expect_insert_car()
        .withf(|draft| {
            draft.transmission_id == 1 && draft.fuel_type_id == 2 && draft.model == "Fiesta"
        })
        .times(1)
        .return_once(|_| Ok(stored_record(1)));

    let service = make_service(store);
    let record = service.create(sample_new_car()).await.expect("create");
    assert_eq!(record.id.as_str(), "1");
    assert_eq!(record.mileage, 1482);
}

#[tokio::test]
async fn create_rejects_invalid_payload_before_any_store_call() {
    // No expectations registered: any store interaction panics the mock.
    let store = MockCarStore::new();
    let service = make_service(store);

    let mut car = sample_new_car();
    car.year = 1850;
    let error = service.create(car).await.expect_err("invalid year");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details");
    assert_eq!(details["field"], "year");
}

#[tokio::test]
async fn create_maps_unknown_reference_to_not_found() {
    let mut store = MockCarStore::new();
    store
        .expect_resolve_transmission()
        .returning(|_| Ok(1));
    store.expect_resolve_fuel_type().return_once(|_| {
        Err(CarStoreError::unknown_reference(
            LookupKind::FuelType,
            "Steam",
            vec!["Petrol".into(), "Diesel".into()],
        ))
    });

    let service = make_service(store);
    let mut car = sample_new_car();
    car.fuel_type = "Steam".into();
    let error = service.create(car).await.expect_err("unknown fuel");
    assert_eq!(error.code(), ErrorCode::NotFound);
    let details = error.details().expect("details");
    assert_eq!(details["field"], "fuelType");
    assert_eq!(details["validNames"][0], "Petrol");
}

#[tokio::test]
async fn update_rejects_empty_patch() {
    let service = make_service(MockCarStore::new());
    let id = CarId::from(1);
    let error = service
        .update(&id, CarPatch::default())
        .await
        .expect_err("empty patch");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn update_missing_car_is_not_found() {
    let mut store = MockCarStore::new();
    store.expect_find_car().times(1).returning(|_| Ok(None));

    let service = make_service(store);
    let id = CarId::from(42);
    let patch = CarPatch {
        tax: Some(150),
        ..CarPatch::default()
    };
    let error = service.update(&id, patch).await.expect_err("missing car");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_translates_names_and_keeps_absent_fields_untouched() {
    let mut store = MockCarStore::new();
    store
        .expect_find_car()
        .times(1)
        .returning(|_| Ok(Some(stored_record(1))));
    store
        .expect_resolve_fuel_type()
        .withf(|name| name == "Diesel")
        .times(1)
        .returning(|_| Ok(2));
    store
        .expect_update_car()
        .withf(|_, changes: &CarChanges| {
            changes.fuel_type_id == Some(2)
                && changes.model == Some("Focus".to_owned())
                && changes.transmission_id.is_none()
                && changes.year.is_none()
        })
        .times(1)
        .return_once(|_, _| {
            let mut updated = stored_record(1);
            updated.model = "Focus".into();
            Ok(updated)
        });

    let service = make_service(store);
    let id = CarId::from(1);
    let patch = CarPatch {
        model: Some("Focus".into()),
        fuel_type: Some("Diesel".into()),
        ..CarPatch::default()
    };
    let record = service.update(&id, patch).await.expect("update");
    assert_eq!(record.model, "Focus");
}

#[tokio::test]
async fn delete_missing_car_is_not_found() {
    let mut store = MockCarStore::new();
    store
        .expect_delete_car()
        .times(1)
        .returning(|id| Err(CarStoreError::missing_car(id.as_str())));

    let service = make_service(store);
    let id = CarId::from(9);
    let error = service.delete(&id).await.expect_err("missing car");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut store = MockCarStore::new();
    store
        .expect_list_cars()
        .returning(|_| Err(CarStoreError::connection("pool exhausted")));

    let service = make_service(store);
    let error = service.cars(Page::first()).await.expect_err("unavailable");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn malformed_id_surfaces_as_invalid_request() {
    let mut store = MockCarStore::new();
    store
        .expect_find_car()
        .returning(|id| Err(CarStoreError::malformed_id(id.as_str())));

    let service = make_service(store);
    let id = CarId::new("not-an-id").expect("id");
    let error = service.car(&id).await.expect_err("malformed");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
