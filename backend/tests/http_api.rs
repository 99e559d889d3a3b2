//! End-to-end API tests over the public crate surface with the in-memory
//! store standing in for a database.

use std::sync::Arc;

use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use carhub::domain::ports::MemoryCarStore;
use carhub::inbound::http::cars::{create_car, delete_car, get_car, list_cars, update_car};
use carhub::inbound::http::lookups::{list_fuel_types, list_transmissions};
use carhub::inbound::http::state::HttpState;

fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api/v1")
            .service(create_car)
            .service(list_cars)
            .service(get_car)
            .service(update_car)
            .service(delete_car)
            .service(list_transmissions)
            .service(list_fuel_types),
    )
}

#[actix_web::test]
async fn full_car_lifecycle() {
    let store = Arc::new(MemoryCarStore::seeded());
    let state = web::Data::new(HttpState::from_store(store));
    let app = actix_test::init_service(api_app(state)).await;

    // Create.
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/cars")
        .set_json(json!({
            "model": "Fiesta",
            "year": 2019,
            "price": 16500.0,
            "mileage": 1482,
            "tax": 145,
            "mpg": 48.7,
            "engineSize": 1.0,
            "transmission": "Manual",
            "fuelType": "Petrol",
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(response).await;
    let id = created["id"].as_str().expect("string id").to_string();

    // Read it back.
    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/cars/{id}"))
        .to_request();
    let fetched: Value =
        actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(fetched["model"], "Fiesta");
    assert_eq!(fetched["transmissionId"], created["transmissionId"]);

    // It shows up in the default listing.
    let request = actix_test::TestRequest::get()
        .uri("/api/v1/cars")
        .to_request();
    let listed: Value =
        actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
    assert!(
        listed
            .as_array()
            .expect("array")
            .iter()
            .any(|car| car["id"] == created["id"])
    );

    // Partial update touches only the named fields.
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/cars/{id}"))
        .set_json(json!({ "price": 15250.0 }))
        .to_request();
    let updated: Value =
        actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(updated["price"], 15250.0);
    assert_eq!(updated["model"], "Fiesta");
    assert_eq!(updated["year"], 2019);

    // Delete, then the id is gone.
    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/v1/cars/{id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    let confirmation: Value = actix_test::read_body_json(response).await;
    assert!(
        confirmation["message"]
            .as_str()
            .expect("message")
            .contains(&id)
    );

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/cars/{id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn seeded_lookups_are_listed() {
    let store = Arc::new(MemoryCarStore::seeded());
    let state = web::Data::new(HttpState::from_store(store));
    let app = actix_test::init_service(api_app(state)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/transmissions")
        .to_request();
    let transmissions: Value =
        actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
    let names: Vec<&str> = transmissions
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names, ["Automatic", "Manual", "Semi-Automatic"]);

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/fueltypes")
        .to_request();
    let fuel_types: Value =
        actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(fuel_types.as_array().expect("array").len(), 4);
}

#[actix_web::test]
async fn error_envelope_is_stable_across_failure_kinds() {
    let store = Arc::new(MemoryCarStore::seeded());
    let state = web::Data::new(HttpState::from_store(store));
    let app = actix_test::init_service(api_app(state)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/cars/999")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found");
    assert!(body["message"].is_string());

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/cars?skip=-1")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "skip");
}
