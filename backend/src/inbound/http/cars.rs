//! Car CRUD HTTP handlers.
//!
//! ```text
//! POST   /api/v1/cars
//! GET    /api/v1/cars?skip=&limit=
//! GET    /api/v1/cars/{id}
//! PUT    /api/v1/cars/{id}
//! DELETE /api/v1/cars/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CarPatch, CarRecord, NewCar};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_car_id, parse_page};

/// Car payload for creation and partial update.
///
/// All fields are optional at the serde level; creation requires every
/// field and reports the first missing one, update applies whatever subset
/// is present.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarRequest {
    #[schema(example = "Fiesta")]
    pub model: Option<String>,
    #[schema(example = 2019)]
    pub year: Option<i32>,
    #[schema(example = 16500.0)]
    pub price: Option<f64>,
    #[schema(example = 1482)]
    pub mileage: Option<i64>,
    #[schema(example = 145)]
    pub tax: Option<i32>,
    #[schema(example = 48.7)]
    pub mpg: Option<f64>,
    #[schema(example = 1.0)]
    pub engine_size: Option<f64>,
    /// Transmission type name, resolved against the lookup table.
    #[schema(example = "Automatic")]
    pub transmission: Option<String>,
    /// Fuel type name, resolved against the lookup table.
    #[schema(example = "Petrol")]
    pub fuel_type: Option<String>,
}

/// Stored car as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: i64,
    pub tax: i32,
    pub mpg: f64,
    pub engine_size: f64,
    pub transmission_id: i32,
    pub fuel_type_id: i32,
}

impl From<CarRecord> for CarResponse {
    fn from(record: CarRecord) -> Self {
        Self {
            id: record.id.to_string(),
            model: record.model,
            year: record.year,
            price: record.price,
            mileage: record.mileage,
            tax: record.tax,
            mpg: record.mpg,
            engine_size: record.engine_size,
            transmission_id: record.transmission_id,
            fuel_type_id: record.fuel_type_id,
        }
    }
}

/// Confirmation body for deletions.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    pub message: String,
}

/// Paging query parameters for the car list.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Number of cars to skip. Defaults to 0.
    pub skip: Option<i64>,
    /// Page size. Defaults to 10, values above 100 are clamped.
    pub limit: Option<i64>,
}

fn parse_new_car(payload: CarRequest) -> Result<NewCar, crate::domain::Error> {
    Ok(NewCar {
        model: payload.model.ok_or_else(|| missing_field_error("model"))?,
        year: payload.year.ok_or_else(|| missing_field_error("year"))?,
        price: payload.price.ok_or_else(|| missing_field_error("price"))?,
        mileage: payload
            .mileage
            .ok_or_else(|| missing_field_error("mileage"))?,
        tax: payload.tax.ok_or_else(|| missing_field_error("tax"))?,
        mpg: payload.mpg.ok_or_else(|| missing_field_error("mpg"))?,
        engine_size: payload
            .engine_size
            .ok_or_else(|| missing_field_error("engineSize"))?,
        transmission: payload
            .transmission
            .ok_or_else(|| missing_field_error("transmission"))?,
        fuel_type: payload
            .fuel_type
            .ok_or_else(|| missing_field_error("fuelType"))?,
    })
}

fn to_patch(payload: CarRequest) -> CarPatch {
    CarPatch {
        model: payload.model,
        year: payload.year,
        price: payload.price,
        mileage: payload.mileage,
        tax: payload.tax,
        mpg: payload.mpg,
        engine_size: payload.engine_size,
        transmission: payload.transmission,
        fuel_type: payload.fuel_type,
    }
}

/// Create a car.
#[utoipa::path(
    post,
    path = "/api/v1/cars",
    request_body = CarRequest,
    responses(
        (status = 201, description = "Stored car with its assigned id", body = CarResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 404, description = "Unknown transmission or fuel type name", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "createCar"
)]
#[post("/cars")]
pub async fn create_car(
    state: web::Data<HttpState>,
    payload: web::Json<CarRequest>,
) -> ApiResult<HttpResponse> {
    let new_car = parse_new_car(payload.into_inner())?;
    let record = state.cars_command.create(new_car).await?;
    Ok(HttpResponse::Created().json(CarResponse::from(record)))
}

/// List cars with paging.
#[utoipa::path(
    get,
    path = "/api/v1/cars",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of cars in insertion order", body = [CarResponse]),
        (status = 400, description = "Invalid paging values", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "listCars"
)]
#[get("/cars")]
pub async fn list_cars(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = parse_page(query.skip, query.limit)?;
    let cars = state.cars_query.cars(page).await?;
    let body: Vec<CarResponse> = cars.into_iter().map(CarResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Fetch one car by id.
#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}",
    params(("id" = String, Path, description = "Car identifier")),
    responses(
        (status = 200, description = "The car", body = CarResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No car with this id", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "getCar"
)]
#[get("/cars/{id}")]
pub async fn get_car(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_car_id(&path.into_inner())?;
    let record = state.cars_query.car(&id).await?;
    Ok(HttpResponse::Ok().json(CarResponse::from(record)))
}

/// Partially update a car. Absent fields keep their stored value.
#[utoipa::path(
    put,
    path = "/api/v1/cars/{id}",
    params(("id" = String, Path, description = "Car identifier")),
    request_body = CarRequest,
    responses(
        (status = 200, description = "Refreshed car", body = CarResponse),
        (status = 400, description = "Empty update or invalid field", body = ErrorSchema),
        (status = 404, description = "No car with this id", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "updateCar"
)]
#[put("/cars/{id}")]
pub async fn update_car(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CarRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_car_id(&path.into_inner())?;
    let patch = to_patch(payload.into_inner());
    let record = state.cars_command.update(&id, patch).await?;
    Ok(HttpResponse::Ok().json(CarResponse::from(record)))
}

/// Delete a car.
#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    params(("id" = String, Path, description = "Car identifier")),
    responses(
        (status = 200, description = "Deletion confirmation", body = ConfirmationResponse),
        (status = 404, description = "No car with this id", body = ErrorSchema)
    ),
    tags = ["cars"],
    operation_id = "deleteCar"
)]
#[delete("/cars/{id}")]
pub async fn delete_car(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_car_id(&path.into_inner())?;
    state.cars_command.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ConfirmationResponse {
        message: format!("car {id} deleted"),
    }))
}
