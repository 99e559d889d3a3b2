//! Lookup listing HTTP handlers.
//!
//! ```text
//! GET /api/v1/transmissions
//! GET /api/v1/fueltypes
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::LookupEntry;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// A lookup entry as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupEntryResponse {
    pub id: i32,
    #[schema(example = "Automatic")]
    pub name: String,
}

impl From<LookupEntry> for LookupEntryResponse {
    fn from(entry: LookupEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
        }
    }
}

fn to_body(entries: Vec<LookupEntry>) -> Vec<LookupEntryResponse> {
    entries.into_iter().map(LookupEntryResponse::from).collect()
}

/// List all transmission types.
#[utoipa::path(
    get,
    path = "/api/v1/transmissions",
    responses((status = 200, description = "All transmission types", body = [LookupEntryResponse])),
    tags = ["lookups"],
    operation_id = "listTransmissions"
)]
#[get("/transmissions")]
pub async fn list_transmissions(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let entries = state.cars_query.transmissions().await?;
    Ok(HttpResponse::Ok().json(to_body(entries)))
}

/// List all fuel types.
#[utoipa::path(
    get,
    path = "/api/v1/fueltypes",
    responses((status = 200, description = "All fuel types", body = [LookupEntryResponse])),
    tags = ["lookups"],
    operation_id = "listFuelTypes"
)]
#[get("/fueltypes")]
pub async fn list_fuel_types(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let entries = state.cars_query.fuel_types().await?;
    Ok(HttpResponse::Ok().json(to_body(entries)))
}
