//! OpenAPI document aggregating every HTTP endpoint.

use utoipa::OpenApi;

/// OpenAPI description served to Swagger UI in debug builds.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Carhub API",
        description = "Car inventory CRUD service with pluggable storage backends"
    ),
    paths(
        crate::inbound::http::cars::create_car,
        crate::inbound::http::cars::list_cars,
        crate::inbound::http::cars::get_car,
        crate::inbound::http::cars::update_car,
        crate::inbound::http::cars::delete_car,
        crate::inbound::http::lookups::list_transmissions,
        crate::inbound::http::lookups::list_fuel_types,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::inbound::http::cars::CarRequest,
        crate::inbound::http::cars::CarResponse,
        crate::inbound::http::cars::ConfirmationResponse,
        crate::inbound::http::lookups::LookupEntryResponse,
        crate::inbound::http::schemas::ErrorSchema,
    )),
    tags(
        (name = "cars", description = "Car inventory CRUD"),
        (name = "lookups", description = "Transmission and fuel type reference data"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/cars",
            "/api/v1/cars/{id}",
            "/api/v1/transmissions",
            "/api/v1/fueltypes",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path: {path}"
            );
        }
    }
}
