//! HTTP server assembly: backend selection, provisioning, and startup.

mod config;

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::ports::MemoryCarStore;
use crate::inbound::http::cars::{create_car, delete_car, get_car, list_cars, update_car};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::lookups::{list_fuel_types, list_transmissions};
use crate::inbound::http::state::HttpState;
use crate::outbound::document::{self, MongoCarStore};
use crate::outbound::persistence::{self, DieselCarStore, PoolConfig};

pub use config::{Backend, ServerConfig};

/// Build the state for the configured backend, provisioning it unless told
/// not to.
async fn build_state(config: &ServerConfig) -> io::Result<HttpState> {
    match config.backend {
        Backend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| io::Error::other("DATABASE_URL is required for the postgres backend"))?;
            let pool = PoolConfig::new(url).build().await.map_err(io::Error::other)?;
            if !config.skip_provision {
                persistence::provision(&pool).await.map_err(io::Error::other)?;
            }
            info!(backend = "postgres", "storage backend ready");
            Ok(HttpState::from_store(Arc::new(DieselCarStore::new(pool))))
        }
        Backend::Mongodb => {
            let url = config
                .mongodb_url
                .as_deref()
                .ok_or_else(|| io::Error::other("MONGODB_URL is required for the mongodb backend"))?;
            let store = MongoCarStore::connect(url).await.map_err(io::Error::other)?;
            if !config.skip_provision {
                document::provision(store.database())
                    .await
                    .map_err(io::Error::other)?;
            }
            info!(backend = "mongodb", "storage backend ready");
            Ok(HttpState::from_store(Arc::new(store)))
        }
        Backend::Memory => {
            warn!("no durable backend selected; data is lost on shutdown");
            Ok(HttpState::from_store(Arc::new(MemoryCarStore::seeded())))
        }
    }
}

/// Assemble the application with every route mounted.
fn build_app(
    state: web::Data<HttpState>,
    health: web::Data<HealthState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(state)
        .app_data(health)
        .service(
            web::scope("/api/v1")
                .service(create_car)
                .service(list_cars)
                .service(get_car)
                .service(update_car)
                .service(delete_car)
                .service(list_transmissions)
                .service(list_fuel_types),
        )
        .service(ready)
        .service(live);

    // Swagger UI is a development aid only.
    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::doc::ApiDoc::openapi()),
    );

    app
}

/// Run the server until it is stopped.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let state = web::Data::new(build_state(&config).await?);
    let health = web::Data::new(HealthState::new());

    let app_state = state.clone();
    let app_health = health.clone();
    let server = HttpServer::new(move || build_app(app_state.clone(), app_health.clone()))
        .bind(config.bind)?
        .run();

    health.mark_ready();
    info!(bind = %config.bind, backend = ?config.backend, "listening");
    server.await
}
