//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::CarInventoryService;
use crate::domain::ports::{CarStore, CarsCommand, CarsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub cars_query: Arc<dyn CarsQuery>,
    pub cars_command: Arc<dyn CarsCommand>,
}

impl HttpState {
    /// Bundle explicit port implementations.
    pub fn new(cars_query: Arc<dyn CarsQuery>, cars_command: Arc<dyn CarsCommand>) -> Self {
        Self {
            cars_query,
            cars_command,
        }
    }

    /// Wire both driving ports to one inventory service over the given store.
    pub fn from_store<S: CarStore + 'static>(store: Arc<S>) -> Self {
        let service = Arc::new(CarInventoryService::new(store));
        Self {
            cars_query: service.clone(),
            cars_command: service,
        }
    }
}
