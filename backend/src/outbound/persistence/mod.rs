//! Relational storage adapter: Diesel over PostgreSQL with an async pool.

mod diesel_car_store;
mod models;
mod pool;
mod provision;
mod schema;

pub use diesel_car_store::DieselCarStore;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use provision::provision;
