//! HTTP inbound adapter exposing REST endpoints.

pub mod cars;
pub mod error;
pub mod health;
pub mod lookups;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;
