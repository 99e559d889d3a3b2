//! Document storage adapter: MongoDB collections keyed by ObjectId.

mod mongo_car_store;
mod provision;

pub use mongo_car_store::MongoCarStore;
pub use provision::provision;
