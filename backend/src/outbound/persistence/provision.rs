//! Idempotent schema provisioning for the relational backend.
//!
//! Creates the four tables when missing and seeds the lookup tables plus a
//! single starter car. Safe to run on every startup: existing rows are left
//! alone, so operators can re-run it after upgrades.

use diesel_async::RunQueryDsl;
use tracing::info;

use crate::domain::ports::CarStoreError;

use super::pool::{DbPool, checkout};

const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS transmissions (
        transmissionid SERIAL PRIMARY KEY,
        type VARCHAR NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS fueltypes (
        fueltypeid SERIAL PRIMARY KEY,
        type VARCHAR NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS cars (
        carid SERIAL PRIMARY KEY,
        model VARCHAR NOT NULL,
        year INTEGER NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        transmissionid INTEGER NOT NULL REFERENCES transmissions (transmissionid),
        mileage BIGINT NOT NULL,
        fueltypeid INTEGER NOT NULL REFERENCES fueltypes (fueltypeid),
        tax INTEGER NOT NULL,
        mpg DOUBLE PRECISION NOT NULL,
        enginesize DOUBLE PRECISION NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS carlogs (
        logid SERIAL PRIMARY KEY,
        carid INTEGER NOT NULL REFERENCES cars (carid),
        action VARCHAR NOT NULL,
        timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

const SEEDS: &[&str] = &[
    "INSERT INTO transmissions (type)
     VALUES ('Automatic'), ('Manual'), ('Semi-Automatic')
     ON CONFLICT (type) DO NOTHING",
    "INSERT INTO fueltypes (type)
     VALUES ('Petrol'), ('Diesel'), ('Electric'), ('Hybrid')
     ON CONFLICT (type) DO NOTHING",
    // One sample record so a fresh deployment lists something.
    "INSERT INTO cars
        (model, year, price, transmissionid, mileage, fueltypeid, tax, mpg, enginesize)
     SELECT 'Civic', 2018, 15500, t.transmissionid, 21000, f.fueltypeid, 145, 55.4, 1.5
     FROM transmissions t, fueltypes f
     WHERE t.type = 'Automatic'
       AND f.type = 'Petrol'
       AND NOT EXISTS (SELECT 1 FROM cars)",
];

/// Create missing tables and seed reference data.
pub async fn provision(pool: &DbPool) -> Result<(), CarStoreError> {
    let mut conn = checkout(pool).await?;
    for statement in DDL.iter().chain(SEEDS) {
        diesel::sql_query(*statement).execute(&mut conn).await?;
    }
    info!("relational schema provisioned");
    Ok(())
}
