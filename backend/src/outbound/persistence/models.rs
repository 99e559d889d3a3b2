//! Diesel row types mapping between the relational schema and domain types.

use diesel::prelude::*;

use crate::domain::car::{CarChanges, CarDraft, CarId, CarRecord, LookupEntry};

use super::schema::{carlogs, cars, fueltypes, transmissions};

/// A car row as stored in the `cars` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CarRow {
    pub carid: i32,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub transmissionid: i32,
    pub mileage: i64,
    pub fueltypeid: i32,
    pub tax: i32,
    pub mpg: f64,
    pub enginesize: f64,
}

impl From<CarRow> for CarRecord {
    fn from(row: CarRow) -> Self {
        Self {
            id: CarId::from(row.carid),
            model: row.model,
            year: row.year,
            price: row.price,
            mileage: row.mileage,
            tax: row.tax,
            mpg: row.mpg,
            engine_size: row.enginesize,
            transmission_id: row.transmissionid,
            fuel_type_id: row.fueltypeid,
        }
    }
}

/// Insertable car row; the key is assigned by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = cars)]
pub struct NewCarRow<'a> {
    pub model: &'a str,
    pub year: i32,
    pub price: f64,
    pub transmissionid: i32,
    pub mileage: i64,
    pub fueltypeid: i32,
    pub tax: i32,
    pub mpg: f64,
    pub enginesize: f64,
}

impl<'a> NewCarRow<'a> {
    pub fn from_draft(draft: &'a CarDraft) -> Self {
        Self {
            model: &draft.model,
            year: draft.year,
            price: draft.price,
            transmissionid: draft.transmission_id,
            mileage: draft.mileage,
            fueltypeid: draft.fuel_type_id,
            tax: draft.tax,
            mpg: draft.mpg,
            enginesize: draft.engine_size,
        }
    }
}

/// Changeset applying only the provided fields; `None` columns keep their
/// stored value.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = cars)]
pub struct CarChangesRow<'a> {
    pub model: Option<&'a str>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub transmissionid: Option<i32>,
    pub mileage: Option<i64>,
    pub fueltypeid: Option<i32>,
    pub tax: Option<i32>,
    pub mpg: Option<f64>,
    pub enginesize: Option<f64>,
}

impl<'a> CarChangesRow<'a> {
    pub fn from_changes(changes: &'a CarChanges) -> Self {
        Self {
            model: changes.model.as_deref(),
            year: changes.year,
            price: changes.price,
            transmissionid: changes.transmission_id,
            mileage: changes.mileage,
            fueltypeid: changes.fuel_type_id,
            tax: changes.tax,
            mpg: changes.mpg,
            enginesize: changes.engine_size,
        }
    }
}

/// A transmission lookup row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = transmissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransmissionRow {
    pub transmissionid: i32,
    pub type_: String,
}

impl From<TransmissionRow> for LookupEntry {
    fn from(row: TransmissionRow) -> Self {
        Self {
            id: row.transmissionid,
            name: row.type_,
        }
    }
}

/// A fuel type lookup row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = fueltypes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FuelTypeRow {
    pub fueltypeid: i32,
    pub type_: String,
}

impl From<FuelTypeRow> for LookupEntry {
    fn from(row: FuelTypeRow) -> Self {
        Self {
            id: row.fueltypeid,
            name: row.type_,
        }
    }
}

/// Insertable audit trail row.
#[derive(Debug, Insertable)]
#[diesel(table_name = carlogs)]
pub struct NewCarLogRow<'a> {
    pub carid: i32,
    pub action: &'a str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
