//! PostgreSQL-backed [`CarStore`] implementation.
//!
//! Lookup policy is find-or-create: a reference name with no matching row
//! gets one inserted, so relational writes never fail on unknown names.
//! Every car mutation that touches the audit trail runs inside a single
//! transaction, so a car row and its `carlogs` entries stay consistent.

use async_trait::async_trait;
use chrono::Utc;
use diesel::define_sql_function;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::car::{CarAction, CarChanges, CarDraft, CarId, CarRecord, LookupEntry, Page};
use crate::domain::ports::{CarStore, CarStoreError, LookupKind};

use super::models::{
    CarChangesRow, CarRow, FuelTypeRow, NewCarLogRow, NewCarRow, TransmissionRow,
};
use super::pool::{DbPool, PoolError, checkout};
use super::schema::{carlogs, cars, fueltypes, transmissions};

define_sql_function! {
    /// SQL `lower()`, used for case-insensitive lookup matching.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text
}

/// Relational car store backed by a Diesel connection pool.
#[derive(Clone)]
pub struct DieselCarStore {
    pool: DbPool,
}

impl DieselCarStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<PoolError> for CarStoreError {
    fn from(err: PoolError) -> Self {
        CarStoreError::connection(err.to_string())
    }
}

impl From<diesel::result::Error> for CarStoreError {
    fn from(err: diesel::result::Error) -> Self {
        CarStoreError::query(err.to_string())
    }
}

/// Parse the opaque identifier into the serial key this backend uses.
pub(crate) fn parse_relational_id(id: &CarId) -> Result<i32, CarStoreError> {
    id.as_str()
        .parse::<i32>()
        .map_err(|_| CarStoreError::malformed_id(id.as_str()))
}

#[async_trait]
impl CarStore for DieselCarStore {
    async fn find_car(&self, id: &CarId) -> Result<Option<CarRecord>, CarStoreError> {
        let car_id = parse_relational_id(id)?;
        let mut conn = checkout(&self.pool).await?;
        let row = cars::table
            .find(car_id)
            .select(CarRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(CarRecord::from))
    }

    async fn list_cars(&self, page: Page) -> Result<Vec<CarRecord>, CarStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let rows = cars::table
            .order(cars::carid.asc())
            .offset(page.skip())
            .limit(page.limit())
            .select(CarRow::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.into_iter().map(CarRecord::from).collect())
    }

    async fn insert_car(&self, draft: CarDraft) -> Result<CarRecord, CarStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let row = conn
            .transaction::<CarRow, CarStoreError, _>(|conn| {
                async move {
                    let row: CarRow = diesel::insert_into(cars::table)
                        .values(NewCarRow::from_draft(&draft))
                        .returning(CarRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(carlogs::table)
                        .values(NewCarLogRow {
                            carid: row.carid,
                            action: CarAction::Created.as_str(),
                            timestamp: Utc::now(),
                        })
                        .execute(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await?;
        debug!(car_id = row.carid, "inserted car");
        Ok(CarRecord::from(row))
    }

    async fn update_car(
        &self,
        id: &CarId,
        changes: CarChanges,
    ) -> Result<CarRecord, CarStoreError> {
        let car_id = parse_relational_id(id)?;
        let mut conn = checkout(&self.pool).await?;
        let row = conn
            .transaction::<CarRow, CarStoreError, _>(|conn| {
                async move {
                    let updated = diesel::update(cars::table.find(car_id))
                        .set(CarChangesRow::from_changes(&changes))
                        .returning(CarRow::as_returning())
                        .get_result::<CarRow>(conn)
                        .await
                        .optional()?;
                    let Some(row) = updated else {
                        return Err(CarStoreError::missing_car(car_id.to_string()));
                    };
                    diesel::insert_into(carlogs::table)
                        .values(NewCarLogRow {
                            carid: row.carid,
                            action: CarAction::Updated.as_str(),
                            timestamp: Utc::now(),
                        })
                        .execute(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await?;
        Ok(CarRecord::from(row))
    }

    async fn delete_car(&self, id: &CarId) -> Result<(), CarStoreError> {
        let car_id = parse_relational_id(id)?;
        let mut conn = checkout(&self.pool).await?;
        conn.transaction::<(), CarStoreError, _>(|conn| {
            async move {
                // Log rows go first so the delete never trips the foreign key.
                diesel::delete(carlogs::table.filter(carlogs::carid.eq(car_id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(cars::table.find(car_id))
                    .execute(conn)
                    .await?;
                if deleted == 0 {
                    return Err(CarStoreError::missing_car(car_id.to_string()));
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await?;
        debug!(car_id, "deleted car and audit trail");
        Ok(())
    }

    async fn resolve_transmission(&self, name: &str) -> Result<i32, CarStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let existing = transmissions::table
            .filter(lower(transmissions::type_).eq(name.to_lowercase()))
            .select(transmissions::transmissionid)
            .first::<i32>(&mut conn)
            .await
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        let id = diesel::insert_into(transmissions::table)
            .values(transmissions::type_.eq(name))
            .returning(transmissions::transmissionid)
            .get_result::<i32>(&mut conn)
            .await?;
        debug!(name, id, kind = %LookupKind::Transmission, "created lookup entry");
        Ok(id)
    }

    async fn resolve_fuel_type(&self, name: &str) -> Result<i32, CarStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let existing = fueltypes::table
            .filter(lower(fueltypes::type_).eq(name.to_lowercase()))
            .select(fueltypes::fueltypeid)
            .first::<i32>(&mut conn)
            .await
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        let id = diesel::insert_into(fueltypes::table)
            .values(fueltypes::type_.eq(name))
            .returning(fueltypes::fueltypeid)
            .get_result::<i32>(&mut conn)
            .await?;
        debug!(name, id, kind = %LookupKind::FuelType, "created lookup entry");
        Ok(id)
    }

    async fn list_transmissions(&self) -> Result<Vec<LookupEntry>, CarStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let rows = transmissions::table
            .order(transmissions::transmissionid.asc())
            .select(TransmissionRow::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.into_iter().map(LookupEntry::from).collect())
    }

    async fn list_fuel_types(&self) -> Result<Vec<LookupEntry>, CarStoreError> {
        let mut conn = checkout(&self.pool).await?;
        let rows = fueltypes::table
            .order(fueltypes::fueltypeid.asc())
            .select(FuelTypeRow::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows.into_iter().map(LookupEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7", Ok(7))]
    #[case("0", Ok(0))]
    #[case("-3", Ok(-3))]
    #[case("abc", Err(()))]
    #[case("64f1c9b2a7e4d3001f8e9a10", Err(()))]
    #[case("7.5", Err(()))]
    fn identifier_parsing(#[case] raw: &str, #[case] expected: Result<i32, ()>) {
        let id = CarId::new(raw).expect("well-formed id");
        match (parse_relational_id(&id), expected) {
            (Ok(parsed), Ok(want)) => assert_eq!(parsed, want),
            (Err(CarStoreError::MalformedId { value }), Err(())) => assert_eq!(value, raw),
            (got, want) => panic!("mismatch: got {got:?}, wanted {want:?}"),
        }
    }

    #[test]
    fn pool_errors_map_to_connection_failures() {
        let err = CarStoreError::from(PoolError::checkout("timed out"));
        assert!(matches!(err, CarStoreError::Connection { .. }));
    }
}
