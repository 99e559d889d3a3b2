//! Car domain types and request validation.
//!
//! Purpose: define the car aggregate, the validated creation and partial
//! update payloads, and the paging window used by list queries. Reference
//! fields (`transmission`, `fuel type`) travel as human-readable names in
//! requests and as resolved lookup identifiers in stored records.

use chrono::{Datelike, Utc};
use thiserror::Error;

/// Identifier of a lookup entry (transmission or fuel type).
pub type LookupId = i32;

/// Earliest accepted model year.
pub const MIN_YEAR: i32 = 1900;

/// Latest accepted model year: one year past the current calendar year.
pub fn max_year() -> i32 {
    Utc::now().year() + 1
}

/// Opaque car identifier.
///
/// Both backends assign identifiers at insert time; the wire format is a
/// string so one surface covers integer keys and ObjectIds alike. Each
/// adapter parses the value into its native key type and rejects values it
/// cannot parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CarId(String);

impl CarId {
    /// Construct an identifier, rejecting empty or padded values.
    pub fn new(value: impl Into<String>) -> Result<Self, CarIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CarIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CarIdValidationError::SurroundingWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<i32> for CarId {
    /// Integer keys render to non-empty digit strings, so this cannot fail.
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

/// Validation errors returned when constructing [`CarId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("car id must not be empty")]
    Empty,
    /// Identifier carries leading or trailing whitespace.
    #[error("car id must not contain surrounding whitespace")]
    SurroundingWhitespace,
}

/// A lookup entry: transmission type or fuel type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub id: LookupId,
    pub name: String,
}

/// Audit-trail action recorded by backends that keep a car log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarAction {
    Created,
    Updated,
}

impl CarAction {
    /// Stable text stored in the audit trail.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

/// A stored car as returned by the storage adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct CarRecord {
    pub id: CarId,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: i64,
    pub tax: i32,
    pub mpg: f64,
    pub engine_size: f64,
    pub transmission_id: LookupId,
    pub fuel_type_id: LookupId,
}

/// A validated car creation request, reference fields still as names.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: i64,
    pub tax: i32,
    pub mpg: f64,
    pub engine_size: f64,
    pub transmission: String,
    pub fuel_type: String,
}

impl NewCar {
    /// Check every field against the domain bounds.
    ///
    /// Returns the first violation; callers surface it before any storage
    /// interaction happens.
    pub fn validate(&self) -> Result<(), CarValidationError> {
        require_text("model", &self.model)?;
        require_text("transmission", &self.transmission)?;
        require_text("fuelType", &self.fuel_type)?;
        require_year(self.year)?;
        require_non_negative_f64("price", self.price)?;
        require_non_negative_i64("mileage", self.mileage)?;
        require_non_negative_i32("tax", self.tax)?;
        require_positive_f64("mpg", self.mpg)?;
        require_positive_f64("engineSize", self.engine_size)?;
        Ok(())
    }
}

/// A partial update: only provided fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarPatch {
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub mileage: Option<i64>,
    pub tax: Option<i32>,
    pub mpg: Option<f64>,
    pub engine_size: Option<f64>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
}

impl CarPatch {
    /// True when no field was provided at all.
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.year.is_none()
            && self.price.is_none()
            && self.mileage.is_none()
            && self.tax.is_none()
            && self.mpg.is_none()
            && self.engine_size.is_none()
            && self.transmission.is_none()
            && self.fuel_type.is_none()
    }

    /// Validate every provided field against the same bounds as creation.
    pub fn validate(&self) -> Result<(), CarValidationError> {
        if let Some(model) = &self.model {
            require_text("model", model)?;
        }
        if let Some(transmission) = &self.transmission {
            require_text("transmission", transmission)?;
        }
        if let Some(fuel_type) = &self.fuel_type {
            require_text("fuelType", fuel_type)?;
        }
        if let Some(year) = self.year {
            require_year(year)?;
        }
        if let Some(price) = self.price {
            require_non_negative_f64("price", price)?;
        }
        if let Some(mileage) = self.mileage {
            require_non_negative_i64("mileage", mileage)?;
        }
        if let Some(tax) = self.tax {
            require_non_negative_i32("tax", tax)?;
        }
        if let Some(mpg) = self.mpg {
            require_positive_f64("mpg", mpg)?;
        }
        if let Some(engine_size) = self.engine_size {
            require_positive_f64("engineSize", engine_size)?;
        }
        Ok(())
    }
}

/// A car ready for insertion: reference names resolved to lookup ids.
#[derive(Debug, Clone, PartialEq)]
pub struct CarDraft {
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: i64,
    pub tax: i32,
    pub mpg: f64,
    pub engine_size: f64,
    pub transmission_id: LookupId,
    pub fuel_type_id: LookupId,
}

impl CarDraft {
    /// Assemble a storable record from a validated request and resolved ids.
    pub fn from_new_car(new_car: NewCar, transmission_id: LookupId, fuel_type_id: LookupId) -> Self {
        Self {
            model: new_car.model,
            year: new_car.year,
            price: new_car.price,
            mileage: new_car.mileage,
            tax: new_car.tax,
            mpg: new_car.mpg,
            engine_size: new_car.engine_size,
            transmission_id,
            fuel_type_id,
        }
    }
}

/// A partial update with reference names already resolved, ready for the
/// storage adapter. Absent fields are left untouched by the write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarChanges {
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub mileage: Option<i64>,
    pub tax: Option<i32>,
    pub mpg: Option<f64>,
    pub engine_size: Option<f64>,
    pub transmission_id: Option<LookupId>,
    pub fuel_type_id: Option<LookupId>,
}

impl CarChanges {
    /// True when the update would touch nothing.
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.year.is_none()
            && self.price.is_none()
            && self.mileage.is_none()
            && self.tax.is_none()
            && self.mpg.is_none()
            && self.engine_size.is_none()
            && self.transmission_id.is_none()
            && self.fuel_type_id.is_none()
    }
}

/// Paging window for list queries: offset plus clamped page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: i64,
    limit: i64,
}

impl Page {
    /// Page size applied when the client does not ask for one.
    pub const DEFAULT_LIMIT: i64 = 10;
    /// Upper bound a requested page size is clamped to.
    pub const MAX_LIMIT: i64 = 100;

    /// Build a paging window. Negative offsets and non-positive limits are
    /// rejected; limits above [`Page::MAX_LIMIT`] are clamped down to it.
    pub fn new(skip: i64, limit: i64) -> Result<Self, PageValidationError> {
        if skip < 0 {
            return Err(PageValidationError::NegativeSkip);
        }
        if limit < 1 {
            return Err(PageValidationError::NonPositiveLimit);
        }
        Ok(Self {
            skip,
            limit: limit.min(Self::MAX_LIMIT),
        })
    }

    /// The first page with the default size.
    pub fn first() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Number of records to skip.
    pub fn skip(self) -> i64 {
        self.skip
    }

    /// Number of records to return.
    pub fn limit(self) -> i64 {
        self.limit
    }
}

/// Validation errors returned when constructing [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageValidationError {
    /// `skip` was negative.
    #[error("skip must be zero or greater")]
    NegativeSkip,
    /// `limit` was zero or negative.
    #[error("limit must be at least 1")]
    NonPositiveLimit,
}

/// Field-level validation failure for car payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarValidationError {
    /// A text field is empty after trimming.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    /// A numeric field is outside its allowed range.
    #[error("{field} {requirement}")]
    OutOfRange {
        field: &'static str,
        requirement: String,
    },
}

impl CarValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::OutOfRange { field, .. } => field,
        }
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), CarValidationError> {
    if value.trim().is_empty() {
        return Err(CarValidationError::Empty { field });
    }
    Ok(())
}

fn require_year(year: i32) -> Result<(), CarValidationError> {
    let max = max_year();
    if year < MIN_YEAR || year > max {
        return Err(CarValidationError::OutOfRange {
            field: "year",
            requirement: format!("must be between {MIN_YEAR} and {max}"),
        });
    }
    Ok(())
}

fn require_non_negative_f64(field: &'static str, value: f64) -> Result<(), CarValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CarValidationError::OutOfRange {
            field,
            requirement: "must be zero or greater".into(),
        });
    }
    Ok(())
}

fn require_non_negative_i64(field: &'static str, value: i64) -> Result<(), CarValidationError> {
    if value < 0 {
        return Err(CarValidationError::OutOfRange {
            field,
            requirement: "must be zero or greater".into(),
        });
    }
    Ok(())
}

fn require_non_negative_i32(field: &'static str, value: i32) -> Result<(), CarValidationError> {
    if value < 0 {
        return Err(CarValidationError::OutOfRange {
            field,
            requirement: "must be zero or greater".into(),
        });
    }
    Ok(())
}

fn require_positive_f64(field: &'static str, value: f64) -> Result<(), CarValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CarValidationError::OutOfRange {
            field,
            requirement: "must be greater than zero".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_new_car() -> NewCar {
        NewCar {
            model: "Fiesta".into(),
            year: 2019,
            price: 16500.0,
            mileage: 1482,
            tax: 145,
            mpg: 48.7,
            engine_size: 1.0,
            transmission: "Automatic".into(),
            fuel_type: "Petrol".into(),
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_new_car().validate().is_ok());
    }

    #[rstest]
    #[case::blank_model(|c: &mut NewCar| c.model = "  ".into(), "model")]
    #[case::blank_transmission(|c: &mut NewCar| c.transmission = String::new(), "transmission")]
    #[case::blank_fuel(|c: &mut NewCar| c.fuel_type = String::new(), "fuelType")]
    #[case::ancient_year(|c: &mut NewCar| c.year = 1899, "year")]
    #[case::future_year(|c: &mut NewCar| c.year = max_year() + 1, "year")]
    #[case::negative_price(|c: &mut NewCar| c.price = -1.0, "price")]
    #[case::nan_price(|c: &mut NewCar| c.price = f64::NAN, "price")]
    #[case::negative_mileage(|c: &mut NewCar| c.mileage = -5, "mileage")]
    #[case::negative_tax(|c: &mut NewCar| c.tax = -1, "tax")]
    #[case::zero_mpg(|c: &mut NewCar| c.mpg = 0.0, "mpg")]
    #[case::zero_engine(|c: &mut NewCar| c.engine_size = 0.0, "engineSize")]
    fn invalid_payload_names_the_field(
        #[case] mutate: impl Fn(&mut NewCar),
        #[case] field: &str,
    ) {
        let mut car = valid_new_car();
        mutate(&mut car);
        let err = car.validate().expect_err("validation failure");
        assert_eq!(err.field(), field);
    }

    #[test]
    fn patch_validates_only_provided_fields() {
        let patch = CarPatch {
            price: Some(12000.0),
            ..CarPatch::default()
        };
        assert!(patch.validate().is_ok());

        let patch = CarPatch {
            mpg: Some(-3.0),
            ..CarPatch::default()
        };
        assert_eq!(
            patch.validate().expect_err("invalid mpg").field(),
            "mpg"
        );
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(CarPatch::default().is_empty());
        let patch = CarPatch {
            tax: Some(0),
            ..CarPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[rstest]
    #[case(0, 10, 0, 10)]
    #[case(5, 100, 5, 100)]
    #[case(0, 500, 0, Page::MAX_LIMIT)]
    fn page_clamps_limit(
        #[case] skip: i64,
        #[case] limit: i64,
        #[case] expected_skip: i64,
        #[case] expected_limit: i64,
    ) {
        let page = Page::new(skip, limit).expect("valid page");
        assert_eq!(page.skip(), expected_skip);
        assert_eq!(page.limit(), expected_limit);
    }

    #[rstest]
    #[case(-1, 10, PageValidationError::NegativeSkip)]
    #[case(0, 0, PageValidationError::NonPositiveLimit)]
    #[case(0, -7, PageValidationError::NonPositiveLimit)]
    fn page_rejects_bad_bounds(
        #[case] skip: i64,
        #[case] limit: i64,
        #[case] expected: PageValidationError,
    ) {
        assert_eq!(Page::new(skip, limit).expect_err("invalid page"), expected);
    }

    #[rstest]
    #[case("", false)]
    #[case("  ", false)]
    #[case(" 12", false)]
    #[case("12", true)]
    #[case("64f1c9b2a7e4d3001f8e9a10", true)]
    fn car_id_rejects_blank_values(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(CarId::new(raw).is_ok(), ok);
    }
}
