//! Diesel table definitions for the relational schema.
//!
//! These definitions must match the DDL in `provision.rs` exactly; Diesel
//! uses them for compile-time query validation and type-safe SQL.

diesel::table! {
    /// Cars with resolved lookup references.
    cars (carid) {
        carid -> Int4,
        model -> Varchar,
        year -> Int4,
        price -> Float8,
        transmissionid -> Int4,
        mileage -> Int8,
        fueltypeid -> Int4,
        tax -> Int4,
        mpg -> Float8,
        enginesize -> Float8,
    }
}

diesel::table! {
    /// Transmission type lookup table.
    transmissions (transmissionid) {
        transmissionid -> Int4,
        #[sql_name = "type"]
        type_ -> Varchar,
    }
}

diesel::table! {
    /// Fuel type lookup table.
    fueltypes (fueltypeid) {
        fueltypeid -> Int4,
        #[sql_name = "type"]
        type_ -> Varchar,
    }
}

diesel::table! {
    /// Audit trail rows, removed together with their car.
    carlogs (logid) {
        logid -> Int4,
        carid -> Int4,
        action -> Varchar,
        timestamp -> Timestamptz,
    }
}

diesel::joinable!(cars -> transmissions (transmissionid));
diesel::joinable!(cars -> fueltypes (fueltypeid));
diesel::joinable!(carlogs -> cars (carid));

diesel::allow_tables_to_appear_in_same_query!(cars, transmissions, fueltypes, carlogs);
