//! Driven adapters implementing the storage port against real backends.

pub mod document;
pub mod persistence;
