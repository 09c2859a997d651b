//! Database access helper.
//!
//! This module provides:
//! - `Database`: one lazily opened connection per instance
//! - `Params`: positional or `:name` statement parameters
//! - `Statement`, `Row` and `Value`: executed statements and their rows

pub mod database;
pub mod error;
pub mod params;
pub mod statement;
pub mod value;

pub use database::{ConnectionState, Database};
pub use error::DbError;
pub use params::Params;
pub use statement::{Fetched, Statement};
pub use value::{Row, Value};
