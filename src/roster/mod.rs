//! # Roster Pipeline
//!
//! Shared by the query service and the dashboard: the [`Loader`] reads and normalizes
//! the athlete workbook, [`period`] pulls years out of the free-text period column and
//! [`aggregate`] groups and counts rows.
pub mod aggregate;
pub mod error;
pub mod loader;
pub mod period;
pub mod schema;
pub mod table;
pub mod value;

pub use crate::roster::error::RosterError;
pub use crate::roster::loader::Loader;
pub use crate::roster::schema::RosterSchema;
pub use crate::roster::table::AthleteRecord;
pub use crate::roster::table::AthleteTable;
pub use crate::roster::value::FieldValue;
