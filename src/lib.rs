//! # Disabled-Athlete Roster
//!
//! Reads a regional roster of disabled athletes from an xlsx workbook, normalizes its
//! categorical columns and serves it two ways: JSON endpoints and an HTML dashboard
//! with charts.
//!
//! ## Features
//!
//! - **Pure Rust xlsx reader**: shared and inline strings, 1900/1904 date systems,
//!   number-format driven dates, no spreadsheet application required
//! - **Normalization**: trimmed lower-case headers, title-cased categories, a fixed
//!   label for missing values
//! - **Period years**: the first four-digit year in a free-text period column
//! - **Aggregation**: counts per category and per year
//! - **Query service**: `/atlet`, `/atlet/{id}`, `/jeniskelamin`, `/wilayah`, `/cabor`,
//!   `/periode`, `/periode/count`
//! - **Dashboard**: region and sport filters, counters, SVG charts and a detail table
//!   at `/dashboard`
pub mod config;
pub mod dashboard;
pub mod error;
pub mod helpers;
pub mod roster;
pub mod service;
pub mod spreadsheet;

pub use crate::config::Config;
pub use crate::service::build_router;
pub use crate::service::AppState;
