//! Tally Core Library
//!
//! Shared functionality for the Tally business operations dashboard:
//! - Database access and migrations for inquiries, feedback and service records
//! - CSV import of service records
//! - Analytics: time windows, trend series, KPIs, forecasting and insight bands

pub mod analytics;
pub mod db;
pub mod error;
pub mod import;
pub mod models;

pub use analytics::Dashboard;
pub use db::Database;
pub use error::{Error, Result};
pub use import::{import_records_csv, parse_records_csv};
