// Public fallible APIs in this crate share one concrete error contract (`ApiwatchError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod aggregate;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub(crate) mod jsonl;
pub mod load;
pub mod models;
pub mod period;
pub mod request_log;
pub(crate) mod text;

pub use client::Apiwatch;
pub use config::AppConfig;
pub use dashboard::{DashboardRequest, DashboardState};
pub use error::{ApiwatchError, Result};
pub use load::{DataSource, LoadOutcome, Loader};
pub use period::MonthLocale;
