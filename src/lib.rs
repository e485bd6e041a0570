//! Digital Product Passport data layer
//!
//! Fetches a traceability record for an identified item (or a static
//! preview), derives the display-ready view model from it and exposes the
//! result as a read-only page-load snapshot.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod common;
pub mod config;
pub mod context;
pub mod errors;
pub mod i18n;
pub mod models;
pub mod query;
pub mod services;
pub mod sources;

pub use config::{load_config, AppConfig};
pub use context::{ClientState, LoadState, PassportLoader, PassportSnapshot, SnapshotCache};
pub use errors::{ErrorView, ServiceError};
pub use query::PassportQuery;
