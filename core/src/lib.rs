//! Core library for the gymrat tracker.
//!
//! Everything here is synchronous and in-memory apart from [`storage`],
//! which reads and appends the flat CSV/JSON files under the data directory.

pub mod error;
pub mod foods;
pub mod macros;
pub mod models;
pub mod progress;
pub mod report;
pub mod service;
pub mod storage;
pub mod store;
pub mod training;

pub use error::{CoreError, Result};
