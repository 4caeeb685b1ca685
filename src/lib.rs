//! Coffee EDA - exploratory analysis of CQI arabica coffee reviews
//!
//! Loads the review CSV with Polars, cleans it (drops the row-number column,
//! normalizes column names, patches known-bad altitudes), then computes the
//! summaries, distributions and correlations shown by the console report,
//! the interactive viewer and the PNG exporter.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod gui;
pub mod report;
pub mod stats;

pub use config::{AltitudePatch, EdaConfig};
pub use data::{DataCleaner, DataLoader};
pub use error::{EdaError, Result};
pub use report::EdaReport;
