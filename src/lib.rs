//! Dataset connectors that reshape climate and health time series into
//! chart-ready JSON documents.
//!
//! The reusable part is the time-series pipeline: [`reading`] normalizes raw
//! rows into per-entity series, [`metrics`] derives deltas, smoothed change and
//! per-capita values, and [`region`] rolls entities up into regions.
//! [`connectors`] wires these together for each supported source.

pub mod cache;
pub mod cli;
pub mod config;
pub mod connectors;
pub mod deserialise;
pub mod document;
pub mod download;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod population;
pub mod reading;
pub mod region;
pub mod series;

pub use series::{EntitySeries, TimePoint, Timestamp};
