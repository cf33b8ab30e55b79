#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Stop/go classification of GPS traces.
//!
//! A pure, synchronous pipeline that turns a planar position trace into
//! labelled samples, stop intervals and trip intervals:
//!
//! - **Ingest**: de-duplicate positions, reject too-short traces
//! - **Attributes**: neighbour distances, time gaps, bearing deviations
//! - **Scoring**: six independent detectors, each emitting `[-1, +1]`
//!   (positive = stop evidence)
//! - **Fusion**: weighted mean plus smoothing with documented precedence
//! - **Aggregation**: contiguous stop intervals with median centroids
//! - **Filtering**: iterative keep/delete/merge to a fixed point
//! - **Trips**: the complement of the stops over the observed span
//!
//! The caller projects geographic coordinates to planar metres first; the
//! core performs no I/O and holds no cross-call state, so a configured
//! [`StopGoClassifier`] is freely shareable across threads.

pub mod classifier;
pub mod config;
pub mod error;
pub mod normalise;
pub mod types;

mod aggregate;
mod filter;
mod fusion;
mod geometry;
mod methods;
mod trace;
mod trips;

pub use classifier::{StopGoClassifier, classify};
pub use config::{
    ClassifierConfig, MissingDataCfg, MotionScoreCfg, StopFilterCfg, WindowMethodCfg,
};
pub use error::{ClassifierError, Result};
pub use types::{
    Classification, LabelledSample, Sample, StopInterval, Summary, TripInterval,
    samples_from_columns,
};
