//! The classifier facade: validates the configuration once, then runs the
//! full pipeline per call. A call is purely sequential and keeps no state
//! between invocations, so one classifier can serve many threads.

use crate::aggregate;
use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, Result};
use crate::filter;
use crate::fusion;
use crate::methods;
use crate::trace::Trace;
use crate::trips;
use crate::types::{Classification, Sample, Summary};

#[derive(Debug, Clone)]
pub struct StopGoClassifier {
    config: ClassifierConfig,
}

impl StopGoClassifier {
    /// Build a classifier from a validated configuration.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a trace, never failing: validation problems land in the
    /// summary with `success = false` and empty interval lists.
    pub fn classify(&self, samples: &[Sample]) -> Classification {
        match self.try_classify(samples) {
            Ok(result) => result,
            Err(report) => {
                tracing::warn!(error = %report, "classification rejected");
                Classification::failed(report.to_string())
            }
        }
    }

    /// Classify a trace, surfacing configuration and input-shape errors as
    /// typed values for library callers.
    pub fn try_classify(&self, samples: &[Sample]) -> Result<Classification> {
        let mut trace = Trace::ingest(samples);

        // Method 1 needs a motion channel; drop it for traces without one
        // so the per-sample certainty logic never consults missing data.
        let mut config = self.config.clone();
        if config.motion.enabled && !trace.has_motion_data() {
            config.motion.enabled = false;
        }

        let max_window = config.max_window_size();
        if trace.len() < max_window {
            return Err(ClassifierError::InputTooShort {
                required: max_window,
                got: trace.len(),
            }
            .into());
        }

        trace.rebuild_attributes();
        if trace.drop_zero_distance_rows() {
            tracing::debug!(remaining = trace.len(), "dropped zero-distance rows");
        }

        let scores = methods::score_samples(&trace, &config);
        let labelled = fusion::conclude(&trace, &scores, &config);
        if labelled.is_empty() {
            // every window stayed undefined; nothing to aggregate
            return Ok(Classification {
                stops: Vec::new(),
                trips: Vec::new(),
                samples: labelled,
                trip_sample_indices: Vec::new(),
                summary: Summary {
                    total_points: 0,
                    total_stops: 0,
                    total_trips: 0,
                    success: true,
                    error: None,
                },
            });
        }

        let mut stops = aggregate::aggregate_stops(&labelled)?;
        tracing::debug!(stops = stops.len(), "aggregation done");
        if !stops.is_empty() {
            stops = filter::filter_stops(stops, &labelled, &config.stops)?;
            tracing::debug!(stops = stops.len(), "outlier filtering done");
        }

        let (trips, trip_sample_indices) = trips::isolate_trips(&stops, &labelled);

        let summary = Summary {
            total_points: labelled.len(),
            total_stops: stops.len(),
            total_trips: trips.len(),
            success: true,
            error: None,
        };
        Ok(Classification {
            stops,
            trips,
            samples: labelled,
            trip_sample_indices,
            summary,
        })
    }
}

/// One-shot convenience over [`StopGoClassifier`].
pub fn classify(samples: &[Sample], config: ClassifierConfig) -> Classification {
    match StopGoClassifier::new(config) {
        Ok(classifier) => classifier.classify(samples),
        Err(report) => Classification::failed(report.to_string()),
    }
}
