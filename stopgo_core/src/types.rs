//! Input and output types of the classifier.
//!
//! Timestamps are wall-clock seconds (`f64`); durations are differences of
//! those. Coordinates are metres in a caller-supplied planar projection —
//! converting from geographic lat/lng is the projection adapter's job.

use crate::error::{ClassifierError, Result};

/// One position observation. Identity for de-duplication is the `(x, y)`
/// pair; the first occurrence wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Wall-clock seconds; the trace must be ordered by this field.
    pub ts: f64,
    /// Planar metres (east).
    pub x: f64,
    /// Planar metres (north).
    pub y: f64,
    /// Optional accelerometer-derived motion magnitude, >= 0.
    pub motion_score: Option<f64>,
}

/// Build samples from equal-length columns, the shape most ingest adapters
/// naturally produce. `motion` may be `None` (no accelerometer channel) or
/// a column with per-row gaps.
pub fn samples_from_columns(
    ts: &[f64],
    x: &[f64],
    y: &[f64],
    motion: Option<&[Option<f64>]>,
) -> Result<Vec<Sample>> {
    if ts.len() != x.len() || ts.len() != y.len() {
        return Err(ClassifierError::ColumnMismatch("ts, x and y must have equal length").into());
    }
    if let Some(m) = motion
        && m.len() != ts.len()
    {
        return Err(
            ClassifierError::ColumnMismatch("motion column must match the position columns").into(),
        );
    }
    Ok((0..ts.len())
        .map(|i| Sample {
            ts: ts[i],
            x: x[i],
            y: y[i],
            motion_score: motion.and_then(|m| m[i]),
        })
        .collect())
}

/// A classified sample as returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledSample {
    /// Position of this row in the caller's original input.
    pub index: usize,
    pub ts: f64,
    pub x: f64,
    pub y: f64,
    pub rectangle_distance_score: Option<f64>,
    pub bearing_score: Option<f64>,
    pub start_end_distance_score: Option<f64>,
    pub intersecting_segments_score: Option<f64>,
    /// Fused score in `[-1, +1]`; positive means stop.
    pub overall_score: f64,
    pub is_stop: bool,
    /// `overall_score.abs()`.
    pub confidence: f64,
}

/// A contiguous interval in which the device is deemed stationary.
/// The centroid `(cx, cy)` is the per-axis median of the samples whose
/// timestamps fall inside the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopInterval {
    pub start: f64,
    pub stop: f64,
    pub duration_s: f64,
    pub cx: f64,
    pub cy: f64,
}

/// A contiguous interval of movement between stops (or spanning the whole
/// trace when no stops were found).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripInterval {
    pub start: f64,
    pub stop: f64,
    pub duration_s: f64,
}

/// Run statistics plus the success flag; on a validation failure the error
/// message lands here and the interval lists stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_points: usize,
    pub total_stops: usize,
    pub total_trips: usize,
    pub success: bool,
    pub error: Option<String>,
}

/// Everything one classification call produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub stops: Vec<StopInterval>,
    pub trips: Vec<TripInterval>,
    pub samples: Vec<LabelledSample>,
    /// For each trip (same order as `trips`), the indices into `samples`
    /// whose timestamps fall inside that trip.
    pub trip_sample_indices: Vec<Vec<usize>>,
    pub summary: Summary,
}

impl Classification {
    pub(crate) fn failed(error: String) -> Self {
        Self {
            stops: Vec::new(),
            trips: Vec::new(),
            samples: Vec::new(),
            trip_sample_indices: Vec::new(),
            summary: Summary {
                total_points: 0,
                total_stops: 0,
                total_trips: 0,
                success: false,
                error: Some(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_must_agree_in_length() {
        let err = samples_from_columns(&[0.0, 1.0], &[0.0], &[0.0, 0.0], None);
        assert!(err.is_err());
    }

    #[test]
    fn motion_column_is_optional_per_row() {
        let motion = [Some(1.0), None];
        let samples =
            samples_from_columns(&[0.0, 1.0], &[0.0, 5.0], &[0.0, 0.0], Some(&motion)).unwrap();
        assert_eq!(samples[0].motion_score, Some(1.0));
        assert_eq!(samples[1].motion_score, None);
    }
}
