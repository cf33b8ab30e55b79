//! Turns the labelled sample sequence into stop intervals.
//!
//! An interval opens where the label flips trip->stop and closes on the
//! next stop->trip flip; flips are read against each sample's predecessor,
//! with the first sample compared to itself so it never registers as a
//! change on its own. Missing boundaries are synthesized at the ends of
//! the trace.

use crate::error::{ClassifierError, Result};
use crate::types::{LabelledSample, StopInterval};

/// Median of the values; even counts average the two middle elements.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Median position of the samples whose timestamps fall in
/// `[start, stop]`; robust against a stray outlier inside the interval.
pub(crate) fn median_position(
    samples: &[LabelledSample],
    start: f64,
    stop: f64,
) -> Option<(f64, f64)> {
    let xs: Vec<f64> = samples
        .iter()
        .filter(|s| s.ts >= start && s.ts <= stop)
        .map(|s| s.x)
        .collect();
    let ys: Vec<f64> = samples
        .iter()
        .filter(|s| s.ts >= start && s.ts <= stop)
        .map(|s| s.y)
        .collect();
    Some((median(xs)?, median(ys)?))
}

/// Finalize a `(start, stop)` pair into an interval with duration and
/// median centroid.
pub(crate) fn build_interval(
    samples: &[LabelledSample],
    start: f64,
    stop: f64,
) -> Result<StopInterval> {
    let (cx, cy) = median_position(samples, start, stop)
        .ok_or(ClassifierError::EmptyInterval { start, stop })?;
    Ok(StopInterval {
        start,
        stop,
        duration_s: stop - start,
        cx,
        cy,
    })
}

pub(crate) fn aggregate_stops(samples: &[LabelledSample]) -> Result<Vec<StopInterval>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    // (timestamp, opens_interval) at every label flip
    let mut changes: Vec<(f64, bool)> = Vec::new();
    for (i, sample) in samples.iter().enumerate() {
        let shifted = if i == 0 {
            sample.is_stop
        } else {
            samples[i - 1].is_stop
        };
        if sample.is_stop != shifted {
            changes.push((sample.ts, sample.is_stop));
        }
    }

    if changes.is_empty() {
        return if samples[0].is_stop {
            Ok(vec![build_interval(
                samples,
                samples[0].ts,
                samples[samples.len() - 1].ts,
            )?])
        } else {
            Ok(Vec::new())
        };
    }

    if let Some(&(_, opens)) = changes.first()
        && !opens
    {
        changes.insert(0, (samples[0].ts, true));
    }
    if let Some(&(_, opens)) = changes.last()
        && opens
    {
        changes.push((samples[samples.len() - 1].ts, false));
    }

    let mut stops = Vec::with_capacity(changes.len() / 2);
    for pair in changes.chunks_exact(2) {
        stops.push(build_interval(samples, pair[0].0, pair[1].0)?);
    }
    Ok(stops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(ts: f64, x: f64, is_stop: bool) -> LabelledSample {
        LabelledSample {
            index: ts as usize,
            ts,
            x,
            y: 0.0,
            rectangle_distance_score: None,
            bearing_score: None,
            start_end_distance_score: None,
            intersecting_segments_score: None,
            overall_score: if is_stop { 0.5 } else { -0.5 },
            is_stop,
            confidence: 0.5,
        }
    }

    #[test]
    fn whole_trace_stop_emits_one_spanning_interval() {
        let samples: Vec<_> = (0..5).map(|i| labelled(f64::from(i), 1.0, true)).collect();
        let stops = aggregate_stops(&samples).unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].start, 0.0);
        assert_eq!(stops[0].stop, 4.0);
        assert_eq!(stops[0].duration_s, 4.0);
    }

    #[test]
    fn whole_trace_trip_emits_nothing() {
        let samples: Vec<_> = (0..5).map(|i| labelled(f64::from(i), 1.0, false)).collect();
        assert!(aggregate_stops(&samples).unwrap().is_empty());
    }

    #[test]
    fn interior_stop_gets_both_boundaries_from_flips() {
        let labels = [false, false, true, true, true, false, false];
        let samples: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(i, &s)| labelled(i as f64, i as f64, s))
            .collect();
        let stops = aggregate_stops(&samples).unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!((stops[0].start, stops[0].stop), (2.0, 5.0));
    }

    #[test]
    fn leading_stop_synthesizes_a_start_at_the_first_sample() {
        let labels = [true, true, false, false];
        let samples: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(i, &s)| labelled(i as f64, i as f64, s))
            .collect();
        let stops = aggregate_stops(&samples).unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!((stops[0].start, stops[0].stop), (0.0, 2.0));
    }

    #[test]
    fn trailing_stop_synthesizes_an_end_at_the_last_sample() {
        let labels = [false, false, true, true];
        let samples: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(i, &s)| labelled(i as f64, i as f64, s))
            .collect();
        let stops = aggregate_stops(&samples).unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!((stops[0].start, stops[0].stop), (2.0, 3.0));
    }

    #[test]
    fn centroid_is_the_median_not_the_mean() {
        let mut samples: Vec<_> = (0..5).map(|i| labelled(f64::from(i), 10.0, true)).collect();
        samples[2].x = 1000.0; // one outlier inside the stop
        let stops = aggregate_stops(&samples).unwrap();
        assert_eq!(stops[0].cx, 10.0);
    }
}
