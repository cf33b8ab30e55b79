//! Trip isolation: the complement of the stop list within the observed
//! time range, plus the samples that fall inside each trip.

use crate::types::{LabelledSample, StopInterval, TripInterval};

pub(crate) fn isolate_trips(
    stops: &[StopInterval],
    samples: &[LabelledSample],
) -> (Vec<TripInterval>, Vec<Vec<usize>>) {
    let Some(first) = samples.first() else {
        return (Vec::new(), Vec::new());
    };
    let last_ts = samples[samples.len() - 1].ts;

    let mut trips: Vec<TripInterval> = Vec::new();
    if stops.is_empty() {
        trips.push(span(first.ts, last_ts));
    } else {
        for pair in stops.windows(2) {
            trips.push(span(pair[0].stop, pair[1].start));
        }
        if first.ts < stops[0].start {
            trips.push(span(first.ts, stops[0].start));
        }
        if last_ts > stops[stops.len() - 1].stop {
            trips.push(span(stops[stops.len() - 1].stop, last_ts));
        }
        trips.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    let members = trips
        .iter()
        .map(|trip| {
            samples
                .iter()
                .enumerate()
                .filter(|(_, s)| s.ts >= trip.start && s.ts <= trip.stop)
                .map(|(i, _)| i)
                .collect()
        })
        .collect();
    (trips, members)
}

fn span(start: f64, stop: f64) -> TripInterval {
    TripInterval {
        start,
        stop,
        duration_s: stop - start,
    }
}
