#![no_main]
use libfuzzer_sys::fuzz_target;
use stopgo_core::{ClassifierConfig, Sample, classify};

// The classifier must never panic on arbitrary sample data: NaN and
// infinite coordinates, unordered timestamps, duplicates. Validation
// failures land in the summary, everything else must classify.
fuzz_target!(|rows: Vec<(f64, f64, f64, Option<f64>)>| {
    let samples: Vec<Sample> = rows
        .into_iter()
        .take(2000)
        .map(|(ts, x, y, motion_score)| Sample {
            ts,
            x,
            y,
            motion_score,
        })
        .collect();
    let result = classify(&samples, ClassifierConfig::default());
    // summary totals must stay consistent with the returned lists
    assert_eq!(result.summary.total_stops, result.stops.len());
    assert_eq!(result.summary.total_trips, result.trips.len());
});
