//! Quick Start Example
//!
//! Classifies a small synthetic trace: a straight transit, a five-minute
//! dwell, and a second transit. Run with
//! `cargo run --example quick_start -p stopgo_core`.

use stopgo_core::{ClassifierConfig, Sample, StopGoClassifier};

fn main() -> Result<(), eyre::Report> {
    let mut samples = Vec::new();
    // transit: 2 minutes at 5 m/s
    for i in 0..120 {
        samples.push(Sample {
            ts: f64::from(i),
            x: f64::from(i) * 5.0,
            y: 0.0,
            motion_score: None,
        });
    }
    // dwell: 5 minutes scattered around (610, 0)
    for k in 0..300 {
        let angle = f64::from(k) * 2.399_963;
        samples.push(Sample {
            ts: 120.0 + f64::from(k),
            x: 610.0 + 1.5 * angle.cos(),
            y: 1.5 * angle.sin(),
            motion_score: None,
        });
    }
    // transit onward
    for i in 0..120 {
        samples.push(Sample {
            ts: 420.0 + f64::from(i),
            x: 620.0 + f64::from(i) * 5.0,
            y: 0.0,
            motion_score: None,
        });
    }

    let classifier = StopGoClassifier::new(ClassifierConfig::default())?;
    let result = classifier.classify(&samples);

    println!(
        "classified {} samples: {} stops, {} trips",
        result.summary.total_points, result.summary.total_stops, result.summary.total_trips
    );
    for stop in &result.stops {
        println!(
            "stop  {:7.1}s .. {:7.1}s ({:5.1}s) at ({:.1}, {:.1})",
            stop.start, stop.stop, stop.duration_s, stop.cx, stop.cy
        );
    }
    for trip in &result.trips {
        println!(
            "trip  {:7.1}s .. {:7.1}s ({:5.1}s)",
            trip.start, trip.stop, trip.duration_s
        );
    }
    Ok(())
}
