//! The `classify` command: load a trace, run the pipeline, emit results.

use std::path::Path;

use serde_json::json;
use stopgo_config::{Config, load_trace_csv};
use stopgo_core::{
    Classification, ClassifierConfig, MissingDataCfg, MotionScoreCfg, Sample, StopFilterCfg,
    StopGoClassifier, WindowMethodCfg,
};

/// Map the TOML schema onto the core's runtime configuration.
pub fn core_config(cfg: &Config) -> ClassifierConfig {
    let window = |enabled: bool,
                  window_size: usize,
                  lower_cutoff: f64,
                  threshold: f64,
                  upper_cutoff: f64,
                  weight: f64| WindowMethodCfg {
        enabled,
        window_size,
        lower_cutoff,
        threshold,
        upper_cutoff,
        weight,
    };
    ClassifierConfig {
        stops: StopFilterCfg {
            min_stop_interval_s: cfg.stops.min_stop_interval_s,
            relevant_stop_duration_s: cfg.stops.relevant_stop_duration_s,
            min_distance_between_stops_m: cfg.stops.min_distance_between_stops_m,
            relevant_distance_between_stops_m: cfg.stops.relevant_distance_between_stops_m,
            min_time_between_stops_s: cfg.stops.min_time_between_stops_s,
            relevant_time_between_stops_s: cfg.stops.relevant_time_between_stops_s,
            max_time_between_stops_for_merge_s: cfg.stops.max_time_between_stops_for_merge_s,
        },
        motion: MotionScoreCfg {
            enabled: cfg.motion_score.enabled,
            lower_cutoff: cfg.motion_score.lower_cutoff,
            threshold: cfg.motion_score.threshold,
            upper_cutoff: cfg.motion_score.upper_cutoff,
        },
        rectangle_distance: window(
            cfg.rectangle_distance.enabled,
            cfg.rectangle_distance.window_size,
            cfg.rectangle_distance.lower_cutoff,
            cfg.rectangle_distance.threshold,
            cfg.rectangle_distance.upper_cutoff,
            cfg.rectangle_distance.weight,
        ),
        bearing: window(
            cfg.bearing.enabled,
            cfg.bearing.window_size,
            cfg.bearing.lower_cutoff,
            cfg.bearing.threshold,
            cfg.bearing.upper_cutoff,
            cfg.bearing.weight,
        ),
        start_end_distance: window(
            cfg.start_end_distance.enabled,
            cfg.start_end_distance.window_size,
            cfg.start_end_distance.lower_cutoff,
            cfg.start_end_distance.threshold,
            cfg.start_end_distance.upper_cutoff,
            cfg.start_end_distance.weight,
        ),
        intersecting_segments: window(
            cfg.intersecting_segments.enabled,
            cfg.intersecting_segments.window_size,
            cfg.intersecting_segments.lower_cutoff,
            cfg.intersecting_segments.threshold,
            cfg.intersecting_segments.upper_cutoff,
            cfg.intersecting_segments.weight,
        ),
        missing_data: MissingDataCfg {
            enabled: cfg.missing_data.enabled,
            min_gap_s: cfg.missing_data.min_gap_s,
            lower_cutoff: cfg.missing_data.lower_cutoff,
            threshold: cfg.missing_data.threshold,
            upper_cutoff: cfg.missing_data.upper_cutoff,
        },
    }
}

pub fn run(cfg: &Config, trace_path: &Path, json: bool, stops_only: bool) -> eyre::Result<()> {
    let rows = load_trace_csv(trace_path)?;
    tracing::info!(rows = rows.len(), path = %trace_path.display(), "trace loaded");
    let samples: Vec<Sample> = rows
        .iter()
        .map(|r| Sample {
            ts: r.ts,
            x: r.x,
            y: r.y,
            motion_score: r.motion_score,
        })
        .collect();

    let classifier = StopGoClassifier::new(core_config(cfg))?;
    let result = classifier.try_classify(&samples)?;
    tracing::info!(
        stops = result.summary.total_stops,
        trips = result.summary.total_trips,
        points = result.summary.total_points,
        "classification finished"
    );

    if json {
        emit_json(&result, stops_only);
    } else {
        emit_human(&result, stops_only);
    }
    Ok(())
}

fn emit_json(result: &Classification, stops_only: bool) {
    for stop in &result.stops {
        println!(
            "{}",
            json!({
                "event": "stop",
                "start": stop.start,
                "stop": stop.stop,
                "duration_s": stop.duration_s,
                "x": stop.cx,
                "y": stop.cy,
            })
        );
    }
    if !stops_only {
        for trip in &result.trips {
            println!(
                "{}",
                json!({
                    "event": "trip",
                    "start": trip.start,
                    "stop": trip.stop,
                    "duration_s": trip.duration_s,
                })
            );
        }
    }
    println!(
        "{}",
        json!({
            "event": "summary",
            "total_points": result.summary.total_points,
            "total_stops": result.summary.total_stops,
            "total_trips": result.summary.total_trips,
            "success": result.summary.success,
        })
    );
}

fn emit_human(result: &Classification, stops_only: bool) {
    if result.stops.is_empty() {
        println!("no stops detected");
    }
    for (i, stop) in result.stops.iter().enumerate() {
        println!(
            "stop {:>3}  {:>12.1} .. {:<12.1} {:>7.1}s  at ({:.1}, {:.1})",
            i, stop.start, stop.stop, stop.duration_s, stop.cx, stop.cy
        );
    }
    if !stops_only {
        for (i, trip) in result.trips.iter().enumerate() {
            println!(
                "trip {:>3}  {:>12.1} .. {:<12.1} {:>7.1}s",
                i, trip.start, trip.stop, trip.duration_s
            );
        }
    }
    println!(
        "{} points, {} stops, {} trips",
        result.summary.total_points, result.summary.total_stops, result.summary.total_trips
    );
}
