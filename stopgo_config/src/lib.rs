#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and trace parsing for the stop/go classification tools.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated;
//!   every key is optional and falls back to the published defaults.
//! - The trace CSV loader enforces a strict header and monotone
//!   timestamps, accepting epoch seconds or RFC 3339 in the `ts` column.

use serde::Deserialize;

/// Stop filtering and merge thresholds (`[stops]`).
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct StopsCfg {
    pub min_stop_interval_s: f64,
    pub relevant_stop_duration_s: f64,
    pub min_distance_between_stops_m: f64,
    pub relevant_distance_between_stops_m: f64,
    pub min_time_between_stops_s: f64,
    pub relevant_time_between_stops_s: f64,
    pub max_time_between_stops_for_merge_s: f64,
}

impl Default for StopsCfg {
    fn default() -> Self {
        Self {
            min_stop_interval_s: 63.0,
            relevant_stop_duration_s: 178.0,
            min_distance_between_stops_m: 37.0,
            relevant_distance_between_stops_m: 165.0,
            min_time_between_stops_s: 69.0,
            relevant_time_between_stops_s: 131.0,
            max_time_between_stops_for_merge_s: 175.0,
        }
    }
}

/// Accelerometer motion scoring (`[motion_score]`).
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct MotionScoreCfg {
    pub enabled: bool,
    pub lower_cutoff: f64,
    pub threshold: f64,
    pub upper_cutoff: f64,
}

impl Default for MotionScoreCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            lower_cutoff: 0.29,
            threshold: 1.30,
            upper_cutoff: 3.00,
        }
    }
}

/// Shared schema of the four windowed methods. Defaults differ per
/// section, so each gets its own `Default`-providing wrapper below.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct WindowMethodCfg {
    pub enabled: bool,
    pub window_size: usize,
    pub lower_cutoff: f64,
    pub threshold: f64,
    pub upper_cutoff: f64,
    pub weight: f64,
}

macro_rules! window_method_section {
    ($name:ident, $enabled:expr, $window:expr, $lower:expr, $threshold:expr, $upper:expr, $weight:expr) => {
        #[derive(Debug, Deserialize, Clone, Copy)]
        #[serde(default)]
        pub struct $name {
            pub enabled: bool,
            pub window_size: usize,
            pub lower_cutoff: f64,
            pub threshold: f64,
            pub upper_cutoff: f64,
            pub weight: f64,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    enabled: $enabled,
                    window_size: $window,
                    lower_cutoff: $lower,
                    threshold: $threshold,
                    upper_cutoff: $upper,
                    weight: $weight,
                }
            }
        }

        impl From<$name> for WindowMethodCfg {
            fn from(cfg: $name) -> Self {
                Self {
                    enabled: cfg.enabled,
                    window_size: cfg.window_size,
                    lower_cutoff: cfg.lower_cutoff,
                    threshold: cfg.threshold,
                    upper_cutoff: cfg.upper_cutoff,
                    weight: cfg.weight,
                }
            }
        }
    };
}

window_method_section!(RectangleDistanceCfg, true, 23, 1.0, 1.95, 2.875, 0.735);
window_method_section!(BearingCfg, true, 15, 31.0, 41.0, 82.0, 1.2);
window_method_section!(StartEndDistanceCfg, true, 14, 19.0, 95.0, 262.0, 1.125);
window_method_section!(IntersectingSegmentsCfg, true, 19, 0.0, 0.75, 4.0, 0.43);

/// Missing-data analysis (`[missing_data]`); cutoffs are km/h.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct MissingDataCfg {
    pub enabled: bool,
    pub min_gap_s: f64,
    pub lower_cutoff: f64,
    pub threshold: f64,
    pub upper_cutoff: f64,
}

impl Default for MissingDataCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            min_gap_s: 53.0,
            lower_cutoff: 0.39,
            threshold: 1.4,
            upper_cutoff: 26.0,
        }
    }
}

/// Logging sinks (`[logging]`), consumed by the CLI.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    /// Path to a .log file (JSON lines).
    pub file: Option<String>,
    /// "error" | "warn" | "info" | "debug" | "trace"
    pub level: Option<String>,
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never).
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub stops: StopsCfg,
    pub motion_score: MotionScoreCfg,
    pub rectangle_distance: RectangleDistanceCfg,
    pub bearing: BearingCfg,
    pub start_end_distance: StartEndDistanceCfg,
    pub intersecting_segments: IntersectingSegmentsCfg,
    pub missing_data: MissingDataCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    /// Mirror of the core's validation so the CLI can reject a bad file
    /// before reading any trace data.
    pub fn validate(&self) -> eyre::Result<()> {
        if !(self.rectangle_distance.enabled || self.bearing.enabled || self.start_end_distance.enabled)
        {
            eyre::bail!(
                "at least one of rectangle_distance, bearing, start_end_distance must be enabled"
            );
        }
        let windowed: [(&str, WindowMethodCfg); 4] = [
            ("rectangle_distance", self.rectangle_distance.into()),
            ("bearing", self.bearing.into()),
            ("start_end_distance", self.start_end_distance.into()),
            ("intersecting_segments", self.intersecting_segments.into()),
        ];
        for (name, method) in windowed {
            if !method.enabled {
                continue;
            }
            if !(3..=9999).contains(&method.window_size) {
                eyre::bail!("{name}.window_size must be in 3..=9999");
            }
            if !(method.lower_cutoff < method.threshold && method.threshold < method.upper_cutoff) {
                eyre::bail!("{name} cutoffs must satisfy lower < threshold < upper");
            }
            if method.weight <= 0.0 || !method.weight.is_finite() {
                eyre::bail!("{name}.weight must be a positive finite number");
            }
        }
        if self.motion_score.enabled
            && !(self.motion_score.lower_cutoff < self.motion_score.threshold
                && self.motion_score.threshold < self.motion_score.upper_cutoff)
        {
            eyre::bail!("motion_score cutoffs must satisfy lower < threshold < upper");
        }
        if self.missing_data.enabled {
            if !(self.missing_data.lower_cutoff < self.missing_data.threshold
                && self.missing_data.threshold < self.missing_data.upper_cutoff)
            {
                eyre::bail!("missing_data cutoffs must satisfy lower < threshold < upper");
            }
            if self.missing_data.min_gap_s <= 0.0 {
                eyre::bail!("missing_data.min_gap_s must be > 0");
            }
        }
        if self.stops.min_stop_interval_s <= 0.0 {
            eyre::bail!("stops.min_stop_interval_s must be > 0");
        }
        if self.stops.min_stop_interval_s >= self.stops.relevant_stop_duration_s {
            eyre::bail!("stops.min_stop_interval_s must be below relevant_stop_duration_s");
        }
        if self.stops.min_distance_between_stops_m >= self.stops.relevant_distance_between_stops_m {
            eyre::bail!(
                "stops.min_distance_between_stops_m must be below relevant_distance_between_stops_m"
            );
        }
        if self.stops.min_time_between_stops_s >= self.stops.relevant_time_between_stops_s {
            eyre::bail!("stops.min_time_between_stops_s must be below relevant_time_between_stops_s");
        }
        if self.stops.max_time_between_stops_for_merge_s <= 0.0 {
            eyre::bail!("stops.max_time_between_stops_for_merge_s must be > 0");
        }
        Ok(())
    }
}

/// Trace CSV schema.
///
/// Expected headers:
/// ts,x,y  or  ts,x,y,motion_score
///
/// Example:
/// ts,x,y,motion_score
/// 2024-05-01T08:30:00Z,1041.2,-220.8,0.4
/// 1714552201,1043.9,-219.1,
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRow {
    /// Wall-clock seconds.
    pub ts: f64,
    pub x: f64,
    pub y: f64,
    pub motion_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawTraceRow {
    ts: String,
    x: f64,
    y: f64,
    #[serde(default)]
    motion_score: Option<f64>,
}

/// Parse a timestamp cell: epoch seconds (integer or fractional) or an
/// RFC 3339 datetime.
pub fn parse_timestamp(cell: &str) -> eyre::Result<f64> {
    if let Ok(seconds) = cell.parse::<f64>() {
        if !seconds.is_finite() {
            eyre::bail!("timestamp {cell:?} is not finite");
        }
        return Ok(seconds);
    }
    let parsed = chrono::DateTime::parse_from_rfc3339(cell)
        .map_err(|e| eyre::eyre!("timestamp {cell:?} is neither epoch seconds nor RFC 3339: {e}"))?;
    Ok(parsed.timestamp() as f64 + f64::from(parsed.timestamp_subsec_nanos()) / 1e9)
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace {path:?}: {e}"))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read trace headers: {e}"))?;
    let fields: Vec<&str> = headers.iter().collect();
    if fields != ["ts", "x", "y"] && fields != ["ts", "x", "y", "motion_score"] {
        eyre::bail!("trace CSV must have headers 'ts,x,y' or 'ts,x,y,motion_score'");
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<RawTraceRow>().enumerate() {
        // header occupies line 1
        let line = idx + 2;
        let raw = record.map_err(|e| eyre::eyre!("trace line {line}: {e}"))?;
        let ts = parse_timestamp(&raw.ts).map_err(|e| eyre::eyre!("trace line {line}: {e}"))?;
        if let Some(prev) = rows.last().map(|r: &TraceRow| r.ts)
            && ts < prev
        {
            eyre::bail!("trace line {line}: timestamps must be non-decreasing ({ts} after {prev})");
        }
        rows.push(TraceRow {
            ts,
            x: raw.x,
            y: raw.y,
            motion_score: raw.motion_score,
        });
    }
    Ok(rows)
}
