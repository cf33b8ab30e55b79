//! Runtime configuration for the classifier.
//!
//! One immutable value carries every threshold. Defaults follow the
//! published calibration of the detection methods; all of them can be
//! overridden per call. These are separate from the TOML-deserialized
//! schema in `stopgo_config`.

use crate::error::ClassifierError;

/// Stop-interval filtering and merge thresholds (seconds / metres).
#[derive(Debug, Clone, PartialEq)]
pub struct StopFilterCfg {
    /// Stops shorter than this are discarded.
    pub min_stop_interval_s: f64,
    /// Duration at/above which a stop counts as strongly independent.
    pub relevant_stop_duration_s: f64,
    /// Neighbour path length below which stops are merge candidates.
    pub min_distance_between_stops_m: f64,
    /// Neighbour distance at/above which a stop is clearly independent.
    pub relevant_distance_between_stops_m: f64,
    /// Temporal proximity below which stops are merge candidates.
    pub min_time_between_stops_s: f64,
    /// Temporal gap considered clearly independent.
    pub relevant_time_between_stops_s: f64,
    /// Hard upper bound: never merge across a larger gap.
    pub max_time_between_stops_for_merge_s: f64,
}

impl Default for StopFilterCfg {
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

/// Accelerometer motion score (method 1). Automatically disabled for a
/// trace that carries no motion data at all.
#[derive(Debug, Clone, PartialEq)]
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

/// Shared shape of the four windowed detection methods (2-5): a centred
/// window plus normaliser cutoffs and a fusion weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMethodCfg {
    pub enabled: bool,
    pub window_size: usize,
    pub lower_cutoff: f64,
    pub threshold: f64,
    pub upper_cutoff: f64,
    pub weight: f64,
}

impl WindowMethodCfg {
    /// Method 2, rectangle-distance ratio. The lower cutoff is pinned at
    /// 1.0: a straight path has ratio ~1 by construction.
    pub fn rectangle_distance_defaults() -> Self {
        Self {
            enabled: true,
            window_size: 23,
            lower_cutoff: 1.0,
            threshold: 1.95,
            upper_cutoff: 2.875,
            weight: 0.735,
        }
    }

    /// Method 3, bearing analysis (degrees of deviation).
    pub fn bearing_defaults() -> Self {
        Self {
            enabled: true,
            window_size: 15,
            lower_cutoff: 31.0,
            threshold: 41.0,
            upper_cutoff: 82.0,
            weight: 1.2,
        }
    }

    /// Method 4, start-end distance analysis (metres).
    pub fn start_end_distance_defaults() -> Self {
        Self {
            enabled: true,
            window_size: 14,
            lower_cutoff: 19.0,
            threshold: 95.0,
            upper_cutoff: 262.0,
            weight: 1.125,
        }
    }

    /// Method 5, intersecting segments (count per window).
    pub fn intersecting_segments_defaults() -> Self {
        Self {
            enabled: true,
            window_size: 19,
            lower_cutoff: 0.0,
            threshold: 0.75,
            upper_cutoff: 4.0,
            weight: 0.43,
        }
    }
}

/// Missing-data analysis (method 6): gap threshold plus speed cutoffs in
/// km/h.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingDataCfg {
    pub enabled: bool,
    /// Time gap (seconds) at/above which a pair of samples counts as a
    /// data gap worth scoring.
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

/// The complete, immutable classifier configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub stops: StopFilterCfg,
    pub motion: MotionScoreCfg,
    pub rectangle_distance: WindowMethodCfg,
    pub bearing: WindowMethodCfg,
    pub start_end_distance: WindowMethodCfg,
    pub intersecting_segments: WindowMethodCfg,
    pub missing_data: MissingDataCfg,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            stops: StopFilterCfg::default(),
            motion: MotionScoreCfg::default(),
            rectangle_distance: WindowMethodCfg::rectangle_distance_defaults(),
            bearing: WindowMethodCfg::bearing_defaults(),
            start_end_distance: WindowMethodCfg::start_end_distance_defaults(),
            intersecting_segments: WindowMethodCfg::intersecting_segments_defaults(),
            missing_data: MissingDataCfg::default(),
        }
    }
}

/// Window sizes outside this range cannot describe any reasonable trace.
const WINDOW_RANGE: std::ops::RangeInclusive<usize> = 3..=9999;

impl ClassifierConfig {
    /// Largest window among the enabled windowed methods; the trace must
    /// have at least this many unique samples.
    pub fn max_window_size(&self) -> usize {
        self.windowed_methods()
            .iter()
            .filter(|(m, _)| m.enabled)
            .map(|(m, _)| m.window_size)
            .max()
            .unwrap_or(0)
    }

    fn windowed_methods(&self) -> [(&WindowMethodCfg, &'static str); 4] {
        [
            (&self.rectangle_distance, "rectangle_distance"),
            (&self.bearing, "bearing"),
            (&self.start_end_distance, "start_end_distance"),
            (&self.intersecting_segments, "intersecting_segments"),
        ]
    }

    /// Validate every threshold relation the pipeline divides or compares
    /// by. Returns the first violation.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if !(self.rectangle_distance.enabled || self.bearing.enabled || self.start_end_distance.enabled)
        {
            return Err(ClassifierError::InvalidConfig(
                "at least one of rectangle_distance, bearing, start_end_distance must be enabled",
            ));
        }
        for (method, name) in self.windowed_methods() {
            if !method.enabled {
                continue;
            }
            if !WINDOW_RANGE.contains(&method.window_size) {
                return Err(ClassifierError::InvalidConfig(window_size_message(name)));
            }
            if !(method.lower_cutoff < method.threshold && method.threshold < method.upper_cutoff) {
                return Err(ClassifierError::InvalidConfig(cutoff_order_message(name)));
            }
            if method.weight <= 0.0 || !method.weight.is_finite() {
                return Err(ClassifierError::InvalidConfig(weight_message(name)));
            }
        }
        if self.motion.enabled
            && !(self.motion.lower_cutoff < self.motion.threshold
                && self.motion.threshold < self.motion.upper_cutoff)
        {
            return Err(ClassifierError::InvalidConfig(
                "motion_score cutoffs must satisfy lower < threshold < upper",
            ));
        }
        if self.missing_data.enabled {
            if !(self.missing_data.lower_cutoff < self.missing_data.threshold
                && self.missing_data.threshold < self.missing_data.upper_cutoff)
            {
                return Err(ClassifierError::InvalidConfig(
                    "missing_data cutoffs must satisfy lower < threshold < upper",
                ));
            }
            if self.missing_data.min_gap_s <= 0.0 {
                return Err(ClassifierError::InvalidConfig(
                    "missing_data.min_gap_s must be > 0",
                ));
            }
        }
        let s = &self.stops;
        if s.min_stop_interval_s <= 0.0 {
            return Err(ClassifierError::InvalidConfig(
                "stops.min_stop_interval_s must be > 0",
            ));
        }
        if s.min_stop_interval_s >= s.relevant_stop_duration_s {
            return Err(ClassifierError::InvalidConfig(
                "stops.min_stop_interval_s must be below relevant_stop_duration_s",
            ));
        }
        if s.min_distance_between_stops_m >= s.relevant_distance_between_stops_m {
            return Err(ClassifierError::InvalidConfig(
                "stops.min_distance_between_stops_m must be below relevant_distance_between_stops_m",
            ));
        }
        if s.min_time_between_stops_s >= s.relevant_time_between_stops_s {
            return Err(ClassifierError::InvalidConfig(
                "stops.min_time_between_stops_s must be below relevant_time_between_stops_s",
            ));
        }
        if s.max_time_between_stops_for_merge_s <= 0.0 {
            return Err(ClassifierError::InvalidConfig(
                "stops.max_time_between_stops_for_merge_s must be > 0",
            ));
        }
        Ok(())
    }
}

fn window_size_message(method: &'static str) -> &'static str {
    match method {
        "rectangle_distance" => "rectangle_distance.window_size out of range (3..=9999)",
        "bearing" => "bearing.window_size out of range (3..=9999)",
        "start_end_distance" => "start_end_distance.window_size out of range (3..=9999)",
        _ => "intersecting_segments.window_size out of range (3..=9999)",
    }
}

fn cutoff_order_message(method: &'static str) -> &'static str {
    match method {
        "rectangle_distance" => "rectangle_distance cutoffs must satisfy lower < threshold < upper",
        "bearing" => "bearing cutoffs must satisfy lower < threshold < upper",
        "start_end_distance" => {
            "start_end_distance cutoffs must satisfy lower < threshold < upper"
        }
        _ => "intersecting_segments cutoffs must satisfy lower < threshold < upper",
    }
}

fn weight_message(method: &'static str) -> &'static str {
    match method {
        "rectangle_distance" => "rectangle_distance.weight must be a positive finite number",
        "bearing" => "bearing.weight must be a positive finite number",
        "start_end_distance" => "start_end_distance.weight must be a positive finite number",
        _ => "intersecting_segments.weight must be a positive finite number",
    }
}
