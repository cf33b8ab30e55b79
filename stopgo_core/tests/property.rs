//! Property-based checks of the classifier invariants: interval coverage,
//! ordering, the stop duration floor, the merge fixed point, determinism
//! and permutation independence.

use proptest::prelude::*;
use stopgo_core::{Classification, ClassifierConfig, Sample, StopGoClassifier, normalise};

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Debug, Clone)]
enum Leg {
    /// seconds of 5 m/s straight movement
    Transit(usize),
    /// seconds of dwelling on a 1.3 m circle
    Dwell(usize),
    /// seconds of slow crawl (0.3 m/s), short enough to stay mergeable
    Crawl(usize),
}

fn leg_strategy() -> impl Strategy<Value = Leg> {
    prop_oneof![
        (50usize..100).prop_map(Leg::Transit),
        (25usize..110).prop_map(Leg::Dwell),
        (30usize..50).prop_map(Leg::Crawl),
    ]
}

fn trace_strategy() -> impl Strategy<Value = Vec<Sample>> {
    proptest::collection::vec(leg_strategy(), 2..7).prop_map(|legs| {
        let mut samples: Vec<Sample> = vec![Sample {
            ts: 0.0,
            x: 0.0,
            y: 0.0,
            motion_score: None,
        }];
        for leg in legs {
            match leg {
                Leg::Transit(n) => extend_linear(&mut samples, n, 5.0),
                Leg::Crawl(n) => extend_linear(&mut samples, n, 0.3),
                Leg::Dwell(n) => {
                    let cx = samples.last().map_or(0.0, |s| s.x) + 2.0;
                    for k in 0..n {
                        let ts = samples.last().map_or(0.0, |s| s.ts) + 1.0;
                        let angle = k as f64 * GOLDEN_ANGLE;
                        samples.push(Sample {
                            ts,
                            x: cx + 1.3 * angle.cos(),
                            y: 1.3 * angle.sin(),
                            motion_score: None,
                        });
                    }
                    // step clear of the circle so the next leg cannot
                    // collide with a dwell position
                    let ts = samples.last().map_or(0.0, |s| s.ts) + 1.0;
                    samples.push(Sample {
                        ts,
                        x: cx + 4.0,
                        y: 0.0,
                        motion_score: None,
                    });
                }
            }
        }
        samples
    })
}

fn extend_linear(samples: &mut Vec<Sample>, n: usize, speed: f64) {
    for _ in 0..n {
        let last = samples.last().copied().unwrap_or(Sample {
            ts: 0.0,
            x: 0.0,
            y: 0.0,
            motion_score: None,
        });
        samples.push(Sample {
            ts: last.ts + 1.0,
            x: last.x + speed,
            y: 0.0,
            motion_score: None,
        });
    }
}

fn run(samples: &[Sample]) -> Classification {
    StopGoClassifier::new(ClassifierConfig::default())
        .unwrap()
        .classify(samples)
}

/// Walked path length over the labelled samples between two timestamps;
/// mirrors the filter's independence measure.
fn path_length(result: &Classification, start: f64, stop: f64) -> f64 {
    let pts: Vec<(f64, f64)> = result
        .samples
        .iter()
        .filter(|s| s.ts >= start && s.ts <= stop)
        .map(|s| (s.x, s.y))
        .collect();
    pts.windows(2)
        .map(|p| (p[0].0 - p[1].0).hypot(p[0].1 - p[1].1))
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn intervals_cover_the_labelled_span_without_overlap(samples in trace_strategy()) {
        let result = run(&samples);
        prop_assert!(result.summary.success);
        if result.samples.is_empty() {
            return Ok(());
        }
        let first = result.samples[0].ts;
        let last = result.samples[result.samples.len() - 1].ts;

        let mut intervals: Vec<(f64, f64)> = result.stops.iter().map(|s| (s.start, s.stop)).collect();
        intervals.extend(result.trips.iter().map(|t| (t.start, t.stop)));
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));

        prop_assert!(!intervals.is_empty());
        prop_assert_eq!(intervals[0].0, first);
        prop_assert_eq!(intervals[intervals.len() - 1].1, last);
        for pair in intervals.windows(2) {
            // exact abutment: no gap, no overlap
            prop_assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn stops_are_ordered_and_above_the_duration_floor(samples in trace_strategy()) {
        let result = run(&samples);
        prop_assert!(result.summary.success);
        let floor = ClassifierConfig::default().stops.min_stop_interval_s;
        for stop in &result.stops {
            prop_assert!(stop.duration_s >= floor, "duration {} below floor", stop.duration_s);
            prop_assert!(stop.stop >= stop.start);
        }
        for pair in result.stops.windows(2) {
            prop_assert!(pair[0].stop <= pair[1].start, "stops overlap");
        }
    }

    #[test]
    fn adjacent_stops_never_violate_both_proximity_floors(samples in trace_strategy()) {
        let result = run(&samples);
        prop_assert!(result.summary.success);
        let cfg = ClassifierConfig::default().stops;
        for pair in result.stops.windows(2) {
            let time_gap = pair[1].start - pair[0].stop;
            let path = path_length(&result, pair[0].stop, pair[1].start);
            prop_assert!(
                time_gap >= cfg.min_time_between_stops_s
                    || path >= cfg.min_distance_between_stops_m,
                "merge fixed point violated: gap {time_gap}s, path {path}m"
            );
        }
    }

    #[test]
    fn classification_is_deterministic(samples in trace_strategy()) {
        let first = run(&samples);
        let second = run(&samples);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn shuffling_then_sorting_by_time_changes_nothing(samples in trace_strategy()) {
        let baseline = run(&samples);
        // deterministic shuffle: interleave the two halves, then restore
        let mut shuffled = Vec::with_capacity(samples.len());
        let mid = samples.len() / 2;
        for i in 0..mid {
            shuffled.push(samples[mid + i]);
            shuffled.push(samples[i]);
        }
        shuffled.extend_from_slice(&samples[2 * mid..]);
        shuffled.sort_by(|a, b| a.ts.total_cmp(&b.ts));
        let resorted = run(&shuffled);
        prop_assert_eq!(baseline, resorted);
    }

    #[test]
    fn normaliser_is_monotone_and_pinned(
        lower in -100.0f64..100.0,
        width_t in 0.5f64..50.0,
        width_u in 0.5f64..50.0,
        probe in -200.0f64..200.0,
    ) {
        let threshold = lower + width_t;
        let upper = threshold + width_u;
        prop_assert_eq!(normalise::normalised_score_at(lower, lower, upper, threshold), -1.0);
        prop_assert_eq!(normalise::normalised_score_at(upper, lower, upper, threshold), 1.0);
        prop_assert_eq!(normalise::normalised_score_at(threshold, lower, upper, threshold), 0.0);
        let score = normalise::normalised_score_at(probe, lower, upper, threshold);
        prop_assert!((-1.0..=1.0).contains(&score));
        let nudged = normalise::normalised_score_at(probe + 0.25, lower, upper, threshold);
        prop_assert!(nudged >= score, "not monotone: {score} then {nudged}");
    }
}
