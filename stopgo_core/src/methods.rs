//! The six stop-evidence detectors.
//!
//! Methods 2-5 slide a centred window over the samples surrounding the
//! uncertain ones; method 1 scores accelerometer motion directly and
//! method 6 scores time gaps between consecutive uncertain samples. Every
//! score lands in `[-1, +1]` with positive meaning stop.

use crate::config::{ClassifierConfig, MissingDataCfg, MotionScoreCfg, WindowMethodCfg};
use crate::geometry;
use crate::normalise::normalised_score_at;
use crate::trace::Trace;

/// Per-sample score vectors over the full trace; `None` marks a score a
/// method could not produce (disabled, boundary window, certain sample).
#[derive(Debug, Clone)]
pub(crate) struct SampleScores {
    /// Normalised motion score; present wherever the raw channel was.
    pub motion: Vec<Option<f64>>,
    /// False only where method 1 asserts a certain stop.
    pub uncertain: Vec<bool>,
    pub rectangle_distance: Vec<Option<f64>>,
    pub bearing: Vec<Option<f64>>,
    pub start_end_distance: Vec<Option<f64>>,
    pub intersecting_segments: Vec<Option<f64>>,
    /// Weighted fusion of methods 2-5.
    pub fused: Vec<Option<f64>>,
    pub missing_data: Vec<Option<f64>>,
}

/// Centred window bounds for the label at `i`: the window of width `w`
/// ends at `i + (w-1)/2` (even widths reach one row further left than
/// right) and is truncated to the sequence. Inclusive bounds.
fn centred_window(i: usize, w: usize, len: usize) -> (usize, usize) {
    let end_unclamped = i as i64 + ((w - 1) / 2) as i64;
    let end = end_unclamped.min(len as i64 - 1);
    let start = (end_unclamped - w as i64 + 1).max(0);
    (start as usize, end as usize)
}

/// Method 1: normalised motion score. Low raw motion is stop evidence, so
/// the sign of the shared normaliser is flipped.
fn motion_score(raw: f64, cfg: &MotionScoreCfg) -> f64 {
    -normalised_score_at(raw, cfg.lower_cutoff, cfg.upper_cutoff, cfg.threshold)
}

/// Method 2: rectangle-distance ratio. Path length over the window divided
/// by the hull diameter; a dense cluster walks far while spanning little.
fn run_rectangle_distance(
    cfg: &WindowMethodCfg,
    pts: &[(f64, f64)],
    dist_next: &[Option<f64>],
) -> Vec<Option<f64>> {
    let m = pts.len();
    let w = cfg.window_size;
    let mut out = vec![None; m];
    for (i, slot) in out.iter_mut().enumerate() {
        let (start, end) = centred_window(i, w, m);
        if end + 1 - start < w {
            continue;
        }
        let window = &dist_next[start..=end];
        if window.iter().any(Option::is_none) {
            continue;
        }
        let path: f64 = window.iter().flatten().sum();
        let window_pts = &pts[start..=end];
        let diameter = match geometry::convex_hull(window_pts) {
            Some(hull) => geometry::max_pairwise_distance(&hull),
            // Collinear window: the span between its endpoints stands in
            // for the hull diameter.
            None => geometry::euclidean(window_pts[0], window_pts[w - 1]),
        };
        let ratio = path / diameter;
        *slot = Some(normalised_score_at(
            ratio,
            cfg.lower_cutoff,
            cfg.upper_cutoff,
            cfg.threshold,
        ));
    }
    out
}

/// Method 3: bearing analysis. Trimmed mean (single min and max removed)
/// of the window's bearing deviations; undefined deviations sort last and
/// take the place of the maximum when present.
fn run_bearing(cfg: &WindowMethodCfg, bearings: &[Option<f64>]) -> Vec<Option<f64>> {
    let m = bearings.len();
    let w = cfg.window_size;
    let min_periods = w - 1;
    let mut out = vec![None; m];
    let mut sorted: Vec<Option<f64>> = Vec::with_capacity(w);
    for (i, slot) in out.iter_mut().enumerate() {
        let (start, end) = centred_window(i, w, m);
        let window = &bearings[start..=end];
        if window.iter().flatten().count() < min_periods {
            continue;
        }
        sorted.clear();
        sorted.extend_from_slice(window);
        sorted.sort_by(|a, b| match (a, b) {
            (Some(x), Some(y)) => x.total_cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        let middle = &sorted[1..sorted.len() - 1];
        if middle.is_empty() || middle.iter().any(Option::is_none) {
            continue;
        }
        let mean = middle.iter().flatten().sum::<f64>() / middle.len() as f64;
        *slot = Some(normalised_score_at(
            mean,
            cfg.lower_cutoff,
            cfg.upper_cutoff,
            cfg.threshold,
        ));
    }
    out
}

/// Method 4: start-end distance. Distance between the averaged first two
/// and averaged last two window points; far apart means movement, so the
/// score is negated.
fn run_start_end_distance(
    cfg: &WindowMethodCfg,
    pts: &[(f64, f64)],
    dist_next: &[Option<f64>],
) -> Vec<Option<f64>> {
    let m = pts.len();
    let w = cfg.window_size;
    let mut out = vec![None; m];
    for (i, slot) in out.iter_mut().enumerate() {
        let (start, end) = centred_window(i, w, m);
        if end + 1 - start < w {
            continue;
        }
        if dist_next[start..=end].iter().any(Option::is_none) {
            continue;
        }
        let p = &pts[start..=end];
        let head = ((p[0].0 + p[1].0) / 2.0, (p[0].1 + p[1].1) / 2.0);
        let tail = (
            (p[w - 2].0 + p[w - 1].0) / 2.0,
            (p[w - 2].1 + p[w - 1].1) / 2.0,
        );
        let distance = geometry::euclidean(head, tail);
        *slot = Some(-normalised_score_at(
            distance,
            cfg.lower_cutoff,
            cfg.upper_cutoff,
            cfg.threshold,
        ));
    }
    out
}

/// Method 5: intersecting segments. Counts proper self-intersections among
/// the window's consecutive segments, excluding each segment's immediate
/// neighbour.
fn run_intersecting_segments(cfg: &WindowMethodCfg, pts: &[(f64, f64)]) -> Vec<Option<f64>> {
    let m = pts.len();
    let w = cfg.window_size;
    let mut out = vec![None; m];
    if m < 2 {
        return out;
    }
    let seg_count = m - 1;
    // Banded matrix: band[i][k] says whether segment i intersects segment
    // i + 2 + k. Only the window-reachable band is materialised.
    let band: Vec<Vec<bool>> = (0..seg_count)
        .map(|i| {
            ((i + 2)..(i + w).min(seg_count))
                .map(|j| geometry::segments_intersect(pts[i], pts[i + 1], pts[j], pts[j + 1]))
                .collect()
        })
        .collect();
    for (i, slot) in out.iter_mut().enumerate() {
        let (start, end) = centred_window(i, w, m);
        if end + 1 - start < w {
            continue;
        }
        let mut intersections = 0usize;
        for (row, hits) in band.iter().enumerate().take(end).skip(start) {
            for (k, &hit) in hits.iter().enumerate() {
                if row + 2 + k >= end {
                    break;
                }
                if hit {
                    intersections += 1;
                }
            }
        }
        *slot = Some(normalised_score_at(
            intersections as f64,
            cfg.lower_cutoff,
            cfg.upper_cutoff,
            cfg.threshold,
        ));
    }
    out
}

/// Method 6: missing-data analysis over consecutive *uncertain* samples.
/// A long gap crossed at walking-or-below speed is stop evidence; the
/// score attaches to the sample before the gap.
fn run_missing_data(trace: &Trace, uncertain: &[bool], cfg: &MissingDataCfg) -> Vec<Option<f64>> {
    let mut out = vec![None; trace.len()];
    let positions: Vec<usize> = (0..trace.len()).filter(|&i| uncertain[i]).collect();
    for pair in positions.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let gap = trace.ts[b] - trace.ts[a];
        if gap < cfg.min_gap_s || gap <= 0.0 {
            continue;
        }
        let speed_kmh = geometry::euclidean(trace.point(a), trace.point(b)) / gap * 3.6;
        out[a] = Some(-normalised_score_at(
            speed_kmh,
            cfg.lower_cutoff,
            cfg.upper_cutoff,
            cfg.threshold,
        ));
    }
    out
}

/// Run every enabled method over the trace and fuse methods 2-5.
pub(crate) fn score_samples(trace: &Trace, cfg: &ClassifierConfig) -> SampleScores {
    let n = trace.len();
    let mut motion = vec![None; n];
    let mut uncertain = vec![true; n];
    if cfg.motion.enabled {
        for i in 0..n {
            if let Some(raw) = trace.motion[i] {
                let score = motion_score(raw, &cfg.motion);
                if score == 1.0 {
                    uncertain[i] = false;
                }
                motion[i] = Some(score);
            }
        }
    }
    tracing::debug!(
        total = n,
        uncertain = uncertain.iter().filter(|u| **u).count(),
        "motion scoring done"
    );

    // The windowed methods need context around every uncertain sample:
    // everything within half the largest window participates.
    let half = (cfg.max_window_size() / 2) as i64;
    let mut relevant = vec![false; n];
    for i in 0..n {
        if uncertain[i] {
            let lo = (i as i64 - half).max(0) as usize;
            let hi = ((i as i64 + half).min(n as i64)) as usize;
            for slot in &mut relevant[lo..hi] {
                *slot = true;
            }
        }
    }
    let positions: Vec<usize> = (0..n).filter(|&i| relevant[i]).collect();

    // Compacted view for the window scans. Attribute values stay the ones
    // derived on the full trace; only the window adjacency is compacted.
    let pts: Vec<(f64, f64)> = positions.iter().map(|&p| trace.point(p)).collect();
    let dist_next: Vec<Option<f64>> = positions.iter().map(|&p| trace.dist_next[p]).collect();
    let bearings: Vec<Option<f64>> = positions.iter().map(|&p| trace.bearing[p]).collect();
    let m = positions.len();

    let rdr_c = if cfg.rectangle_distance.enabled {
        run_rectangle_distance(&cfg.rectangle_distance, &pts, &dist_next)
    } else {
        vec![None; m]
    };
    let ba_c = if cfg.bearing.enabled {
        run_bearing(&cfg.bearing, &bearings)
    } else {
        vec![None; m]
    };
    let seda_c = if cfg.start_end_distance.enabled {
        run_start_end_distance(&cfg.start_end_distance, &pts, &dist_next)
    } else {
        vec![None; m]
    };
    let isa_c = if cfg.intersecting_segments.enabled {
        run_intersecting_segments(&cfg.intersecting_segments, &pts)
    } else {
        vec![None; m]
    };

    // The denominator uses all four configured weights, enabled or not;
    // disabling a method removes its contribution from the numerator only.
    let weight_mean = (cfg.rectangle_distance.weight
        + cfg.bearing.weight
        + cfg.start_end_distance.weight
        + cfg.intersecting_segments.weight)
        / 4.0;

    let mut rectangle_distance = vec![None; n];
    let mut bearing = vec![None; n];
    let mut start_end_distance = vec![None; n];
    let mut intersecting_segments = vec![None; n];
    let mut fused = vec![None; n];
    for (j, &p) in positions.iter().enumerate() {
        if !uncertain[p] {
            continue;
        }
        rectangle_distance[p] = rdr_c[j];
        bearing[p] = ba_c[j];
        start_end_distance[p] = seda_c[j];
        intersecting_segments[p] = isa_c[j];

        let components = [
            (rdr_c[j], cfg.rectangle_distance.weight),
            (ba_c[j], cfg.bearing.weight),
            (seda_c[j], cfg.start_end_distance.weight),
            (isa_c[j], cfg.intersecting_segments.weight),
        ];
        let mut sum = 0.0;
        let mut count = 0usize;
        for (score, weight) in components {
            if let Some(value) = score {
                sum += value * weight;
                count += 1;
            }
        }
        if count > 0 {
            fused[p] = Some(sum / count as f64 / weight_mean);
        }
    }

    let missing_data = if cfg.missing_data.enabled {
        run_missing_data(trace, &uncertain, &cfg.missing_data)
    } else {
        vec![None; n]
    };

    SampleScores {
        motion,
        uncertain,
        rectangle_distance,
        bearing,
        start_end_distance,
        intersecting_segments,
        fused,
        missing_data,
    }
}
