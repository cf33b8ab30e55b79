//! Stop outlier filtering and merging.
//!
//! Every pass scores each stop on duration and on independence from its
//! neighbours, decides keep/delete/merge, applies the merges in a single
//! direction each, rebuilds the list and runs again until a pass changes
//! nothing. Termination holds because an effective pass strictly shrinks
//! the list.

use crate::aggregate::build_interval;
use crate::config::StopFilterCfg;
use crate::error::Result;
use crate::geometry;
use crate::normalise::normalised_score;
use crate::types::{LabelledSample, StopInterval};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Keep,
    Delete,
    Merge,
}

/// Walked distance between two timestamps: the summed sample-to-sample
/// distances inside `[start, stop]`. `None` with fewer than two samples.
pub(crate) fn path_length_between(
    samples: &[LabelledSample],
    start: f64,
    stop: f64,
) -> Option<f64> {
    let span: Vec<(f64, f64)> = samples
        .iter()
        .filter(|s| s.ts >= start && s.ts <= stop)
        .map(|s| (s.x, s.y))
        .collect();
    if span.len() < 2 {
        return None;
    }
    Some(
        span.windows(2)
            .map(|pair| geometry::euclidean(pair[0], pair[1]))
            .sum(),
    )
}

/// Pinned time score for gaps too wide to merge across: large enough that
/// the distance component alone can never force independence negative.
const UNMERGEABLE_TIME_SCORE: f64 = 3.0;

/// Sentinel independence for a stop that is temporally independent but
/// spatially adjacent: merge it, never delete it.
const MERGE_NOT_DELETE: f64 = -0.001;

struct NeighbourAttrs {
    /// Effective distances: the larger of centroid distance and walked
    /// path length to the neighbouring stop.
    dist_next: Vec<Option<f64>>,
    dist_prev: Vec<Option<f64>>,
    time_next: Vec<Option<f64>>,
    time_prev: Vec<Option<f64>>,
}

fn neighbour_attrs(stops: &[StopInterval], samples: &[LabelledSample]) -> NeighbourAttrs {
    let k = stops.len();
    let mut dist_next = vec![None; k];
    let mut time_next = vec![None; k];
    for i in 0..k.saturating_sub(1) {
        let euclid = geometry::euclidean(
            (stops[i].cx, stops[i].cy),
            (stops[i + 1].cx, stops[i + 1].cy),
        );
        let path = path_length_between(samples, stops[i].stop, stops[i + 1].start);
        dist_next[i] = Some(path.map_or(euclid, |p| if p > euclid { p } else { euclid }));
        time_next[i] = Some(stops[i + 1].start - stops[i].stop);
    }
    let mut dist_prev = vec![None; k];
    let mut time_prev = vec![None; k];
    for i in 1..k {
        dist_prev[i] = dist_next[i - 1];
        time_prev[i] = time_next[i - 1];
    }
    NeighbourAttrs {
        dist_next,
        dist_prev,
        time_next,
        time_prev,
    }
}

fn duration_score(duration: f64, cfg: &StopFilterCfg) -> f64 {
    // nudge an exactly-minimal duration off the -1.0 boundary
    let value = if duration == cfg.min_stop_interval_s {
        cfg.min_stop_interval_s + 0.1
    } else {
        duration
    };
    normalised_score(value, cfg.min_stop_interval_s, cfg.relevant_stop_duration_s)
}

fn independence_score(i: usize, k: usize, attrs: &NeighbourAttrs, cfg: &StopFilterCfg) -> f64 {
    if k == 1 {
        return 1.0;
    }
    let nearest = |prev: Option<f64>, next: Option<f64>| match (prev, next) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    };
    let Some(time_value) = nearest(attrs.time_prev[i], attrs.time_next[i]) else {
        return 1.0;
    };
    let time_score = if time_value > cfg.max_time_between_stops_for_merge_s {
        UNMERGEABLE_TIME_SCORE
    } else {
        normalised_score(
            time_value,
            cfg.min_time_between_stops_s,
            cfg.relevant_time_between_stops_s,
        )
    };
    let Some(dist_value) = nearest(attrs.dist_prev[i], attrs.dist_next[i]) else {
        return 1.0;
    };
    let dist_score = normalised_score(
        dist_value,
        cfg.min_distance_between_stops_m,
        cfg.relevant_distance_between_stops_m,
    );
    if time_score == 1.0 && dist_score == -1.0 {
        MERGE_NOT_DELETE
    } else {
        (time_score + dist_score) / 2.0
    }
}

/// Pick the merge direction: forward when the forward neighbour survives
/// and sits at the smaller distance within the mergeable time gap (or when
/// there is no backward distance at all), else backward under the mirror
/// condition, else none.
fn merge_direction(
    i: usize,
    decisions: &[Decision],
    attrs: &NeighbourAttrs,
    cfg: &StopFilterCfg,
) -> Option<i64> {
    if decisions[i] != Decision::Merge {
        return None;
    }
    let next_decision = decisions.get(i + 1).copied();
    let prev_decision = (i > 0).then(|| decisions[i - 1]);

    if next_decision != Some(Decision::Delete) {
        match (attrs.dist_prev[i], attrs.dist_next[i]) {
            (None, _) => return Some(1),
            (Some(dp), Some(dn)) if dn <= dp => {
                if matches!(attrs.time_next[i], Some(t) if t <= cfg.max_time_between_stops_for_merge_s)
                {
                    return Some(1);
                }
            }
            _ => {}
        }
    }
    if prev_decision != Some(Decision::Delete) {
        let prev_is_nearest = match (attrs.dist_prev[i], attrs.dist_next[i]) {
            (Some(_), None) => true,
            (Some(dp), Some(dn)) => dp <= dn,
            (None, _) => false,
        };
        if prev_is_nearest
            && matches!(attrs.time_prev[i], Some(t) if t <= cfg.max_time_between_stops_for_merge_s)
        {
            return Some(-1);
        }
    }
    None
}

/// One scoring/merging pass. Returns the rebuilt stop list.
fn filter_pass(
    stops: &[StopInterval],
    samples: &[LabelledSample],
    cfg: &StopFilterCfg,
) -> Result<Vec<StopInterval>> {
    let k = stops.len();
    let attrs = neighbour_attrs(stops, samples);

    let duration_scores: Vec<f64> = stops
        .iter()
        .map(|s| duration_score(s.duration_s, cfg))
        .collect();
    let independence_scores: Vec<f64> = (0..k)
        .map(|i| independence_score(i, k, &attrs, cfg))
        .collect();
    let mut decisions: Vec<Decision> = (0..k)
        .map(|i| {
            if duration_scores[i] == -1.0 && independence_scores[i] >= 0.0 {
                Decision::Delete
            } else if independence_scores[i] < 0.0 {
                Decision::Merge
            } else {
                Decision::Keep
            }
        })
        .collect();
    let directions: Vec<Option<i64>> = (0..k)
        .map(|i| merge_direction(i, &decisions, &attrs, cfg))
        .collect();
    // a merge with no applicable direction is undefined; keep the stop
    for i in 0..k {
        if decisions[i] == Decision::Merge && directions[i].is_none() {
            decisions[i] = Decision::Keep;
        }
    }
    tracing::trace!(
        stops = k,
        deletes = decisions.iter().filter(|d| **d == Decision::Delete).count(),
        merges = decisions.iter().filter(|d| **d == Decision::Merge).count(),
        "stop filter pass scored"
    );

    // deletes vanish before merges are applied
    let survivors: Vec<usize> = (0..k).filter(|&i| decisions[i] != Decision::Delete).collect();

    if survivors.is_empty() {
        return Ok(Vec::new());
    }
    if survivors.len() == 1 {
        let idx = survivors[0];
        if duration_scores[idx] == -1.0 {
            // a lone leftover below the duration floor is noise
            return Ok(Vec::new());
        }
        return Ok(vec![build_interval(
            samples,
            stops[idx].start,
            stops[idx].stop,
        )?]);
    }

    let mut bounds: Vec<(f64, f64)> = survivors
        .iter()
        .map(|&i| (stops[i].start, stops[i].stop))
        .collect();
    let mut consumed = vec![false; survivors.len()];
    for (pos, &i) in survivors.iter().enumerate() {
        if decisions[i] != Decision::Merge {
            continue;
        }
        let Some(dir) = directions[i] else { continue };
        let neighbour = pos as i64 + dir;
        if neighbour < 0 || neighbour >= survivors.len() as i64 {
            continue;
        }
        let neighbour = neighbour as usize;
        if consumed[neighbour] {
            // the candidate survives unmerged
            continue;
        }
        bounds[neighbour].0 = bounds[neighbour].0.min(bounds[pos].0);
        bounds[neighbour].1 = bounds[neighbour].1.max(bounds[pos].1);
        consumed[pos] = true;
    }

    let mut rebuilt = Vec::with_capacity(survivors.len());
    for (pos, &(start, stop)) in bounds.iter().enumerate() {
        if !consumed[pos] {
            rebuilt.push(build_interval(samples, start, stop)?);
        }
    }
    Ok(rebuilt)
}

/// Filter and merge to a fixed point.
pub(crate) fn filter_stops(
    mut stops: Vec<StopInterval>,
    samples: &[LabelledSample],
    cfg: &StopFilterCfg,
) -> Result<Vec<StopInterval>> {
    while !stops.is_empty() {
        let before = stops.len();
        stops = filter_pass(&stops, samples, cfg)?;
        debug_assert!(stops.len() <= before, "a filter pass must never grow the list");
        if stops.len() == before {
            break;
        }
        tracing::debug!(before, after = stops.len(), "stop filter pass");
    }
    Ok(stops)
}
