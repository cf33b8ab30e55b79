//! Score fusion and the per-sample stop/trip conclusion.
//!
//! Precedence per sample: a certain motion verdict wins outright, then a
//! missing-data score, then the fused algorithmic score. The chosen values
//! are smoothed with a centred rolling mean, after which missing-data stop
//! evidence is re-asserted so smoothing cannot dilute it.

use crate::config::ClassifierConfig;
use crate::methods::SampleScores;
use crate::trace::Trace;
use crate::types::LabelledSample;

const SMOOTHING_WINDOW: usize = 5;

/// Pick the pre-smoothing score for each sample.
fn select_scores(scores: &SampleScores, cfg: &ClassifierConfig) -> Vec<Option<f64>> {
    (0..scores.uncertain.len())
        .map(|i| {
            if scores.uncertain[i] {
                if cfg.missing_data.enabled && scores.missing_data[i].is_some() {
                    scores.missing_data[i]
                } else {
                    scores.fused[i]
                }
            } else {
                scores.motion[i]
            }
        })
        .collect()
}

/// Centred rolling mean that only produces a value where the full window
/// is present and defined.
fn smooth(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let n = values.len();
    let half = SMOOTHING_WINDOW / 2;
    let mut out = vec![None; n];
    for (i, slot) in out.iter_mut().enumerate() {
        if i < half || i + half >= n {
            continue;
        }
        let window = &values[i - half..=i + half];
        if window.iter().any(Option::is_none) {
            continue;
        }
        *slot = Some(window.iter().flatten().sum::<f64>() / SMOOTHING_WINDOW as f64);
    }
    out
}

/// Produce the labelled samples, dropping every row whose overall score
/// stayed undefined (boundary windows with nothing to fall back on).
pub(crate) fn conclude(
    trace: &Trace,
    scores: &SampleScores,
    cfg: &ClassifierConfig,
) -> Vec<LabelledSample> {
    let selected = select_scores(scores, cfg);
    let smoothed = smooth(&selected);

    let mut labelled = Vec::with_capacity(trace.len());
    for i in 0..trace.len() {
        // Missing-data stop evidence survives smoothing; an undefined
        // smoothed value falls back to the raw algorithmic score.
        let overall = match scores.missing_data[i] {
            Some(mda) if mda > 0.0 => Some(mda),
            _ => smoothed[i].or(scores.fused[i]),
        };
        let Some(overall) = overall else {
            continue;
        };
        labelled.push(LabelledSample {
            index: trace.index[i],
            ts: trace.ts[i],
            x: trace.x[i],
            y: trace.y[i],
            rectangle_distance_score: scores.rectangle_distance[i],
            bearing_score: scores.bearing[i],
            start_end_distance_score: scores.start_end_distance[i],
            intersecting_segments_score: scores.intersecting_segments[i],
            overall_score: overall,
            is_stop: overall > 0.0,
            confidence: overall.abs(),
        });
    }
    tracing::debug!(
        labelled = labelled.len(),
        dropped = trace.len() - labelled.len(),
        "sample conclusion done"
    );
    labelled
}
