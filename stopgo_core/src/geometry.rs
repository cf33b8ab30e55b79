//! Planar geometry primitives: distances, convex hulls, segment
//! intersection, bearing deviation. Everything operates on metres in a
//! caller-supplied local projection.

/// Euclidean distance between two points.
#[inline]
pub(crate) fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Cross product of `(o -> a)` and `(o -> b)`; positive when the turn at
/// `o` is counter-clockwise.
#[inline]
fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Convex hull via Andrew's monotone chain, strict turns only.
///
/// Returns `None` when the input is degenerate (fewer than three distinct
/// points, or all points collinear); callers fall back to the window's
/// first and last points in that case.
pub(crate) fn convex_hull(points: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    pts.dedup();
    if pts.len() < 3 {
        return None;
    }

    let mut hull: Vec<(f64, f64)> = Vec::with_capacity(pts.len() + 1);
    // Lower hull
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Upper hull
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop(); // closing point repeats the start

    if hull.len() < 3 { None } else { Some(hull) }
}

/// Largest pairwise distance among the given vertices. Hull sizes here are
/// bounded by the method window, so the quadratic scan is fine.
pub(crate) fn max_pairwise_distance(vertices: &[(f64, f64)]) -> f64 {
    let mut best = 0.0f64;
    for (i, &a) in vertices.iter().enumerate() {
        for &b in &vertices[i + 1..] {
            let d = euclidean(a, b);
            if d > best {
                best = d;
            }
        }
    }
    best
}

/// Strict counter-clockwise orientation test used by segment intersection.
#[inline]
fn ccw(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    (c.1 - a.1) * (b.0 - a.0) > (b.1 - a.1) * (c.0 - a.0)
}

/// Whether segments `a-b` and `c-d` properly intersect. Shared endpoints
/// and collinear overlaps do not count.
#[inline]
pub(crate) fn segments_intersect(
    a: (f64, f64),
    b: (f64, f64),
    c: (f64, f64),
    d: (f64, f64),
) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

/// Absolute deviation (degrees) from straight-line motion at `b`, given its
/// neighbours `a` and `c`: 0 for a straight pass-through, approaching 180
/// for a full reversal. `None` when either leg has zero length.
pub(crate) fn bearing_deviation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Option<f64> {
    let ba = (a.0 - b.0, a.1 - b.1);
    let bc = (c.0 - b.0, c.1 - b.1);
    let denom = ba.0.hypot(ba.1) * bc.0.hypot(bc.1);
    if denom == 0.0 {
        return None;
    }
    let cosine = ((ba.0 * bc.0 + ba.1 * bc.1) / denom).clamp(-1.0, 1.0);
    Some((cosine.acos() - std::f64::consts::PI).to_degrees().abs())
}
