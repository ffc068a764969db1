//! Single-line helpers
//!
//! A line is a [`LineString`] of plain coordinates. Closedness is never stored: a line is
//! closed when its first and last points are within a caller-provided tolerance.

use geo::{Coord, LineString};

/// Euclidean distance between two coordinates
#[inline(always)]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Check whether the first and last points of `line` are within `tolerance`
///
/// Empty lines are never closed.
#[inline]
pub fn is_closed(line: &LineString<f64>, tolerance: f64) -> bool {
    match (line.0.first(), line.0.last()) {
        (Some(&first), Some(&last)) => distance(first, last) <= tolerance,
        _ => false,
    }
}

/// Sum of the distances between consecutive points
#[inline]
pub fn line_length(line: &LineString<f64>) -> f64 {
    line.0.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Number of segments in a line (point count minus one, floored at zero)
#[inline]
pub fn segment_count(line: &LineString<f64>) -> usize {
    line.0.len().saturating_sub(1)
}

/// Move the seam of a closed line to `loc`
///
/// Closedness is not checked. The first and last points are replaced by their average,
/// then the points are rotated so the line starts (and ends) at the former `line[loc]`.
/// `loc` is taken modulo the number of distinct points (`len - 1`). Lines with fewer than
/// two points are returned unchanged.
pub fn reloop_line(line: &LineString<f64>, loc: usize) -> LineString<f64> {
    let points = &line.0;
    let n = points.len();
    if n < 2 {
        return line.clone();
    }

    let loc = loc % (n - 1);
    let first = points[0];
    let last = points[n - 1];
    let seam = Coord {
        x: 0.5 * (first.x + last.x),
        y: 0.5 * (first.y + last.y),
    };

    let mut averaged = points.clone();
    averaged[0] = seam;
    averaged[n - 1] = seam;

    let mut result = Vec::with_capacity(n);
    result.extend_from_slice(&averaged[loc..]);
    result.extend_from_slice(&averaged[1..=loc]);
    LineString::from(result)
}

/// Resample `line` with evenly spaced points no more than `step` apart
///
/// The resampled line has `1 + ceil(length / step)` points spread uniformly along the
/// original line's arc length, starting at its first point and ending at its last.
/// Lines with fewer than two points, and non-positive steps, yield an unchanged copy.
pub fn interpolate_line(line: &LineString<f64>, step: f64) -> LineString<f64> {
    let points = &line.0;
    if points.len() < 2 || !(step > 0.0) {
        return line.clone();
    }

    // Cumulative arc length at each original point
    let mut abscissa = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    abscissa.push(acc);
    for w in points.windows(2) {
        acc += distance(w[0], w[1]);
        abscissa.push(acc);
    }
    let total = acc;

    let sample_count = 1 + (total / step).ceil() as usize;
    if sample_count == 1 {
        return LineString::from(vec![points[0]]);
    }

    let mut result = Vec::with_capacity(sample_count);
    let mut segment = 0;
    for i in 0..sample_count {
        let s = total * i as f64 / (sample_count - 1) as f64;
        // Advance to the original segment containing arc length `s`
        while segment + 2 < abscissa.len() && abscissa[segment + 1] < s {
            segment += 1;
        }
        let (s0, s1) = (abscissa[segment], abscissa[segment + 1]);
        let (p0, p1) = (points[segment], points[segment + 1]);
        let t = if s1 > s0 {
            ((s - s0) / (s1 - s0)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        result.push(Coord {
            x: p0.x + (p1.x - p0.x) * t,
            y: p0.y + (p1.y - p0.y) * t,
        });
    }

    LineString::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> LineString<f64> {
        LineString::from(vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ])
    }

    #[test]
    fn test_is_closed() {
        assert!(is_closed(&square(), 0.0));

        let open = LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]);
        assert!(!is_closed(&open, 0.5));
        assert!(is_closed(&open, 1.0));

        assert!(!is_closed(&LineString::new(vec![]), 1.0));
    }

    #[test]
    fn test_line_length() {
        assert!((line_length(&square()) - 4.0).abs() < 1e-12);
        assert_eq!(line_length(&LineString::from(vec![(3.0, 3.0)])), 0.0);
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count(&square()), 4);
        assert_eq!(segment_count(&LineString::new(vec![])), 0);
    }

    #[test]
    fn test_reloop_line_rotates_seam() {
        let relooped = reloop_line(&square(), 2);
        let expected = LineString::from(vec![
            (1.0, 1.0),
            (0.0, 1.0),
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
        ]);
        assert_eq!(relooped, expected);
    }

    #[test]
    fn test_reloop_line_averages_seam() {
        // Nearly closed: last point is slightly off
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.2, 0.0)]);
        let relooped = reloop_line(&line, 0);
        assert_eq!(relooped.0.len(), 4);
        assert_eq!(relooped.0[0], Coord { x: 0.1, y: 0.0 });
        assert_eq!(relooped.0[3], Coord { x: 0.1, y: 0.0 });
    }

    #[test]
    fn test_reloop_line_wraps_location() {
        // 4 distinct points: loc 6 is loc 2
        assert_eq!(reloop_line(&square(), 6), reloop_line(&square(), 2));
    }

    #[test]
    fn test_reloop_line_short() {
        let single = LineString::from(vec![(1.0, 1.0)]);
        assert_eq!(reloop_line(&single, 3), single);
    }

    #[test]
    fn test_interpolate_line() {
        let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
        let resampled = interpolate_line(&line, 3.0);
        // ceil(10 / 3) + 1 = 5 points, 2.5 apart
        assert_eq!(resampled.0.len(), 5);
        assert_eq!(resampled.0[0], Coord { x: 0.0, y: 0.0 });
        assert!((resampled.0[1].x - 2.5).abs() < 1e-12);
        assert_eq!(resampled.0[4], Coord { x: 10.0, y: 0.0 });
    }

    #[test]
    fn test_interpolate_line_follows_corners() {
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let resampled = interpolate_line(&line, 0.5);
        assert_eq!(resampled.0.len(), 5);
        assert!((resampled.0[2].x - 1.0).abs() < 1e-12);
        assert!(resampled.0[2].y.abs() < 1e-12);
        assert!((resampled.0[3].y - 0.5).abs() < 1e-12);
    }
}
