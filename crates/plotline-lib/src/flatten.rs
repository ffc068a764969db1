//! Path flattening: curve and line segments to polylines
//!
//! Curve math and polyline simplification are consumed through two narrow traits,
//! [`CurveSegment`] and [`Simplifier`], implemented here for `kurbo` segments and the
//! `geo` Ramer–Douglas–Peucker algorithm.

use crate::{DataError, LineCollection, PageGeometry, Result};
use geo::{Coord, LineString, MultiLineString, Simplify};
use kurbo::{ParamCurve, ParamCurveArclen, PathSeg};

/// Absolute accuracy used when measuring curve arc length
const ARCLEN_ACCURACY: f64 = 1e-6;

/// Upper bound on the number of steps a single curve may be sampled with
const MAX_SEGMENT_STEPS: f64 = 10_000_000.0;

/// A single path segment, straight or curved
pub trait CurveSegment {
    fn start(&self) -> Coord<f64>;
    fn end(&self) -> Coord<f64>;
    /// Straight segments are emitted as their two endpoints without sampling
    fn is_straight(&self) -> bool;
    /// Arc length of the segment
    fn length(&self) -> f64;
    /// Point at curve parameter `t` in `[0, 1]`
    fn point_at(&self, t: f64) -> Coord<f64>;
}

impl CurveSegment for PathSeg {
    #[inline]
    fn start(&self) -> Coord<f64> {
        to_coord(ParamCurve::start(self))
    }

    #[inline]
    fn end(&self) -> Coord<f64> {
        to_coord(ParamCurve::end(self))
    }

    #[inline]
    fn is_straight(&self) -> bool {
        matches!(self, PathSeg::Line(_))
    }

    fn length(&self) -> f64 {
        self.arclen(ARCLEN_ACCURACY)
    }

    #[inline]
    fn point_at(&self, t: f64) -> Coord<f64> {
        to_coord(self.eval(t))
    }
}

#[inline(always)]
fn to_coord(p: kurbo::Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Polyline simplification collaborator
pub trait Simplifier: Sync {
    fn simplify(&self, lines: &MultiLineString<f64>, tolerance: f64) -> MultiLineString<f64>;
}

/// Ramer–Douglas–Peucker simplification from `geo`
#[derive(Debug, Clone, Copy, Default)]
pub struct RamerDouglasPeucker;

impl Simplifier for RamerDouglasPeucker {
    fn simplify(&self, lines: &MultiLineString<f64>, tolerance: f64) -> MultiLineString<f64> {
        lines.simplify(tolerance)
    }
}

/// Approximate one segment with points no more than about `quantization` apart
///
/// Straight segments yield their two endpoints. Curves yield `n + 1` points with
/// `n = max(1, ceil(length / quantization))`: the endpoints plus `n - 1` samples at
/// uniform parameter steps.
///
/// Fails with `Parse` when the curve would need more than `MAX_SEGMENT_STEPS` steps, or
/// when its length is not finite.
pub fn sample_segment<S: CurveSegment + ?Sized>(
    segment: &S,
    quantization: f64,
) -> Result<Vec<Coord<f64>>> {
    if segment.is_straight() {
        return Ok(vec![segment.start(), segment.end()]);
    }

    let length = segment.length();
    let steps = (length / quantization).ceil();
    if !(steps <= MAX_SEGMENT_STEPS) {
        return Err(DataError::Parse(format!(
            "curve of length {length} cannot be sampled with quantization {quantization}"
        )));
    }

    let steps = (steps as usize).max(1);
    let mut coords = Vec::with_capacity(steps + 1);
    coords.push(segment.start());
    coords.extend((1..steps).map(|i| segment.point_at(i as f64 / steps as f64)));
    coords.push(segment.end());
    Ok(coords)
}

/// Convert path elements to a [`LineCollection`]
///
/// Each element is a sequence of segments. Consecutive runs within an element are joined
/// into a single line when the end of one exactly equals the start of the next; otherwise
/// a new line begins. Every point is then mapped through `page`. When a simplifier is
/// given, the whole collection is simplified with `quantization` as tolerance.
///
/// # Arguments
/// * `paths` - Path elements, each an iterable of segments
/// * `quantization` - Maximum chord length for curve approximation (must be positive)
/// * `page` - Scale and offset applied to every point
/// * `simplifier` - Optional simplification pass
pub fn flatten_paths<I, P, S>(
    paths: I,
    quantization: f64,
    page: &PageGeometry,
    simplifier: Option<&dyn Simplifier>,
) -> Result<LineCollection>
where
    I: IntoIterator<Item = P>,
    P: IntoIterator<Item = S>,
    S: CurveSegment,
{
    #[cfg(feature = "profiling")]
    profiling::scope!("flatten::flatten_paths");

    if !(quantization.is_finite() && quantization > 0.0) {
        return Err(DataError::Parse(format!(
            "quantization must be positive, got {quantization}"
        )));
    }

    let mut collection = LineCollection::new();
    for path in paths {
        let mut sub_paths: Vec<Vec<Coord<f64>>> = Vec::new();

        for segment in path {
            let coords = sample_segment(&segment, quantization)?;
            match sub_paths.last_mut() {
                Some(last) if last.last() == coords.first() => {
                    last.extend_from_slice(&coords[1..]);
                }
                _ => sub_paths.push(coords),
            }
        }

        for sub_path in sub_paths {
            let line: Vec<Coord<f64>> = sub_path.into_iter().map(|c| page.apply(c)).collect();
            collection.push(LineString::from(line));
        }
    }

    if let Some(simplifier) = simplifier {
        let simplified = simplifier.simplify(&collection.as_mls(), quantization);
        collection = LineCollection::from(simplified);
    }

    tracing::debug!(lines = collection.len(), "flattened paths");
    Ok(collection)
}
