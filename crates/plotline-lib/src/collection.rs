//! LineCollection - Ordered polylines with transforms, metrics and merging
//!
//! Insertion order is draw order: it seeds the merge engine and defines pen-up travel.

use crate::{DataError, LineIndex, Result, line};

use geo::{BoundingRect, Coord, LineString, MapCoordsInPlace, MultiLineString, Rect};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Pen-up travel statistics between consecutive lines
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PenUpStats {
    /// Sum of all pen-up distances
    pub total: f64,
    /// Mean pen-up distance (0 with fewer than two lines)
    pub mean: f64,
    /// Median pen-up distance (0 with fewer than two lines)
    pub median: f64,
}

/// Ordered collection of polylines belonging to one layer
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LineCollection {
    lines: Vec<LineString<f64>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl LineCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Create a collection from lines, keeping their order
    pub fn from_lines(lines: Vec<LineString<f64>>) -> Self {
        Self { lines }
    }

    /// Append a line
    #[inline]
    pub fn push(&mut self, line: LineString<f64>) {
        self.lines.push(line);
    }

    /// Append all lines of another collection, in order
    pub fn extend(&mut self, other: LineCollection) {
        self.lines.extend(other.lines);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn lines(&self) -> &[LineString<f64>] {
        &self.lines
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&LineString<f64>> {
        self.lines.get(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, LineString<f64>> {
        self.lines.iter()
    }

    /// Copy the lines into a `MultiLineString`
    pub fn as_mls(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.lines.clone())
    }

    /// Apply `f` to every point of every line
    fn map_points(&mut self, f: impl Fn(Coord<f64>) -> Coord<f64> + Copy) {
        for line in &mut self.lines {
            line.map_coords_in_place(f);
        }
    }

    /// Add a constant offset to every point
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.map_points(|c| Coord {
            x: c.x + dx,
            y: c.y + dy,
        });
    }

    /// Scale each axis independently about the origin
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.map_points(|c| Coord {
            x: c.x * sx,
            y: c.y * sy,
        });
    }

    /// Scale both axes by the same factor about the origin
    pub fn scale_uniform(&mut self, s: f64) {
        self.scale(s, s);
    }

    /// Rotate about the origin by `angle` radians (counter-clockwise in a y-up frame)
    pub fn rotate(&mut self, angle: f64) {
        let (sin, cos) = angle.sin_cos();
        self.map_points(|c| Coord {
            x: c.x * cos - c.y * sin,
            y: c.x * sin + c.y * cos,
        });
    }

    /// Shear with `x += tan(ax) * y` and `y += tan(ay) * x`, both from the original point
    pub fn skew(&mut self, ax: f64, ay: f64) {
        let (tx, ty) = (ax.tan(), ay.tan());
        self.map_points(|c| Coord {
            x: c.x + tx * c.y,
            y: c.y + ty * c.x,
        });
    }

    /// Move the seam of every closed line
    ///
    /// A line is closed when its first and last points are within `tolerance`. The new
    /// seam is `seam` (wrapped to the line's point count) or, when `None`, drawn
    /// uniformly from `rng` for each closed line. See [`line::reloop_line`].
    pub fn reloop<R: Rng + ?Sized>(&mut self, tolerance: f64, seam: Option<usize>, rng: &mut R) {
        let mut relooped = 0usize;
        for l in &mut self.lines {
            let n = l.0.len();
            if n < 2 || !line::is_closed(l, tolerance) {
                continue;
            }
            let loc = seam.unwrap_or_else(|| rng.random_range(0..n - 1));
            *l = line::reloop_line(l, loc);
            relooped += 1;
        }
        tracing::debug!(relooped, "relooped closed lines");
    }

    /// Merge lines whose endings are within `tolerance`, optionally flipping lines
    ///
    /// Chains are seeded in collection order and greedily grown at their tail with the
    /// nearest available line start (or line end, reversed, when `flip` is set). When the
    /// tail has no candidate and `flip` is set, the chain is reversed if its head has
    /// one. Joined endpoints that coincide exactly are stored once. Lines without points
    /// are dropped.
    pub fn merge(&mut self, tolerance: f64, flip: bool) {
        #[cfg(feature = "profiling")]
        profiling::scope!("collection::merge");

        if self.lines.len() < 2 {
            return;
        }

        let lines_before = self.lines.len();
        let mut index = LineIndex::new(std::mem::take(&mut self.lines), flip);
        let mut merged = Vec::with_capacity(index.len());

        while let Some(mut chain) = index.pop_front() {
            // we grow `chain` until nothing is close enough to either end
            loop {
                let Some(&tail) = chain.0.last() else {
                    break;
                };
                let mut found = index.find_nearest_within(tail, tolerance);

                if found.is_none() && flip {
                    let head = chain.0[0];
                    found = index.find_nearest_within(head, tolerance);
                    if found.is_some() {
                        chain.0.reverse();
                    }
                }

                let Some((handle, reverse)) = found else {
                    break;
                };
                let Some(mut next) = index.pop(handle) else {
                    break;
                };
                if reverse {
                    next.0.reverse();
                }
                append_line(&mut chain, next);
            }

            merged.push(chain);
        }

        tracing::debug!(
            lines_before,
            lines_after = merged.len(),
            tolerance,
            flip,
            "merged lines"
        );
        self.lines = merged;
    }

    /// Bounding box of all points
    ///
    /// Returns `NoGeometry` if the collection holds no points.
    pub fn bounds(&self) -> Result<Rect<f64>> {
        self.lines
            .iter()
            .filter_map(|l| l.bounding_rect())
            .reduce(union_rect)
            .ok_or(DataError::NoGeometry)
    }

    /// Width of the bounding box
    pub fn width(&self) -> Result<f64> {
        Ok(self.bounds()?.width())
    }

    /// Height of the bounding box
    pub fn height(&self) -> Result<f64> {
        Ok(self.bounds()?.height())
    }

    /// Total drawn length
    pub fn length(&self) -> f64 {
        self.lines.iter().map(line::line_length).sum()
    }

    /// Distances travelled with the pen up from each line's end to the next line's start
    ///
    /// Lines are taken in collection order; lines without points are skipped.
    pub fn pen_up_length(&self) -> PenUpStats {
        let drawn: Vec<&LineString<f64>> = self.lines.iter().filter(|l| !l.0.is_empty()).collect();
        let mut dists: Vec<f64> = drawn
            .windows(2)
            .map(|w| line::distance(w[0].0[w[0].0.len() - 1], w[1].0[0]))
            .collect();

        if dists.is_empty() {
            return PenUpStats::default();
        }

        let total: f64 = dists.iter().sum();
        let mean = total / dists.len() as f64;

        dists.sort_by(f64::total_cmp);
        let mid = dists.len() / 2;
        let median = if dists.len() % 2 == 0 {
            0.5 * (dists[mid - 1] + dists[mid])
        } else {
            dists[mid]
        };

        PenUpStats {
            total,
            mean,
            median,
        }
    }

    /// Total number of segments across all lines
    pub fn segment_count(&self) -> usize {
        self.lines.iter().map(line::segment_count).sum()
    }
}

/// Append `next` to `chain`, storing an exactly shared endpoint once
fn append_line(chain: &mut LineString<f64>, next: LineString<f64>) {
    let skip = match (chain.0.last(), next.0.first()) {
        (Some(a), Some(b)) if a == b => 1,
        _ => 0,
    };
    chain.0.extend(next.0.into_iter().skip(skip));
}

/// Smallest rectangle containing both `a` and `b`
pub(crate) fn union_rect(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

impl Index<usize> for LineCollection {
    type Output = LineString<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lines[index]
    }
}

impl From<MultiLineString<f64>> for LineCollection {
    fn from(mls: MultiLineString<f64>) -> Self {
        Self { lines: mls.0 }
    }
}

impl From<Vec<LineString<f64>>> for LineCollection {
    fn from(lines: Vec<LineString<f64>>) -> Self {
        Self { lines }
    }
}

impl FromIterator<LineString<f64>> for LineCollection {
    fn from_iter<T: IntoIterator<Item = LineString<f64>>>(iter: T) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LineCollection {
    type Item = LineString<f64>;
    type IntoIter = std::vec::IntoIter<LineString<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

impl<'a> IntoIterator for &'a LineCollection {
    type Item = &'a LineString<f64>;
    type IntoIter = std::slice::Iter<'a, LineString<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
