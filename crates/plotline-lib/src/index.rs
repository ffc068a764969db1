//! Endpoint index for line merging
//!
//! This module provides a dynamic point quadtree over line endpoints. Lines are removed
//! from the index as they are consumed by the merge engine, and the remaining endpoints
//! can be searched for the nearest one within a distance, in O(log N) expected time.

use geo::{Coord, LineString, Rect};

/// Maximum depth of the quadtree to prevent infinite recursion on coincident points
const MAX_DEPTH: u32 = 20;

/// Number of endpoints a leaf holds before it is subdivided
const MAX_ENDPOINTS_PER_NODE: usize = 16;

/// Opaque reference to a line stored in a [`LineIndex`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(usize);

/// A registered line endpoint
#[derive(Clone, Copy, Debug)]
struct Endpoint {
    coord: Coord<f64>,
    /// Insertion index of the owning line
    line: usize,
    /// True for the line's last point (matching it requires reversing the line)
    trailing: bool,
}

/// Best match found so far during a nearest-neighbor search
#[derive(Clone, Copy, Debug)]
struct Candidate {
    dist2: f64,
    line: usize,
    trailing: bool,
}

impl Candidate {
    /// Tie-break: closer first, then lower insertion index, then leading before trailing
    fn beats(&self, other: &Candidate) -> bool {
        (self.dist2, self.line, self.trailing) < (other.dist2, other.line, other.trailing)
    }
}

/// Searchable, shrinking set of lines keyed by their endpoints
///
/// Every non-empty line has its leading endpoint registered. When built with `reverse`,
/// its trailing endpoint is registered as well, and a match on it is reported as
/// requiring the line to be reversed. Lines without points are not indexed.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Lines in insertion order; `None` once popped
    lines: Vec<Option<LineString<f64>>>,
    /// Spatial index over the registered endpoints of the remaining lines
    root: QuadtreeNode,
    /// Whether trailing endpoints are registered
    reverse: bool,
    /// Number of lines still present
    remaining: usize,
    /// All lines before this insertion index have been popped
    front: usize,
}

/// A single node of the endpoint quadtree
#[derive(Debug, Clone)]
struct QuadtreeNode {
    /// Bounding box of this node
    bounding_box: Rect<f64>,
    /// Depth level in the tree (0 = root)
    level: u32,
    /// Endpoints stored at this node (leaves only)
    endpoints: Vec<Endpoint>,
    /// Child nodes (NW, NE, SW, SE) if subdivided
    children: Option<Box<[QuadtreeNode; 4]>>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl LineIndex {
    /// Build an index over `lines`
    ///
    /// # Arguments
    /// * `lines` - Lines in insertion order; empty lines are discarded
    /// * `reverse` - Also register trailing endpoints, allowing matches that need reversal
    pub fn new(lines: Vec<LineString<f64>>, reverse: bool) -> Self {
        let lines: Vec<LineString<f64>> = lines.into_iter().filter(|l| !l.0.is_empty()).collect();

        let bounding_box = endpoint_bounds(&lines, reverse);
        let mut root = QuadtreeNode::new(bounding_box, 0);
        for (i, line) in lines.iter().enumerate() {
            for endpoint in line_endpoints(line, i, reverse) {
                root.insert(endpoint);
            }
        }

        Self {
            remaining: lines.len(),
            lines: lines.into_iter().map(Some).collect(),
            root,
            reverse,
            front: 0,
        }
    }

    /// Number of lines still present
    #[inline]
    pub fn len(&self) -> usize {
        self.remaining
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Remove and return the remaining line that was inserted first
    pub fn pop_front(&mut self) -> Option<LineString<f64>> {
        while self.front < self.lines.len() {
            if self.lines[self.front].is_some() {
                return self.pop(LineHandle(self.front));
            }
            self.front += 1;
        }
        None
    }

    /// Remove and return a line in its original orientation
    ///
    /// Returns `None` if the line was already removed.
    pub fn pop(&mut self, handle: LineHandle) -> Option<LineString<f64>> {
        let line = self.lines.get_mut(handle.0)?.take()?;
        for endpoint in line_endpoints(&line, handle.0, self.reverse) {
            let removed = self.root.remove(&endpoint);
            debug_assert!(removed, "endpoint missing from index");
        }
        self.remaining -= 1;
        Some(line)
    }

    /// Find the registered endpoint nearest to `point` within `tolerance`
    ///
    /// Returns the owning line and whether it must be reversed so that the matched
    /// endpoint becomes its first point, or `None` if no endpoint is close enough.
    /// Equidistant matches resolve to the lowest insertion index, then to the leading
    /// endpoint.
    pub fn find_nearest_within(
        &self,
        point: Coord<f64>,
        tolerance: f64,
    ) -> Option<(LineHandle, bool)> {
        if self.remaining == 0 || !(tolerance >= 0.0) {
            return None;
        }

        let mut best = None;
        self.root
            .nearest_within(point, tolerance * tolerance, &mut best);
        best.map(|c| (LineHandle(c.line), c.trailing))
    }
}

impl QuadtreeNode {
    fn new(bounding_box: Rect<f64>, level: u32) -> Self {
        Self {
            bounding_box,
            level,
            endpoints: Vec::new(),
            children: None,
        }
    }

    /// Child slot for a coordinate: NW, NE, SW, SE
    #[inline]
    fn quadrant(&self, coord: Coord<f64>) -> usize {
        let center = self.bounding_box.center();
        let is_east = coord.x >= center.x;
        let is_north = coord.y >= center.y;

        match (is_east, is_north) {
            (false, true) => 0,  // NW
            (true, true) => 1,   // NE
            (false, false) => 2, // SW
            (true, false) => 3,  // SE
        }
    }

    fn insert(&mut self, endpoint: Endpoint) {
        let quadrant = self.quadrant(endpoint.coord);
        if let Some(children) = &mut self.children {
            children[quadrant].insert(endpoint);
            return;
        }

        self.endpoints.push(endpoint);
        if self.endpoints.len() > MAX_ENDPOINTS_PER_NODE && self.level < MAX_DEPTH {
            self.subdivide();
        }
    }

    /// Split this leaf into 4 children and move its endpoints down
    fn subdivide(&mut self) {
        if self.children.is_some() {
            return; // Already subdivided
        }

        let min = self.bounding_box.min();
        let max = self.bounding_box.max();
        let mid = self.bounding_box.center();
        let child_level = self.level + 1;

        // Create 4 children: NW, NE, SW, SE
        let nw = QuadtreeNode::new(
            Rect::new(Coord { x: min.x, y: mid.y }, Coord { x: mid.x, y: max.y }),
            child_level,
        );
        let ne = QuadtreeNode::new(
            Rect::new(Coord { x: mid.x, y: mid.y }, Coord { x: max.x, y: max.y }),
            child_level,
        );
        let sw = QuadtreeNode::new(
            Rect::new(Coord { x: min.x, y: min.y }, Coord { x: mid.x, y: mid.y }),
            child_level,
        );
        let se = QuadtreeNode::new(
            Rect::new(Coord { x: mid.x, y: min.y }, Coord { x: max.x, y: mid.y }),
            child_level,
        );

        let mut children = Box::new([nw, ne, sw, se]);
        for endpoint in std::mem::take(&mut self.endpoints) {
            children[self.quadrant(endpoint.coord)].insert(endpoint);
        }
        self.children = Some(children);
    }

    /// Remove one endpoint, returning whether it was found
    fn remove(&mut self, endpoint: &Endpoint) -> bool {
        let quadrant = self.quadrant(endpoint.coord);
        if let Some(children) = &mut self.children {
            return children[quadrant].remove(endpoint);
        }

        match self
            .endpoints
            .iter()
            .position(|e| e.line == endpoint.line && e.trailing == endpoint.trailing)
        {
            Some(pos) => {
                self.endpoints.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Branch-and-bound search for the best endpoint within `max_dist2` of `point`
    fn nearest_within(&self, point: Coord<f64>, max_dist2: f64, best: &mut Option<Candidate>) {
        // Equal distances are still explored: they may hold a lower insertion index
        let bound = best.map_or(max_dist2, |b| b.dist2);
        if rect_distance2(self.bounding_box, point) > bound {
            return;
        }

        if let Some(children) = &self.children {
            // Visit the nearest children first to tighten the bound early
            let mut order: [(f64, usize); 4] =
                std::array::from_fn(|i| (rect_distance2(children[i].bounding_box, point), i));
            order.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (_, i) in order {
                children[i].nearest_within(point, max_dist2, best);
            }
            return;
        }

        for endpoint in &self.endpoints {
            let dx = endpoint.coord.x - point.x;
            let dy = endpoint.coord.y - point.y;
            let candidate = Candidate {
                dist2: dx * dx + dy * dy,
                line: endpoint.line,
                trailing: endpoint.trailing,
            };
            if !(candidate.dist2 <= max_dist2) {
                continue;
            }
            if best.is_none_or(|b| candidate.beats(&b)) {
                *best = Some(candidate);
            }
        }
    }
}

/// Registered endpoints of a non-empty line
fn line_endpoints(
    line: &LineString<f64>,
    index: usize,
    reverse: bool,
) -> impl Iterator<Item = Endpoint> {
    let leading = line.0.first().map(|&coord| Endpoint {
        coord,
        line: index,
        trailing: false,
    });
    let trailing = line.0.last().filter(|_| reverse).map(|&coord| Endpoint {
        coord,
        line: index,
        trailing: true,
    });
    leading.into_iter().chain(trailing)
}

/// Bounding box of every endpoint that will be registered
fn endpoint_bounds(lines: &[LineString<f64>], reverse: bool) -> Rect<f64> {
    let mut min = Coord {
        x: f64::INFINITY,
        y: f64::INFINITY,
    };
    let mut max = Coord {
        x: f64::NEG_INFINITY,
        y: f64::NEG_INFINITY,
    };

    for (i, line) in lines.iter().enumerate() {
        for endpoint in line_endpoints(line, i, reverse) {
            let c = endpoint.coord;
            if !(c.x.is_finite() && c.y.is_finite()) {
                continue;
            }
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
    }

    if min.x > max.x || min.y > max.y {
        return Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 });
    }
    Rect::new(min, max)
}

/// Squared distance from a point to the closest point of a rectangle (0 inside)
#[inline]
fn rect_distance2(rect: Rect<f64>, point: Coord<f64>) -> f64 {
    let min = rect.min();
    let max = rect.max();
    let dx = (min.x - point.x).max(0.0).max(point.x - max.x);
    let dy = (min.y - point.y).max(0.0).max(point.y - max.y);
    dx * dx + dy * dy
}
