//! Zone bounds and the prepared `Shape` used for containment and sampling.
//!
//! # Data layout
//!
//! `Bounds` is what the store configuration supplies.  `Shape::new` validates
//! it once and precomputes everything the hot paths need:
//!
//! - area and centroid,
//! - the axis-aligned bounding box (fed to the R-tree in `ZoneModel`),
//! - for polygons, a counter-clockwise vertex ring and an ear-clipped
//!   triangle list with cumulative areas for O(log T) area-weighted picks.

use rand::Rng;
use serde::{Deserialize, Serialize};

use cf_core::Point;

/// Absolute tolerance for boundary tests and degeneracy checks.
pub const EPSILON: f64 = 1e-9;

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Geometric bounds of a zone in store-local coordinates.
///
/// In JSON: `{"rect": {"min": {..}, "max": {..}}}` or
/// `{"polygon": [{"x": .., "y": ..}, ..]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bounds {
    /// Axis-aligned rectangle.
    Rect { min: Point, max: Point },
    /// Simple polygon, either winding.  A closing vertex equal to the first
    /// one is accepted and ignored.
    Polygon(Vec<Point>),
}

impl Bounds {
    pub fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Bounds::Rect { min: Point::new(min_x, min_y), max: Point::new(max_x, max_y) }
    }
}

// ── Shape ─────────────────────────────────────────────────────────────────────

/// Validated, preprocessed zone geometry.
#[derive(Clone, Debug)]
pub struct Shape {
    bounds:     Bounds,
    area:       f64,
    centroid:   Point,
    bbox_min:   Point,
    bbox_max:   Point,
    /// Counter-clockwise vertex ring.  Empty for rectangles.
    ring:       Vec<Point>,
    /// Ear-clipped triangles.  Empty for rectangles.
    triangles:  Vec<[Point; 3]>,
    /// `cumulative[i]` = total area of `triangles[..=i]`.
    cumulative: Vec<f64>,
}

impl Shape {
    /// Validate `bounds` and precompute sampling data.
    ///
    /// Returns a human-readable reason on failure; `ZoneModel` wraps it in
    /// `ZoneError::InvalidGeometry` with the zone id attached.
    pub fn new(bounds: Bounds) -> Result<Self, String> {
        match &bounds {
            Bounds::Rect { min, max } => {
                let (min, max) = (*min, *max);
                if !min.is_finite() || !max.is_finite() {
                    return Err("non-finite rectangle corner".into());
                }
                let (w, h) = (max.x - min.x, max.y - min.y);
                if w <= EPSILON || h <= EPSILON {
                    return Err(format!("rectangle has zero area ({w} x {h})"));
                }
                Ok(Self {
                    area:       w * h,
                    centroid:   Point::new(min.x + w * 0.5, min.y + h * 0.5),
                    bbox_min:   min,
                    bbox_max:   max,
                    ring:       Vec::new(),
                    triangles:  Vec::new(),
                    cumulative: Vec::new(),
                    bounds,
                })
            }
            Bounds::Polygon(points) => {
                let mut ring = points.clone();
                if ring.len() > 1 && ring.first() == ring.last() {
                    ring.pop();
                }
                if ring.len() < 3 {
                    return Err(format!("polygon needs at least 3 vertices, got {}", ring.len()));
                }
                if ring.iter().any(|p| !p.is_finite()) {
                    return Err("non-finite polygon vertex".into());
                }
                if let Some((i, j)) = crossing_edges(&ring) {
                    return Err(format!("polygon is not simple: edges {i} and {j} cross or touch"));
                }

                let signed = signed_area(&ring);
                if signed.abs() <= EPSILON {
                    return Err("polygon has zero area".into());
                }
                if signed < 0.0 {
                    ring.reverse();
                }
                let area = signed.abs();

                let triangles = ear_clip(&ring).ok_or_else(|| "polygon could not be triangulated".to_string())?;
                let mut cumulative = Vec::with_capacity(triangles.len());
                let mut running = 0.0;
                for t in &triangles {
                    running += triangle_area(t[0], t[1], t[2]);
                    cumulative.push(running);
                }

                let (bbox_min, bbox_max) = bbox(&ring);
                Ok(Self {
                    centroid: polygon_centroid(&ring, area),
                    area,
                    bbox_min,
                    bbox_max,
                    ring,
                    triangles,
                    cumulative,
                    bounds,
                })
            }
        }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bbox(&self) -> (Point, Point) {
        (self.bbox_min, self.bbox_max)
    }

    /// Boundary-inclusive containment test (within [`EPSILON`]).
    pub fn contains(&self, p: Point) -> bool {
        if !p.is_finite() {
            return false;
        }
        let (lo, hi) = (self.bbox_min, self.bbox_max);
        if p.x < lo.x - EPSILON || p.x > hi.x + EPSILON || p.y < lo.y - EPSILON || p.y > hi.y + EPSILON {
            return false;
        }
        match self.bounds {
            Bounds::Rect { .. } => true,
            Bounds::Polygon(_) => on_boundary(&self.ring, p) || ray_cast(&self.ring, p),
        }
    }

    /// Uniformly distributed point inside the shape.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        match self.bounds {
            Bounds::Rect { min, max } => {
                Point::new(rng.gen_range(min.x..max.x), rng.gen_range(min.y..max.y))
            }
            Bounds::Polygon(_) => {
                let pick = rng.r#gen::<f64>() * self.area;
                let i = self
                    .cumulative
                    .partition_point(|&c| c <= pick)
                    .min(self.triangles.len() - 1);
                let [a, b, c] = self.triangles[i];

                let (mut r1, mut r2): (f64, f64) = (rng.r#gen(), rng.r#gen());
                if r1 + r2 > 1.0 {
                    r1 = 1.0 - r1;
                    r2 = 1.0 - r2;
                }
                Point::new(
                    a.x + r1 * (b.x - a.x) + r2 * (c.x - a.x),
                    a.y + r1 * (b.y - a.y) + r2 * (c.y - a.y),
                )
            }
        }
    }
}

// ── Polygon helpers ───────────────────────────────────────────────────────────

/// Shoelace formula.  Positive for counter-clockwise rings.
fn signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

fn polygon_centroid(ring: &[Point], area: f64) -> Point {
    let n = ring.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    // `ring` is counter-clockwise here, so the signed area equals `area`.
    Point::new(cx / (6.0 * area), cy / (6.0 * area))
}

fn bbox(ring: &[Point]) -> (Point, Point) {
    let mut lo = Point::new(f64::INFINITY, f64::INFINITY);
    let mut hi = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in ring {
        lo.x = lo.x.min(p.x);
        lo.y = lo.y.min(p.y);
        hi.x = hi.x.max(p.x);
        hi.y = hi.y.max(p.y);
    }
    (lo, hi)
}

/// z-component of `(b - a) × (c - a)`.
#[inline]
fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[inline]
fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    cross(a, b, c).abs() * 0.5
}

fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    cross(a, b, p) >= -EPSILON && cross(b, c, p) >= -EPSILON && cross(c, a, p) >= -EPSILON
}

/// Triangulate a counter-clockwise simple polygon by ear clipping.
///
/// Collinear vertices are dropped without emitting a triangle.  Returns `None`
/// when no ear can be found.
fn ear_clip(ring: &[Point]) -> Option<Vec<[Point; 3]>> {
    let mut idx: Vec<usize> = (0..ring.len()).collect();
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));

    while idx.len() > 3 {
        let m = idx.len();
        let mut clipped = false;

        for i in 0..m {
            let (ia, ib, ic) = (idx[(i + m - 1) % m], idx[i], idx[(i + 1) % m]);
            let (a, b, c) = (ring[ia], ring[ib], ring[ic]);
            let turn = cross(a, b, c);

            if turn.abs() <= EPSILON {
                idx.remove(i);
                clipped = true;
                break;
            }
            if turn < 0.0 {
                continue; // reflex vertex
            }
            let blocked = idx.iter().any(|&j| {
                j != ia
                    && j != ib
                    && j != ic
                    && ring[j] != a
                    && ring[j] != b
                    && ring[j] != c
                    && point_in_triangle(ring[j], a, b, c)
            });
            if blocked {
                continue;
            }

            triangles.push([a, b, c]);
            idx.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            return None;
        }
    }

    let (a, b, c) = (ring[idx[0]], ring[idx[1]], ring[idx[2]]);
    if cross(a, b, c) > EPSILON {
        triangles.push([a, b, c]);
    }
    if triangles.is_empty() { None } else { Some(triangles) }
}

/// First pair of non-adjacent edges that intersect, touching included.
/// Edge `i` runs from `ring[i]` to `ring[i + 1]`.
fn crossing_edges(ring: &[Point]) -> Option<(usize, usize)> {
    let n = ring.len();
    for i in 0..n {
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue; // shares ring[0]
            }
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            let (c, d) = (ring[j], ring[(j + 1) % n]);
            if segments_meet(a, b, c, d) {
                return Some((i, j));
            }
        }
    }
    None
}

fn segments_meet(a: Point, b: Point, c: Point, d: Point) -> bool {
    let (d1, d2) = (cross(c, d, a), cross(c, d, b));
    let (d3, d4) = (cross(a, b, c), cross(a, b, d));
    let straddles = |p: f64, q: f64| (p > EPSILON && q < -EPSILON) || (p < -EPSILON && q > EPSILON);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }
    segment_distance(a, c, d) <= EPSILON
        || segment_distance(b, c, d) <= EPSILON
        || segment_distance(c, a, b) <= EPSILON
        || segment_distance(d, a, b) <= EPSILON
}

fn on_boundary(ring: &[Point], p: Point) -> bool {
    let n = ring.len();
    (0..n).any(|i| segment_distance(p, ring[i], ring[(i + 1) % n]) <= EPSILON)
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Even-odd ray cast towards +x.
fn ray_cast(ring: &[Point], p: Point) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
