// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Enclosed region detection over wall centerlines.
//!
//! Wall segments are split at every crossing and T-junction, welded into a
//! planar graph and traced face by face. Faces with positive signed area are
//! enclosed regions; faces with negative area are the outer boundaries of
//! connected wall groups and become holes of the region that surrounds them.

use nalgebra::{Point2, Vector2};
use rustc_hash::FxHashSet;

use crate::spatial::VertexGrid;

/// A straight boundary segment in plan coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + self.direction() * t
    }
}

/// A closed region bounded by segments.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Counter-clockwise outer boundary.
    pub boundary: Vec<Point2<f64>>,
    /// Boundaries of wall groups standing free inside the region.
    pub holes: Vec<Vec<Point2<f64>>>,
    /// Enclosed area with holes subtracted.
    pub area: f64,
}

impl Circuit {
    /// Whether `p` lies inside the region and outside all of its holes.
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        point_in_polygon(p, &self.boundary)
            && !self.holes.iter().any(|hole| point_in_polygon(p, hole))
    }

    /// Finds a point strictly inside the region.
    ///
    /// The boundary centroid is used when it falls inside; otherwise
    /// horizontal scanlines are tried at progressively finer fractions of the
    /// height and the midpoint of the widest inside span is taken.
    pub fn interior_point(&self) -> Option<Point2<f64>> {
        if let Some(centroid) = polygon_centroid(&self.boundary) {
            if self.contains(&centroid) {
                return Some(centroid);
            }
        }

        let (min_y, max_y) = self
            .boundary
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        if !min_y.is_finite() || max_y <= min_y {
            return None;
        }

        for fraction in SCANLINE_FRACTIONS {
            let y = min_y + (max_y - min_y) * fraction;
            let mut xs = scanline_crossings(&self.boundary, y);
            for hole in &self.holes {
                xs.extend(scanline_crossings(hole, y));
            }
            xs.sort_by(f64::total_cmp);

            let widest = xs
                .chunks_exact(2)
                .filter(|span| span[1] > span[0])
                .max_by(|a, b| (a[1] - a[0]).total_cmp(&(b[1] - b[0])));
            if let Some(span) = widest {
                let candidate = Point2::new((span[0] + span[1]) / 2.0, y);
                if self.contains(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

const SCANLINE_FRACTIONS: [f64; 7] = [0.5, 0.25, 0.75, 0.125, 0.375, 0.625, 0.875];

/// Detects every enclosed region formed by `segments`.
///
/// Endpoints and crossings closer than `tolerance` are treated as one vertex.
/// Regions are returned in a deterministic order for a given input.
pub fn detect_circuits(segments: &[Segment], tolerance: f64) -> Vec<Circuit> {
    let tolerance = tolerance.max(1e-9);
    let segments: Vec<Segment> = segments
        .iter()
        .copied()
        .filter(|s| s.direction().norm() > tolerance)
        .collect();
    if segments.len() < 3 {
        return Vec::new();
    }

    let splits = split_parameters(&segments, tolerance);
    let mut grid = VertexGrid::new(tolerance);
    let mut seen = FxHashSet::default();
    let mut edges = Vec::new();

    for (segment, params) in segments.iter().zip(&splits) {
        let mut previous: Option<usize> = None;
        for &t in params {
            let v = grid.weld(segment.point_at(t));
            if let Some(u) = previous {
                let key = (u.min(v), u.max(v));
                if u != v && seen.insert(key) {
                    edges.push(key);
                }
            }
            previous = Some(v);
        }
    }

    let points = grid.into_points();
    let graph = PlanarGraph::new(&points, &edges);
    let components = graph.components();
    let area_epsilon = tolerance * tolerance;

    let mut bounded: Vec<Face> = Vec::new();
    let mut outers: Vec<Face> = Vec::new();
    for cycle in graph.faces() {
        let polygon: Vec<Point2<f64>> = cycle.iter().map(|&v| points[v]).collect();
        let area = signed_area(&polygon);
        let face = Face {
            component: components[cycle[0]],
            gross_area: area.abs(),
            polygon,
            holes: Vec::new(),
        };
        if area > area_epsilon {
            bounded.push(face);
        } else if area < -area_epsilon {
            outers.push(face);
        }
    }

    for outer in outers {
        let sample = outer.polygon[0];
        let container = bounded
            .iter_mut()
            .filter(|f| f.component != outer.component && point_in_polygon(&sample, &f.polygon))
            .min_by(|a, b| a.gross_area.total_cmp(&b.gross_area));
        if let Some(face) = container {
            face.holes.push(outer);
        }
    }

    bounded
        .into_iter()
        .map(|face| {
            let hole_area: f64 = face.holes.iter().map(|h| h.gross_area).sum();
            Circuit {
                area: (face.gross_area - hole_area).max(0.0),
                boundary: face.polygon,
                holes: face.holes.into_iter().map(|h| h.polygon).collect(),
            }
        })
        .collect()
}

#[derive(Debug)]
struct Face {
    component: usize,
    gross_area: f64,
    polygon: Vec<Point2<f64>>,
    holes: Vec<Face>,
}

/// Sorted split parameters along each segment, including both endpoints.
fn split_parameters(segments: &[Segment], tolerance: f64) -> Vec<Vec<f64>> {
    let mut params: Vec<Vec<f64>> = vec![vec![0.0, 1.0]; segments.len()];
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            for (ti, tj) in intersections(&segments[i], &segments[j], tolerance) {
                params[i].push(ti);
                params[j].push(tj);
            }
        }
    }
    for p in &mut params {
        p.sort_by(f64::total_cmp);
        p.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
    }
    params
}

/// Parameter pairs at which two segments touch, within tolerance.
fn intersections(a: &Segment, b: &Segment, tolerance: f64) -> Vec<(f64, f64)> {
    let r = a.direction();
    let s = b.direction();
    let qp = b.start - a.start;
    let r_len = r.norm();
    let s_len = s.norm();
    let denom = cross(&r, &s);

    if denom.abs() <= 1e-12 * r_len * s_len {
        // Parallel: only collinear overlaps matter.
        if cross(&qp, &r).abs() / r_len > tolerance {
            return Vec::new();
        }
        let mut hits = Vec::new();
        let (lo_r, hi_r) = (-tolerance / r_len, 1.0 + tolerance / r_len);
        for (point, u) in [(b.start, 0.0), (b.end, 1.0)] {
            let t = (point - a.start).dot(&r) / (r_len * r_len);
            if t >= lo_r && t <= hi_r {
                hits.push((t.clamp(0.0, 1.0), u));
            }
        }
        let (lo_s, hi_s) = (-tolerance / s_len, 1.0 + tolerance / s_len);
        for (point, t) in [(a.start, 0.0), (a.end, 1.0)] {
            let u = (point - b.start).dot(&s) / (s_len * s_len);
            if u >= lo_s && u <= hi_s {
                hits.push((t, u.clamp(0.0, 1.0)));
            }
        }
        return hits;
    }

    let t = cross(&qp, &s) / denom;
    let u = cross(&qp, &r) / denom;
    let slack_t = tolerance / r_len;
    let slack_u = tolerance / s_len;
    if t >= -slack_t && t <= 1.0 + slack_t && u >= -slack_u && u <= 1.0 + slack_u {
        vec![(t.clamp(0.0, 1.0), u.clamp(0.0, 1.0))]
    } else {
        Vec::new()
    }
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Half-edge view of an undirected planar graph.
///
/// Half-edge `2k` runs along edge `k` from its first to its second vertex,
/// `2k + 1` runs back.
struct PlanarGraph<'p> {
    points: &'p [Point2<f64>],
    edges: &'p [(usize, usize)],
    /// Outgoing half-edges per vertex, sorted counter-clockwise by angle.
    outgoing: Vec<Vec<usize>>,
    /// Position of each half-edge within its origin's outgoing list.
    slot: Vec<usize>,
}

impl<'p> PlanarGraph<'p> {
    fn new(points: &'p [Point2<f64>], edges: &'p [(usize, usize)]) -> Self {
        let mut outgoing = vec![Vec::new(); points.len()];
        for (k, &(a, b)) in edges.iter().enumerate() {
            outgoing[a].push(2 * k);
            outgoing[b].push(2 * k + 1);
        }

        let mut graph = Self {
            points,
            edges,
            outgoing: Vec::new(),
            slot: vec![0; edges.len() * 2],
        };
        for list in &mut outgoing {
            list.sort_by(|&h1, &h2| graph.angle(h1).total_cmp(&graph.angle(h2)));
            for (position, &h) in list.iter().enumerate() {
                graph.slot[h] = position;
            }
        }
        graph.outgoing = outgoing;
        graph
    }

    fn origin(&self, h: usize) -> usize {
        let (a, b) = self.edges[h / 2];
        if h % 2 == 0 {
            a
        } else {
            b
        }
    }

    fn angle(&self, h: usize) -> f64 {
        let d = self.points[self.origin(h ^ 1)] - self.points[self.origin(h)];
        d.y.atan2(d.x)
    }

    /// Next half-edge around the face to the left of `h`: at the end vertex,
    /// the clockwise neighbour of the twin.
    fn next(&self, h: usize) -> usize {
        let twin = h ^ 1;
        let list = &self.outgoing[self.origin(twin)];
        list[(self.slot[twin] + list.len() - 1) % list.len()]
    }

    /// Vertex cycles of every face, including unbounded ones.
    fn faces(&self) -> Vec<Vec<usize>> {
        let count = self.edges.len() * 2;
        let mut visited = vec![false; count];
        let mut faces = Vec::new();

        for start in 0..count {
            if visited[start] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut h = start;
            loop {
                visited[h] = true;
                cycle.push(self.origin(h));
                h = self.next(h);
                if h == start || visited[h] {
                    break;
                }
            }
            faces.push(cycle);
        }
        faces
    }

    /// Connected component representative for every vertex.
    fn components(&self) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.points.len()).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        for &(a, b) in self.edges {
            let ra = find(&mut parent, a);
            let rb = find(&mut parent, b);
            if ra != rb {
                parent[ra.max(rb)] = ra.min(rb);
            }
        }
        (0..parent.len()).map(|v| find(&mut parent, v)).collect()
    }
}

/// Shoelace formula. Positive for counter-clockwise polygons.
pub fn signed_area(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let p = &polygon[i];
            let q = &polygon[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice / 2.0
}

/// Even-odd containment test.
pub fn point_in_polygon(p: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&polygon[i], &polygon[j]);
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

fn polygon_centroid(polygon: &[Point2<f64>]) -> Option<Point2<f64>> {
    let area = signed_area(polygon);
    if area.abs() < f64::EPSILON {
        return None;
    }
    let n = polygon.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let p = &polygon[i];
        let q = &polygon[(i + 1) % n];
        let w = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * w;
        cy += (p.y + q.y) * w;
    }
    Some(Point2::new(cx / (6.0 * area), cy / (6.0 * area)))
}

fn scanline_crossings(polygon: &[Point2<f64>], y: f64) -> Vec<f64> {
    let n = polygon.len();
    (0..n)
        .filter_map(|i| {
            let a = &polygon[i];
            let b = &polygon[(i + 1) % n];
            ((a.y > y) != (b.y > y)).then(|| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
        })
        .collect()
}
