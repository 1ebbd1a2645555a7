//! Path geometry for series lines.
//!
//! Points are joined with a uniform cubic B-spline (the "basis" curve common in charting
//! libraries): the curve starts and ends at the outer points and is pulled towards the
//! inner ones. Missing values split the line into separate sub-paths.
//!
//! Besides SVG path data this module measures the path, because the reveal animation works
//! on stroke length: with a dash array of `[L, L]` and an offset `o`, exactly the first
//! `L - o` units of the path are painted. [`PathGeometry::prefix`] returns that part as
//! polylines for backends without dash support.

use std::fmt::Write;

/// Cubic segments are flattened into this many chords for length and prefix queries.
const CUBIC_STEPS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn dist(self, o: Point) -> f64 {
        (self.x - o.x).hypot(self.y - o.y)
    }

    fn lerp(self, o: Point, t: f64) -> Point {
        Point::new(self.x + (o.x - self.x) * t, self.y + (o.y - self.y) * t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Point),
    Cubic(Point, Point, Point),
}

/// One continuous stroke: a start point and the segments that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub start: Point,
    pub segments: Vec<Segment>,
}

impl SubPath {
    /// Polyline approximation, starting at `start`.
    pub fn flatten(&self) -> Vec<Point> {
        let mut out = vec![self.start];
        let mut cur = self.start;
        for seg in &self.segments {
            match *seg {
                Segment::Line(p) => {
                    out.push(p);
                    cur = p;
                }
                Segment::Cubic(c1, c2, p) => {
                    for i in 1..=CUBIC_STEPS {
                        out.push(cubic_at(cur, c1, c2, p, i as f64 / CUBIC_STEPS as f64));
                    }
                    cur = p;
                }
            }
        }
        out
    }

    pub fn length(&self) -> f64 {
        polyline_length(&self.flatten())
    }
}

/// A series line, possibly broken into several sub-paths by missing values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathGeometry {
    pub subpaths: Vec<SubPath>,
}

impl PathGeometry {
    /// Basis curve through `points`; `None` entries break the line.
    pub fn basis(points: &[Option<Point>]) -> Self {
        let subpaths = points
            .split(|p| p.is_none())
            .filter(|run| !run.is_empty())
            .map(|run| {
                let run: Vec<Point> = run.iter().flatten().copied().collect();
                basis_subpath(&run)
            })
            .collect();
        Self { subpaths }
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Total stroke length, in the same units as the points.
    pub fn total_length(&self) -> f64 {
        self.subpaths.iter().map(SubPath::length).sum()
    }

    /// SVG path data (`M`, `L`, `C` commands).
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        for sp in &self.subpaths {
            let _ = write!(d, "M{},{}", fmt_num(sp.start.x), fmt_num(sp.start.y));
            for seg in &sp.segments {
                let _ = match *seg {
                    Segment::Line(p) => write!(d, "L{},{}", fmt_num(p.x), fmt_num(p.y)),
                    Segment::Cubic(c1, c2, p) => write!(
                        d,
                        "C{},{},{},{},{},{}",
                        fmt_num(c1.x),
                        fmt_num(c1.y),
                        fmt_num(c2.x),
                        fmt_num(c2.y),
                        fmt_num(p.x),
                        fmt_num(p.y)
                    ),
                };
            }
        }
        d
    }

    /// The first `len` units of the stroke, as polylines.
    ///
    /// Dash patterns run continuously across sub-paths, so the budget carries over.
    pub fn prefix(&self, len: f64) -> Vec<Vec<Point>> {
        let mut budget = len;
        let mut out = Vec::new();
        for sp in &self.subpaths {
            if budget <= 0.0 {
                break;
            }
            let pts = sp.flatten();
            let mut kept = vec![pts[0]];
            for w in pts.windows(2) {
                let d = w[0].dist(w[1]);
                if d <= budget {
                    kept.push(w[1]);
                    budget -= d;
                } else {
                    if d > 0.0 {
                        kept.push(w[0].lerp(w[1], budget / d));
                    }
                    budget = 0.0;
                    break;
                }
            }
            if kept.len() > 1 {
                out.push(kept);
            }
        }
        out
    }
}

fn basis_subpath(points: &[Point]) -> SubPath {
    let start = points[0];
    let mut segments = Vec::new();
    match points.len() {
        1 => {}
        2 => segments.push(Segment::Line(points[1])),
        _ => {
            let (p0, p1) = (points[0], points[1]);
            segments.push(Segment::Line(Point::new(
                (5.0 * p0.x + p1.x) / 6.0,
                (5.0 * p0.y + p1.y) / 6.0,
            )));
            let mut a = p0;
            let mut b = p1;
            for &p in &points[2..] {
                segments.push(basis_segment(a, b, p));
                a = b;
                b = p;
            }
            segments.push(basis_segment(a, b, b));
            segments.push(Segment::Line(b));
        }
    }
    SubPath { start, segments }
}

fn basis_segment(a: Point, b: Point, c: Point) -> Segment {
    Segment::Cubic(
        Point::new((2.0 * a.x + b.x) / 3.0, (2.0 * a.y + b.y) / 3.0),
        Point::new((a.x + 2.0 * b.x) / 3.0, (a.y + 2.0 * b.y) / 3.0),
        Point::new((a.x + 4.0 * b.x + c.x) / 6.0, (a.y + 4.0 * b.y + c.y) / 6.0),
    )
}

fn cubic_at(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * c1.x + c * c2.x + d * p3.x,
        a * p0.y + b * c1.y + c * c2.y + d * p3.y,
    )
}

pub fn polyline_length(pts: &[Point]) -> f64 {
    pts.windows(2).map(|w| w[0].dist(w[1])).sum()
}

/// Compact coordinate formatting: at most three decimals, no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
