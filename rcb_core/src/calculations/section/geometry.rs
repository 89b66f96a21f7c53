//! # Polygon Geometry
//!
//! Plane geometry of a cross-section given as a simple polygon, measured in
//! mm with `y` pointing up toward the compression face.
//!
//! ## Notation
//!
//! - `A` = Gross area (shoelace formula)
//! - `x̄, ȳ` = Centroid
//! - `b(y)` = Width of the section cut by a horizontal line at height `y`
//! - `a` = Depth of the compression block measured down from the top fibre

use serde::{Deserialize, Serialize};

/// Subintervals used to integrate the compression block
pub const INTEGRATION_STEPS: usize = 100;

/// A vertex of the section outline (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned bounds of a vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounds of `vertices`, `None` when the list is empty
    pub fn of(vertices: &[Point]) -> Option<Self> {
        let first = vertices.first()?;
        let init = BoundingBox {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(vertices.iter().fold(init, |b, v| BoundingBox {
            min_x: b.min_x.min(v.x),
            max_x: b.max_x.max(v.x),
            min_y: b.min_y.min(v.y),
            max_y: b.max_y.max(v.y),
        }))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn mid_height(&self) -> f64 {
        (self.min_y + self.max_y) / 2.0
    }
}

/// Gross area and centroid by the shoelace formula.
///
/// # Formula
/// ```text
/// 2A   = Σ (xᵢ yᵢ₊₁ − xᵢ₊₁ yᵢ)
/// x̄    = Σ (xᵢ + xᵢ₊₁)(xᵢ yᵢ₊₁ − xᵢ₊₁ yᵢ) / 6A
/// ȳ    = Σ (yᵢ + yᵢ₊₁)(xᵢ yᵢ₊₁ − xᵢ₊₁ yᵢ) / 6A
/// ```
///
/// The centroid uses the signed area so either winding gives the same
/// point; the returned area is its absolute value.
///
/// # Returns
/// `(area, x̄, ȳ)`; all zero for fewer than 3 vertices or a degenerate
/// outline.
///
/// # Example
/// ```rust
/// use rcb_core::calculations::section::geometry::{area_and_centroid, Point};
///
/// let rect = [
///     Point::new(0.0, 0.0),
///     Point::new(300.0, 0.0),
///     Point::new(300.0, 500.0),
///     Point::new(0.0, 500.0),
/// ];
/// let (area, cx, cy) = area_and_centroid(&rect);
/// assert_eq!(area, 150_000.0);
/// assert_eq!((cx, cy), (150.0, 250.0));
/// ```
pub fn area_and_centroid(vertices: &[Point]) -> (f64, f64, f64) {
    let n = vertices.len();
    if n < 3 {
        return (0.0, 0.0, 0.0);
    }

    let mut signed_area = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for (i, vi) in vertices.iter().enumerate() {
        let vj = &vertices[(i + 1) % n];
        let cross = vi.x * vj.y - vj.x * vi.y;
        signed_area += cross;
        sum_x += (vi.x + vj.x) * cross;
        sum_y += (vi.y + vj.y) * cross;
    }
    signed_area /= 2.0;

    if signed_area == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    (signed_area.abs(), sum_x / (6.0 * signed_area), sum_y / (6.0 * signed_area))
}

/// Width of the section cut by the horizontal line at height `y` (mm).
///
/// Every edge crossing the line contributes one x-intercept. An edge counts
/// when `y_lo ≤ y < y_hi`, so a vertex lying on the line is met exactly once.
/// At the top fibre the rule flips to `y_lo < y ≤ y_hi`, which takes the
/// width from just inside the section instead of reporting zero.
///
/// The sorted intercepts are paired up and the spans summed, so a line
/// crossing two disjoint parts (the flange overhangs of an inverted U, two
/// webs of a double tee) reports the concrete actually cut, not the outer
/// span.
///
/// # Example
/// ```rust
/// use rcb_core::calculations::section::geometry::{width_at_y, Point};
///
/// // Tee: 600 wide flange 100 deep over a 250 wide web, 500 overall
/// let tee = [
///     Point::new(175.0, 0.0),
///     Point::new(425.0, 0.0),
///     Point::new(425.0, 400.0),
///     Point::new(600.0, 400.0),
///     Point::new(600.0, 500.0),
///     Point::new(0.0, 500.0),
///     Point::new(0.0, 400.0),
///     Point::new(175.0, 400.0),
/// ];
/// assert_eq!(width_at_y(&tee, 450.0), 600.0);
/// assert_eq!(width_at_y(&tee, 200.0), 250.0);
/// assert_eq!(width_at_y(&tee, 500.0), 600.0);
/// ```
pub fn width_at_y(vertices: &[Point], y: f64) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let at_top = BoundingBox::of(vertices).is_some_and(|b| y >= b.max_y);

    let mut intercepts: Vec<f64> = Vec::new();
    for (i, v1) in vertices.iter().enumerate() {
        let v2 = &vertices[(i + 1) % n];
        let (lo, hi) = if v1.y <= v2.y { (v1.y, v2.y) } else { (v2.y, v1.y) };
        let crosses = if at_top {
            lo < y && y <= hi
        } else {
            lo <= y && y < hi
        };
        if crosses {
            let t = (y - v1.y) / (v2.y - v1.y);
            intercepts.push(v1.x + t * (v2.x - v1.x));
        }
    }

    if intercepts.len() < 2 {
        return 0.0;
    }
    intercepts.sort_by(f64::total_cmp);
    intercepts.chunks_exact(2).map(|pair| pair[1] - pair[0]).sum()
}

/// Trapezoid integration of `b(y)` over the top `a` mm of the section.
///
/// Returns `(area, first moment about the top fibre)`.
fn integrate_block(vertices: &[Point], a: f64) -> (f64, f64) {
    let Some(bounds) = BoundingBox::of(vertices) else {
        return (0.0, 0.0);
    };
    if !(a > 0.0) {
        return (0.0, 0.0);
    }

    let dy = a / INTEGRATION_STEPS as f64;
    let mut area = 0.0;
    let mut moment = 0.0;
    let mut w_upper = width_at_y(vertices, bounds.max_y);
    for i in 0..INTEGRATION_STEPS {
        // Land the last node exactly on `a`
        let depth = if i + 1 == INTEGRATION_STEPS { a } else { (i + 1) as f64 * dy };
        let w_lower = width_at_y(vertices, bounds.max_y - depth);
        let da = (w_upper + w_lower) / 2.0 * dy;
        area += da;
        moment += da * (i as f64 + 0.5) * dy;
        w_upper = w_lower;
    }
    (area, moment)
}

/// Area of the compression block of depth `a` below the top fibre (mm²).
///
/// Composite trapezoid rule over [`INTEGRATION_STEPS`] subintervals.
pub fn compression_block_area(vertices: &[Point], a: f64) -> f64 {
    integrate_block(vertices, a).0
}

/// Depth from the top fibre to the centroid of the compression block (mm).
///
/// Returns `a / 2` when the block has no area.
pub fn compression_block_centroid(vertices: &[Point], a: f64) -> f64 {
    let (area, moment) = integrate_block(vertices, a);
    if area > 0.0 {
        moment / area
    } else {
        a / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle(b: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(b, 0.0),
            Point::new(b, h),
            Point::new(0.0, h),
        ]
    }

    fn tee() -> Vec<Point> {
        vec![
            Point::new(175.0, 0.0),
            Point::new(425.0, 0.0),
            Point::new(425.0, 400.0),
            Point::new(600.0, 400.0),
            Point::new(600.0, 500.0),
            Point::new(0.0, 500.0),
            Point::new(0.0, 400.0),
            Point::new(175.0, 400.0),
        ]
    }

    #[test]
    fn test_area_and_centroid_either_winding() {
        let ccw = rectangle(300.0, 500.0);
        let cw: Vec<Point> = ccw.iter().rev().copied().collect();

        assert_eq!(area_and_centroid(&ccw), (150_000.0, 150.0, 250.0));
        assert_eq!(area_and_centroid(&cw), (150_000.0, 150.0, 250.0));
    }

    #[test]
    fn test_tee_centroid() {
        let (area, cx, cy) = area_and_centroid(&tee());
        // Flange 600x100 at 450, web 250x400 at 200
        assert!((area - 160_000.0).abs() < 1e-6);
        assert!((cx - 300.0).abs() < 1e-9);
        let expected = (60_000.0 * 450.0 + 100_000.0 * 200.0) / 160_000.0;
        assert!((cy - expected).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_outline() {
        let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(area_and_centroid(&line), (0.0, 0.0, 0.0));
        assert_eq!(width_at_y(&line, 0.5), 0.0);
        assert_eq!(compression_block_area(&[], 10.0), 0.0);
    }

    #[test]
    fn test_width_at_extreme_fibres() {
        let rect = rectangle(300.0, 500.0);
        assert_eq!(width_at_y(&rect, 0.0), 300.0);
        assert_eq!(width_at_y(&rect, 250.0), 300.0);
        assert_eq!(width_at_y(&rect, 500.0), 300.0);
        assert_eq!(width_at_y(&rect, 501.0), 0.0);
        assert_eq!(width_at_y(&rect, -1.0), 0.0);
    }

    #[test]
    fn test_width_of_trapezoid() {
        // 200 wide at the bottom, 400 wide at the top
        let trap = [
            Point::new(100.0, 0.0),
            Point::new(300.0, 0.0),
            Point::new(400.0, 600.0),
            Point::new(0.0, 600.0),
        ];
        assert!((width_at_y(&trap, 300.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_width_counts_separate_spans() {
        // Channel opening downward: two 100 wide legs under a 100 deep top
        let channel = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 300.0),
            Point::new(300.0, 300.0),
            Point::new(300.0, 0.0),
            Point::new(400.0, 0.0),
            Point::new(400.0, 400.0),
            Point::new(0.0, 400.0),
        ];
        assert_eq!(width_at_y(&channel, 150.0), 200.0);
        assert_eq!(width_at_y(&channel, 350.0), 400.0);
    }

    #[test]
    fn test_rectangle_block_area_and_centroid() {
        let rect = rectangle(300.0, 500.0);
        let area = compression_block_area(&rect, 100.0);
        assert!((area - 30_000.0).abs() < 1e-6);
        assert!((compression_block_centroid(&rect, 100.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_tee_block_into_web() {
        // a = 150: 600x100 flange + 250x50 web. One trapezoid straddles
        // the flange soffit, so allow a little integration error.
        let area = compression_block_area(&tee(), 150.0);
        assert!((area - 72_500.0).abs() / 72_500.0 < 0.005);

        let expected = (60_000.0 * 50.0 + 12_500.0 * 125.0) / 72_500.0;
        assert!((compression_block_centroid(&tee(), 150.0) - expected).abs() < 0.5);
    }

    #[test]
    fn test_zero_depth_block() {
        let rect = rectangle(300.0, 500.0);
        assert_eq!(compression_block_area(&rect, 0.0), 0.0);
        assert_eq!(compression_block_centroid(&rect, 0.0), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rectangle_block_area_is_b_times_a(
                b in 100.0f64..1000.0,
                h in 200.0f64..1500.0,
                frac in 0.0f64..=1.0,
            ) {
                let a = frac * h;
                let area = compression_block_area(&rectangle(b, h), a);
                let exact = b * a;
                prop_assert!((area - exact).abs() <= 1e-3 * exact + 1e-6);
            }

            #[test]
            fn width_inside_rectangle_is_b(
                b in 100.0f64..1000.0,
                h in 200.0f64..1500.0,
                frac in 0.0f64..=1.0,
            ) {
                prop_assert!((width_at_y(&rectangle(b, h), frac * h) - b).abs() < 1e-9);
            }
        }
    }
}
