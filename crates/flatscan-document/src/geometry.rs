// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry helpers: corner ordering, distances, and polygon areas.

use flatscan_core::error::{FlatscanError, Result};
use flatscan_core::{Point, Quadrilateral};

/// Order four corners as `[top_left, top_right, bottom_right, bottom_left]`.
///
/// The top-left corner has the smallest `x + y` and the bottom-right the
/// largest. The top-right corner has the smallest `y - x` and the
/// bottom-left the largest.
///
/// Fails with [`FlatscanError::Geometry`] when an extreme value is shared by
/// two points, or when the four picks do not land on four distinct points.
/// Ties away from the extremes are harmless.
pub fn order_points(points: [Point; 4]) -> Result<Quadrilateral> {
    let sums = points.map(|p| p.x + p.y);
    let diffs = points.map(|p| p.y - p.x);

    let top_left = unique_extreme(&sums, Extreme::Min, "x + y minimum")?;
    let bottom_right = unique_extreme(&sums, Extreme::Max, "x + y maximum")?;
    let top_right = unique_extreme(&diffs, Extreme::Min, "y - x minimum")?;
    let bottom_left = unique_extreme(&diffs, Extreme::Max, "y - x maximum")?;

    let picks = [top_left, top_right, bottom_right, bottom_left];
    for i in 0..picks.len() {
        for j in (i + 1)..picks.len() {
            if picks[i] == picks[j] {
                return Err(FlatscanError::Geometry(format!(
                    "point {:?} selected for two corners",
                    points[picks[i]]
                )));
            }
        }
    }

    Ok(Quadrilateral::new(picks.map(|i| points[i])))
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    a.distance(&b)
}

/// Enclosed area of a closed polygon (shoelace formula, always non-negative).
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    twice_area.abs() / 2.0
}

/// Perimeter of a closed polygon.
pub fn arc_length(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].distance(&points[(i + 1) % n]) as f64)
        .sum()
}

/// Simplify a closed contour with the Douglas-Peucker algorithm.
///
/// The contour is split at its first point and the point farthest from it,
/// and each half is simplified as an open chain. Vertices closer than
/// `epsilon` to the simplified outline are dropped.
pub fn approximate_polygon(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n <= 3 {
        return points.to_vec();
    }

    let origin = points[0];
    let mut far = 0;
    let mut far_dist = 0.0f32;
    for (i, p) in points.iter().enumerate().skip(1) {
        let d = origin.distance(p);
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }
    if far == 0 {
        return vec![origin];
    }

    let mut first: Vec<Point> = points[..=far].to_vec();
    let mut second: Vec<Point> = points[far..].to_vec();
    second.push(origin);

    first = douglas_peucker(&first, epsilon);
    second = douglas_peucker(&second, epsilon);

    // Both chains end where the other starts.
    first.pop();
    second.pop();
    first.extend(second);
    first
}

/// Open-chain Douglas-Peucker; the endpoints are always kept.
fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end - start <= 1 {
            continue;
        }
        let mut max_dist = 0.0f64;
        let mut max_index = start;
        for i in (start + 1)..end {
            let d = point_to_segment_distance(points[i], points[start], points[end]);
            if d > max_dist {
                max_dist = d;
                max_index = i;
            }
        }
        if max_dist > epsilon {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (px - ax).hypot(py - ay);
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    (px - (ax + t * dx)).hypot(py - (ay + t * dy))
}

/// Convex hull (Andrew's monotone chain). Collinear points are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x as f64 - o.x as f64) * (b.y as f64 - o.y as f64)
        - (a.y as f64 - o.y as f64) * (b.x as f64 - o.x as f64)
}

#[derive(Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

/// Index of the single smallest/largest value, or a geometry error on a tie.
fn unique_extreme(values: &[f32; 4], which: Extreme, label: &str) -> Result<usize> {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        let better = match which {
            Extreme::Min => v < values[best],
            Extreme::Max => v > values[best],
        };
        if better {
            best = i;
        }
    }
    let ties = values.iter().filter(|&&v| v == values[best]).count();
    if ties > 1 || !values[best].is_finite() {
        return Err(FlatscanError::Geometry(format!(
            "ambiguous corner ordering: {label} shared by {ties} points"
        )));
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: [(f32, f32); 4]) -> [Point; 4] {
        raw.map(Point::from)
    }

    #[test]
    fn orders_shuffled_axis_aligned_rectangle() {
        let quad = order_points(pts([(100.0, 50.0), (0.0, 0.0), (0.0, 50.0), (100.0, 0.0)])).unwrap();
        assert_eq!(quad.top_left(), Point::new(0.0, 0.0));
        assert_eq!(quad.top_right(), Point::new(100.0, 0.0));
        assert_eq!(quad.bottom_right(), Point::new(100.0, 50.0));
        assert_eq!(quad.bottom_left(), Point::new(0.0, 50.0));
    }

    /// A square shares its off-diagonal sums; only the extremes matter.
    #[test]
    fn square_with_non_extremal_ties_is_accepted() {
        let quad = order_points(pts([(0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)])).unwrap();
        assert_eq!(quad.top_left(), Point::new(0.0, 0.0));
        assert_eq!(quad.bottom_right(), Point::new(10.0, 10.0));
    }

    #[test]
    fn orders_slightly_rotated_quadrilateral() {
        let quad = order_points(pts([
            (412.0, 37.0),
            (31.0, 22.0),
            (398.0, 580.0),
            (18.0, 560.0),
        ]))
        .unwrap();
        assert_eq!(quad.top_left(), Point::new(31.0, 22.0));
        assert_eq!(quad.top_right(), Point::new(412.0, 37.0));
        assert_eq!(quad.bottom_right(), Point::new(398.0, 580.0));
        assert_eq!(quad.bottom_left(), Point::new(18.0, 560.0));
    }

    /// Every ordering of four distinct indices.
    fn permutations() -> Vec<[usize; 4]> {
        let mut out = Vec::with_capacity(24);
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let p = [a, b, c, d];
                        if (0..4).all(|i| p.contains(&i)) {
                            out.push(p);
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn rotated_rectangles_order_the_same_from_any_input_order() {
        let orders = permutations();
        assert_eq!(orders.len(), 24);

        for degrees in (-40..=40).step_by(4) {
            let (sin, cos) = (degrees as f32).to_radians().sin_cos();
            // Corners of a 300x200 page around (500, 400), already in
            // top-left, top-right, bottom-right, bottom-left order.
            let expected = [(-150.0, -100.0), (150.0, -100.0), (150.0, 100.0), (-150.0, 100.0)]
                .map(|(x, y): (f32, f32)| Point::new(500.0 + x * cos - y * sin, 400.0 + x * sin + y * cos));

            for &order in &orders {
                let input = order.map(|i| expected[i]);
                let quad = order_points(input)
                    .unwrap_or_else(|err| panic!("{degrees} deg, order {order:?}: {err}"));
                assert_eq!(quad.corners, expected, "{degrees} deg, order {order:?}");

                let sums = quad.corners.map(|p| p.x + p.y);
                assert!(sums.iter().all(|&s| s >= sums[0]), "{degrees} deg: top-left sum");
                assert!(sums.iter().all(|&s| s <= sums[2]), "{degrees} deg: bottom-right sum");
                let diffs = quad.corners.map(|p| p.y - p.x);
                assert!(diffs.iter().all(|&d| d >= diffs[1]), "{degrees} deg: top-right diff");
                assert!(diffs.iter().all(|&d| d <= diffs[3]), "{degrees} deg: bottom-left diff");
            }
        }
    }

    /// A square rotated by 45 degrees has two points with the minimal sum.
    #[test]
    fn diamond_is_ambiguous() {
        let err = order_points(pts([(5.0, 0.0), (10.0, 5.0), (5.0, 10.0), (0.0, 5.0)])).unwrap_err();
        assert!(matches!(err, FlatscanError::Geometry(_)));
    }

    #[test]
    fn repeated_points_are_rejected() {
        let p = Point::new(3.0, 3.0);
        assert!(order_points([p, p, p, p]).is_err());
    }

    #[test]
    fn one_point_cannot_fill_two_corners() {
        // (2, 20) has both the largest sum and the largest difference.
        let result = order_points(pts([(0.0, 0.0), (2.0, 20.0), (10.0, 1.0), (5.0, 3.0)]));
        assert!(matches!(result, Err(FlatscanError::Geometry(_))));
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance(b, a), 5.0);
    }

    #[test]
    fn shoelace_area_of_rectangle() {
        let rect = pts([(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)]);
        assert!((polygon_area(&rect) - 50.0).abs() < 1e-9);
        let mut reversed = rect;
        reversed.reverse();
        assert!((polygon_area(&reversed) - 50.0).abs() < 1e-9);
        assert_eq!(polygon_area(&rect[..2]), 0.0);
    }

    /// Trace every integer boundary point of an axis-aligned rectangle,
    /// clockwise from the top-left corner, the way contour tracing does.
    fn traced_rectangle(w: i32, h: i32) -> Vec<Point> {
        let mut out = Vec::new();
        for x in 0..w {
            out.push(Point::new(x as f32, 0.0));
        }
        for y in 0..h {
            out.push(Point::new(w as f32, y as f32));
        }
        for x in (1..=w).rev() {
            out.push(Point::new(x as f32, h as f32));
        }
        for y in (1..=h).rev() {
            out.push(Point::new(0.0, y as f32));
        }
        out
    }

    #[test]
    fn perimeter_of_traced_rectangle() {
        let contour = traced_rectangle(40, 30);
        assert!((arc_length(&contour) - 140.0).abs() < 1e-6);
    }

    #[test]
    fn traced_rectangle_simplifies_to_its_corners() {
        let contour = traced_rectangle(40, 30);
        let eps = 0.02 * arc_length(&contour);
        let approx = approximate_polygon(&contour, eps);
        assert_eq!(approx.len(), 4, "got {approx:?}");
        for corner in [(0.0, 0.0), (40.0, 0.0), (40.0, 30.0), (0.0, 30.0)] {
            assert!(approx.contains(&Point::from(corner)), "missing {corner:?}");
        }
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let points = pts([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let mut cloud = points.to_vec();
        cloud.push(Point::new(5.0, 5.0));
        cloud.push(Point::new(5.0, 0.0));
        let hull = convex_hull(&cloud);
        assert_eq!(hull.len(), 4);
        for p in points {
            assert!(hull.contains(&p));
        }
    }

    #[test]
    fn hull_of_collinear_points_is_degenerate() {
        let line = pts([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert!(convex_hull(&line).len() < 3);
    }
}
