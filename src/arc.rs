//! Arc path emission and the arcTo tangent-circle solver.
//!
//! tiny-skia has no arc primitive, so arcs are approximated with cubic
//! bezier segments of at most a quarter turn each.

use crate::geometry::{ArcToParams, EllipseParams};
use std::f32::consts::PI;
use tiny_skia::PathBuilder;

/// Distance standing in for "infinitely far" when arcTo degenerates to a ray.
const ARC_TO_FAR_DISTANCE: f32 = 65535.0;

/// Add an elliptical arc to the path.
///
/// The first point of the arc is emitted as a `move_to`; callers that need
/// line connectivity with the current subpath handle that when appending.
pub fn ellipse(path: &mut PathBuilder, params: &EllipseParams) {
    let EllipseParams {
        x,
        y,
        radius_x,
        radius_y,
        rotation,
        start_angle,
        end_angle,
        anticlockwise,
    } = *params;

    if radius_x <= 0.0 || radius_y <= 0.0 {
        return;
    }

    let sweep = signed_sweep(start_angle, end_angle, anticlockwise);

    let cos_rot = rotation.cos();
    let sin_rot = rotation.sin();
    let point_at = |angle: f32| -> (f32, f32) {
        let px = radius_x * angle.cos();
        let py = radius_y * angle.sin();
        (
            x + px * cos_rot - py * sin_rot,
            y + px * sin_rot + py * cos_rot,
        )
    };

    let (sx, sy) = point_at(start_angle);
    path.move_to(sx, sy);

    let num_segments = ((sweep.abs() / (PI / 2.0)).ceil() as usize).max(1);
    let segment_angle = sweep / num_segments as f32;
    for i in 0..num_segments {
        let a1 = start_angle + i as f32 * segment_angle;
        let a2 = a1 + segment_angle;
        bezier_arc_segment(path, x, y, radius_x, radius_y, cos_rot, sin_rot, a1, a2);
    }
}

/// Sweep from `start` to `end` in the requested direction.
///
/// Clockwise sweeps are positive and anticlockwise negative (screen-space
/// angles grow clockwise). A full-circle request is preserved rather than
/// collapsed to zero.
fn signed_sweep(start: f32, end: f32, anticlockwise: bool) -> f32 {
    let tau = 2.0 * PI;
    let mut sweep = (end - start) % tau;
    if anticlockwise {
        if sweep > 0.0 {
            sweep -= tau;
        }
        if sweep == 0.0 && (end - start).abs() >= tau {
            sweep = -tau;
        }
    } else {
        if sweep < 0.0 {
            sweep += tau;
        }
        if sweep == 0.0 && (end - start).abs() >= tau {
            sweep = tau;
        }
    }
    sweep
}

/// Emit one arc segment (at most a quarter turn) as a cubic bezier.
#[allow(clippy::too_many_arguments)]
fn bezier_arc_segment(
    path: &mut PathBuilder,
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
    cos_rot: f32,
    sin_rot: f32,
    angle1: f32,
    angle2: f32,
) {
    let k = 4.0 / 3.0 * ((angle2 - angle1) / 4.0).tan();

    // Endpoints and control points on the unit circle.
    let (x1, y1) = (angle1.cos(), angle1.sin());
    let (x2, y2) = (angle2.cos(), angle2.sin());
    let (cp1x, cp1y) = (x1 - k * y1, y1 + k * x1);
    let (cp2x, cp2y) = (x2 + k * y2, y2 - k * x2);

    let map = |px: f32, py: f32| -> (f32, f32) {
        let tx = rx * px;
        let ty = ry * py;
        (
            cx + tx * cos_rot - ty * sin_rot,
            cy + tx * sin_rot + ty * cos_rot,
        )
    };

    let (c1x, c1y) = map(cp1x, cp1y);
    let (c2x, c2y) = map(cp2x, cp2y);
    let (ex, ey) = map(x2, y2);
    path.cubic_to(c1x, c1y, c2x, c2y, ex, ey);
}

/// Continue the current subpath with a circular arc sweep.
///
/// The current point must already be at the arc's start position; only
/// cubic segments are emitted, so subpath connectivity is preserved.
fn arc_sweep(
    path: &mut PathBuilder,
    cx: f32,
    cy: f32,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    anticlockwise: bool,
) {
    let sweep = signed_sweep(start_angle, end_angle, anticlockwise);
    let num_segments = ((sweep.abs() / (PI / 2.0)).ceil() as usize).max(1);
    let segment_angle = sweep / num_segments as f32;
    for i in 0..num_segments {
        let a1 = start_angle + i as f32 * segment_angle;
        let a2 = a1 + segment_angle;
        bezier_arc_segment(path, cx, cy, radius, radius, 1.0, 0.0, a1, a2);
    }
}

/// Add an arcTo segment: a straight line from the current point `(x0, y0)`
/// tangent into a circular arc that touches segment `P1P0` and segment
/// `P1P2`, ending tangent onto the `P2` segment.
///
/// Construction follows the tangent-circle geometry used for rounded path
/// corners, including its degenerate cases:
/// - coincident control points or zero radius emit a line to `P1`;
/// - collinear opposite segments emit a line to `P1`;
/// - collinear same-direction segments emit a line to a point far along
///   the `P0 -> P1` direction.
pub fn arc_to(path: &mut PathBuilder, x0: f32, y0: f32, params: &ArcToParams) {
    let ArcToParams {
        x1,
        y1,
        x2,
        y2,
        radius,
    } = *params;

    if (x1 == x0 && y1 == y0) || (x1 == x2 && y1 == y2) || radius == 0.0 {
        path.line_to(x1, y1);
        return;
    }

    // Vectors from the corner out to the adjacent points.
    let p1p0 = (x0 - x1, y0 - y1);
    let p1p2 = (x2 - x1, y2 - y1);
    let p1p0_length = (p1p0.0 * p1p0.0 + p1p0.1 * p1p0.1).sqrt();
    let p1p2_length = (p1p2.0 * p1p2.0 + p1p2.1 * p1p2.1).sqrt();

    let cos_phi = (p1p0.0 * p1p2.0 + p1p0.1 * p1p2.1) / (p1p0_length * p1p2_length);

    // All three points on one line. P2 doubling back toward P0 gets a
    // plain line to the corner; continuing straight through P1 gets a
    // line to a point standing in for "infinitely far" along P0 -> P1.
    if cos_phi == 1.0 {
        path.line_to(x1, y1);
        return;
    }
    if cos_phi == -1.0 {
        let factor = ARC_TO_FAR_DISTANCE / p1p0_length;
        path.line_to(x0 - factor * p1p0.0, y0 - factor * p1p0.1);
        return;
    }

    let tangent = radius / (cos_phi.acos() / 2.0).tan();

    // Tangent point on segment P1P0.
    let factor_p1p0 = tangent / p1p0_length;
    let t_p1p0 = (x1 + factor_p1p0 * p1p0.0, y1 + factor_p1p0 * p1p0.1);

    // Perpendicular to P1P0, flipped to point toward the side P1P2 lies on.
    let mut orth = (p1p0.1, -p1p0.0);
    let orth_length = p1p0_length;
    let cos_alpha = (orth.0 * p1p2.0 + orth.1 * p1p2.1) / (orth_length * p1p2_length);
    if cos_alpha < 0.0 {
        orth = (-orth.0, -orth.1);
    }

    // Arc center.
    let factor_ra = radius / orth_length;
    let center = (t_p1p0.0 + factor_ra * orth.0, t_p1p0.1 + factor_ra * orth.1);

    // Start angle: direction from the center back to the first tangent
    // point, wrapped into [0, 2pi).
    orth = (-orth.0, -orth.1);
    let mut sa = (orth.0 / orth_length).acos();
    if orth.1 < 0.0 {
        sa = 2.0 * PI - sa;
    }

    // End angle from the second tangent point.
    let factor_p1p2 = tangent / p1p2_length;
    let t_p1p2 = (x1 + factor_p1p2 * p1p2.0, y1 + factor_p1p2 * p1p2.1);
    let to_end = (t_p1p2.0 - center.0, t_p1p2.1 - center.1);
    let to_end_length = (to_end.0 * to_end.0 + to_end.1 * to_end.1).sqrt();
    let mut ea = (to_end.0 / to_end_length).acos();
    if to_end.1 < 0.0 {
        ea = 2.0 * PI - ea;
    }

    // Sweep in whichever direction spans less than half a turn.
    let anticlockwise = (sa > ea && sa - ea < PI) || (sa < ea && ea - sa > PI);

    path.line_to(t_p1p0.0, t_p1p0.1);
    arc_sweep(path, center.0, center.1, radius, sa, ea, anticlockwise);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ArcParams;

    fn last_point(path: &tiny_skia::Path) -> (f32, f32) {
        let mut last = (f32::NAN, f32::NAN);
        for seg in path.segments() {
            match seg {
                tiny_skia::PathSegment::MoveTo(p)
                | tiny_skia::PathSegment::LineTo(p) => last = (p.x, p.y),
                tiny_skia::PathSegment::QuadTo(_, p) => last = (p.x, p.y),
                tiny_skia::PathSegment::CubicTo(_, _, p) => last = (p.x, p.y),
                tiny_skia::PathSegment::Close => {}
            }
        }
        last
    }

    #[test]
    fn test_ellipse_full_circle() {
        let mut builder = PathBuilder::new();
        ellipse(
            &mut builder,
            &EllipseParams::from(&ArcParams {
                x: 50.0,
                y: 50.0,
                radius: 50.0,
                start_angle: 0.0,
                end_angle: 2.0 * PI,
                anticlockwise: false,
            }),
        );
        let path = builder.finish().unwrap();
        let bounds = path.bounds();
        assert!((bounds.left() - 0.0).abs() < 0.5);
        assert!((bounds.right() - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_ellipse_quarter_circle_endpoint() {
        let mut builder = PathBuilder::new();
        ellipse(
            &mut builder,
            &EllipseParams::from(&ArcParams {
                x: 0.0,
                y: 0.0,
                radius: 10.0,
                start_angle: 0.0,
                end_angle: PI / 2.0,
                anticlockwise: false,
            }),
        );
        let path = builder.finish().unwrap();
        let (x, y) = last_point(&path);
        assert!((x - 0.0).abs() < 1e-3);
        assert!((y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_arc_to_coincident_start_emits_line_to_corner() {
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        arc_to(
            &mut builder,
            0.0,
            0.0,
            &ArcToParams {
                x1: 0.0,
                y1: 0.0,
                x2: 5.0,
                y2: 5.0,
                radius: 3.0,
            },
        );
        let path = builder.finish().unwrap();
        assert_eq!(last_point(&path), (0.0, 0.0));
        assert_eq!(path.segments().count(), 2); // move + line only
    }

    #[test]
    fn test_arc_to_zero_radius_emits_line_to_corner() {
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        arc_to(
            &mut builder,
            0.0,
            0.0,
            &ArcToParams {
                x1: 20.0,
                y1: 10.0,
                x2: 40.0,
                y2: 0.0,
                radius: 0.0,
            },
        );
        let path = builder.finish().unwrap();
        assert_eq!(last_point(&path), (20.0, 10.0));
    }

    #[test]
    fn test_arc_to_collinear_opposite_emits_line_to_corner() {
        let mut builder = PathBuilder::new();
        builder.move_to(10.0, 0.0);
        arc_to(
            &mut builder,
            10.0,
            0.0,
            &ArcToParams {
                x1: 5.0,
                y1: 0.0,
                x2: 10.0,
                y2: 0.0,
                radius: 2.0,
            },
        );
        let path = builder.finish().unwrap();
        assert_eq!(last_point(&path), (5.0, 0.0));
    }

    #[test]
    fn test_arc_to_collinear_same_direction_emits_far_line() {
        let mut builder = PathBuilder::new();
        builder.move_to(0.0, 0.0);
        arc_to(
            &mut builder,
            0.0,
            0.0,
            &ArcToParams {
                x1: 5.0,
                y1: 0.0,
                x2: 10.0,
                y2: 0.0,
                radius: 2.0,
            },
        );
        let path = builder.finish().unwrap();
        let (x, y) = last_point(&path);
        assert_eq!(y, 0.0);
        assert_eq!(x, ARC_TO_FAR_DISTANCE);
        // A line, never an arc.
        assert_eq!(path.segments().count(), 2);
    }

    #[test]
    fn test_arc_to_right_angle_tangent_points() {
        // Horizontal then vertical segment meeting at (30, 10); the tangent
        // points sit `radius` back from the corner on each segment.
        let mut builder = PathBuilder::new();
        builder.move_to(10.0, 10.0);
        arc_to(
            &mut builder,
            10.0,
            10.0,
            &ArcToParams {
                x1: 30.0,
                y1: 10.0,
                x2: 30.0,
                y2: 30.0,
                radius: 12.0,
            },
        );
        let path = builder.finish().unwrap();
        // Line lands on the first tangent point.
        let mut segs = path.segments();
        segs.next(); // move
        let first_tangent = match segs.next().unwrap() {
            tiny_skia::PathSegment::LineTo(p) => p,
            other => panic!("expected line to tangent point, got {:?}", other),
        };
        assert!((first_tangent.x - 18.0).abs() < 1e-3);
        assert!((first_tangent.y - 10.0).abs() < 1e-3);
        // Arc ends on the second tangent point.
        let (ex, ey) = last_point(&path);
        assert!((ex - 30.0).abs() < 1e-2);
        assert!((ey - 22.0).abs() < 1e-2);
    }
}
