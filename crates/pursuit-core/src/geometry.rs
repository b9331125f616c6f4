//! Vector helpers used by the controller.
//!
//! Angles are in radians, counter-clockwise positive.

use std::f64::consts::{PI, TAU};

use crate::types::Vec2;

/// Returns `v` scaled to unit length, or `None` for a zero-length or
/// non-finite input.
pub fn normalize(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Signed angle that rotates `from` onto the direction of `to`.
///
/// The result lies in (-π, π] and is positive for a counter-clockwise
/// rotation. Degenerate inputs (zero-length vectors, NaN) yield 0.
pub fn signed_angle(to: Vec2, from: Vec2) -> f64 {
    let (Some(to), Some(from)) = (normalize(to), normalize(from)) else {
        return 0.0;
    };

    // Unit vectors can still produce |dot| slightly above 1.
    let dot = from.dot(to).clamp(-1.0, 1.0);
    let mut angle = dot.acos();
    if from.perp_dot(to) < 0.0 {
        angle = -angle;
    }

    let angle = wrap_angle(angle);
    if angle.is_nan() {
        0.0
    } else {
        angle
    }
}

/// Remap an angle into (-π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    if angle > PI || angle <= -PI {
        let wrapped = (angle + PI).rem_euclid(TAU) - PI;
        if wrapped <= -PI {
            wrapped + TAU
        } else {
            wrapped
        }
    } else {
        angle
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    a.distance(b)
}

/// Rotate `v` counter-clockwise by `radians`.
pub fn rotate(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}
