//! Virtual trackball math.
//!
//! Pointer positions are projected onto a sphere centered in the viewport,
//! deformed into a hyperbolic sheet away from the center so the mapping stays
//! smooth when the cursor leaves the sphere. A drag between two projected
//! points becomes a rotation about their cross product.
//!
//! Matrices follow glam's convention: column-major storage and column vectors
//! (`M * v`). The renderer composes transforms by post-multiplying onto the
//! current matrix, and the shader consumes the same layout unchanged.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::camera::Viewport;

/// Default radius of the virtual sphere in normalized viewport units.
pub const TRACKBALL_RADIUS: f32 = 0.8;

/// Maps a pixel position (origin top-left, y down) to normalized viewport
/// coordinates in roughly [-1, 1] with the origin at the center and y up.
pub fn normalize_cursor(viewport: Viewport, pixel: Vec2) -> Vec2 {
    let width = viewport.width() as f32;
    let height = viewport.height() as f32;
    Vec2::new(
        (2.0 * pixel.x - width) / width,
        (height - 2.0 * pixel.y) / height,
    )
}

/// Height of the deformed sphere above the point `(x, y)`.
pub fn project_to_sphere(radius: f32, point: Vec2) -> f32 {
    let d = point.length();
    if d < radius * std::f32::consts::FRAC_1_SQRT_2 {
        (radius * radius - d * d).sqrt()
    } else {
        let t = radius * std::f32::consts::FRAC_1_SQRT_2;
        t * t / d
    }
}

/// Rotation produced by dragging from `p1` to `p2` (normalized coordinates).
pub fn drag_quaternion(p1: Vec2, p2: Vec2, radius: f32) -> Quat {
    if p1 == p2 {
        return Quat::IDENTITY;
    }

    let start = Vec3::new(p1.x, p1.y, project_to_sphere(radius, p1));
    let end = Vec3::new(p2.x, p2.y, project_to_sphere(radius, p2));

    let Some(axis) = start.cross(end).try_normalize() else {
        return Quat::IDENTITY;
    };

    let t = ((end - start).length() / (2.0 * radius)).clamp(-1.0, 1.0);
    let angle = 2.0 * t.asin();
    Quat::from_axis_angle(axis, angle)
}

/// Applies `delta` on top of `current`: the Hamilton product `delta * current`.
pub fn compose(delta: Quat, current: Quat) -> Quat {
    delta * current
}

pub fn rotation_matrix(orientation: Quat) -> Mat4 {
    Mat4::from_quat(orientation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_quat_eq(a: Quat, b: Quat) {
        assert!(a.abs_diff_eq(b, EPSILON), "expected {b:?}, got {a:?}");
    }

    #[test]
    fn stationary_cursor_gives_identity() {
        for point in [Vec2::ZERO, Vec2::new(0.3, -0.2), Vec2::new(1.5, 1.5)] {
            assert_eq!(
                drag_quaternion(point, point, TRACKBALL_RADIUS),
                Quat::IDENTITY
            );
        }
    }

    #[test]
    fn identity_is_left_and_right_neutral() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0).normalize(), 0.7);
        assert_quat_eq(compose(Quat::IDENTITY, q), q);
        assert_quat_eq(compose(q, Quat::IDENTITY), q);
    }

    #[test]
    fn compose_applies_delta_after_current() {
        let current = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let delta = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let composed = compose(delta, current);
        // +Z turns to +X under current, and X is fixed by delta.
        let rotated = composed * Vec3::Z;
        assert!(rotated.abs_diff_eq(Vec3::X, EPSILON), "{rotated:?}");
        assert_ne!(composed, compose(current, delta));
    }

    #[test]
    fn horizontal_drag_rotates_about_vertical_axis() {
        let q = drag_quaternion(Vec2::ZERO, Vec2::new(0.1, 0.0), TRACKBALL_RADIUS);
        let (axis, angle) = q.to_axis_angle();
        assert!(angle > 0.0);
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-3), "{axis:?}");
        // The front of the sphere follows the cursor to the right.
        assert!((q * Vec3::Z).x > 0.0);
    }

    #[test]
    fn drag_quaternion_is_unit_length() {
        let q = drag_quaternion(Vec2::new(-0.9, 0.4), Vec2::new(0.7, -0.8), TRACKBALL_RADIUS);
        assert!((q.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn projection_is_continuous_at_the_boundary() {
        let boundary = TRACKBALL_RADIUS * std::f32::consts::FRAC_1_SQRT_2;
        let inside = project_to_sphere(TRACKBALL_RADIUS, Vec2::new(boundary - 1e-4, 0.0));
        let outside = project_to_sphere(TRACKBALL_RADIUS, Vec2::new(boundary + 1e-4, 0.0));
        assert!((inside - outside).abs() < 1e-3);
        assert!((project_to_sphere(TRACKBALL_RADIUS, Vec2::ZERO) - TRACKBALL_RADIUS).abs() < EPSILON);
    }

    #[test]
    fn normalize_cursor_maps_corners() {
        let viewport = Viewport::new(800, 600).unwrap();
        assert_eq!(normalize_cursor(viewport, Vec2::new(400.0, 300.0)), Vec2::ZERO);
        assert_eq!(normalize_cursor(viewport, Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(normalize_cursor(viewport, Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn rotation_matrix_matches_quaternion() {
        let q = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let m = rotation_matrix(q);
        let v = m.transform_vector3(Vec3::X);
        assert!(v.abs_diff_eq(Vec3::Y, EPSILON));
        assert_eq!(m.w_axis, glam::Vec4::W);
        assert_eq!(rotation_matrix(Quat::IDENTITY), Mat4::IDENTITY);
    }
}
