//! Transform math helpers for the helicopter's Euler-angle rig.

use glam::{Mat4, Vec3};

/// Build a rotation matrix from accumulated Euler angles.
///
/// Yaw is applied outermost (world-relative), then pitch, then roll
/// innermost, i.e. `Y(yaw) * X(pitch) * Z(roll)`. The order matters: it
/// makes pitch/roll body-relative after the craft has yawed.
pub fn yaw_pitch_roll(angles: Vec3) -> Mat4 {
    Mat4::from_rotation_y(angles.y) * Mat4::from_rotation_x(angles.x) * Mat4::from_rotation_z(angles.z)
}

/// Rotate about a fixed pivot point: `T(pivot) * rotation * T(-pivot)`.
///
/// Used for spinning a rigid part around its hub instead of the model
/// origin. The pivot must match the authored geometry or the part will
/// swing around the wrong point.
pub fn rotate_about_pivot(pivot: Vec3, rotation: Mat4) -> Mat4 {
    Mat4::from_translation(pivot) * rotation * Mat4::from_translation(-pivot)
}

/// Global transform from a world position and an orientation matrix:
/// `T(position) * rotation`.
pub fn compose_transform(position: Vec3, rotation: Mat4) -> Mat4 {
    Mat4::from_translation(position) * rotation
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn pivot_point_is_fixed_under_rotation() {
        let pivot = Vec3::new(0.263874, 2.87729, -6.52368);
        let m = rotate_about_pivot(pivot, Mat4::from_rotation_x(1.37));
        let moved = m.transform_point3(pivot);
        assert_relative_eq!(moved.x, pivot.x, epsilon = 1e-5);
        assert_relative_eq!(moved.y, pivot.y, epsilon = 1e-5);
        assert_relative_eq!(moved.z, pivot.z, epsilon = 1e-5);
    }

    #[test]
    fn pivot_rotation_moves_off_pivot_points() {
        let pivot = Vec3::new(0.0, 3.0, 0.0);
        let m = rotate_about_pivot(pivot, Mat4::from_rotation_y(PI));
        let p = m.transform_point3(Vec3::new(1.0, 3.0, 0.0));
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn yaw_pitch_roll_order_is_yxz() {
        let angles = Vec3::new(0.3, 1.1, -0.7);
        let expected = Mat4::from_rotation_y(angles.y)
            * Mat4::from_rotation_x(angles.x)
            * Mat4::from_rotation_z(angles.z);
        let got = yaw_pitch_roll(angles);
        for (a, b) in got.to_cols_array().iter().zip(expected.to_cols_array().iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn level_rotation_has_world_up_axis() {
        let m = yaw_pitch_roll(Vec3::ZERO);
        let up = m.y_axis.truncate();
        assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn quarter_yaw_turns_forward_axis() {
        let m = yaw_pitch_roll(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let fwd = m.transform_vector3(Vec3::Z);
        assert_relative_eq!(fwd.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(fwd.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn compose_translates_then_rotates() {
        let m = compose_transform(Vec3::new(1.0, 2.0, 3.0), Mat4::from_rotation_y(FRAC_PI_2));
        let p = m.transform_point3(Vec3::Z);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-5);
    }
}
