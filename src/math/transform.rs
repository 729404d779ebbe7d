use glam::{Vec2, Vec3};

/// Distance of the eye from the projection plane in perspective mode.
pub const FOCAL_DISTANCE: f32 = 500.0;

/// Floor for the perspective denominator; points at or behind the eye are
/// pinned to it.
const MIN_DEPTH: f32 = 1.0;

/// Rotates about X, then Y, then Z. Each step only reads what the previous
/// step produced; a zero angle skips its step.
pub fn rotate(point: Vec3, angle_x: f32, angle_y: f32, angle_z: f32) -> Vec3 {
    let Vec3 { mut x, mut y, mut z } = point;

    if angle_x != 0.0 {
        let (sin, cos) = angle_x.sin_cos();
        (y, z) = (y * cos - z * sin, y * sin + z * cos);
    }

    if angle_y != 0.0 {
        let (sin, cos) = angle_y.sin_cos();
        (x, z) = (x * cos + z * sin, -x * sin + z * cos);
    }

    if angle_z != 0.0 {
        let (sin, cos) = angle_z.sin_cos();
        (x, y) = (x * cos - y * sin, x * sin + y * cos);
    }

    Vec3::new(x, y, z)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Isometric,
    Perspective,
}

impl Projection {
    pub fn project(self, point: Vec3, scale: f32, offset: Vec2) -> Vec2 {
        match self {
            Projection::Isometric => {
                let (sin30, cos30) = 30.0_f32.to_radians().sin_cos();
                let iso_x = (point.x - point.y) * cos30;
                let iso_y = point.z + (point.x + point.y) * sin30;
                Vec2::new(iso_x * scale + offset.x, iso_y * scale + offset.y)
            }
            Projection::Perspective => {
                let factor = FOCAL_DISTANCE / (FOCAL_DISTANCE + point.z * 2.0).max(MIN_DEPTH);
                Vec2::new(
                    point.x * factor * scale + offset.x,
                    point.y * factor * scale + offset.y,
                )
            }
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Projection::Isometric => Projection::Perspective,
            Projection::Perspective => Projection::Isometric,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Projection::Isometric => "ISOMETRIC",
            Projection::Perspective => "PERSPECTIVE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-4;

    fn near(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn zero_rotation_is_exact_identity() {
        for p in [Vec3::new(1.25, -3.5, 7.0), Vec3::new(0.1, 0.2, 0.3), Vec3::ZERO] {
            assert_eq!(rotate(p, 0.0, 0.0, 0.0), p);
        }
    }

    #[test]
    fn single_axis_rotations_invert() {
        let p = Vec3::new(3.0, -2.0, 5.5);
        let theta = 0.7;
        assert!(near(rotate(rotate(p, theta, 0.0, 0.0), -theta, 0.0, 0.0), p));
        assert!(near(rotate(rotate(p, 0.0, theta, 0.0), 0.0, -theta, 0.0), p));
        assert!(near(rotate(rotate(p, 0.0, 0.0, theta), 0.0, 0.0, -theta), p));
    }

    #[test]
    fn z_step_uses_incoming_coordinates() {
        // A quarter turn about Z maps +X onto +Y. Feeding the freshly written
        // x back into the y formula would give (0, 0, 0) instead.
        let r = rotate(Vec3::X, 0.0, 0.0, FRAC_PI_2);
        assert!(near(r, Vec3::Y), "{r:?}");
    }

    #[test]
    fn axes_follow_right_hand_rule() {
        assert!(near(rotate(Vec3::Y, FRAC_PI_2, 0.0, 0.0), Vec3::Z));
        assert!(near(rotate(Vec3::Z, 0.0, FRAC_PI_2, 0.0), Vec3::X));
        assert!(near(rotate(Vec3::X, 0.0, 0.0, PI), -Vec3::X));
    }

    #[test]
    fn steps_compose_in_order() {
        // X first takes +Y to +Z, then Y takes +Z to +X.
        let r = rotate(Vec3::Y, FRAC_PI_2, FRAC_PI_2, 0.0);
        assert!(near(r, Vec3::X), "{r:?}");
    }

    #[test]
    fn origin_projects_onto_offset() {
        let offset = Vec2::new(600.0, 400.0);
        for projection in [Projection::Isometric, Projection::Perspective] {
            for scale in [1.0, 20.0, 37.5] {
                assert_eq!(projection.project(Vec3::ZERO, scale, offset), offset);
            }
        }
    }

    #[test]
    fn isometric_formula() {
        let p = Vec3::new(2.0, 1.0, 3.0);
        let s = projection_at_unit(Projection::Isometric, p);
        assert!((s.x - 30.0_f32.to_radians().cos()).abs() < EPS);
        assert!((s.y - (3.0 + 1.5)).abs() < EPS);
    }

    #[test]
    fn perspective_shrinks_with_depth() {
        let near_pt = projection_at_unit(Projection::Perspective, Vec3::new(10.0, 10.0, 0.0));
        let far_pt = projection_at_unit(Projection::Perspective, Vec3::new(10.0, 10.0, 250.0));
        assert_eq!(near_pt, Vec2::new(10.0, 10.0));
        assert!((far_pt.x - 5.0).abs() < EPS);
    }

    #[test]
    fn perspective_stays_finite_behind_the_eye() {
        for z in [-250.0, -251.0, -1000.0] {
            let s = projection_at_unit(Projection::Perspective, Vec3::new(3.0, -2.0, z));
            assert!(s.is_finite(), "z = {z}: {s:?}");
            assert_eq!(s, Vec2::new(3.0 * FOCAL_DISTANCE, -2.0 * FOCAL_DISTANCE));
        }
    }

    fn projection_at_unit(projection: Projection, p: Vec3) -> Vec2 {
        projection.project(p, 1.0, Vec2::ZERO)
    }

    #[test]
    fn toggling_cycles() {
        assert_eq!(Projection::Isometric.toggled(), Projection::Perspective);
        assert_eq!(Projection::Isometric.toggled().toggled(), Projection::Isometric);
    }
}
