#![warn(missing_docs)]

//! Math types for the orgelbau console generator.
//!
//! Thin wrappers around nalgebra: points, vectors, rigid placement
//! transforms, and tolerance constants. All dimensions are millimetres
//! and all angles exposed by [`Transform`] constructors named `_deg`
//! are degrees, because every board placement formula in the console
//! layouts is written in degrees.

use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in the 2D profile plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the 2D profile plane.
pub type Vec2 = Vector2<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Sequential Euler rotation in degrees: world X first, then world Y,
    /// then world Z. This is the rotation convention of every board
    /// placement in the console layouts.
    pub fn euler_xyz_deg(rx: f64, ry: f64, rz: f64) -> Self {
        let x = Self::rotation_x(rx.to_radians());
        let y = Self::rotation_y(ry.to_radians());
        let z = Self::rotation_z(rz.to_radians());
        x.then(&y).then(&z)
    }

    /// Full board placement: Euler X-Y-Z rotation in degrees followed by
    /// a translation to `position`.
    pub fn placement(position: [f64; 3], rotation_deg: [f64; 3]) -> Self {
        Self::euler_xyz_deg(rotation_deg[0], rotation_deg[1], rotation_deg[2]).then(
            &Self::translation(position[0], position[1], position[2]),
        )
    }

    /// Compose: apply `self` first, then `other` (matrix `other * self`).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Transform a normal vector (inverse transpose of the upper-left 3x3).
    pub fn apply_normal(&self, n: &Vec3) -> Vec3 {
        let m3 = self.matrix.fixed_view::<3, 3>(0, 0);
        if let Some(inv) = m3.try_inverse() {
            inv.transpose() * n
        } else {
            *n
        }
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let result = t.apply_point(&p);
        assert!((result.x - 11.0).abs() < 1e-12);
        assert!((result.y - 22.0).abs() < 1e-12);
        assert!((result.z - 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_z_90_deg() {
        let t = Transform::euler_xyz_deg(0.0, 0.0, 90.0);
        let p = Point3::new(1.0, 0.0, 0.0);
        let result = t.apply_point(&p);
        assert!(result.x.abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_euler_order_is_x_then_y_then_z() {
        // X by 90° sends +Z to -Y; Z by 90° then sends -Y to +X.
        let t = Transform::euler_xyz_deg(90.0, 0.0, 90.0);
        let p = Point3::new(0.0, 0.0, 1.0);
        let result = t.apply_point(&p);
        assert!((result.x - 1.0).abs() < 1e-12);
        assert!(result.y.abs() < 1e-12);
        assert!(result.z.abs() < 1e-12);
    }

    #[test]
    fn test_then_applies_self_first() {
        let rotate = Transform::rotation_z(std::f64::consts::FRAC_PI_2);
        let shift = Transform::translation(5.0, 0.0, 0.0);
        // rotate first, then shift: (1,0,0) -> (0,1,0) -> (5,1,0)
        let combined = rotate.then(&shift);
        let result = combined.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((result.x - 5.0).abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_placement_matches_rotate_then_translate() {
        let t = Transform::placement([10.0, 0.0, 0.0], [0.0, 90.0, 0.0]);
        // Y-rotation by 90° sends +X to -Z, then translate.
        let result = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((result.x - 10.0).abs() < 1e-12);
        assert!(result.y.abs() < 1e-12);
        assert!((result.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform::placement([1.0, 2.0, 3.0], [30.0, 0.0, 45.0]);
        let inv = t.inverse().unwrap();
        let p = Point3::new(5.0, 6.0, 7.0);
        let result = inv.apply_point(&t.apply_point(&p));
        assert!((result - p).norm() < 1e-9);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        assert!(!tol.points_equal(&a, &Point3::new(1.001, 2.0, 3.0)));
    }
}
