//! Directions and the rotations applied to them.

use std::ops::{Mul, Neg};

use prtmath::approx::AbsDiffEq;
use prtmath::{EPSILON, Float, Mat4, approx_cmp};

/// Direction in 3D space.
///
/// Directions are **not** normalized on construction. Spherical harmonic
/// evaluation assumes unit length, so callers must pass the same convention
/// that was used when the transport coefficients were generated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Direction {
    /// X component.
    pub x: Float,
    /// Y component.
    pub y: Float,
    /// Z component.
    pub z: Float,
}

impl Direction {
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Constructs a direction from its components.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }
    /// Constructs a direction from homogeneous coordinates, ignoring `w`.
    pub const fn from_homogeneous([x, y, z, _w]: [Float; 4]) -> Self {
        Self::new(x, y, z)
    }
    /// Returns homogeneous coordinates with `w = 0`.
    pub const fn to_homogeneous(self) -> [Float; 4] {
        [self.x, self.y, self.z, 0.0]
    }
    /// Returns the components as an array.
    pub const fn to_array(self) -> [Float; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns the squared magnitude of the direction.
    pub fn mag2(self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    /// Returns the magnitude of the direction.
    pub fn mag(self) -> Float {
        self.mag2().sqrt()
    }
    /// Returns whether the direction has length one, within `EPSILON`.
    pub fn is_unit(self) -> bool {
        approx_cmp::is_approx_one(&self.mag())
    }
    /// Returns a unit-length copy of the direction, or `None` if it has zero
    /// length.
    #[must_use]
    pub fn normalize(self) -> Option<Self> {
        let mult = 1.0 / self.mag();
        let ret = Self::new(self.x * mult, self.y * mult, self.z * mult);
        mult.is_finite().then_some(ret)
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AbsDiffEq for Direction {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

/// Homogeneous 4x4 transform applied to the scene or light.
///
/// Only directions are transformed (`w = 0`), so any translation is ignored.
/// The upper-left 3x3 block is expected to be a rotation; a scale or shear
/// there produces non-unit directions, which band rotation rejects.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[Float; 16]", into = "[Float; 16]")
)]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RotationTransform(Mat4);

impl RotationTransform {
    /// Identity transform.
    pub const IDENT: Self = Self(Mat4::IDENT);

    /// Wraps a 4x4 matrix.
    pub const fn from_matrix(m: Mat4) -> Self {
        Self(m)
    }
    /// Constructs a transform from 16 elements in **column-major** order,
    /// which is the memory layout used by GL-style `mat4` values.
    pub fn from_cols_array(elems: &[Float; 16]) -> Self {
        Self(Mat4::from_fn(|col, row| elems[col * 4 + row]))
    }
    /// Returns the 16 elements in **column-major** order.
    pub fn to_cols_array(&self) -> [Float; 16] {
        std::array::from_fn(|i| self.0.get(i / 4, i % 4))
    }
    /// Constructs a transform from its rows.
    pub fn from_rows(rows: [[Float; 4]; 4]) -> Self {
        Self(Mat4::from_rows(rows))
    }
    /// Constructs a rotation of `angle` radians around `axis`, which is
    /// assumed to be normalized.
    pub fn from_axis_angle(axis: Direction, angle: Float) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let Direction { x, y, z } = axis;
        Self::from_rows([
            [c + x * x * t, x * y * t - z * s, x * z * t + y * s, 0.0],
            [x * y * t + z * s, c + y * y * t, y * z * t - x * s, 0.0],
            [x * z * t - y * s, y * z * t + x * s, c + z * z * t, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
    /// Constructs a rotation of `angle` radians around the X axis.
    pub fn from_rotation_x(angle: Float) -> Self {
        Self::from_axis_angle(Direction::X, angle)
    }
    /// Constructs a rotation of `angle` radians around the Y axis.
    pub fn from_rotation_y(angle: Float) -> Self {
        Self::from_axis_angle(Direction::Y, angle)
    }
    /// Constructs a rotation of `angle` radians around the Z axis.
    pub fn from_rotation_z(angle: Float) -> Self {
        Self::from_axis_angle(Direction::Z, angle)
    }

    /// Returns the underlying matrix.
    pub fn matrix(&self) -> &Mat4 {
        &self.0
    }

    /// Transforms a direction, treating it as homogeneous with `w = 0`.
    pub fn transform_direction(&self, dir: Direction) -> Direction {
        Direction::from_homogeneous(self.0 * dir.to_homogeneous())
    }

    /// Returns the transform that applies `self` and then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        *next * *self
    }

    /// Returns the inverse rotation.
    ///
    /// This is the transpose of the upper-left 3x3 block. Translation is
    /// dropped because it never affects directions.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self(Mat4::from_fn(|col, row| match (col, row) {
            (3, 3) => 1.0,
            (3, _) | (_, 3) => 0.0,
            _ => self.0.get(row, col),
        }))
    }
}

impl Mul for RotationTransform {
    type Output = Self;

    /// Composes two transforms. `a * b` applies `b` first.
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl From<[Float; 16]> for RotationTransform {
    fn from(elems: [Float; 16]) -> Self {
        Self::from_cols_array(&elems)
    }
}
impl From<RotationTransform> for [Float; 16] {
    fn from(transform: RotationTransform) -> Self {
        transform.to_cols_array()
    }
}

impl AbsDiffEq for RotationTransform {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use pretty_assertions::assert_eq;
    use prtmath::assert_approx_eq;

    use super::*;

    #[test]
    fn test_direction_normalize() {
        let d = Direction::new(3.0, 0.0, 4.0);
        assert!(!d.is_unit());
        assert_eq!(d.mag(), 5.0);
        let n = d.normalize().expect("nonzero direction");
        assert!(n.is_unit());
        assert_approx_eq!(n, Direction::new(0.6, 0.0, 0.8));
        assert_eq!(Direction::default().normalize(), None);
    }

    #[test]
    fn test_rotation_about_y() {
        let r = RotationTransform::from_rotation_y(FRAC_PI_2);
        assert_approx_eq!(r.transform_direction(Direction::Z), Direction::X);
        assert_approx_eq!(r.transform_direction(Direction::X), -Direction::Z);
        assert_approx_eq!(r.transform_direction(Direction::Y), Direction::Y);
    }

    #[test]
    fn test_rotation_ignores_translation() {
        let mut elems = RotationTransform::from_rotation_z(0.7).to_cols_array();
        elems[12..15].copy_from_slice(&[10.0, -4.0, 2.5]);
        let translated = RotationTransform::from_cols_array(&elems);
        let rotated = RotationTransform::from_rotation_z(0.7);
        let d = Direction::new(0.0, 0.6, 0.8);
        assert_eq!(
            translated.transform_direction(d),
            rotated.transform_direction(d),
        );
    }

    #[test]
    fn test_cols_array_layout() {
        let elems: [Float; 16] = std::array::from_fn(|i| i as Float);
        let t = RotationTransform::from_cols_array(&elems);
        assert_eq!(t.matrix().col(1), [4.0, 5.0, 6.0, 7.0]);
        assert_eq!(t.to_cols_array(), elems);
        assert_eq!(<[Float; 16]>::from(RotationTransform::from(elems)), elems);
    }

    #[test]
    fn test_compose_and_invert() {
        let a = RotationTransform::from_rotation_x(0.4);
        let b = RotationTransform::from_axis_angle(
            Direction::new(1.0, 2.0, 2.0).normalize().expect("nonzero axis"),
            -1.1,
        );
        let d = Direction::new(0.48, 0.6, 0.64);
        assert_approx_eq!(
            a.then(&b).transform_direction(d),
            b.transform_direction(a.transform_direction(d)),
        );
        assert_approx_eq!(a.then(&a.inverse()), RotationTransform::IDENT);
        assert_approx_eq!(b.inverse().then(&b), RotationTransform::IDENT);
        assert!(b.matrix().is_orthogonal());
    }
}
