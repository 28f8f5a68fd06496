//! Conversions between per-axis Euler angles (degrees) and rotation matrices.
//!
//! Rotations are applied X first, then Y, then Z, so the matrix for a
//! rotation triple is `Rz * Ry * Rx`.

use glam::{DMat3, DVec3};

use crate::math::angles::{normalize_angle, normalize_rotation, tidy_angle};

/// Above this `|R[2][0]|` the pitch is treated as locked at ±90°.
const GIMBAL_LOCK_THRESHOLD: f64 = 0.99999;

pub fn euler_to_matrix(rotation: DVec3) -> DMat3 {
    let radians = rotation * (std::f64::consts::PI / 180.0);
    DMat3::from_rotation_z(radians.z)
        * DMat3::from_rotation_y(radians.y)
        * DMat3::from_rotation_x(radians.x)
}

/// Inverse of [`euler_to_matrix`]. When the pitch is locked the roll about Z
/// is folded into X and Z is reported as zero.
pub fn matrix_to_euler(matrix: &DMat3) -> DVec3 {
    // glam is column-major: R[row][col] == matrix.col(col)[row].
    let r00 = matrix.x_axis.x;
    let r10 = matrix.x_axis.y;
    let r20 = matrix.x_axis.z;
    let r11 = matrix.y_axis.y;
    let r21 = matrix.y_axis.z;
    let r12 = matrix.z_axis.y;
    let r22 = matrix.z_axis.z;

    let y = (-r20).clamp(-1.0, 1.0).asin();
    let (x, z) = if r20.abs() < GIMBAL_LOCK_THRESHOLD {
        (r21.atan2(r22), r10.atan2(r00))
    } else {
        ((-r12).atan2(r11), 0.0)
    };

    normalize_rotation(DVec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees()))
}

/// Rotates `point` by `rotation` about `pivot`.
pub fn rotate_point_around(point: DVec3, rotation: DVec3, pivot: DVec3) -> DVec3 {
    euler_to_matrix(rotation) * (point - pivot) + pivot
}

/// How a parent rotation and a child rotation are merged into one triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// Multiply the rotation matrices and decompose the product. Preserves
    /// the pose for any pair of rotations.
    Exact,
    /// Add the angles axis by axis. Only pose-preserving when the two
    /// rotations commute, e.g. both are about the same single axis.
    Additive,
}

impl Composition {
    pub fn compose(self, parent: DVec3, child: DVec3) -> DVec3 {
        match self {
            Composition::Exact => compose_exact(parent, child),
            Composition::Additive => compose_additive(parent, child),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Composition::Exact => "exact",
            Composition::Additive => "additive",
        }
    }
}

pub fn compose_exact(parent: DVec3, child: DVec3) -> DVec3 {
    let combined = euler_to_matrix(parent) * euler_to_matrix(child);
    matrix_to_euler(&combined)
}

pub fn compose_additive(parent: DVec3, child: DVec3) -> DVec3 {
    let sum = parent + child;
    DVec3::new(tidy_angle(sum.x), tidy_angle(sum.y), tidy_angle(sum.z))
}

/// Per-axis angular distance between two rotation triples.
pub fn rotation_delta(a: DVec3, b: DVec3) -> DVec3 {
    DVec3::new(
        normalize_angle(a.x - b.x),
        normalize_angle(a.y - b.y),
        normalize_angle(a.z - b.z),
    )
}
