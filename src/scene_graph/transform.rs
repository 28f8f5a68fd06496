use glam::{DAffine3, DMat3, DVec3};

use crate::math::angles::{finite_or_zero, normalize_rotation};
use crate::math::euler::euler_to_matrix;

/// Rotation (degrees per axis) about a model-space origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    rotation: DVec3,
    origin: DVec3,
}

impl Transform {
    pub fn new(rotation: DVec3, origin: DVec3) -> Self {
        let mut transform = Self::default();
        transform.set_rotation(rotation);
        transform.set_origin(origin);
        transform
    }

    pub fn rotation(&self) -> DVec3 {
        self.rotation
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Stores the rotation with every axis normalized into (-180, 180].
    pub fn set_rotation(&mut self, rotation: DVec3) {
        self.rotation = normalize_rotation(rotation);
    }

    pub fn set_origin(&mut self, origin: DVec3) {
        self.origin = DVec3::new(
            finite_or_zero(origin.x),
            finite_or_zero(origin.y),
            finite_or_zero(origin.z),
        );
    }

    pub fn rotation_matrix(&self) -> DMat3 {
        euler_to_matrix(self.rotation)
    }

    /// How a pivot moves its subtree: rotate model space about the origin.
    pub fn pivot_matrix(&self) -> DAffine3 {
        DAffine3::from_translation(self.origin)
            * DAffine3::from_mat3(self.rotation_matrix())
            * DAffine3::from_translation(-self.origin)
    }

    /// Maps a leaf's local geometry frame (centered on its origin) to model space.
    pub fn placement_matrix(&self) -> DAffine3 {
        DAffine3::from_mat3_translation(self.rotation_matrix(), self.origin)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: DVec3::ZERO,
            origin: DVec3::ZERO,
        }
    }
}
