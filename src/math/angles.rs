use glam::DVec3;
use serde::{Deserialize, Serialize};

pub const ANGLE_EPSILON: f64 = 1e-6;

const BASE_ANGLES: [f64; 11] = [
    0.0, 22.5, 45.0, 67.5, 90.0, 135.0, -22.5, -45.0, -67.5, -90.0, -135.0,
];

const EXTENDED_ANGLES: [f64; 13] = [
    0.0, 22.5, 45.0, 67.5, 90.0, 135.0, 180.0, -22.5, -45.0, -67.5, -90.0, -135.0, -180.0,
];

/// Which version of the editor's legal rotation set a project targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowedAngles {
    #[default]
    Base,
    /// Base set plus ±180.
    Extended,
}

impl AllowedAngles {
    pub fn values(self) -> &'static [f64] {
        match self {
            AllowedAngles::Base => &BASE_ANGLES,
            AllowedAngles::Extended => &EXTENDED_ANGLES,
        }
    }

    pub fn is_allowed(self, angle: f64) -> bool {
        let angle = finite_or_zero(angle);
        self.values()
            .iter()
            .any(|v| (angle - v).abs() <= ANGLE_EPSILON)
    }

    /// True when every axis of `rotation` is in the set.
    pub fn is_legal_rotation(self, rotation: DVec3) -> bool {
        self.is_allowed(rotation.x) && self.is_allowed(rotation.y) && self.is_allowed(rotation.z)
    }
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Maps an angle in degrees into (-180, 180].
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = finite_or_zero(angle) % 360.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

pub fn normalize_rotation(rotation: DVec3) -> DVec3 {
    DVec3::new(
        normalize_angle(rotation.x),
        normalize_angle(rotation.y),
        normalize_angle(rotation.z),
    )
}

/// Normalizes, snaps near-zero values to zero and rounds to six decimals.
pub fn tidy_angle(angle: f64) -> f64 {
    let angle = normalize_angle(angle);
    if angle.abs() < ANGLE_EPSILON {
        return 0.0;
    }
    normalize_angle((angle * 1e6).round() / 1e6)
}
