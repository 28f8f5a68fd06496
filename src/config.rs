use serde::{Deserialize, Serialize};

use crate::math::AllowedAngles;

/// Project-level settings the operations read from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Tag newly created pivots as rig bones.
    pub bone_rig: bool,
    pub allowed_angles: AllowedAngles,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            bone_rig: false,
            allowed_angles: AllowedAngles::Base,
        }
    }
}
