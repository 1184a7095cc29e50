//! Loader Settings
//!
//! Content-authoring conventions that the loader relies on. The defaults match
//! the assets the loader was written against; override them when a content
//! pipeline uses different names or offsets.
//!
//! ```rust,ignore
//! use avatar_loader::settings::LoaderSettings;
//!
//! let settings = LoaderSettings::from_json_str(r#"{ "floor_marker": "Ground" }"#)?;
//! assert_eq!(settings.collision_marker, "Collision");
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Configuration shared by the import orchestrator, the scene mesh
/// classifier and the retargeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Added to the recentred avatar pivot.
    pub pivot_offset: Vec3,
    /// Name substring marking a mesh as a collision volume.
    pub collision_marker: String,
    /// Name substring marking a collision volume as walkable ground.
    pub floor_marker: String,
    /// Registry name of the shared fallback material.
    pub fallback_material_name: String,
    /// Flat color used for every channel of the fallback material.
    pub fallback_color: Vec3,
    /// Diameter of the fallback sphere.
    pub fallback_sphere_diameter: f32,
    /// Name of the root bone whose motion gets re-expressed.
    pub root_bone_name: String,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            pivot_offset: Vec3::new(0.0, -0.1, 0.0),
            collision_marker: "Collision".to_string(),
            floor_marker: "Floor".to_string(),
            fallback_material_name: "DummyMaterial".to_string(),
            fallback_color: Vec3::new(1.0, 0.0, 0.0),
            fallback_sphere_diameter: 1.0,
            root_bone_name: "Hips".to_string(),
        }
    }
}

impl LoaderSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
