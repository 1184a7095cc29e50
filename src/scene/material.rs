use glam::Vec3;

/// Minimal Blinn-Phong style material description.
///
/// The rendering engine owns the real GPU material; the loader only needs a
/// named, shareable record of its colors.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
}

impl StandardMaterial {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ambient_color: Vec3::ZERO,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
        }
    }

    /// Single color on every channel.
    #[must_use]
    pub fn flat(name: &str, color: Vec3) -> Self {
        Self {
            name: name.to_string(),
            ambient_color: color,
            diffuse_color: color,
            specular_color: color,
        }
    }
}
