use crate::scene::Node;
use crate::settings::LoaderSettings;

/// Interaction flags derived from a static scene mesh's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshFlags {
    pub pickable: bool,
    pub check_collisions: bool,
    pub visible: bool,
}

/// Name-substring rule for static scene meshes.
///
/// Everything starts non-pickable and non-collidable. A name containing the
/// collision marker hides the mesh; it then becomes pickable if the name also
/// contains the floor marker (ground probing), collidable otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneMeshRule {
    collision_marker: String,
    floor_marker: String,
}

impl Default for SceneMeshRule {
    fn default() -> Self {
        Self::new("Collision", "Floor")
    }
}

impl SceneMeshRule {
    #[must_use]
    pub fn new(collision_marker: impl Into<String>, floor_marker: impl Into<String>) -> Self {
        Self {
            collision_marker: collision_marker.into(),
            floor_marker: floor_marker.into(),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &LoaderSettings) -> Self {
        Self::new(settings.collision_marker.as_str(), settings.floor_marker.as_str())
    }

    /// Flags for a mesh called `name` that is currently `visible`.
    #[must_use]
    pub fn flags_for(&self, name: &str, visible: bool) -> MeshFlags {
        let mut flags = MeshFlags {
            pickable: false,
            check_collisions: false,
            visible,
        };

        if name.contains(&self.collision_marker) {
            flags.visible = false;
            if name.contains(&self.floor_marker) {
                flags.pickable = true;
            } else {
                flags.check_collisions = true;
            }
        }

        flags
    }

    pub fn apply(&self, node: &mut Node) {
        let flags = self.flags_for(&node.name, node.visible);
        node.pickable = flags.pickable;
        node.check_collisions = flags.check_collisions;
        node.visible = flags.visible;
    }
}
