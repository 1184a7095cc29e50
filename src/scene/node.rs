use std::sync::Arc;

use uuid::Uuid;

use crate::scene::geometry::Geometry;
use crate::scene::transform::Transform;
use crate::scene::{MaterialKey, NodeHandle};

/// A scene node: hierarchy links, local transform, interaction flags and
/// optional renderable data.
///
/// # Flags
///
/// - `pickable`: participates in ray picking (ground-height queries, clicks)
/// - `check_collisions`: blocks movement of colliding actors
/// - `visible`: rendered
///
/// Defaults mirror a freshly imported mesh: pickable, visible, no collisions.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Identity assigned by the loader; `None` until assigned.
    pub id: Option<Uuid>,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,

    pub pickable: bool,
    pub check_collisions: bool,
    pub visible: bool,

    pub geometry: Option<Arc<Geometry>>,
    pub material: Option<MaterialKey>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            pickable: true,
            check_collisions: false,
            visible: true,
            geometry: None,
            material: None,
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: Arc<Geometry>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Whether the node carries renderable geometry.
    #[inline]
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        self.geometry.is_some()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}
