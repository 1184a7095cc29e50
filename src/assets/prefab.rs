use std::sync::Arc;

use crate::animation::curve::AnimationCurve;
use crate::scene::geometry::Geometry;
use crate::scene::transform::Transform;

/// 预制体节点：只包含数据，使用索引引用子节点
#[derive(Debug, Clone)]
pub struct PrefabNode {
    pub name: String,
    pub transform: Transform,
    /// Indices into `Prefab::nodes`
    pub children_indices: Vec<usize>,
    pub geometry: Option<Arc<Geometry>>,
}

impl PrefabNode {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::new(),
            children_indices: Vec::new(),
            geometry: None,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: Arc<Geometry>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = usize>) -> Self {
        self.children_indices.extend(children);
        self
    }
}

/// One curve of an imported animation, addressed by node index.
#[derive(Debug, Clone)]
pub struct PrefabChannel {
    pub node_index: usize,
    pub curve: AnimationCurve,
}

#[derive(Debug, Clone)]
pub struct PrefabAnimation {
    pub name: String,
    pub channels: Vec<PrefabChannel>,
}

impl PrefabAnimation {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            channels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_channel(mut self, node_index: usize, curve: AnimationCurve) -> Self {
        self.channels.push(PrefabChannel { node_index, curve });
        self
    }
}

/// 预制体：从资源文件解析出的中间数据结构
///
/// Plain, thread-safe data without any scene handles. Importers produce it
/// off the scene; `Scene::instantiate` turns it into live nodes and
/// registered animation groups.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    /// 扁平化存储的所有节点
    pub nodes: Vec<PrefabNode>,
    /// 根节点在 nodes 中的索引
    pub root_indices: Vec<usize>,
    pub animations: Vec<PrefabAnimation>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its index.
    pub fn push_node(&mut self, node: PrefabNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// 线程安全的 Prefab 引用
pub type SharedPrefab = Arc<Prefab>;
