use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Affine3A;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::group::{AnimationGroup, AnimationTarget};
use crate::assets::prefab::Prefab;
use crate::scene::geometry::BoundingBox;
use crate::scene::material::StandardMaterial;
use crate::scene::node::Node;
use crate::scene::{AnimationGroupHandle, MaterialKey, NodeHandle};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Handles created by [`Scene::instantiate`].
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Every instantiated node, depth-first from the first root.
    pub nodes: Vec<NodeHandle>,
    /// Root nodes and nodes with geometry, in the same order. The first entry
    /// is the import's root.
    pub meshes: Vec<NodeHandle>,
    /// Animation groups registered in the scene.
    pub animation_groups: Vec<AnimationGroupHandle>,
}

/// 场景图结构
///
/// Owns nodes, shared materials and the scene-level animation-group
/// registry. Everything registered here is released when the scene is
/// dropped; content that must outlive the scene has to be taken out first
/// (see [`Scene::remove_animation_group`]).
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    materials: SlotMap<MaterialKey, StandardMaterial>,
    material_lookup: FxHashMap<String, MaterialKey>,

    animation_groups: SlotMap<AnimationGroupHandle, AnimationGroup>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            materials: SlotMap::with_key(),
            material_lookup: FxHashMap::default(),
            animation_groups: SlotMap::with_key(),
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// 添加一个节点到场景 (默认放在根节点)
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("Parent node not found, adding '{}' as a root", child.name);
            return self.add_node(child);
        }
        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// 建立父子关系 (Attach)
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }
        self.unlink(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Moves `child` to the root level, keeping its local transform.
    pub fn detach_to_root(&mut self, child: NodeHandle) {
        if !self.nodes.contains_key(child) {
            return;
        }
        self.unlink(child);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        self.root_nodes.push(child);
    }

    /// Removes `handle` from its parent's child list or from the roots.
    fn unlink(&mut self, handle: NodeHandle) {
        let parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(p) = parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == handle)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }
    }

    /// 移除节点 (递归移除所有子节点)
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let children = match self.nodes.get(handle) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.remove_node(child);
        }
        self.unlink(handle);
        self.nodes.remove(handle);
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes.get(handle).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Depth-first search below (and including) `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.name == name {
                return Some(current);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    // ========================================================================
    // Spatial queries
    // ========================================================================

    /// World matrix from the parent chain.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        let mut node = self.nodes.get(handle)?;
        let mut world = node.transform.local_matrix();
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            world = parent.transform.local_matrix() * world;
            node = parent;
        }
        Some(world)
    }

    /// World-space box around every geometry in the subtree rooted at
    /// `handle`. `None` when the subtree holds no geometry.
    #[must_use]
    pub fn hierarchy_bounding_box(&self, handle: NodeHandle) -> Option<BoundingBox> {
        let mut combined: Option<BoundingBox> = None;
        let mut stack = vec![(handle, self.world_matrix(handle)?)];

        while let Some((current, world)) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };

            if let Some(local) = node.geometry.as_ref().and_then(|g| g.bounding_box()) {
                let bbox = local.transform(&world);
                combined = Some(match combined {
                    Some(existing) => existing.union(&bbox),
                    None => bbox,
                });
            }

            for &child in &node.children {
                if let Some(c) = self.nodes.get(child) {
                    stack.push((child, world * c.transform.local_matrix()));
                }
            }
        }

        combined
    }

    // ========================================================================
    // Materials
    // ========================================================================

    /// Registers a material. The first material registered under a name is
    /// the one returned by name lookups.
    pub fn add_material(&mut self, material: StandardMaterial) -> MaterialKey {
        let name = material.name.clone();
        let key = self.materials.insert(material);
        self.material_lookup.entry(name).or_insert(key);
        key
    }

    #[must_use]
    pub fn get_material_by_name(&self, name: &str) -> Option<MaterialKey> {
        self.material_lookup.get(name).copied()
    }

    /// Lookup-or-create by name; `create` runs at most once per name.
    pub fn get_or_create_material(
        &mut self,
        name: &str,
        create: impl FnOnce() -> StandardMaterial,
    ) -> MaterialKey {
        if let Some(key) = self.get_material_by_name(name) {
            return key;
        }
        let mut material = create();
        material.name = name.to_string();
        self.add_material(material)
    }

    #[must_use]
    pub fn material(&self, key: MaterialKey) -> Option<&StandardMaterial> {
        self.materials.get(key)
    }

    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // ========================================================================
    // Animation group registry
    // ========================================================================

    pub fn add_animation_group(&mut self, group: AnimationGroup) -> AnimationGroupHandle {
        self.animation_groups.insert(group)
    }

    #[must_use]
    pub fn animation_group(&self, handle: AnimationGroupHandle) -> Option<&AnimationGroup> {
        self.animation_groups.get(handle)
    }

    /// Takes a group out of the registry, handing ownership to the caller.
    pub fn remove_animation_group(&mut self, handle: AnimationGroupHandle) -> Option<AnimationGroup> {
        self.animation_groups.remove(handle)
    }

    /// Releases a registered group. Returns `false` if it was already gone.
    pub fn dispose_animation_group(&mut self, handle: AnimationGroupHandle) -> bool {
        self.animation_groups.remove(handle).is_some()
    }

    #[must_use]
    pub fn animation_group_count(&self) -> usize {
        self.animation_groups.len()
    }

    // ========================================================================
    // Prefab instantiation
    // ========================================================================

    /// Creates live nodes and registered animation groups from imported data.
    pub fn instantiate(&mut self, prefab: &Prefab) -> ImportResult {
        let mut result = ImportResult::default();
        let mut mapping: Vec<Option<NodeHandle>> = vec![None; prefab.nodes.len()];

        let mut stack: Vec<(usize, Option<NodeHandle>)> =
            prefab.root_indices.iter().rev().map(|&i| (i, None)).collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(source) = prefab.nodes.get(index) else {
                log::warn!("Prefab references missing node index {index}");
                continue;
            };
            if mapping[index].is_some() {
                log::warn!("Prefab node '{}' is referenced more than once", source.name);
                continue;
            }

            let mut node = Node::new(&source.name).with_transform(source.transform.clone());
            node.geometry = source.geometry.clone();
            let is_mesh = parent.is_none() || node.is_mesh();

            let handle = match parent {
                Some(p) => self.add_to_parent(node, p),
                None => self.add_node(node),
            };
            mapping[index] = Some(handle);
            result.nodes.push(handle);
            if is_mesh {
                result.meshes.push(handle);
            }

            stack.extend(source.children_indices.iter().rev().map(|&c| (c, Some(handle))));
        }

        for animation in &prefab.animations {
            let mut group = AnimationGroup::new(&animation.name);
            for channel in &animation.channels {
                let Some(node) = mapping.get(channel.node_index).copied().flatten() else {
                    log::warn!(
                        "Animation '{}' targets unknown node index {}",
                        animation.name,
                        channel.node_index
                    );
                    continue;
                };
                let target = AnimationTarget {
                    node,
                    name: prefab.nodes[channel.node_index].name.clone(),
                };
                group.add_targeted_animation(Arc::new(channel.curve.clone()), target);
            }
            result.animation_groups.push(self.add_animation_group(group));
        }

        result
    }
}
