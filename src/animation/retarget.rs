//! Animation Retargeting
//!
//! Re-expresses imported animation groups in the local frame of a reference
//! mesh.
//!
//! Avatar rigs bake root motion into the root bone ("Hips") relative to the
//! source rig's orientation and scale. When the animation is replayed under a
//! node carrying a different rotation/scale, the root displacement and facing
//! must be re-projected into that frame or the character slides and turns.
//!
//! # Rules
//!
//! The rule set is a decision table over (node role × property kind):
//!
//! | role \ property      | `position`          | `rotationQuaternion` | other   |
//! |----------------------|---------------------|----------------------|---------|
//! | root bone            | reproject (R·v ⊙ S) | compose (R * q)      | discard |
//! | any other node       | discard             | share (same `Arc`)   | discard |
//!
//! Rotations of other bones are frame independent and are shared as-is.
//! Positions of other bones are rig-local constants recoverable from the bind
//! pose, so they are dropped.

use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashSet;

use crate::animation::curve::{AnimationCurve, PropertyPath};
use crate::animation::group::{AnimationGroup, TargetedAnimation};
use crate::scene::node::Node;
use crate::scene::{AnimationGroupHandle, NodeHandle, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    RootBone,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Position,
    Rotation,
    Other,
}

impl From<&PropertyPath> for PropertyKind {
    fn from(path: &PropertyPath) -> Self {
        match path {
            PropertyPath::Position => Self::Position,
            PropertyPath::RotationQuaternion => Self::Rotation,
            _ => Self::Other,
        }
    }
}

/// What happens to one targeted animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetStrategy {
    /// Copy the curve, rotate each vector by the reference rotation and then
    /// scale it component-wise by the reference scale.
    ReprojectPosition,
    /// Copy the curve and left-multiply each key by the reference rotation.
    ComposeRotation,
    /// Reuse the source curve unchanged.
    Share,
    Discard,
}

/// The decision table.
#[must_use]
pub fn strategy_for(role: NodeRole, kind: PropertyKind) -> RetargetStrategy {
    match (role, kind) {
        (NodeRole::RootBone, PropertyKind::Position) => RetargetStrategy::ReprojectPosition,
        (NodeRole::RootBone, PropertyKind::Rotation) => RetargetStrategy::ComposeRotation,
        (NodeRole::Other, PropertyKind::Rotation) => RetargetStrategy::Share,
        _ => RetargetStrategy::Discard,
    }
}

/// Rotation and scale of the reference mesh, captured once per retarget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    /// `None` when the mesh has no rotation quaternion defined.
    pub rotation: Option<Quat>,
    pub scale: Vec3,
}

impl ReferenceFrame {
    #[must_use]
    pub fn new(rotation: Option<Quat>, scale: Vec3) -> Self {
        Self { rotation, scale }
    }

    #[must_use]
    pub fn from_node(node: &Node) -> Self {
        Self {
            rotation: node.transform.rotation,
            scale: node.transform.scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn reproject_position(&self, v: Vec3) -> Vec3 {
        (self.rotation.unwrap_or(Quat::IDENTITY) * v) * self.scale
    }

    /// `R * q`, or `q` untouched when no reference rotation is defined.
    #[inline]
    #[must_use]
    pub fn compose_rotation(&self, q: Quat) -> Quat {
        match self.rotation {
            Some(r) => r * q,
            None => q,
        }
    }
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::new(Some(Quat::IDENTITY), Vec3::ONE)
    }
}

/// Disposes a source group from the scene registry when dropped, so the
/// engine-owned data is released on every exit path.
struct ReleaseOnDrop<'s> {
    scene: &'s mut Scene,
    handle: AnimationGroupHandle,
}

impl ReleaseOnDrop<'_> {
    fn group(&self) -> Option<&AnimationGroup> {
        self.scene.animation_group(self.handle)
    }
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        self.scene.dispose_animation_group(self.handle);
    }
}

#[derive(Debug, Clone)]
pub struct Retargeter {
    root_bone_name: String,
}

impl Default for Retargeter {
    fn default() -> Self {
        Self::new("Hips")
    }
}

impl Retargeter {
    #[must_use]
    pub fn new(root_bone_name: impl Into<String>) -> Self {
        Self {
            root_bone_name: root_bone_name.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root_bone_name(&self) -> &str {
        &self.root_bone_name
    }

    #[must_use]
    pub fn role_of(&self, target_name: &str) -> NodeRole {
        if target_name == self.root_bone_name {
            NodeRole::RootBone
        } else {
            NodeRole::Other
        }
    }

    #[must_use]
    pub fn strategy(&self, target_name: &str, property: &PropertyPath) -> RetargetStrategy {
        strategy_for(self.role_of(target_name), property.into())
    }

    /// Builds the trimmed, re-expressed copy of one group. The source is
    /// left untouched.
    ///
    /// Each target keeps at most one position and one rotation curve; later
    /// duplicates are dropped.
    #[must_use]
    pub fn retarget_group(&self, source: &AnimationGroup, frame: &ReferenceFrame) -> AnimationGroup {
        let mut output = AnimationGroup::new(&source.name);
        let mut seen: FxHashSet<(NodeHandle, PropertyKind)> = FxHashSet::default();

        for ta in source.targeted_animations() {
            let Some(animation) = self.retarget_curve(ta, frame) else {
                continue;
            };
            if !seen.insert((ta.target.node, PropertyKind::from(&animation.property))) {
                log::warn!(
                    "Dropping duplicate '{}' curve on {} in group '{}'",
                    animation.property,
                    ta.target.name,
                    source.name
                );
                continue;
            }
            output.add_targeted_animation(animation, ta.target.clone());
        }

        output
    }

    fn retarget_curve(&self, ta: &TargetedAnimation, frame: &ReferenceFrame) -> Option<Arc<AnimationCurve>> {
        match self.strategy(&ta.target.name, &ta.animation.property) {
            RetargetStrategy::ReprojectPosition => {
                let mut curve = AnimationCurve::clone(&ta.animation);
                if curve.map_vectors(|v| frame.reproject_position(v)) {
                    Some(Arc::new(curve))
                } else {
                    log::warn!(
                        "Dropping '{}' on {}: position curve without vector keys",
                        curve.name,
                        ta.target.name
                    );
                    None
                }
            }
            RetargetStrategy::ComposeRotation => {
                let mut curve = AnimationCurve::clone(&ta.animation);
                if curve.map_quaternions(|q| frame.compose_rotation(q)) {
                    Some(Arc::new(curve))
                } else {
                    log::warn!(
                        "Dropping '{}' on {}: rotation curve without quaternion keys",
                        curve.name,
                        ta.target.name
                    );
                    None
                }
            }
            RetargetStrategy::Share => Some(Arc::clone(&ta.animation)),
            RetargetStrategy::Discard => None,
        }
    }

    /// Retargets engine-owned groups registered in `scene`.
    ///
    /// Each source group is released from the registry once processed. The
    /// returned groups are never registered: the caller owns them and is
    /// responsible for their lifetime.
    pub fn retarget(
        &self,
        scene: &mut Scene,
        sources: &[AnimationGroupHandle],
        frame: &ReferenceFrame,
    ) -> Vec<AnimationGroup> {
        let mut output = Vec::with_capacity(sources.len());

        for &handle in sources {
            let source = ReleaseOnDrop { scene: &mut *scene, handle };
            match source.group() {
                Some(group) => output.push(self.retarget_group(group, frame)),
                None => log::warn!("Animation group {handle:?} was already released"),
            }
        }

        output
    }
}
