use std::sync::Arc;

use crate::animation::curve::{AnimationCurve, KeyframeValue, PropertyPath};
use crate::scene::{NodeHandle, Scene};

/// The node a curve is bound to. The name is captured at bind time so that
/// rules keyed on bone names do not need to reach back into the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationTarget {
    pub node: NodeHandle,
    pub name: String,
}

/// A single animated property curve bound to one scene node.
#[derive(Debug, Clone)]
pub struct TargetedAnimation {
    pub animation: Arc<AnimationCurve>,
    pub target: AnimationTarget,
}

/// A named collection of targeted animations played together.
#[derive(Debug, Clone, Default)]
pub struct AnimationGroup {
    pub name: String,
    targeted_animations: Vec<TargetedAnimation>,
}

impl AnimationGroup {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            targeted_animations: Vec::new(),
        }
    }

    pub fn add_targeted_animation(&mut self, animation: Arc<AnimationCurve>, target: AnimationTarget) {
        self.targeted_animations.push(TargetedAnimation { animation, target });
    }

    #[inline]
    #[must_use]
    pub fn targeted_animations(&self) -> &[TargetedAnimation] {
        &self.targeted_animations
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targeted_animations.is_empty()
    }

    /// Curves bound to the node called `name`.
    pub fn curves_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TargetedAnimation> + 'a {
        self.targeted_animations.iter().filter(move |ta| ta.target.name == name)
    }

    /// Length of the longest curve.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.targeted_animations
            .iter()
            .map(|ta| ta.animation.end_time())
            .fold(0.0_f32, f32::max)
    }

    /// Writes the pose at `time` into the bound nodes' transforms.
    ///
    /// Targets that no longer exist are skipped.
    pub fn apply(&self, scene: &mut Scene, time: f32) {
        for ta in &self.targeted_animations {
            let Some(node) = scene.get_node_mut(ta.target.node) else {
                continue;
            };
            match (&ta.animation.property, ta.animation.sample(time)) {
                (PropertyPath::Position, Some(KeyframeValue::Vector3(v))) => node.transform.position = v,
                (PropertyPath::Scaling, Some(KeyframeValue::Vector3(v))) => node.transform.scale = v,
                (PropertyPath::RotationQuaternion, Some(KeyframeValue::Quaternion(q))) => {
                    node.transform.rotation = Some(q);
                }
                (property, _) => {
                    log::debug!("Skipping unsupported animated property '{property}' on {}", ta.target.name);
                }
            }
        }
    }
}
