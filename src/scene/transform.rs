use glam::{Affine3A, Quat, Vec3};

/// Transform 组件
///
/// Local position, rotation and scale of a scene node.
///
/// The rotation quaternion is optional: nodes created from Euler data or by
/// primitive builders may carry no quaternion at all, and the retargeter
/// distinguishes "no rotation defined" from "identity rotation".
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Option<Quat>,
    pub scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: None,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Some(rotation),
            scale,
        }
    }

    /// The rotation to use for math, identity when none is defined.
    #[inline]
    #[must_use]
    pub fn rotation_or_identity(&self) -> Quat {
        self.rotation.unwrap_or(Quat::IDENTITY)
    }

    /// 获取局部矩阵
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(
            self.scale,
            self.rotation_or_identity(),
            self.position,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
