//! 场景图系统模块
//!
//! 管理场景层级结构和组件：
//! - Node: 场景节点（支持父子关系和变换）
//! - Transform: 变换组件（位置、旋转、缩放）
//! - Geometry / BoundingBox: 几何数据与包围盒
//! - StandardMaterial: 共享材质
//! - Scene: 场景容器（节点、材质、动画组注册表）

pub mod geometry;
pub mod material;
pub mod node;
pub mod primitives;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

// 重新导出常用类型
pub use geometry::{BoundingBox, Geometry};
pub use material::StandardMaterial;
pub use node::Node;
pub use primitives::{SphereOptions, create_sphere};
pub use scene::{ImportResult, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MaterialKey;
    pub struct AnimationGroupHandle;
}
