//! Avatar and scene resource loading with skeletal animation retargeting.
//!
//! - [`assets::ResourceManager`] imports avatars (with a fallback sphere on
//!   failure), avatar animations, and batches of static scene objects.
//! - [`animation::Retargeter`] re-expresses root-bone motion in the frame of
//!   a reference mesh.
//! - [`scene::Scene`] is the in-memory scene the loader writes into.

pub mod animation;
pub mod assets;
pub mod errors;
pub mod scene;
pub mod settings;

pub use animation::{AnimationCurve, AnimationGroup, ReferenceFrame, Retargeter};
pub use assets::{
    AssetImporter, AvatarAnimationResult, AvatarMesh, MemoryImporter, ResourceManager, split_url,
};
pub use errors::{Error, ImportError, Result};
pub use scene::{Node, NodeHandle, Scene};
pub use settings::LoaderSettings;
