//! Resource Manager
//!
//! Front door for loading avatars, avatar animations and static scene
//! objects into a [`Scene`].
//!
//! # Failure policy
//!
//! - [`ResourceManager::load_avatar`] never fails. Import errors are logged
//!   and replaced by a fallback sphere ([`AvatarMesh::Fallback`]).
//! - [`ResourceManager::load_avatar_animations`] propagates import errors,
//!   since there is no meaningful fallback animation.
//! - Batch scene-object tasks fail individually and are only logged.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut manager = ResourceManager::new(MemoryImporter::new());
//! let avatar = manager.load_avatar("avatars/bot.glb").await;
//! let anims = manager.load_avatar_animations("avatars/bot_anims.glb").await?;
//!
//! manager.add_scene_object_tasks("level", "levels/forest/", &["trees.glb", "walls.glb"]);
//! manager.load_async().await;
//! ```

use std::sync::Arc;

use glam::Vec3;
use uuid::Uuid;

use crate::animation::{AnimationGroup, ReferenceFrame, Retargeter};
use crate::assets::classify::SceneMeshRule;
use crate::assets::importer::AssetImporter;
use crate::assets::tasks::{LoadSummary, MeshTask, TaskQueue};
use crate::assets::url::{ResourceUrl, split_url};
use crate::errors::{Error, ImportError, Result};
use crate::scene::{
    ImportResult, Node, NodeHandle, Scene, SphereOptions, StandardMaterial, create_sphere,
};
use crate::settings::LoaderSettings;

/// Name given to the fallback sphere node.
pub const DUMMY_MESH_NAME: &str = "DummyMesh";

/// Outcome of an avatar load. Either way there is a mesh to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarMesh {
    Loaded(NodeHandle),
    /// The import failed and a placeholder sphere was created instead.
    Fallback(NodeHandle),
}

impl AvatarMesh {
    #[inline]
    #[must_use]
    pub fn handle(self) -> NodeHandle {
        match self {
            Self::Loaded(handle) | Self::Fallback(handle) => handle,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// A reference mesh plus the animation groups retargeted onto it.
///
/// The groups are not registered in the scene; the caller owns them.
#[derive(Debug)]
pub struct AvatarAnimationResult {
    pub mesh: NodeHandle,
    pub animation_groups: Vec<AnimationGroup>,
}

pub struct ResourceManager<I> {
    scene: Scene,
    importer: I,
    settings: LoaderSettings,
    retargeter: Retargeter,
    mesh_rule: SceneMeshRule,
    tasks: TaskQueue,
}

impl<I: AssetImporter> ResourceManager<I> {
    pub fn new(importer: I) -> Self {
        Self::with_settings(importer, LoaderSettings::default())
    }

    pub fn with_settings(importer: I, settings: LoaderSettings) -> Self {
        Self::with_scene(Scene::new(), importer, settings)
    }

    pub fn with_scene(scene: Scene, importer: I, settings: LoaderSettings) -> Self {
        Self {
            scene,
            importer,
            retargeter: Retargeter::new(settings.root_bone_name.as_str()),
            mesh_rule: SceneMeshRule::from_settings(&settings),
            settings,
            tasks: TaskQueue::new(),
        }
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    pub fn importer(&self) -> &I {
        &self.importer
    }

    #[inline]
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    #[inline]
    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    #[inline]
    pub fn tasks_mut(&mut self) -> &mut TaskQueue {
        &mut self.tasks
    }

    /// Gives the scene back, e.g. to hand it to a renderer.
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    #[must_use]
    pub fn split_url(url: &str) -> ResourceUrl {
        split_url(url)
    }

    // ========================================================================
    // Avatars
    // ========================================================================

    /// Imports an avatar and prepares its primary mesh for display.
    ///
    /// All imported meshes become non-pickable. The primary mesh (the first
    /// one) gets a fresh id, unit scale, collision checking, and its pivot
    /// moved to the center of its hierarchy's bounding box plus
    /// [`LoaderSettings::pivot_offset`].
    pub async fn load_avatar(&mut self, url: &str) -> AvatarMesh {
        match self.try_load_avatar(url).await {
            Ok(handle) => AvatarMesh::Loaded(handle),
            Err(err) => {
                log::error!("Failed to load avatar {url}: {err}");
                AvatarMesh::Fallback(self.create_dummy_mesh())
            }
        }
    }

    /// Same as [`Self::load_avatar`]; used for the locally controlled avatar.
    pub async fn load_my_avatar(&mut self, url: &str) -> AvatarMesh {
        self.load_avatar(url).await
    }

    async fn try_load_avatar(&mut self, url: &str) -> std::result::Result<NodeHandle, ImportError> {
        let prefab = self.importer.import(url).await?;
        let imported = self.scene.instantiate(&prefab);

        let Some(&primary) = imported.meshes.first() else {
            self.discard_import(&imported);
            return Err(ImportError::MissingPrimaryMesh(url.to_string()));
        };

        for &mesh in &imported.meshes {
            if let Some(node) = self.scene.get_node_mut(mesh) {
                node.pickable = false;
            }
        }

        let id = Uuid::new_v4();
        if let Some(node) = self.scene.get_node_mut(primary) {
            node.id = Some(id);
            node.transform.scale = Vec3::ONE;
            node.check_collisions = true;
        }

        // Bounds are taken after the scale reset.
        let center = self
            .scene
            .hierarchy_bounding_box(primary)
            .map_or(Vec3::ZERO, |bbox| bbox.center());
        if let Some(node) = self.scene.get_node_mut(primary) {
            node.transform.position = -center + self.settings.pivot_offset;
        }

        log::info!("Loaded avatar {url} as {id}");
        Ok(primary)
    }

    /// Imports animations and retargets them onto the import's reference
    /// mesh, the first child of the import root.
    ///
    /// The import root is disposed afterwards; its children are kept at the
    /// scene root so the returned mesh and the animation targets stay valid.
    /// The source animation groups are released.
    ///
    /// The root's transform (often a handedness flip for glTF content) is
    /// lost with it, so the world pose of the returned nodes differs from the
    /// imported one. Only their local transforms are preserved. Retargeting
    /// uses the reference mesh's local rotation and scale and is unaffected.
    pub async fn load_avatar_animations(&mut self, url: &str) -> Result<AvatarAnimationResult> {
        log::info!("Loading avatar animations from {url}");

        let prefab = self.importer.import(url).await?;
        let imported = self.scene.instantiate(&prefab);

        let Some(&root) = imported.meshes.first() else {
            self.discard_import(&imported);
            return Err(ImportError::MissingPrimaryMesh(url.to_string()).into());
        };

        let Some(&reference) = self.scene.children(root).first() else {
            self.discard_import(&imported);
            return Err(ImportError::Malformed {
                url: url.to_string(),
                reason: "import root has no child mesh".to_string(),
            }
            .into());
        };

        let frame = match self.scene.get_node(reference) {
            Some(node) => ReferenceFrame::from_node(node),
            None => {
                self.discard_import(&imported);
                return Err(Error::NodeNotFound(format!("reference mesh of {url}")));
            }
        };

        let animation_groups = self
            .retargeter
            .retarget(&mut self.scene, &imported.animation_groups, &frame);

        let children = self.scene.children(root).to_vec();
        for child in children {
            self.scene.detach_to_root(child);
        }
        self.scene.remove_node(root);

        Ok(AvatarAnimationResult {
            mesh: reference,
            animation_groups,
        })
    }

    /// Removes everything an import added to the scene.
    fn discard_import(&mut self, imported: &ImportResult) {
        for &group in &imported.animation_groups {
            self.scene.dispose_animation_group(group);
        }
        for &node in &imported.nodes {
            self.scene.remove_node(node);
        }
    }

    /// Adds a non-pickable placeholder sphere to the scene.
    ///
    /// All placeholders share one flat-colored material, created on first use.
    pub fn create_dummy_mesh(&mut self) -> NodeHandle {
        let name = self.settings.fallback_material_name.clone();
        let color = self.settings.fallback_color;
        let material = self
            .scene
            .get_or_create_material(&name, || StandardMaterial::flat(&name, color));

        let geometry = create_sphere(&SphereOptions {
            diameter: self.settings.fallback_sphere_diameter,
            ..SphereOptions::default()
        });

        let mut node = Node::new(DUMMY_MESH_NAME).with_geometry(Arc::new(geometry));
        node.material = Some(material);
        node.pickable = false;

        self.scene.add_node(node)
    }

    // ========================================================================
    // Static scene objects
    // ========================================================================

    /// Queues one mesh task per filename under `root_url`.
    ///
    /// Loaded meshes get fresh ids and are classified with the scene mesh
    /// rule. Failures are logged.
    pub fn add_scene_object_tasks<S: AsRef<str>>(&mut self, task_name: &str, root_url: &str, filenames: &[S]) {
        for filename in filenames {
            let filename = filename.as_ref();
            let rule = self.mesh_rule.clone();
            let url = format!("{root_url}{filename}");

            let task = MeshTask::new(task_name, root_url, filename)
                .on_success(move |scene, meshes| {
                    for &mesh in meshes {
                        if let Some(node) = scene.get_node_mut(mesh) {
                            node.id = Some(Uuid::new_v4());
                            rule.apply(node);
                        }
                    }
                    log::info!("Loaded scene object {url} ({} meshes)", meshes.len());
                })
                .on_error(|info, err| {
                    log::error!("Failed to load scene object {}: {err}", info.full_url());
                });

            self.tasks.add_mesh_task(task);
        }
    }

    /// Runs all queued scene-object tasks and resolves once every one has
    /// finished.
    pub async fn load_async(&mut self) -> LoadSummary {
        self.tasks.load_async(&self.importer, &mut self.scene).await
    }
}
