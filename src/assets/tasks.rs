//! Batch queue of named mesh-load tasks.
//!
//! Fetches of all pending tasks are in flight at the same time; completion
//! handling (instantiation, state change, callback) runs one task at a time
//! in completion order. A failing task never affects its siblings.

use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::assets::importer::AssetImporter;
use crate::errors::ImportError;
use crate::scene::{NodeHandle, Scene};

/// Called with the meshes a task instantiated.
pub type SuccessCallback = Box<dyn FnMut(&mut Scene, &[NodeHandle])>;
/// Called with the failed task and the import error.
pub type ErrorCallback = Box<dyn FnMut(&TaskInfo, &ImportError)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Init,
    Running,
    Done,
    Error,
}

impl TaskState {
    #[inline]
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// What a task loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub name: String,
    pub root_url: String,
    pub filename: String,
}

impl TaskInfo {
    #[must_use]
    pub fn full_url(&self) -> String {
        format!("{}{}", self.root_url, self.filename)
    }
}

/// A single named mesh-load task.
pub struct MeshTask {
    info: TaskInfo,
    state: TaskState,
    loaded: Vec<NodeHandle>,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl MeshTask {
    #[must_use]
    pub fn new(name: &str, root_url: &str, filename: &str) -> Self {
        Self {
            info: TaskInfo {
                name: name.to_string(),
                root_url: root_url.to_string(),
                filename: filename.to_string(),
            },
            state: TaskState::Init,
            loaded: Vec::new(),
            on_success: None,
            on_error: None,
        }
    }

    #[must_use]
    pub fn on_success(mut self, callback: impl FnMut(&mut Scene, &[NodeHandle]) + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_error(mut self, callback: impl FnMut(&TaskInfo, &ImportError) + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    #[inline]
    #[must_use]
    pub fn info(&self) -> &TaskInfo {
        &self.info
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Meshes instantiated by this task. Empty unless it succeeded.
    #[inline]
    #[must_use]
    pub fn loaded_meshes(&self) -> &[NodeHandle] {
        &self.loaded
    }
}

impl std::fmt::Debug for MeshTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshTask")
            .field("info", &self.info)
            .field("state", &self.state)
            .field("loaded", &self.loaded.len())
            .finish_non_exhaustive()
    }
}

/// Outcome counts of one [`TaskQueue::load_async`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Vec<MeshTask>,
}

impl TaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task and returns its index.
    pub fn add_mesh_task(&mut self, task: MeshTask) -> usize {
        self.tasks.push(task);
        self.tasks.len() - 1
    }

    #[must_use]
    pub fn tasks(&self) -> &[MeshTask] {
        &self.tasks
    }

    #[must_use]
    pub fn task(&self, index: usize) -> Option<&MeshTask> {
        self.tasks.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks that have not run yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.state == TaskState::Init).count()
    }

    /// Drops every task, finished or not.
    pub fn reset(&mut self) {
        self.tasks.clear();
    }

    /// Runs every task still in [`TaskState::Init`] and resolves once all of
    /// them have finished. Failures are reported through the task's error
    /// callback only.
    pub async fn load_async<I: AssetImporter>(&mut self, importer: &I, scene: &mut Scene) -> LoadSummary {
        let mut in_flight = FuturesUnordered::new();

        for (index, task) in self.tasks.iter_mut().enumerate() {
            if task.state != TaskState::Init {
                continue;
            }
            task.state = TaskState::Running;
            let url = task.info.full_url();
            in_flight.push(async move {
                let result = importer.import(&url).await;
                (index, result)
            });
        }

        let mut summary = LoadSummary::default();

        while let Some((index, result)) = in_flight.next().await {
            let Some(task) = self.tasks.get_mut(index) else {
                continue;
            };

            match result {
                Ok(prefab) => {
                    let imported = scene.instantiate(&prefab);
                    task.state = TaskState::Done;
                    task.loaded.clone_from(&imported.meshes);
                    if let Some(callback) = task.on_success.as_mut() {
                        callback(scene, &imported.meshes);
                    }
                    summary.succeeded += 1;
                }
                Err(err) => {
                    task.state = TaskState::Error;
                    match task.on_error.as_mut() {
                        Some(callback) => callback(&task.info, &err),
                        None => log::warn!("Task '{}' failed: {err}", task.info.name),
                    }
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}
