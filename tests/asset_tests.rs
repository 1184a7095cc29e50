//! Asset Pipeline Tests
//!
//! Tests for:
//! - split_url
//! - FileAssetReader and ReaderImporter with a custom decoder
//! - TaskQueue: concurrent fetches, serialized callbacks, failure isolation
//! - Scene mesh classification rule

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use avatar_loader::assets::{
    AssetImporter, AssetReader, FileAssetReader, MemoryImporter, MeshTask, Prefab, PrefabNode,
    ReaderImporter, ResourceUrl, SceneMeshRule, SharedPrefab, TaskQueue, TaskState, split_url,
};
use avatar_loader::errors::ImportError;
use avatar_loader::scene::{Node, Scene};
use avatar_loader::settings::LoaderSettings;

fn single_node_prefab(name: &str) -> Prefab {
    let mut prefab = Prefab::new();
    let root = prefab.push_node(PrefabNode::new(name));
    prefab.root_indices.push(root);
    prefab
}

// ============================================================================
// URL handling
// ============================================================================

#[test]
fn split_url_nested_path() {
    let parts = split_url("a/b/c.glb");
    assert_eq!(parts.root_url, "a/b/");
    assert_eq!(parts.filename, "c.glb");
}

#[test]
fn split_url_bare_filename() {
    let parts = split_url("c.glb");
    assert_eq!(parts.root_url, "");
    assert_eq!(parts.filename, "c.glb");
}

#[test]
fn split_url_keeps_scheme_in_root() {
    let parts = split_url("https://cdn.example.com/avatars/bot.glb");
    assert_eq!(parts, ResourceUrl::new("https://cdn.example.com/avatars/", "bot.glb"));
    assert_eq!(parts.to_string(), "https://cdn.example.com/avatars/bot.glb");
}

// ============================================================================
// Readers & importers
// ============================================================================

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("avatar_loader_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn file_reader_reads_relative_to_root() {
    let dir = temp_dir("reader");
    tokio::fs::write(dir.join("hello.bin"), b"myth").await.unwrap();

    let reader = FileAssetReader::new(&dir);
    assert_eq!(reader.read_bytes("hello.bin").await.unwrap(), b"myth");

    let missing = reader.read_bytes("missing.bin").await;
    assert!(matches!(missing, Err(ImportError::NotFound(_))));
}

fn decode_names(bytes: &[u8], source: &ResourceUrl) -> Result<Prefab, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ImportError::Decode(e.to_string()))?;
    let mut prefab = Prefab::new();
    let children: Vec<usize> = text
        .lines()
        .filter(|l| !l.is_empty())
        .map(|name| prefab.push_node(PrefabNode::new(name)))
        .collect();
    if children.is_empty() {
        return Err(ImportError::Malformed {
            url: source.full_url(),
            reason: "no nodes".to_string(),
        });
    }
    let root = prefab.push_node(PrefabNode::new(&source.filename).with_children(children));
    prefab.root_indices.push(root);
    Ok(prefab)
}

#[tokio::test]
async fn reader_importer_decodes_file() {
    let dir = temp_dir("importer");
    tokio::fs::write(dir.join("scene.txt"), "Wall\nFloor\n").await.unwrap();
    tokio::fs::write(dir.join("empty.txt"), "").await.unwrap();

    let importer = ReaderImporter::new(decode_names);
    let url = format!("{}/scene.txt", dir.display());

    let prefab = importer.import(&url).await.unwrap();
    assert_eq!(prefab.nodes.len(), 3);
    assert_eq!(prefab.nodes[prefab.root_indices[0]].name, "scene.txt");

    let empty = importer.import(&format!("{}/empty.txt", dir.display())).await;
    assert!(matches!(empty, Err(ImportError::Malformed { .. })));

    let missing = importer.import(&format!("{}/nope.txt", dir.display())).await;
    assert!(matches!(missing, Err(ImportError::NotFound(_))));
}

// ============================================================================
// TaskQueue
// ============================================================================

/// Delays each import by a per-URL amount and records completion order.
struct DelayedImporter {
    inner: MemoryImporter,
    delays: HashMap<String, u64>,
    completed: RefCell<Vec<String>>,
}

impl AssetImporter for DelayedImporter {
    async fn import(&self, url: &str) -> Result<SharedPrefab, ImportError> {
        let delay = self.delays.get(url).copied().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        self.completed.borrow_mut().push(url.to_string());
        self.inner.import(url).await
    }
}

#[tokio::test]
async fn task_queue_runs_fetches_concurrently() {
    let importer = DelayedImporter {
        inner: MemoryImporter::new()
            .with_asset("lvl/a.glb", single_node_prefab("A"))
            .with_asset("lvl/b.glb", single_node_prefab("B"))
            .with_asset("lvl/c.glb", single_node_prefab("C")),
        delays: HashMap::from([
            ("lvl/a.glb".to_string(), 90),
            ("lvl/b.glb".to_string(), 10),
            ("lvl/c.glb".to_string(), 50),
        ]),
        completed: RefCell::new(Vec::new()),
    };

    let order = Rc::new(RefCell::new(Vec::new()));
    let mut queue = TaskQueue::new();
    for filename in ["a.glb", "b.glb", "c.glb"] {
        let order = Rc::clone(&order);
        queue.add_mesh_task(MeshTask::new("level", "lvl/", filename).on_success(move |scene, meshes| {
            let name = scene.get_node(meshes[0]).unwrap().name.clone();
            order.borrow_mut().push(name);
        }));
    }

    let mut scene = Scene::new();
    let summary = queue.load_async(&importer, &mut scene).await;

    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);
    // Callbacks follow completion order, not registration order.
    assert_eq!(*order.borrow(), ["B", "C", "A"]);
    assert_eq!(*importer.completed.borrow(), ["lvl/b.glb", "lvl/c.glb", "lvl/a.glb"]);
    assert!(queue.tasks().iter().all(|t| t.state() == TaskState::Done));
}

#[tokio::test]
async fn task_queue_isolates_failures() {
    let importer = MemoryImporter::new()
        .with_asset("lvl/ok.glb", single_node_prefab("Ok"))
        .with_failure("lvl/bad.glb", "503");

    let errors = Rc::new(RefCell::new(Vec::new()));
    let mut queue = TaskQueue::new();
    let ok = queue.add_mesh_task(MeshTask::new("level", "lvl/", "ok.glb"));
    let bad = {
        let errors = Rc::clone(&errors);
        queue.add_mesh_task(MeshTask::new("level", "lvl/", "bad.glb").on_error(move |info, err| {
            errors.borrow_mut().push((info.full_url(), err.to_string()));
        }))
    };

    let mut scene = Scene::new();
    let summary = queue.load_async(&importer, &mut scene).await;

    assert_eq!((summary.succeeded, summary.failed), (1, 1));
    assert_eq!(queue.task(ok).unwrap().state(), TaskState::Done);
    assert_eq!(queue.task(ok).unwrap().loaded_meshes().len(), 1);
    assert_eq!(queue.task(bad).unwrap().state(), TaskState::Error);
    assert!(queue.task(bad).unwrap().loaded_meshes().is_empty());
    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(errors.borrow()[0].0, "lvl/bad.glb");
}

#[tokio::test]
async fn task_queue_only_runs_pending_tasks() {
    let importer = MemoryImporter::new()
        .with_asset("a.glb", single_node_prefab("A"))
        .with_asset("b.glb", single_node_prefab("B"));

    let mut scene = Scene::new();
    let mut queue = TaskQueue::new();
    queue.add_mesh_task(MeshTask::new("first", "", "a.glb"));
    queue.load_async(&importer, &mut scene).await;
    assert_eq!(queue.pending_count(), 0);

    queue.add_mesh_task(MeshTask::new("second", "", "b.glb"));
    let summary = queue.load_async(&importer, &mut scene).await;

    assert_eq!(summary.succeeded, 1);
    assert_eq!(importer.requests(), ["a.glb", "b.glb"]);

    queue.reset();
    assert!(queue.is_empty());
    assert_eq!(scene.root_nodes.len(), 2);
}

#[tokio::test]
async fn empty_queue_resolves_immediately() {
    let mut scene = Scene::new();
    let summary = TaskQueue::new().load_async(&MemoryImporter::new(), &mut scene).await;
    assert_eq!((summary.succeeded, summary.failed), (0, 0));
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn wall_collision_blocks_but_is_hidden() {
    let mut node = Node::new("Wall_Collision");
    SceneMeshRule::default().apply(&mut node);
    assert!(!node.visible);
    assert!(node.check_collisions);
    assert!(!node.pickable);
}

#[test]
fn floor_collision_is_pickable_ground() {
    let mut node = Node::new("Ground_Collision_Floor");
    SceneMeshRule::default().apply(&mut node);
    assert!(!node.visible);
    assert!(node.pickable);
    assert!(!node.check_collisions);
}

#[test]
fn regular_mesh_is_not_interactive() {
    let mut node = Node::new("Floor_Tiles");
    SceneMeshRule::default().apply(&mut node);
    assert!(node.visible);
    assert!(!node.pickable);
    assert!(!node.check_collisions);
}

#[test]
fn rule_follows_settings_markers() {
    let settings = LoaderSettings {
        collision_marker: "_col".to_string(),
        floor_marker: "_walk".to_string(),
        ..LoaderSettings::default()
    };
    let mut node = Node::new("bridge_col_walk");
    SceneMeshRule::from_settings(&settings).apply(&mut node);
    assert!(node.pickable);
    assert!(!node.visible);
}
