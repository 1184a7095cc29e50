//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: add/remove nodes, attach/detach hierarchy
//! - World matrices and hierarchy bounding boxes
//! - Material registry lookup-or-create
//! - Animation group registry ownership
//! - Prefab instantiation

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use avatar_loader::animation::{AnimationCurve, AnimationGroup, KeyframeTrack, PropertyPath};
use avatar_loader::assets::{Prefab, PrefabAnimation, PrefabNode};
use avatar_loader::scene::{BoundingBox, Geometry, Node, Scene, StandardMaterial, Transform};

const EPSILON: f32 = 1e-5;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn cube(min: Vec3, max: Vec3) -> Arc<Geometry> {
    Arc::new(Geometry::from_bounds(BoundingBox::new(min, max)))
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn scene_add_node_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("A"));
    assert_eq!(scene.root_nodes, vec![handle]);
    assert!(scene.get_node(handle).unwrap().parent().is_none());
}

#[test]
fn scene_add_to_parent() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);

    assert_eq!(scene.children(parent), &[child]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.root_nodes, vec![parent]);
}

#[test]
fn scene_attach_removes_from_old_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_node(Node::new("B"));
    let child = scene.add_to_parent(Node::new("Child"), a);

    scene.attach(child, b);

    assert!(scene.children(a).is_empty());
    assert_eq!(scene.children(b), &[child]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(b));
}

#[test]
fn scene_attach_to_self_is_noop() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    scene.attach(a, a);
    assert!(scene.get_node(a).unwrap().parent().is_none());
    assert_eq!(scene.root_nodes, vec![a]);
}

#[test]
fn scene_detach_to_root() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);

    scene.detach_to_root(child);

    assert!(scene.children(parent).is_empty());
    assert!(scene.get_node(child).unwrap().parent().is_none());
    assert_eq!(scene.root_nodes, vec![parent, child]);
}

#[test]
fn scene_remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    let child = scene.add_to_parent(Node::new("Child"), root);
    let grandchild = scene.add_to_parent(Node::new("Grandchild"), child);
    let other = scene.add_node(Node::new("Other"));

    scene.remove_node(root);

    assert!(scene.get_node(root).is_none());
    assert!(scene.get_node(child).is_none());
    assert!(scene.get_node(grandchild).is_none());
    assert_eq!(scene.root_nodes, vec![other]);
    assert_eq!(scene.nodes.len(), 1);
}

#[test]
fn scene_find_node_by_name() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Armature"));
    let hips = scene.add_to_parent(Node::new("Hips"), root);
    let spine = scene.add_to_parent(Node::new("Spine"), hips);

    assert_eq!(scene.find_node_by_name(root, "Spine"), Some(spine));
    assert_eq!(scene.find_node_by_name(hips, "Armature"), None);
}

#[test]
fn scene_unique_ids() {
    assert_ne!(Scene::new().id, Scene::new().id);
}

// ============================================================================
// Spatial queries
// ============================================================================

#[test]
fn world_matrix_follows_parent_chain() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent").with_transform(Transform::from_trs(
        Vec3::new(10.0, 0.0, 0.0),
        Quat::from_rotation_y(FRAC_PI_2),
        Vec3::splat(2.0),
    )));
    let child = scene.add_to_parent(
        Node::new("Child").with_transform(Transform {
            position: Vec3::X,
            ..Transform::new()
        }),
        parent,
    );

    let world = scene.world_matrix(child).unwrap();
    // Child offset +X, scaled by 2, yawed to -Z, then moved by the parent.
    assert!(approx_vec3(world.transform_point3(Vec3::ZERO), Vec3::new(10.0, 0.0, -2.0)));
}

#[test]
fn hierarchy_bounding_box_unions_descendants() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    scene.add_to_parent(
        Node::new("Body").with_geometry(cube(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0))),
        root,
    );
    scene.add_to_parent(
        Node::new("Head")
            .with_geometry(cube(Vec3::splat(-0.5), Vec3::splat(0.5)))
            .with_transform(Transform {
                position: Vec3::new(0.0, 1.5, 0.0),
                ..Transform::new()
            }),
        root,
    );

    let bbox = scene.hierarchy_bounding_box(root).unwrap();
    assert!(approx_vec3(bbox.min, Vec3::new(-1.0, 0.0, -1.0)));
    assert!(approx_vec3(bbox.max, Vec3::new(1.0, 2.0, 1.0)));
    assert!(approx_vec3(bbox.center(), Vec3::new(0.0, 1.0, 0.0)));
}

#[test]
fn hierarchy_bounding_box_applies_root_scale() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root").with_transform(Transform {
        scale: Vec3::splat(2.0),
        ..Transform::new()
    }));
    scene.add_to_parent(Node::new("Body").with_geometry(cube(Vec3::ZERO, Vec3::ONE)), root);

    let bbox = scene.hierarchy_bounding_box(root).unwrap();
    assert!(approx_vec3(bbox.max, Vec3::splat(2.0)));
}

#[test]
fn hierarchy_without_geometry_has_no_bounds() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Empty"));
    scene.add_to_parent(Node::new("AlsoEmpty"), root);
    assert!(scene.hierarchy_bounding_box(root).is_none());
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn get_or_create_material_creates_once() {
    let mut scene = Scene::new();
    let mut created = 0;

    let a = scene.get_or_create_material("Shared", || {
        created += 1;
        StandardMaterial::flat("ignored", Vec3::X)
    });
    let b = scene.get_or_create_material("Shared", || {
        created += 1;
        StandardMaterial::new("ignored")
    });

    assert_eq!(a, b);
    assert_eq!(created, 1);
    assert_eq!(scene.material_count(), 1);
    let material = scene.material(a).unwrap();
    assert_eq!(material.name, "Shared");
    assert_eq!(material.diffuse_color, Vec3::X);
}

#[test]
fn materials_are_per_scene() {
    let mut first = Scene::new();
    let second = Scene::new();
    first.get_or_create_material("Shared", || StandardMaterial::new("Shared"));
    assert!(second.get_material_by_name("Shared").is_none());
}

// ============================================================================
// Animation group registry
// ============================================================================

#[test]
fn remove_animation_group_transfers_ownership() {
    let mut scene = Scene::new();
    let handle = scene.add_animation_group(AnimationGroup::new("Idle"));

    let group = scene.remove_animation_group(handle).unwrap();
    assert_eq!(group.name, "Idle");
    assert!(scene.animation_group(handle).is_none());
    assert!(!scene.dispose_animation_group(handle));
}

// ============================================================================
// Prefab instantiation
// ============================================================================

fn rigged_prefab() -> Prefab {
    let mut prefab = Prefab::new();
    let hips = prefab.push_node(PrefabNode::new("Hips"));
    let body = prefab.push_node(PrefabNode::new("Body").with_geometry(cube(Vec3::ZERO, Vec3::ONE)));
    let armature = prefab.push_node(PrefabNode::new("Armature").with_children([hips, body]));
    let root = prefab.push_node(PrefabNode::new("__root__").with_children([armature]));
    prefab.root_indices.push(root);

    prefab.animations.push(PrefabAnimation::new("Walk").with_channel(
        hips,
        AnimationCurve::vector3(
            "position",
            PropertyPath::Position,
            KeyframeTrack::linear(vec![0.0], vec![Vec3::X]),
        ),
    ));
    prefab
}

#[test]
fn instantiate_builds_hierarchy_in_order() {
    let mut scene = Scene::new();
    let imported = scene.instantiate(&rigged_prefab());

    let names: Vec<&str> = imported
        .nodes
        .iter()
        .map(|&h| scene.get_node(h).unwrap().name.as_str())
        .collect();
    assert_eq!(names, ["__root__", "Armature", "Hips", "Body"]);

    // The root comes first, followed by nodes carrying geometry.
    let meshes: Vec<&str> = imported
        .meshes
        .iter()
        .map(|&h| scene.get_node(h).unwrap().name.as_str())
        .collect();
    assert_eq!(meshes, ["__root__", "Body"]);

    let armature = scene.children(imported.meshes[0])[0];
    assert_eq!(scene.get_node(armature).unwrap().name, "Armature");
}

#[test]
fn instantiate_registers_bound_animation_groups() {
    let mut scene = Scene::new();
    let imported = scene.instantiate(&rigged_prefab());

    assert_eq!(imported.animation_groups.len(), 1);
    let group = scene.animation_group(imported.animation_groups[0]).unwrap();
    let ta = &group.targeted_animations()[0];
    assert_eq!(ta.target.name, "Hips");
    assert_eq!(scene.get_node(ta.target.node).unwrap().name, "Hips");
}

#[test]
fn instantiate_skips_bad_indices() {
    let mut prefab = Prefab::new();
    let root = prefab.push_node(PrefabNode::new("Root").with_children([7]));
    prefab.root_indices.extend([root, root]);
    prefab.animations.push(PrefabAnimation::new("Broken").with_channel(
        42,
        AnimationCurve::vector3(
            "position",
            PropertyPath::Position,
            KeyframeTrack::linear(vec![0.0], vec![Vec3::X]),
        ),
    ));

    let mut scene = Scene::new();
    let imported = scene.instantiate(&prefab);

    assert_eq!(imported.nodes.len(), 1);
    let group = scene.animation_group(imported.animation_groups[0]).unwrap();
    assert!(group.is_empty());
}
