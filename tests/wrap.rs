use glam::{DAffine3, DVec3};

use pivot_wrap::math::{AllowedAngles, Composition};
use pivot_wrap::scene_graph::{NodeId, Scene, SceneNode};
use pivot_wrap::{Command, Editor, Host, ProjectConfig};

fn leaf(name: &str, rotation: [f64; 3], origin: [f64; 3]) -> SceneNode {
    SceneNode::leaf(name, DVec3::from_array(rotation), DVec3::from_array(origin))
}

fn placements(scene: &Scene, ids: &[NodeId]) -> Vec<DAffine3> {
    ids.iter()
        .map(|&id| scene.world_placement(id).unwrap())
        .collect()
}

#[test]
fn fix_illegal_wraps_concrete_leaf() {
    let mut scene = Scene::new();
    let group = scene
        .add_node(SceneNode::pivot("body", DVec3::ZERO, DVec3::ZERO, false), None)
        .unwrap();
    let before = scene.add_node(leaf("before", [0.0; 3], [0.0; 3]), Some(group)).unwrap();
    let cube = scene
        .add_node(leaf("leaf", [10.0, 0.0, 0.0], [1.0, 2.0, 3.0]), Some(group))
        .unwrap();
    let after = scene.add_node(leaf("after", [0.0; 3], [0.0; 3]), Some(group)).unwrap();

    let mut editor = Editor::new(scene, ProjectConfig::default());
    Command::FixIllegalWrap.execute(&mut editor).unwrap();

    let scene = &editor.scene;
    let pivot_id = scene.get_node_by_name("leaf_bone_1").unwrap();
    let pivot = scene.get_node(pivot_id).unwrap();
    assert_eq!(pivot.rotation(), DVec3::new(10.0, 0.0, 0.0));
    assert_eq!(pivot.origin(), DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(pivot.child_ids, vec![cube]);

    let cube_node = scene.get_node(cube).unwrap();
    assert_eq!(cube_node.rotation(), DVec3::ZERO);
    assert_eq!(cube_node.origin(), DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(cube_node.parent_id, Some(pivot_id));
    assert_eq!(scene.get_node(group).unwrap().child_ids, vec![before, pivot_id, after]);

    assert_eq!(editor.undo_steps().len(), 1);
    assert_eq!(editor.redraw_count(), 1);
    assert_eq!(
        editor.last_notice(),
        Some("Done: 1 leaf node(s) wrapped into pivots and reset to 0,0,0.")
    );
}

#[test]
fn fix_illegal_without_targets_is_a_no_op() {
    let mut scene = Scene::new();
    let cube = scene.add_node(leaf("cube", [0.0; 3], [4.0, 0.0, 0.0]), None).unwrap();

    let mut editor = Editor::new(scene, ProjectConfig::default());
    Command::FixIllegalWrap.execute(&mut editor).unwrap();

    assert!(editor.undo_steps().is_empty());
    assert!(!editor.is_editing());
    assert_eq!(editor.redraw_count(), 0);
    assert_eq!(editor.scene.len(), 1);
    assert_eq!(editor.scene.get_node(cube).unwrap().parent_id, None);
    assert_eq!(
        editor.last_notice(),
        Some("No leaves with illegal rotations (selection or project).")
    );
}

#[test]
fn selection_limits_targets() {
    let mut scene = Scene::new();
    let first = scene.add_node(leaf("first", [5.0, 0.0, 0.0], [0.0; 3]), None).unwrap();
    let second = scene.add_node(leaf("second", [5.0, 0.0, 0.0], [0.0; 3]), None).unwrap();

    let mut editor = Editor::new(scene, ProjectConfig::default()).with_selection(vec![second]);
    Command::FixIllegalWrap.execute(&mut editor).unwrap();

    assert_eq!(editor.scene.get_node(first).unwrap().parent_id, None);
    assert!(editor.scene.get_node(second).unwrap().parent_id.is_some());
    assert_eq!(editor.undo_steps()[0].affected, vec![second]);
}

#[test]
fn extended_set_accepts_half_turns() {
    let flipped = || {
        let mut scene = Scene::new();
        scene.add_node(leaf("flipped", [180.0, 0.0, 0.0], [0.0; 3]), None).unwrap();
        scene
    };

    let mut base = Editor::new(flipped(), ProjectConfig::default());
    Command::FixIllegalWrap.execute(&mut base).unwrap();
    assert_eq!(base.undo_steps().len(), 1);

    let config = ProjectConfig {
        allowed_angles: AllowedAngles::Extended,
        ..ProjectConfig::default()
    };
    let mut extended = Editor::new(flipped(), config);
    Command::FixIllegalWrap.execute(&mut extended).unwrap();
    assert!(extended.undo_steps().is_empty());
}

fn posed_scene() -> (Scene, Vec<NodeId>) {
    let mut scene = Scene::new();
    let arm = scene
        .add_node(
            SceneNode::pivot("arm", DVec3::new(0.0, 30.0, 0.0), DVec3::new(0.0, 4.0, 0.0), false),
            None,
        )
        .unwrap();
    let ids = vec![
        scene
            .add_node(leaf("a", [12.0, -40.0, 77.0], [1.0, 2.0, 3.0]), Some(arm))
            .unwrap(),
        scene
            .add_node(leaf("b", [0.0, 0.0, 33.0], [-2.0, 0.5, 0.0]), Some(arm))
            .unwrap(),
        scene.add_node(leaf("c", [100.0, 5.0, 0.0], [0.0; 3]), None).unwrap(),
    ];
    (scene, ids)
}

#[test]
fn wrap_preserves_world_pose() {
    for command in [Command::ForceWrapZero, Command::AddZeroRotationGroup] {
        let (scene, ids) = posed_scene();
        let expected = placements(&scene, &ids);

        let mut editor = Editor::new(scene, ProjectConfig::default());
        command.execute(&mut editor).unwrap();

        for (actual, expected) in placements(&editor.scene, &ids).iter().zip(&expected) {
            assert!(actual.abs_diff_eq(*expected, 1e-9), "{} moved a leaf", command.name());
        }
    }
}

#[test]
fn add_zero_rotation_group_names_and_undo() {
    let mut scene = Scene::new();
    let cube = scene.add_node(leaf("cube", [0.0, 45.0, 0.0], [0.0; 3]), None).unwrap();
    scene.add_node(leaf("cube", [0.0; 3], [1.0, 0.0, 0.0]), None).unwrap();

    let mut editor = Editor::new(scene, ProjectConfig::default());
    Command::AddZeroRotationGroup.execute(&mut editor).unwrap();

    assert!(editor.scene.get_node_by_name("cube_grp_1").is_some());
    assert!(editor.scene.get_node_by_name("cube_grp_2").is_some());
    assert_eq!(editor.scene.pivots().len(), 2);
    assert_eq!(
        editor.scene.get_node(cube).unwrap().rotation(),
        DVec3::new(0.0, 45.0, 0.0)
    );

    editor.undo().unwrap();
    assert!(editor.scene.pivots().is_empty());
    assert_eq!(editor.scene.len(), 2);
    assert_eq!(editor.scene.get_node(cube).unwrap().parent_id, None);
}

#[test]
fn rewrapping_allocates_fresh_names() {
    let mut scene = Scene::new();
    scene.add_node(leaf("cube", [1.0, 0.0, 0.0], [0.0; 3]), None).unwrap();

    let mut editor = Editor::new(scene, ProjectConfig::default());
    Command::ForceWrapZero.execute(&mut editor).unwrap();
    Command::ForceWrapZero.execute(&mut editor).unwrap();

    assert!(editor.scene.get_node_by_name("cube_bone_1").is_some());
    assert!(editor.scene.get_node_by_name("cube_bone_2").is_some());
    assert_eq!(editor.undo_steps().len(), 2);
    // The second pass wraps a zero rotation, so the outer pivot stays unrotated.
    assert_eq!(
        editor
            .scene
            .get_node(editor.scene.get_node_by_name("cube_bone_2").unwrap())
            .unwrap()
            .rotation(),
        DVec3::ZERO
    );
}

#[test]
fn bone_rig_tags_new_pivots() {
    let mut scene = Scene::new();
    scene.add_node(leaf("cube", [3.0, 0.0, 0.0], [0.0; 3]), None).unwrap();
    let config = ProjectConfig {
        bone_rig: true,
        ..ProjectConfig::default()
    };

    let mut editor = Editor::new(scene, config);
    Command::FixIllegalWrap.execute(&mut editor).unwrap();
    let pivot = editor.scene.get_node_by_name("cube_bone_1").unwrap();
    assert!(editor.scene.get_node(pivot).unwrap().is_bone());
}

#[test]
fn exact_and_additive_commands_are_distinct() {
    assert_ne!(
        Command::unwrap_by_name(Composition::Exact),
        Command::unwrap_by_name(Composition::Additive)
    );
    assert_eq!(Command::unwrap_by_name(Composition::Exact).name(), "unwrap-by-name");
}

#[test]
fn host_selection_is_live() {
    let mut scene = Scene::new();
    let cube = scene.add_node(leaf("cube", [0.0; 3], [0.0; 3]), None).unwrap();
    let editor = Editor::new(scene, ProjectConfig::default()).with_selection(vec![cube]);
    assert_eq!(Host::selection(&editor), vec![cube]);
}

#[test]
fn fix_illegal_keeps_top_level_position() {
    let mut scene = Scene::new();
    let first = scene.add_node(leaf("a", [0.0; 3], [0.0; 3]), None).unwrap();
    let tilted = scene.add_node(leaf("leaf", [10.0, 0.0, 0.0], [0.0; 3]), None).unwrap();
    let last = scene.add_node(leaf("b", [0.0; 3], [0.0; 3]), None).unwrap();

    let mut editor = Editor::new(scene, ProjectConfig::default());
    Command::FixIllegalWrap.execute(&mut editor).unwrap();

    let pivot = editor.scene.get_node_by_name("leaf_bone_1").unwrap();
    assert_eq!(editor.scene.root_ids(), &[first, pivot, last]);
    assert_eq!(editor.scene.get_node(tilted).unwrap().parent_id, Some(pivot));
}
