//! Flattening pivots back into their leaves.
//!
//! A pivot's rotation and origin are merged into each of its direct leaf
//! children, the leaves take the pivot's place in its parent, and the emptied
//! pivot is removed. Nested pivots are handled innermost first so that every
//! sibling index recorded for an ancestor is still valid when it is used.

use std::cmp::Reverse;
use std::collections::HashSet;

use itertools::Itertools;

use crate::host::{transact, Host};
use crate::math::euler::{rotate_point_around, Composition};
use crate::scene_graph::{NodeId, Scene, SceneError, SceneNode};

pub const DEFAULT_BONE_MARKER: &str = "_bone";

/// Largest change in a leaf's world placement tolerated before warning.
const POSE_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PivotSelector {
    /// Pivots tagged as bones, or whose name contains `marker` (ignoring case).
    Named { marker: String },
    Any,
}

impl PivotSelector {
    pub fn named(marker: impl Into<String>) -> Self {
        PivotSelector::Named {
            marker: marker.into(),
        }
    }

    pub fn matches(&self, node: &SceneNode) -> bool {
        if !node.is_pivot() {
            return false;
        }

        match self {
            PivotSelector::Named { marker } => {
                node.is_bone() || node.name.to_lowercase().contains(&marker.to_lowercase())
            }
            PivotSelector::Any => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapOptions {
    pub selector: PivotSelector,
    /// Also collect every pivot nested below the candidates.
    pub recursive: bool,
    pub composition: Composition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnwrapReport {
    pub pivots_processed: usize,
    pub pivots_removed: usize,
    pub leaves_moved: usize,
}

/// Pivots to flatten, deepest first. Pivots at equal depth keep the order in
/// which they were collected.
pub fn collect_targets(scene: &Scene, selection: &[NodeId], options: &UnwrapOptions) -> Vec<NodeId> {
    let candidates = if selection.is_empty() {
        scene.pivots()
    } else {
        selection
            .iter()
            .copied()
            .filter(|&id| scene.get_node(id).is_some_and(SceneNode::is_pivot))
            .collect()
    };

    let mut visited = HashSet::new();
    let mut collected = Vec::new();
    for pivot_id in candidates {
        if options.recursive {
            collect_descendant_pivots(scene, pivot_id, &mut visited, &mut collected);
        } else if visited.insert(pivot_id) {
            collected.push(pivot_id);
        }
    }

    collected
        .into_iter()
        .filter(|&id| {
            scene
                .get_node(id)
                .is_some_and(|node| options.selector.matches(node))
        })
        .sorted_by_key(|&id| Reverse(scene.depth(id)))
        .collect()
}

fn collect_descendant_pivots(
    scene: &Scene,
    pivot_id: NodeId,
    visited: &mut HashSet<NodeId>,
    collected: &mut Vec<NodeId>,
) {
    let Some(node) = scene.get_node(pivot_id) else {
        return;
    };
    if !node.is_pivot() || !visited.insert(pivot_id) {
        return;
    }

    collected.push(pivot_id);
    for &child_id in &node.child_ids {
        collect_descendant_pivots(scene, child_id, visited, collected);
    }
}

pub fn unwrap<H: Host + ?Sized>(
    host: &mut H,
    options: &UnwrapOptions,
) -> Result<UnwrapReport, SceneError> {
    let targets = collect_targets(host.scene(), &host.selection(), options);

    if targets.is_empty() {
        host.notify("No pivots found to unwrap.");
        return Ok(UnwrapReport::default());
    }

    let label = format!(
        "Unwrapped {} pivot(s) ({} composition)",
        targets.len(),
        options.composition.label()
    );

    let report = transact(host, &targets, &label, |scene| {
        let mut report = UnwrapReport::default();
        for &pivot_id in &targets {
            let (moved, removed) = unwrap_pivot(scene, pivot_id, options.composition)?;
            report.pivots_processed += 1;
            report.leaves_moved += moved;
            if removed {
                report.pivots_removed += 1;
            }
        }
        Ok(report)
    })?;

    log::info!(
        "{}: {} removed, {} leaf node(s) moved",
        label,
        report.pivots_removed,
        report.leaves_moved
    );
    host.notify(&format!(
        "Done: {} pivot(s) unwrapped, {} leaf node(s) moved.",
        report.pivots_removed, report.leaves_moved
    ));

    Ok(report)
}

/// Merges `pivot_id` into each of its direct leaf children and moves them to
/// the pivot's position. Returns the number of leaves moved and whether the
/// pivot was removed.
pub fn unwrap_pivot(
    scene: &mut Scene,
    pivot_id: NodeId,
    composition: Composition,
) -> Result<(usize, bool), SceneError> {
    let pivot = scene
        .get_node(pivot_id)
        .ok_or(SceneError::MissingNode(pivot_id))?;
    if !pivot.is_pivot() {
        return Err(SceneError::NotAPivot(pivot_id));
    }

    let parent_id = pivot.parent_id;
    let pivot_rotation = pivot.rotation();
    let pivot_origin = pivot.origin();
    let leaf_ids: Vec<NodeId> = pivot
        .child_ids
        .iter()
        .copied()
        .filter(|&id| scene.get_node(id).is_some_and(SceneNode::is_leaf))
        .collect();
    let position = scene.insert_position_of(pivot_id)?;

    for (moved, &leaf_id) in leaf_ids.iter().enumerate() {
        let placement_before = scene.world_placement(leaf_id);

        let leaf = scene
            .get_node(leaf_id)
            .ok_or(SceneError::MissingNode(leaf_id))?;
        let origin = rotate_point_around(leaf.origin(), pivot_rotation, pivot_origin);
        let rotation = composition.compose(pivot_rotation, leaf.rotation());
        scene.set_node_origin(leaf_id, origin)?;
        scene.set_node_rotation(leaf_id, rotation)?;

        scene.reparent(leaf_id, parent_id, position.offset(moved))?;

        if let (Some(before), Some(after)) = (placement_before, scene.world_placement(leaf_id)) {
            if !before.abs_diff_eq(after, POSE_TOLERANCE) {
                log::warn!(
                    "Unwrapping {:?} moved leaf {:?} ({} composition does not preserve this pose)",
                    pivot_id,
                    leaf_id,
                    composition.label()
                );
            }
        }
    }

    let removed = scene.remove_if_empty(pivot_id)?;
    if !removed {
        log::debug!("Pivot {:?} still has non-leaf children, leaving it in place", pivot_id);
    }

    Ok((leaf_ids.len(), removed))
}
