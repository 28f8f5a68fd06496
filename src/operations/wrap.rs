//! Wrapping leaves into freshly created pivots.
//!
//! Each target leaf gets a new pivot inserted at the leaf's old position. The
//! pivot takes over the leaf's origin and (usually) its rotation, so the leaf
//! itself ends up with a legal zero rotation while its pose stays the same.

use glam::DVec3;
use itertools::Itertools;

use crate::host::{transact, Host};
use crate::math::AllowedAngles;
use crate::scene_graph::{InsertPosition, NodeId, Scene, SceneError, SceneNode, UniqueNameAllocator};

/// Which leaves get wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapFilter {
    /// Only leaves with at least one axis outside the allowed angle set.
    IllegalOnly,
    All,
}

/// What happens to the leaf's own rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationTransfer {
    /// The pivot takes the rotation and the leaf is zeroed.
    MoveToPivot,
    /// The pivot is created unrotated and the leaf keeps its rotation.
    KeepOnLeaf,
}

impl RotationTransfer {
    fn name_suffix(self) -> &'static str {
        match self {
            RotationTransfer::MoveToPivot => "_bone",
            RotationTransfer::KeepOnLeaf => "_grp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapOptions {
    pub filter: WrapFilter,
    pub transfer: RotationTransfer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapReport {
    /// New pivots, in the order their leaves were processed.
    pub pivots: Vec<NodeId>,
}

impl WrapReport {
    pub fn wrapped(&self) -> usize {
        self.pivots.len()
    }
}

/// Leaves from the selection, or from the whole project when nothing is
/// selected, in their original order and without repeats.
pub fn collect_targets(
    scene: &Scene,
    selection: &[NodeId],
    filter: WrapFilter,
    allowed: AllowedAngles,
) -> Vec<NodeId> {
    let candidates = if selection.is_empty() {
        scene.leaves()
    } else {
        selection.to_vec()
    };

    candidates
        .into_iter()
        .unique()
        .filter(|&id| match scene.get_node(id) {
            Some(node) if node.is_leaf() => match filter {
                WrapFilter::IllegalOnly => !allowed.is_legal_rotation(node.rotation()),
                WrapFilter::All => true,
            },
            _ => false,
        })
        .collect()
}

pub fn wrap<H: Host + ?Sized>(host: &mut H, options: WrapOptions) -> Result<WrapReport, SceneError> {
    let allowed = host.config().allowed_angles;
    let is_bone = host.config().bone_rig;
    let targets = collect_targets(host.scene(), &host.selection(), options.filter, allowed);

    if targets.is_empty() {
        let message = match options.filter {
            WrapFilter::IllegalOnly => "No leaves with illegal rotations (selection or project).",
            WrapFilter::All => "No leaves to wrap (selection or project).",
        };
        host.notify(message);
        return Ok(WrapReport::default());
    }

    let mut names = UniqueNameAllocator::new(host.scene().names());
    let label = match options.transfer {
        RotationTransfer::MoveToPivot => format!("Wrapped and zeroed {} leaf node(s)", targets.len()),
        RotationTransfer::KeepOnLeaf => format!("Grouped {} leaf node(s)", targets.len()),
    };

    let pivots = transact(host, &targets, &label, |scene| {
        targets
            .iter()
            .map(|&leaf_id| wrap_leaf(scene, leaf_id, &mut names, options.transfer, is_bone))
            .collect::<Result<Vec<_>, _>>()
    })?;

    log::info!("{}", label);
    host.notify(&match options.transfer {
        RotationTransfer::MoveToPivot => format!(
            "Done: {} leaf node(s) wrapped into pivots and reset to 0,0,0.",
            pivots.len()
        ),
        RotationTransfer::KeepOnLeaf => format!(
            "Done: {} leaf node(s) placed in unrotated groups.",
            pivots.len()
        ),
    });

    Ok(WrapReport { pivots })
}

/// Inserts a new pivot where `leaf_id` was and moves the leaf into it.
pub fn wrap_leaf(
    scene: &mut Scene,
    leaf_id: NodeId,
    names: &mut UniqueNameAllocator,
    transfer: RotationTransfer,
    is_bone: bool,
) -> Result<NodeId, SceneError> {
    let leaf = scene.get_node(leaf_id).ok_or(SceneError::MissingNode(leaf_id))?;
    let parent_id = leaf.parent_id;
    let position = scene.insert_position_of(leaf_id)?;

    let base_name = if leaf.name.is_empty() { "cube" } else { leaf.name.as_str() };
    let pivot_name = names.allocate(&format!("{}{}", base_name, transfer.name_suffix()));
    let pivot_rotation = match transfer {
        RotationTransfer::MoveToPivot => leaf.rotation(),
        RotationTransfer::KeepOnLeaf => DVec3::ZERO,
    };
    let pivot = SceneNode::pivot(pivot_name, pivot_rotation, leaf.origin(), is_bone);

    let pivot_id = scene.add_node(pivot, parent_id)?;
    scene.reparent(pivot_id, parent_id, position)?;
    scene.reparent(leaf_id, Some(pivot_id), InsertPosition::Append)?;

    if transfer == RotationTransfer::MoveToPivot {
        scene.set_node_rotation(leaf_id, DVec3::ZERO)?;
    }

    log::debug!(
        "Wrapped {:?} into pivot '{}'",
        leaf_id,
        scene.get_node(pivot_id).map_or("", |pivot| pivot.name.as_str())
    );

    Ok(pivot_id)
}
