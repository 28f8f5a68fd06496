pub mod unwrap;
pub mod wrap;

use crate::host::Host;
use crate::math::Composition;
use crate::scene_graph::SceneError;

pub use unwrap::{PivotSelector, UnwrapOptions, UnwrapReport, DEFAULT_BONE_MARKER};
pub use wrap::{RotationTransfer, WrapFilter, WrapOptions, WrapReport};

/// The commands offered to the editor. Each works on the current selection,
/// or on the whole project when nothing is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Wrap leaves with illegal rotations into pivots carrying that rotation.
    FixIllegalWrap,
    /// Wrap every leaf, moving its rotation to the new pivot.
    ForceWrapZero,
    /// Wrap every leaf into an unrotated group, leaving its rotation alone.
    AddZeroRotationGroup,
    /// Flatten bone pivots (tagged, or named with `marker`).
    UnwrapByName {
        marker: String,
        composition: Composition,
    },
    /// Flatten every pivot and all pivots nested below them.
    UnwrapAnyRecursive { composition: Composition },
}

impl Command {
    pub fn unwrap_by_name(composition: Composition) -> Self {
        Command::UnwrapByName {
            marker: DEFAULT_BONE_MARKER.to_string(),
            composition,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::FixIllegalWrap => "fix-illegal-wrap",
            Command::ForceWrapZero => "force-wrap-zero",
            Command::AddZeroRotationGroup => "add-zero-rotation-group",
            Command::UnwrapByName { .. } => "unwrap-by-name",
            Command::UnwrapAnyRecursive { .. } => "unwrap-any-recursive",
        }
    }

    /// Runs the command against `host`. The outcome is reported to the user
    /// through `Host::notify`; an error means the scene was malformed and the
    /// edit has been rolled back.
    pub fn execute<H: Host + ?Sized>(&self, host: &mut H) -> Result<(), SceneError> {
        log::debug!("Running {}", self.name());

        match self {
            Command::FixIllegalWrap => wrap::wrap(
                host,
                WrapOptions {
                    filter: WrapFilter::IllegalOnly,
                    transfer: RotationTransfer::MoveToPivot,
                },
            )
            .map(drop),
            Command::ForceWrapZero => wrap::wrap(
                host,
                WrapOptions {
                    filter: WrapFilter::All,
                    transfer: RotationTransfer::MoveToPivot,
                },
            )
            .map(drop),
            Command::AddZeroRotationGroup => wrap::wrap(
                host,
                WrapOptions {
                    filter: WrapFilter::All,
                    transfer: RotationTransfer::KeepOnLeaf,
                },
            )
            .map(drop),
            Command::UnwrapByName {
                marker,
                composition,
            } => unwrap::unwrap(
                host,
                &UnwrapOptions {
                    selector: PivotSelector::named(marker.as_str()),
                    recursive: false,
                    composition: *composition,
                },
            )
            .map(drop),
            Command::UnwrapAnyRecursive { composition } => unwrap::unwrap(
                host,
                &UnwrapOptions {
                    selector: PivotSelector::Any,
                    recursive: true,
                    composition: *composition,
                },
            )
            .map(drop),
        }
    }
}
