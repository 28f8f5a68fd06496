//! Rotation normalization for editor scene graphs.
//!
//! Leaves whose rotation the target format cannot express are wrapped into
//! new pivots that carry the rotation instead, and pivots can be flattened
//! back into their leaves. Both directions keep every leaf's pose.

pub mod config;
pub mod editor;
pub mod host;
pub mod math;
pub mod operations;
pub mod project;
pub mod scene_graph;

pub use config::ProjectConfig;
pub use editor::Editor;
pub use host::Host;
pub use operations::Command;
pub use project::{Project, ProjectError};
