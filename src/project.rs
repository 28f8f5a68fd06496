//! JSON project files: the outliner tree, the selection and project settings.

use glam::DVec3;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ProjectConfig;
use crate::editor::Editor;
use crate::math::angles::finite_or_zero;
use crate::scene_graph::{NodeId, NodeKind, Scene, SceneError, SceneNode};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid project file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid outliner tree: {0}")]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutlinerEntry {
    Cube {
        #[serde(default)]
        name: String,
        #[serde(default, deserialize_with = "coerce_triple")]
        rotation: [f64; 3],
        #[serde(default, deserialize_with = "coerce_triple")]
        origin: [f64; 3],
    },
    Group {
        #[serde(default)]
        name: String,
        #[serde(default, deserialize_with = "coerce_triple")]
        rotation: [f64; 3],
        #[serde(default, deserialize_with = "coerce_triple")]
        origin: [f64; 3],
        #[serde(default)]
        is_bone: bool,
        #[serde(default)]
        children: Vec<OutlinerEntry>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub config: ProjectConfig,
    #[serde(default)]
    pub outliner: Vec<OutlinerEntry>,
    /// Names of the selected nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<String>,
}

impl Project {
    pub fn from_json(text: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build_scene(&self) -> Result<Scene, ProjectError> {
        let mut scene = Scene::new();
        for entry in &self.outliner {
            spawn_entry(&mut scene, entry, None)?;
        }
        Ok(scene)
    }

    pub fn into_editor(self) -> Result<Editor, ProjectError> {
        let scene = self.build_scene()?;

        let selection = self
            .selection
            .iter()
            .filter_map(|name| {
                let id = scene.get_node_by_name(name);
                if id.is_none() {
                    log::warn!("Selected node '{}' not found in the outliner", name);
                }
                id
            })
            .collect();

        Ok(Editor::new(scene, self.config).with_selection(selection))
    }

    pub fn from_editor(editor: &Editor) -> Self {
        let scene = &editor.scene;
        let outliner = scene
            .root_ids()
            .iter()
            .filter_map(|&id| scene.get_node(id))
            .map(|node| entry_from_node(scene, node))
            .collect();
        let selection = editor
            .selection
            .iter()
            .filter_map(|&id| scene.get_node(id))
            .map(|node| node.name.clone())
            .collect();

        Self {
            config: editor.config.clone(),
            outliner,
            selection,
        }
    }
}

fn spawn_entry(
    scene: &mut Scene,
    entry: &OutlinerEntry,
    parent: Option<NodeId>,
) -> Result<NodeId, SceneError> {
    match entry {
        OutlinerEntry::Cube {
            name,
            rotation,
            origin,
        } => {
            let node = SceneNode::leaf(name.as_str(), DVec3::from_array(*rotation), DVec3::from_array(*origin));
            scene.add_node(node, parent)
        }
        OutlinerEntry::Group {
            name,
            rotation,
            origin,
            is_bone,
            children,
        } => {
            let node = SceneNode::pivot(
                name.as_str(),
                DVec3::from_array(*rotation),
                DVec3::from_array(*origin),
                *is_bone,
            );
            let group_id = scene.add_node(node, parent)?;
            for child in children {
                spawn_entry(scene, child, Some(group_id))?;
            }
            Ok(group_id)
        }
    }
}

fn entry_from_node(scene: &Scene, node: &SceneNode) -> OutlinerEntry {
    let name = node.name.clone();
    let rotation = node.rotation().to_array();
    let origin = node.origin().to_array();

    match node.kind {
        NodeKind::Leaf => OutlinerEntry::Cube {
            name,
            rotation,
            origin,
        },
        NodeKind::Pivot { is_bone } => OutlinerEntry::Group {
            name,
            rotation,
            origin,
            is_bone,
            children: node
                .children(scene)
                .map(|child| entry_from_node(scene, child))
                .collect(),
        },
    }
}

/// Reads a three-component vector the way the editor coerces numbers: numeric
/// strings are parsed, booleans count as 1 or 0, anything else is 0.
fn coerce_triple<'de, D>(deserializer: D) -> Result<[f64; 3], D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let mut triple = [0.0; 3];
    if let Value::Array(items) = value {
        for (slot, item) in triple.iter_mut().zip(items.iter()) {
            *slot = coerce_number(item);
        }
    }
    Ok(triple)
}

fn coerce_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    finite_or_zero(number)
}
