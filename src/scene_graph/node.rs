use glam::DVec3;
use id_arena::Id;

use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;

pub type NodeId = Id<SceneNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Geometry; never has children.
    Leaf,
    /// Group carrying a rotation for its subtree. `is_bone` only matters to exporters.
    Pivot { is_bone: bool },
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub parent_id: Option<NodeId>,
    pub child_ids: Vec<NodeId>,
    pub(crate) removed: bool,
}

impl SceneNode {
    pub fn leaf(name: impl Into<String>, rotation: DVec3, origin: DVec3) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Leaf,
            transform: Transform::new(rotation, origin),
            ..Self::default()
        }
    }

    pub fn pivot(name: impl Into<String>, rotation: DVec3, origin: DVec3, is_bone: bool) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Pivot { is_bone },
            transform: Transform::new(rotation, origin),
            ..Self::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    pub fn is_pivot(&self) -> bool {
        matches!(self.kind, NodeKind::Pivot { .. })
    }

    pub fn is_bone(&self) -> bool {
        matches!(self.kind, NodeKind::Pivot { is_bone: true })
    }

    pub fn rotation(&self) -> DVec3 {
        self.transform.rotation()
    }

    pub fn origin(&self) -> DVec3 {
        self.transform.origin()
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a SceneNode> {
        self.parent_id.and_then(|id| scene.get_node(id))
    }

    pub fn children<'a, 'b>(&'a self, scene: &'b Scene) -> impl Iterator<Item = &'b SceneNode> + 'b
    where
        'a: 'b,
    {
        self.child_ids
            .iter()
            .filter_map(move |id| scene.get_node(*id))
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: NodeKind::Leaf,
            transform: Transform::default(),
            parent_id: None,
            child_ids: Vec::new(),
            removed: false,
        }
    }
}
