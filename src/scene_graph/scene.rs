use glam::{DAffine3, DVec3};
use id_arena::Arena;

use crate::scene_graph::error::SceneError;
use crate::scene_graph::node::{NodeId, SceneNode};

/// Where a node sits among its siblings, or should be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Index(usize),
    Append,
}

impl InsertPosition {
    pub fn offset(self, by: usize) -> Self {
        match self {
            InsertPosition::Index(index) => InsertPosition::Index(index + by),
            InsertPosition::Append => InsertPosition::Append,
        }
    }
}

/// Saved copy of every node, used to roll a scene back to an earlier state.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    nodes: Vec<SceneNode>,
    root_ids: Vec<NodeId>,
}

/// Owns every node of a project. Nodes are addressed by arena ids which stay
/// valid after removal; removed nodes are simply no longer reachable.
pub struct Scene {
    nodes: Arena<SceneNode>,
    root_ids: Vec<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root_ids: Vec::new(),
        }
    }

    /// Adds `node` as the last child of `parent`, or as a top-level node.
    pub fn add_node(
        &mut self,
        mut node: SceneNode,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        if let Some(parent_id) = parent {
            self.require_container(parent_id)?;
        }

        node.parent_id = None;
        node.child_ids.clear();
        node.removed = false;
        let node_id = self.nodes.alloc(node);
        self.attach(node_id, parent, InsertPosition::Append);

        Ok(node_id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id).filter(|node| !node.removed)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id).filter(|node| !node.removed)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    pub fn get_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| !node.removed && node.name == name)
            .map(|(id, _)| id)
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.root_ids
    }

    /// Children of `parent`, or the top-level nodes for `None`.
    pub fn child_ids_of(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(parent_id) => self
                .get_node(parent_id)
                .map_or(&[][..], |node| node.child_ids.as_slice()),
            None => self.root_ids.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|(_, node)| !node.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every live node in outliner order (depth-first, parents before children).
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        for &root_id in &self.root_ids {
            self.walk_recursive(root_id, &mut order);
        }
        order
    }

    fn walk_recursive(&self, node_id: NodeId, order: &mut Vec<NodeId>) {
        if let Some(node) = self.get_node(node_id) {
            order.push(node_id);
            for &child_id in &node.child_ids {
                self.walk_recursive(child_id, order);
            }
        }
    }

    pub fn leaves(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.get_node(id).is_some_and(SceneNode::is_leaf))
            .collect()
    }

    pub fn pivots(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|&id| self.get_node(id).is_some_and(SceneNode::is_pivot))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.removed)
            .map(|(_, node)| node.name.as_str())
    }

    /// Number of ancestor hops up to the root.
    pub fn depth(&self, node_id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get_node(node_id).and_then(|node| node.parent_id);
        while let Some(parent_id) = current {
            depth += 1;
            current = self.get_node(parent_id).and_then(|node| node.parent_id);
        }
        depth
    }

    pub fn is_ancestor(&self, node_id: NodeId, ancestor_id: NodeId) -> bool {
        let mut current = self.get_node(node_id).and_then(|node| node.parent_id);
        while let Some(parent_id) = current {
            if parent_id == ancestor_id {
                return true;
            }
            current = self.get_node(parent_id).and_then(|node| node.parent_id);
        }
        false
    }

    pub fn insert_position_of(&self, node_id: NodeId) -> Result<InsertPosition, SceneError> {
        let node = self
            .get_node(node_id)
            .ok_or(SceneError::MissingNode(node_id))?;

        let position = self
            .child_ids_of(node.parent_id)
            .iter()
            .position(|&id| id == node_id)
            .map_or(InsertPosition::Append, InsertPosition::Index);

        Ok(position)
    }

    /// Moves a node under `new_parent` (or to the top level) at `position`.
    /// Siblings on both sides keep their relative order.
    pub fn reparent(
        &mut self,
        node_id: NodeId,
        new_parent: Option<NodeId>,
        position: InsertPosition,
    ) -> Result<(), SceneError> {
        if !self.contains(node_id) {
            return Err(SceneError::MissingNode(node_id));
        }

        if let Some(parent_id) = new_parent {
            self.require_container(parent_id)?;
            if parent_id == node_id || self.is_ancestor(parent_id, node_id) {
                return Err(SceneError::Cycle {
                    node: node_id,
                    parent: parent_id,
                });
            }
        }

        self.detach(node_id);
        self.attach(node_id, new_parent, position);

        Ok(())
    }

    /// Removes a pivot that has no children left. Returns whether it was removed.
    pub fn remove_if_empty(&mut self, pivot_id: NodeId) -> Result<bool, SceneError> {
        let pivot = self
            .get_node(pivot_id)
            .ok_or(SceneError::MissingNode(pivot_id))?;
        if !pivot.is_pivot() {
            return Err(SceneError::NotAPivot(pivot_id));
        }
        if !pivot.child_ids.is_empty() {
            return Ok(false);
        }

        self.detach(pivot_id);
        if let Some(pivot) = self.nodes.get_mut(pivot_id) {
            pivot.removed = true;
        }

        Ok(true)
    }

    pub fn set_node_rotation(&mut self, node_id: NodeId, rotation: DVec3) -> Result<(), SceneError> {
        let node = self
            .get_node_mut(node_id)
            .ok_or(SceneError::MissingNode(node_id))?;
        node.transform.set_rotation(rotation);
        Ok(())
    }

    pub fn set_node_origin(&mut self, node_id: NodeId, origin: DVec3) -> Result<(), SceneError> {
        let node = self
            .get_node_mut(node_id)
            .ok_or(SceneError::MissingNode(node_id))?;
        node.transform.set_origin(origin);
        Ok(())
    }

    /// Maps the node's local geometry frame into model space, applying every
    /// ancestor pivot from the innermost outwards.
    pub fn world_placement(&self, node_id: NodeId) -> Option<DAffine3> {
        let node = self.get_node(node_id)?;
        let mut matrix = node.transform.placement_matrix();

        let mut current = node.parent_id;
        while let Some(parent_id) = current {
            let parent = self.get_node(parent_id)?;
            matrix = parent.transform.pivot_matrix() * matrix;
            current = parent.parent_id;
        }

        Some(matrix)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            nodes: self.nodes.iter().map(|(_, node)| node.clone()).collect(),
            root_ids: self.root_ids.clone(),
        }
    }

    /// Puts every node back the way `snapshot` saw it. Nodes allocated since
    /// then are marked removed, since the arena never frees slots.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        for (index, (_, node)) in self.nodes.iter_mut().enumerate() {
            match snapshot.nodes.get(index) {
                Some(saved) => *node = saved.clone(),
                None => {
                    node.removed = true;
                    node.parent_id = None;
                    node.child_ids.clear();
                }
            }
        }
        self.root_ids = snapshot.root_ids.clone();
    }

    fn require_container(&self, parent_id: NodeId) -> Result<(), SceneError> {
        match self.get_node(parent_id) {
            None => Err(SceneError::MissingNode(parent_id)),
            Some(parent) if parent.is_leaf() => Err(SceneError::LeafParent(parent_id)),
            Some(_) => Ok(()),
        }
    }

    fn detach(&mut self, node_id: NodeId) {
        let old_parent = self.nodes.get(node_id).and_then(|node| node.parent_id);
        match old_parent.and_then(|parent_id| self.nodes.get_mut(parent_id)) {
            Some(parent) => parent.child_ids.retain(|&id| id != node_id),
            None => self.root_ids.retain(|&id| id != node_id),
        }

        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent_id = None;
        }
    }

    fn attach(&mut self, node_id: NodeId, parent: Option<NodeId>, position: InsertPosition) {
        let siblings = match parent.and_then(|parent_id| self.nodes.get_mut(parent_id)) {
            Some(parent_node) => &mut parent_node.child_ids,
            None => &mut self.root_ids,
        };

        match position {
            InsertPosition::Index(index) => siblings.insert(index.min(siblings.len()), node_id),
            InsertPosition::Append => siblings.push(node_id),
        }

        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent_id = parent;
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
