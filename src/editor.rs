use crate::config::ProjectConfig;
use crate::host::Host;
use crate::scene_graph::{NodeId, Scene, SceneSnapshot};

/// One committed edit.
#[derive(Debug, Clone)]
pub struct UndoStep {
    pub label: String,
    pub affected: Vec<NodeId>,
    before: SceneSnapshot,
}

/// In-memory host: owns the scene, the selection and an undo history.
pub struct Editor {
    pub scene: Scene,
    pub selection: Vec<NodeId>,
    pub config: ProjectConfig,
    undo_stack: Vec<UndoStep>,
    pending: Option<UndoStep>,
    notices: Vec<String>,
    redraws: usize,
}

impl Editor {
    pub fn new(scene: Scene, config: ProjectConfig) -> Self {
        Self {
            scene,
            selection: Vec::new(),
            config,
            undo_stack: Vec::new(),
            pending: None,
            notices: Vec::new(),
            redraws: 0,
        }
    }

    pub fn with_selection(mut self, selection: Vec<NodeId>) -> Self {
        self.selection = selection;
        self
    }

    pub fn undo_steps(&self) -> &[UndoStep] {
        &self.undo_stack
    }

    pub fn is_editing(&self) -> bool {
        self.pending.is_some()
    }

    /// Reverts the most recent edit. Returns its label.
    pub fn undo(&mut self) -> Option<String> {
        let step = self.undo_stack.pop()?;
        self.scene.restore(&step.before);
        self.redraws += 1;
        log::info!("Undo: {}", step.label);
        Some(step.label)
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&str> {
        self.notices.last().map(String::as_str)
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}

impl Host for Editor {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection
            .iter()
            .copied()
            .filter(|&id| self.scene.contains(id))
            .collect()
    }

    fn config(&self) -> &ProjectConfig {
        &self.config
    }

    fn begin_edit(&mut self, affected: &[NodeId], label: &str) {
        if let Some(open) = &self.pending {
            log::warn!("Edit '{}' is still open, discarding it", open.label);
        }

        self.pending = Some(UndoStep {
            label: label.to_string(),
            affected: affected.to_vec(),
            before: self.scene.snapshot(),
        });
    }

    fn finish_edit(&mut self) {
        match self.pending.take() {
            Some(step) => {
                log::debug!("Committed '{}' ({} node(s))", step.label, step.affected.len());
                self.undo_stack.push(step);
            }
            None => log::warn!("finish_edit called without an open edit"),
        }
    }

    fn cancel_edit(&mut self) {
        if let Some(step) = self.pending.take() {
            self.scene.restore(&step.before);
        }
    }

    fn redraw(&mut self) {
        self.redraws += 1;
    }

    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::transact;
    use crate::scene_graph::{InsertPosition, SceneError, SceneNode};
    use glam::DVec3;

    fn editor_with_group() -> (Editor, NodeId, NodeId) {
        let mut scene = Scene::new();
        let group = scene
            .add_node(SceneNode::pivot("group", DVec3::ZERO, DVec3::ZERO, false), None)
            .unwrap();
        let cube = scene
            .add_node(SceneNode::leaf("cube", DVec3::ZERO, DVec3::ZERO), Some(group))
            .unwrap();
        (Editor::new(scene, ProjectConfig::default()), group, cube)
    }

    #[test]
    fn test_transaction_commits_one_undo_step() {
        let (mut editor, group, cube) = editor_with_group();

        transact(&mut editor, &[cube], "move cube", |scene| {
            scene.reparent(cube, None, InsertPosition::Append)?;
            scene.remove_if_empty(group)
        })
        .unwrap();

        assert!(!editor.is_editing());
        assert_eq!(editor.undo_steps().len(), 1);
        assert_eq!(editor.undo_steps()[0].label, "move cube");
        assert_eq!(editor.redraw_count(), 1);
        assert!(!editor.scene.contains(group));

        assert_eq!(editor.undo().as_deref(), Some("move cube"));
        assert!(editor.scene.contains(group));
        assert_eq!(editor.scene.get_node(cube).unwrap().parent_id, Some(group));
        assert_eq!(editor.undo(), None);
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let (mut editor, group, cube) = editor_with_group();

        let result = transact(&mut editor, &[cube], "bad move", |scene| {
            scene.reparent(cube, None, InsertPosition::Append)?;
            scene.reparent(group, Some(cube), InsertPosition::Append)
        });

        assert_eq!(result, Err(SceneError::LeafParent(cube)));
        assert!(!editor.is_editing());
        assert!(editor.undo_steps().is_empty());
        assert_eq!(editor.scene.get_node(group).unwrap().child_ids, vec![cube]);
    }

    #[test]
    fn test_selection_skips_removed_nodes() {
        let (editor, group, cube) = editor_with_group();
        let mut editor = editor.with_selection(vec![group, cube]);
        editor
            .scene
            .reparent(cube, None, InsertPosition::Append)
            .unwrap();
        editor.scene.remove_if_empty(group).unwrap();
        assert_eq!(editor.selection(), vec![cube]);
    }
}
