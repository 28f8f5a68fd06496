use crate::config::ProjectConfig;
use crate::scene_graph::{NodeId, Scene, SceneError};

/// Editor services the operations rely on.
///
/// One `begin_edit`/`finish_edit` pair is one undo step. Hosts must not start
/// a second operation while an edit is open.
pub trait Host {
    fn scene(&self) -> &Scene;
    fn scene_mut(&mut self) -> &mut Scene;

    /// Currently selected nodes, in selection order. May be empty.
    fn selection(&self) -> Vec<NodeId>;

    fn config(&self) -> &ProjectConfig;

    fn begin_edit(&mut self, affected: &[NodeId], label: &str);
    fn finish_edit(&mut self);
    /// Drops an open edit, restoring the scene it started from.
    fn cancel_edit(&mut self);

    fn redraw(&mut self);
    fn notify(&mut self, message: &str);
}

/// Runs `batch` as a single undo step: the edit is opened before the first
/// mutation, the host redraws once and the edit is closed. A failing batch
/// cancels the edit instead.
pub fn transact<H, T, F>(
    host: &mut H,
    affected: &[NodeId],
    label: &str,
    batch: F,
) -> Result<T, SceneError>
where
    H: Host + ?Sized,
    F: FnOnce(&mut Scene) -> Result<T, SceneError>,
{
    host.begin_edit(affected, label);

    match batch(host.scene_mut()) {
        Ok(value) => {
            host.redraw();
            host.finish_edit();
            Ok(value)
        }
        Err(err) => {
            log::error!("{} failed, rolling back: {}", label, err);
            host.cancel_edit();
            Err(err)
        }
    }
}
