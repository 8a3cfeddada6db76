//! Optimistic Commands
//!
//! Every author mutation follows the same protocol: apply the edit to the
//! local tree, issue the remote call, then reconcile the server's echo or
//! roll the edit back. One trait keeps retry/rollback semantics identical
//! across entity kinds instead of drifting per call site.
//!
//! Creates and deletes roll back on failure; field updates keep the author's
//! value and only report the error. That asymmetry is deliberate: the field
//! edit is already visually committed when the call fails.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{Course, EntityId};
use crate::error::{ApiError, ApiResult, StudioError, StudioResult};
use crate::notice::NoticeSink;
use crate::store::CourseStore;

/// What a command wants from the network after its local apply
pub(crate) enum Commitment {
    /// Owner is persisted; issue the call
    Remote,
    /// Entity stays local; optionally tell the author which parent to save
    LocalOnly(Option<StudioError>),
}

#[async_trait]
pub(crate) trait OptimisticCommand: Send {
    /// Echoed server state used to reconcile
    type Remote: Send;

    /// Entity kind for notices and logs
    fn describe(&self) -> &'static str;

    /// Synchronous local edit; runs before any network traffic
    fn apply(&mut self, course: &mut Course) -> StudioResult<()>;

    /// Whether the remote call is legal (ephemeral owners block it)
    fn commitment(&self, course: &Course) -> Commitment;

    /// The remote call
    async fn commit(&mut self) -> ApiResult<Self::Remote>;

    /// Fold the server's echo back into the tree: identity promotion,
    /// normalized fields, echoed quiz state
    fn reconcile(&mut self, course: &mut Course, remote: Self::Remote);

    /// Undo the local edit after a failed commit; a no-op for field updates
    fn rollback(&mut self, course: &mut Course);
}

/// Store id of an entity a command is about to address remotely
pub(crate) fn remote_id(id: EntityId, kind: &'static str) -> ApiResult<i64> {
    id.store_id()
        .ok_or_else(|| ApiError::Transport(format!("local-only {kind} cannot sync")))
}

/// Drive a command through the full protocol
pub(crate) async fn run<C: OptimisticCommand>(
    store: &CourseStore,
    notices: &NoticeSink,
    scope: &CancellationToken,
    mut command: C,
) -> StudioResult<()> {
    if let Err(err) = store.update(|course| command.apply(course)) {
        notices.error(err.to_string());
        return Err(err);
    }

    match command.commitment(&store.snapshot()) {
        Commitment::LocalOnly(conflict) => {
            if let Some(err) = conflict {
                notices.warning(err.to_string());
            }
            return Ok(());
        }
        Commitment::Remote => {}
    }

    match command.commit().await {
        Ok(remote) => {
            if scope.is_cancelled() {
                // The view is gone; a late echo must not touch the tree.
                log::info!("dropping stale {} echo after teardown", command.describe());
                return Ok(());
            }
            store.update(|course| command.reconcile(course, remote));
            Ok(())
        }
        Err(err) => {
            if !scope.is_cancelled() {
                store.update(|course| command.rollback(course));
            }
            log::warn!("{} sync failed: {err}", command.describe());
            notices.error(format!("could not sync {}: {err}", command.describe()));
            Err(StudioError::Network(err))
        }
    }
}
