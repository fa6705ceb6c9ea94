//! Autosave Controller
//!
//! This module runs the periodic background save. Each tick captures the
//! session only when it reports unsaved changes; save failures are logged
//! and swallowed so a full store never takes the editor down. Shutdown
//! performs one final save before the task stops.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use easel_canvas::session::EditorSession;
use easel_canvas::snapshot::CanvasState;

use crate::project::ProjectStore;

/// Default autosave interval (30 seconds)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to a running autosave task
pub struct AutosaveHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
    session: Arc<RwLock<EditorSession>>,
    store: Arc<ProjectStore>,
}

impl AutosaveHandle {
    /// Spawn the autosave loop with the default interval
    #[must_use]
    pub fn spawn(session: Arc<RwLock<EditorSession>>, store: Arc<ProjectStore>) -> Self {
        Self::spawn_with_interval(session, store, DEFAULT_INTERVAL)
    }

    /// Spawn the autosave loop with a custom interval
    #[must_use]
    pub fn spawn_with_interval(
        session: Arc<RwLock<EditorSession>>,
        store: Arc<ProjectStore>,
        interval: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_session = Arc::clone(&session);
        let task_store = Arc::clone(&store);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately and would save a fresh session.
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        save_if_changed(&task_session, &task_store).await;
                    }
                }
            }
            debug!("autosave stopped");
        });

        Self {
            token,
            task,
            session,
            store,
        }
    }

    /// Stop the loop after one final save
    pub async fn shutdown(self) {
        save_if_changed(&self.session, &self.store).await;
        self.token.cancel();
        if let Err(err) = self.task.await {
            warn!(%err, "autosave task did not stop cleanly");
        }
    }

    /// Stop the loop without a final save
    pub fn abort(self) {
        self.token.cancel();
    }
}

/// Save the session's canvas state if anything changed since the last save
async fn save_if_changed(session: &Arc<RwLock<EditorSession>>, store: &Arc<ProjectStore>) {
    let (state, fingerprint) = {
        let session = session.read().await;
        if !session.has_unsaved_changes() {
            return;
        }
        (CanvasState::capture(session.canvas()), session.fingerprint())
    };

    match store.save_canvas_state(&state).await {
        Ok(()) => {
            // Record the fingerprint from capture time: an edit that landed
            // while the write was in flight must still read as unsaved.
            session.write().await.mark_saved_as(fingerprint);
            debug!(elements = state.elements.len(), "autosaved");
        }
        Err(err) => {
            warn!(code = err.code(), %err, "autosave failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryStore, StateStore};
    use easel_canvas::CanvasElement;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    fn fixture() -> (Arc<RwLock<EditorSession>>, Arc<ProjectStore>) {
        let session = Arc::new(RwLock::new(EditorSession::new()));
        let store = Arc::new(ProjectStore::new(Arc::new(MemoryStore::new())));
        (session, store)
    }

    #[tokio::test]
    async fn test_tick_saves_only_when_changed() {
        let (session, store) = fixture();
        session.write().await.mark_saved();

        save_if_changed(&session, &store).await;
        assert!(store.load_canvas_state().await.unwrap().is_none());

        session
            .write()
            .await
            .add_and_select(CanvasElement::text("edit", 0.0, 0.0))
            .unwrap();
        save_if_changed(&session, &store).await;

        let state = store.load_canvas_state().await.unwrap().unwrap();
        assert_eq!(state.elements.len(), 1);
        assert!(!session.read().await.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_shutdown_performs_final_save() {
        let (session, store) = fixture();
        session
            .write()
            .await
            .add_and_select(CanvasElement::text("last edit", 0.0, 0.0))
            .unwrap();

        let handle = AutosaveHandle::spawn_with_interval(
            Arc::clone(&session),
            Arc::clone(&store),
            Duration::from_secs(3600),
        );
        handle.shutdown().await;

        let state = store.load_canvas_state().await.unwrap().unwrap();
        assert_eq!(state.elements.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_fires() {
        let (session, store) = fixture();
        session
            .write()
            .await
            .add_and_select(CanvasElement::text("tick", 0.0, 0.0))
            .unwrap();

        let handle = AutosaveHandle::spawn_with_interval(
            Arc::clone(&session),
            Arc::clone(&store),
            Duration::from_secs(30),
        );
        tokio::time::sleep(Duration::from_secs(31)).await;

        assert!(store.load_canvas_state().await.unwrap().is_some());
        handle.abort();
    }

    /// Store whose first write parks until released, so the test can land
    /// an edit while a save is in flight.
    struct GatedStore {
        inner: MemoryStore,
        gate_armed: AtomicBool,
        put_started: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                gate_armed: AtomicBool::new(true),
                put_started: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait::async_trait]
    impl StateStore for GatedStore {
        async fn get(&self, key: &str) -> crate::Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, value: &str) -> crate::Result<()> {
            if self.gate_armed.swap(false, Ordering::SeqCst) {
                self.put_started.notify_one();
                self.release.notified().await;
            }
            self.inner.put(key, value).await
        }

        async fn remove(&self, key: &str) -> crate::Result<()> {
            self.inner.remove(key).await
        }

        async fn usage(&self) -> crate::Result<u64> {
            self.inner.usage().await
        }
    }

    #[tokio::test]
    async fn test_edit_during_in_flight_save_stays_unsaved() {
        let gated = Arc::new(GatedStore::new());
        let session = Arc::new(RwLock::new(EditorSession::new()));
        let store = Arc::new(ProjectStore::new(
            Arc::clone(&gated) as Arc<dyn StateStore>
        ));

        session
            .write()
            .await
            .add_and_select(CanvasElement::text("first", 0.0, 0.0))
            .unwrap();

        let save = tokio::spawn({
            let session = Arc::clone(&session);
            let store = Arc::clone(&store);
            async move { save_if_changed(&session, &store).await }
        });

        // The save has captured one element and is parked in the write.
        gated.put_started.notified().await;
        session
            .write()
            .await
            .add_and_select(CanvasElement::text("second", 0.0, 0.0))
            .unwrap();
        gated.release.notify_one();
        save.await.unwrap();

        let state = store.load_canvas_state().await.unwrap().unwrap();
        assert_eq!(state.elements.len(), 1);
        assert!(session.read().await.has_unsaved_changes());

        // The next pass picks up the second element.
        save_if_changed(&session, &store).await;
        let state = store.load_canvas_state().await.unwrap().unwrap();
        assert_eq!(state.elements.len(), 2);
        assert!(!session.read().await.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_autosave_failure_is_swallowed() {
        let session = Arc::new(RwLock::new(EditorSession::new()));
        let store = Arc::new(ProjectStore::new(Arc::new(
            MemoryStore::new().with_quota(1),
        )));
        session
            .write()
            .await
            .add_and_select(CanvasElement::text("too big", 0.0, 0.0))
            .unwrap();

        // Must not panic; the session stays dirty for the next attempt.
        save_if_changed(&session, &store).await;
        assert!(session.read().await.has_unsaved_changes());
    }
}
