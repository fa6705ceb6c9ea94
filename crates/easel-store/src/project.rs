//! Project Persistence
//!
//! This module saves and loads project snapshots through the key-value
//! store, maintaining the saved-projects list and a bounded recovery
//! history alongside the current project. A single oversized project is
//! rejected before anything is written; a full store triggers one round of
//! eviction and a single retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use easel_canvas::snapshot::{CanvasState, ProjectSnapshot};

use crate::error::{Error, Result};
use crate::keys;
use crate::kv::StateStore;
use crate::notify::{LogSink, NoticeLevel, NotificationSink};

/// Per-project serialized size ceiling (5 MiB)
pub const MAX_PROJECT_BYTES: u64 = 5 * 1024 * 1024;

/// Saved-projects list cap
pub const PROJECT_LIST_CAP: usize = 50;

/// Saved-projects list size after quota eviction
pub const PROJECT_LIST_EVICTED: usize = 20;

/// Recovery history cap
pub const HISTORY_CAP: usize = 10;

/// One entry in the saved-projects list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project identifier
    pub id: Uuid,
    /// Project display name
    pub name: String,
    /// Number of elements at save time
    pub element_count: usize,
    /// When this version was saved
    pub saved_at: DateTime<Utc>,
}

impl ProjectSummary {
    fn from_snapshot(snapshot: &ProjectSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name.clone(),
            element_count: snapshot.elements.len(),
            saved_at: snapshot.saved_at,
        }
    }
}

/// Project storage over a state store
pub struct ProjectStore {
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl ProjectStore {
    /// Create a project store that reports outcomes to the log
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            notifier: Arc::new(LogSink),
        }
    }

    /// Route user-facing save outcomes to a custom sink
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Save a project snapshot.
    ///
    /// Serializes the snapshot, rejects it with [`Error::TooLarge`] before
    /// any write when it exceeds the size ceiling, then writes the current
    /// project, updates the saved-projects list and appends to the recovery
    /// history. A quota failure evicts recoverable data and retries once.
    pub async fn save_project(&self, snapshot: &ProjectSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        let size = json.len() as u64;
        if size > MAX_PROJECT_BYTES {
            self.notifier
                .notify(NoticeLevel::Error, "Project is too large to save");
            return Err(Error::TooLarge {
                size,
                limit: MAX_PROJECT_BYTES,
            });
        }

        if let Err(err) = self.put_with_eviction(keys::CURRENT_PROJECT, &json).await {
            self.notifier
                .notify(NoticeLevel::Error, "Could not save project: storage is full");
            return Err(err);
        }
        self.update_project_list(snapshot).await?;
        self.append_history(snapshot).await?;

        debug!(project_id = %snapshot.id, size, "project saved");
        self.notifier.notify(NoticeLevel::Success, "Project saved");
        Ok(())
    }

    /// Load the current project. Absence is the normal empty state.
    pub async fn load_project(&self) -> Result<Option<ProjectSnapshot>> {
        match self.store.get(keys::CURRENT_PROJECT).await? {
            Some(json) => Ok(Some(ProjectSnapshot::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Save the lightweight autosave canvas state
    pub async fn save_canvas_state(&self, state: &CanvasState) -> Result<()> {
        let json = state.to_json()?;
        self.put_with_eviction(keys::CANVAS_STATE, &json).await?;
        debug!(size = json.len(), "canvas state saved");
        Ok(())
    }

    /// Load the autosave canvas state
    pub async fn load_canvas_state(&self) -> Result<Option<CanvasState>> {
        match self.store.get(keys::CANVAS_STATE).await? {
            Some(json) => Ok(Some(CanvasState::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Saved-projects summaries, most recent first
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.read_list(keys::SAVED_PROJECTS).await
    }

    /// Recent full snapshots, most recent first
    pub async fn history(&self) -> Result<Vec<ProjectSnapshot>> {
        self.read_list(keys::PROJECT_HISTORY).await
    }

    /// Remove a project from the saved list
    pub async fn delete_project(&self, id: Uuid) -> Result<()> {
        let mut list = self.list_projects().await?;
        list.retain(|p| p.id != id);
        self.write_list(keys::SAVED_PROJECTS, &list).await
    }

    async fn update_project_list(&self, snapshot: &ProjectSnapshot) -> Result<()> {
        let mut list = self.list_projects().await?;
        list.retain(|p| p.id != snapshot.id);
        list.insert(0, ProjectSummary::from_snapshot(snapshot));
        list.truncate(PROJECT_LIST_CAP);
        self.write_list(keys::SAVED_PROJECTS, &list).await
    }

    /// Recovery history is best-effort: a save never fails because its
    /// history entry does not fit.
    async fn append_history(&self, snapshot: &ProjectSnapshot) -> Result<()> {
        let mut history = self.history().await?;
        history.insert(0, snapshot.clone());
        history.truncate(HISTORY_CAP);
        match self.write_list(keys::PROJECT_HISTORY, &history).await {
            Err(err) if err.is_quota_exceeded() => {
                warn!("recovery history does not fit, skipping");
                Ok(())
            }
            other => other,
        }
    }

    async fn read_list<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<()> {
        let json = serde_json::to_string(list)?;
        self.put_with_eviction(key, &json).await
    }

    /// Write a value, evicting recoverable data and retrying once on quota
    async fn put_with_eviction(&self, key: &str, value: &str) -> Result<()> {
        match self.store.put(key, value).await {
            Err(err) if err.is_quota_exceeded() => {
                warn!(key, "store full, evicting recoverable data");
                self.evict().await?;
                self.store.put(key, value).await
            }
            other => other,
        }
    }

    /// Drop the recovery history and trim the project list
    async fn evict(&self) -> Result<()> {
        self.store.remove(keys::PROJECT_HISTORY).await?;

        let mut list: Vec<ProjectSummary> = self.read_list(keys::SAVED_PROJECTS).await?;
        if list.len() > PROJECT_LIST_EVICTED {
            list.truncate(PROJECT_LIST_EVICTED);
            let json = serde_json::to_string(&list)?;
            self.store.put(keys::SAVED_PROJECTS, &json).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use easel_canvas::{Canvas, CanvasElement};

    fn fixture() -> ProjectStore {
        ProjectStore::new(Arc::new(MemoryStore::new()))
    }

    fn snapshot(name: &str) -> ProjectSnapshot {
        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::text("Hello", 10.0, 20.0))
            .unwrap();
        ProjectSnapshot::capture(&canvas, name)
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let store = fixture();
        assert!(store.load_project().await.unwrap().is_none());

        let saved = snapshot("Deck");
        store.save_project(&saved).await.unwrap();

        let loaded = store.load_project().await.unwrap().unwrap();
        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.name, "Deck");
        assert_eq!(loaded.elements.len(), 1);
    }

    #[tokio::test]
    async fn test_list_front_inserts_and_updates_in_place() {
        let store = fixture();
        let first = snapshot("First");
        let second = snapshot("Second");
        store.save_project(&first).await.unwrap();
        store.save_project(&second).await.unwrap();

        let list = store.list_projects().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Second");

        // Re-saving an existing project moves it to the front, no duplicate.
        store.save_project(&first).await.unwrap();
        let list = store.list_projects().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, first.id);
    }

    #[tokio::test]
    async fn test_list_capped_at_fifty() {
        let store = fixture();
        for i in 0..55 {
            store.save_project(&snapshot(&format!("p{i}"))).await.unwrap();
        }
        let list = store.list_projects().await.unwrap();
        assert_eq!(list.len(), PROJECT_LIST_CAP);
        assert_eq!(list[0].name, "p54");
    }

    #[tokio::test]
    async fn test_history_capped_at_ten() {
        let store = fixture();
        for i in 0..12 {
            store.save_project(&snapshot(&format!("p{i}"))).await.unwrap();
        }
        let history = store.history().await.unwrap();
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].name, "p11");
    }

    #[tokio::test]
    async fn test_size_gate_leaves_prior_save_intact() {
        let store = fixture();
        let small = snapshot("Small");
        store.save_project(&small).await.unwrap();

        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::image("x".repeat(6 * 1024 * 1024), 0.0, 0.0))
            .unwrap();
        let huge = ProjectSnapshot::capture(&canvas, "Huge");

        let err = store.save_project(&huge).await.unwrap_err();
        assert_eq!(err.code(), "too_large");

        let loaded = store.load_project().await.unwrap().unwrap();
        assert_eq!(loaded.id, small.id);
    }

    #[tokio::test]
    async fn test_quota_eviction_retries_once() {
        // Quota fits the project itself but not the recovery history too.
        let store = ProjectStore::new(Arc::new(MemoryStore::new().with_quota(32 * 1024)));
        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::text("x".repeat(12 * 1024), 0.0, 0.0))
            .unwrap();
        let a = ProjectSnapshot::capture(&canvas, "A");
        let b = ProjectSnapshot::capture(&canvas, "B").with_id(Uuid::new_v4());

        store.save_project(&a).await.unwrap();
        store.save_project(&b).await.unwrap();

        // History was sacrificed so the save itself could land.
        assert!(store.history().await.unwrap().len() <= 1);
        assert_eq!(store.load_project().await.unwrap().unwrap().name, "B");
    }

    #[tokio::test]
    async fn test_save_outcomes_reach_the_notifier() {
        use crate::notify::test_support::RecordingSink;
        use crate::notify::{NoticeLevel, NotificationSink};

        let sink = Arc::new(RecordingSink::default());
        let notifier: Arc<dyn NotificationSink> = sink.clone();
        let store = ProjectStore::new(Arc::new(MemoryStore::new())).with_notifier(notifier);

        store.save_project(&snapshot("Deck")).await.unwrap();

        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::image("x".repeat(6 * 1024 * 1024), 0.0, 0.0))
            .unwrap();
        let _ = store
            .save_project(&ProjectSnapshot::capture(&canvas, "Huge"))
            .await;

        let notices = sink.notices.lock().unwrap();
        assert_eq!(notices[0].0, NoticeLevel::Success);
        assert_eq!(notices[1].0, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_delete_project_removes_summary() {
        let store = fixture();
        let a = snapshot("A");
        store.save_project(&a).await.unwrap();
        store.delete_project(a.id).await.unwrap();
        assert!(store.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_canvas_state_round_trip() {
        let store = fixture();
        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::text("auto", 1.0, 2.0))
            .unwrap();
        store
            .save_canvas_state(&CanvasState::capture(&canvas))
            .await
            .unwrap();

        let state = store.load_canvas_state().await.unwrap().unwrap();
        assert_eq!(state.elements.len(), 1);
    }
}
