//! Asset Libraries
//!
//! This module persists the user's uploaded media, audio, effects, prompt
//! history, templates and tab usage as capped JSON lists in the key-value
//! store. Each library evicts its oldest entry when full, except prompts,
//! which evict the least recently used.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::keys;
use crate::kv::StateStore;

/// Uploaded media cap
pub const MEDIA_CAP: usize = 50;
/// Per-file ceiling for image and video uploads (10 MiB)
pub const MEDIA_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Uploaded audio cap
pub const AUDIO_CAP: usize = 30;
/// Per-file ceiling for audio uploads (20 MiB)
pub const AUDIO_MAX_BYTES: u64 = 20 * 1024 * 1024;
/// Audio effects cap
pub const EFFECT_CAP: usize = 30;
/// Per-file ceiling for audio effects (10 MiB)
pub const EFFECT_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Prompt history cap
pub const PROMPT_CAP: usize = 100;
/// Tab activation history cap
pub const TAB_HISTORY_CAP: usize = 50;

/// Default tab when no usage has been recorded
const DEFAULT_TAB: &str = "media";

/// Kind of an uploaded media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image
    Image,
    /// Video clip
    Video,
}

/// An uploaded image or video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    /// File identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Media kind
    pub kind: MediaKind,
    /// Source URL or data URL
    pub src: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
}

/// An uploaded audio file or effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFile {
    /// File identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Source URL or data URL
    pub src: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
}

/// One remembered AI prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptEntry {
    /// Entry identifier
    pub id: Uuid,
    /// Prompt text
    pub text: String,
    /// What the prompt generated, e.g. `script` or `narration`
    pub kind: String,
    /// How many times this prompt was used
    pub usage_count: u32,
    /// Last use
    pub last_used: DateTime<Utc>,
}

/// A user-saved template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Template identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Template payload
    pub data: serde_json::Value,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
}

/// Per-tab usage counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabPreference {
    /// Times the tab was activated
    pub count: u32,
    /// Last activation
    pub last_used: DateTime<Utc>,
}

/// One tab activation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabVisit {
    /// Tab name
    pub tab: String,
    /// When it was activated
    pub used_at: DateTime<Utc>,
}

/// Asset library storage over a state store
pub struct LibraryStore {
    store: Arc<dyn StateStore>,
}

impl LibraryStore {
    /// Create a library store
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Media files
    // ------------------------------------------------------------------

    /// Add an image or video, evicting the oldest entry past the cap.
    ///
    /// Oversized files are rejected with no state change.
    pub async fn add_media_file(
        &self,
        name: impl Into<String>,
        kind: MediaKind,
        src: impl Into<String>,
        size_bytes: u64,
    ) -> Result<MediaFile> {
        if size_bytes > MEDIA_MAX_BYTES {
            return Err(Error::TooLarge {
                size: size_bytes,
                limit: MEDIA_MAX_BYTES,
            });
        }
        let file = MediaFile {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            src: src.into(),
            size_bytes,
            uploaded_at: Utc::now(),
        };
        let mut files: Vec<MediaFile> = self.read_list(keys::UPLOADED_FILES).await?;
        files.push(file.clone());
        evict_oldest(&mut files, MEDIA_CAP);
        self.write_list(keys::UPLOADED_FILES, &files).await?;
        debug!(name = %file.name, size_bytes, "media file added");
        Ok(file)
    }

    /// Uploaded media, oldest first
    pub async fn list_media_files(&self) -> Result<Vec<MediaFile>> {
        self.read_list(keys::UPLOADED_FILES).await
    }

    /// Remove a media file by id
    pub async fn remove_media_file(&self, id: Uuid) -> Result<()> {
        let mut files: Vec<MediaFile> = self.read_list(keys::UPLOADED_FILES).await?;
        files.retain(|f| f.id != id);
        self.write_list(keys::UPLOADED_FILES, &files).await
    }

    // ------------------------------------------------------------------
    // Audio files and effects
    // ------------------------------------------------------------------

    /// Add an audio recording
    pub async fn add_audio_file(
        &self,
        name: impl Into<String>,
        src: impl Into<String>,
        size_bytes: u64,
    ) -> Result<AudioFile> {
        self.add_audio(keys::UPLOADED_AUDIO, AUDIO_CAP, AUDIO_MAX_BYTES, name, src, size_bytes)
            .await
    }

    /// Uploaded audio, oldest first
    pub async fn list_audio_files(&self) -> Result<Vec<AudioFile>> {
        self.read_list(keys::UPLOADED_AUDIO).await
    }

    /// Remove an audio file by id
    pub async fn remove_audio_file(&self, id: Uuid) -> Result<()> {
        let mut files: Vec<AudioFile> = self.read_list(keys::UPLOADED_AUDIO).await?;
        files.retain(|f| f.id != id);
        self.write_list(keys::UPLOADED_AUDIO, &files).await
    }

    /// Add an audio effect
    pub async fn add_audio_effect(
        &self,
        name: impl Into<String>,
        src: impl Into<String>,
        size_bytes: u64,
    ) -> Result<AudioFile> {
        self.add_audio(keys::AUDIO_EFFECTS, EFFECT_CAP, EFFECT_MAX_BYTES, name, src, size_bytes)
            .await
    }

    /// Audio effects, oldest first
    pub async fn list_audio_effects(&self) -> Result<Vec<AudioFile>> {
        self.read_list(keys::AUDIO_EFFECTS).await
    }

    async fn add_audio(
        &self,
        key: &str,
        cap: usize,
        max_bytes: u64,
        name: impl Into<String>,
        src: impl Into<String>,
        size_bytes: u64,
    ) -> Result<AudioFile> {
        if size_bytes > max_bytes {
            return Err(Error::TooLarge {
                size: size_bytes,
                limit: max_bytes,
            });
        }
        let file = AudioFile {
            id: Uuid::new_v4(),
            name: name.into(),
            src: src.into(),
            size_bytes,
            uploaded_at: Utc::now(),
        };
        let mut files: Vec<AudioFile> = self.read_list(key).await?;
        files.push(file.clone());
        evict_oldest(&mut files, cap);
        self.write_list(key, &files).await?;
        Ok(file)
    }

    // ------------------------------------------------------------------
    // Prompt history
    // ------------------------------------------------------------------

    /// Record a prompt.
    ///
    /// Re-recording an identical (text, kind) pair bumps its usage count
    /// and timestamp instead of duplicating; when the history is full the
    /// least recently used entry is evicted.
    pub async fn record_prompt(
        &self,
        text: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<PromptEntry> {
        let text = text.into();
        let kind = kind.into();
        let mut prompts: Vec<PromptEntry> = self.read_list(keys::PROMPT_HISTORY).await?;

        let entry = if let Some(existing) = prompts
            .iter_mut()
            .find(|p| p.text == text && p.kind == kind)
        {
            existing.usage_count += 1;
            existing.last_used = Utc::now();
            existing.clone()
        } else {
            let entry = PromptEntry {
                id: Uuid::new_v4(),
                text,
                kind,
                usage_count: 1,
                last_used: Utc::now(),
            };
            prompts.push(entry.clone());
            while prompts.len() > PROMPT_CAP {
                if let Some(lru) = prompts
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, p)| p.last_used)
                    .map(|(i, _)| i)
                {
                    prompts.remove(lru);
                }
            }
            entry
        };

        self.write_list(keys::PROMPT_HISTORY, &prompts).await?;
        Ok(entry)
    }

    /// Prompt history, most recently used first
    pub async fn list_prompts(&self) -> Result<Vec<PromptEntry>> {
        let mut prompts: Vec<PromptEntry> = self.read_list(keys::PROMPT_HISTORY).await?;
        prompts.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        Ok(prompts)
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    /// Save a template. The template library is uncapped.
    pub async fn add_template(
        &self,
        name: impl Into<String>,
        data: serde_json::Value,
    ) -> Result<TemplateEntry> {
        let entry = TemplateEntry {
            id: Uuid::new_v4(),
            name: name.into(),
            data,
            uploaded_at: Utc::now(),
        };
        let mut templates: Vec<TemplateEntry> = self.read_list(keys::USER_TEMPLATES).await?;
        templates.push(entry.clone());
        self.write_list(keys::USER_TEMPLATES, &templates).await?;
        Ok(entry)
    }

    /// Saved templates, oldest first
    pub async fn list_templates(&self) -> Result<Vec<TemplateEntry>> {
        self.read_list(keys::USER_TEMPLATES).await
    }

    /// Delete a template by id
    pub async fn remove_template(&self, id: Uuid) -> Result<()> {
        let mut templates: Vec<TemplateEntry> = self.read_list(keys::USER_TEMPLATES).await?;
        templates.retain(|t| t.id != id);
        self.write_list(keys::USER_TEMPLATES, &templates).await
    }

    /// Delete all templates
    pub async fn clear_templates(&self) -> Result<()> {
        self.store.remove(keys::USER_TEMPLATES).await
    }

    // ------------------------------------------------------------------
    // Tab usage
    // ------------------------------------------------------------------

    /// Record a tab activation in both the counters and the visit history
    pub async fn record_tab_use(&self, tab: impl Into<String>) -> Result<()> {
        let tab = tab.into();
        let now = Utc::now();

        let mut prefs: BTreeMap<String, TabPreference> =
            match self.store.get(keys::TAB_PREFERENCES).await? {
                Some(json) => serde_json::from_str(&json)?,
                None => BTreeMap::new(),
            };
        let pref = prefs.entry(tab.clone()).or_insert(TabPreference {
            count: 0,
            last_used: now,
        });
        pref.count += 1;
        pref.last_used = now;
        let json = serde_json::to_string(&prefs)?;
        self.store.put(keys::TAB_PREFERENCES, &json).await?;

        let mut visits: Vec<TabVisit> = self.read_list(keys::TAB_HISTORY).await?;
        visits.push(TabVisit { tab, used_at: now });
        evict_oldest(&mut visits, TAB_HISTORY_CAP);
        self.write_list(keys::TAB_HISTORY, &visits).await
    }

    /// The most frequently used tab, ties broken by recency
    pub async fn most_used_tab(&self) -> Result<String> {
        let prefs: BTreeMap<String, TabPreference> =
            match self.store.get(keys::TAB_PREFERENCES).await? {
                Some(json) => serde_json::from_str(&json)?,
                None => return Ok(DEFAULT_TAB.to_string()),
            };
        Ok(prefs
            .iter()
            .max_by_key(|(_, p)| (p.count, p.last_used))
            .map(|(tab, _)| tab.clone())
            .unwrap_or_else(|| DEFAULT_TAB.to_string()))
    }

    /// Recent tab activations, oldest first
    pub async fn tab_history(&self) -> Result<Vec<TabVisit>> {
        self.read_list(keys::TAB_HISTORY).await
    }

    // ------------------------------------------------------------------

    async fn read_list<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<()> {
        let json = serde_json::to_string(list)?;
        self.store.put(key, &json).await
    }
}

/// Drop entries from the front until `list` fits the cap
fn evict_oldest<T>(list: &mut Vec<T>, cap: usize) {
    while list.len() > cap {
        list.remove(0);
    }
}
