// Preference store implementations
//
// Preferences are read once at startup and written on every update, so
// the file store favors simplicity: serialize the whole record, write a
// sibling temp file, rename over the old one. Readers never observe a
// half-written record.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use dishboard_core::{DashboardError, NotificationPreferences, Result};

/// Name of the single record under which preferences persist.
pub const PREFERENCES_RECORD: &str = "admin_notification_preferences";

/// Trait for loading and replacing the durable preference record
///
/// Implementations can:
/// - Persist to a file on disk
/// - Keep the record in memory for testing
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Load the persisted record, if any.
    async fn load(&self) -> Result<Option<NotificationPreferences>>;

    /// Replace the persisted record.
    async fn save(&self, preferences: &NotificationPreferences) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PreferenceRecord {
    name: String,
    preferences: NotificationPreferences,
}

// ============================================================================
// FilePreferenceStore - One named JSON record on disk
// ============================================================================

/// File-backed preference store.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn load(&self) -> Result<Option<NotificationPreferences>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DashboardError::store(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let record: PreferenceRecord = serde_json::from_slice(&bytes).map_err(|e| {
            DashboardError::store(format!("corrupt preference record {}: {e}", self.path.display()))
        })?;
        Ok(Some(record.preferences))
    }

    async fn save(&self, preferences: &NotificationPreferences) -> Result<()> {
        let record = PreferenceRecord {
            name: PREFERENCES_RECORD.to_string(),
            preferences: *preferences,
        };
        let bytes = serde_json::to_vec_pretty(&record)
            .map_err(|e| DashboardError::store(format!("serialize preference record: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    DashboardError::store(format!("create {}: {e}", parent.display()))
                })?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| DashboardError::store(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DashboardError::store(format!("rename {}: {e}", self.path.display())))?;

        tracing::debug!(path = %self.path.display(), "preference record saved");
        Ok(())
    }
}

// ============================================================================
// InMemoryPreferenceStore - For examples and testing
// ============================================================================

/// In-memory preference store
///
/// Keeps the record in memory. Useful for tests that don't want to touch
/// the filesystem.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPreferenceStore {
    record: Arc<RwLock<Option<NotificationPreferences>>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load(&self) -> Result<Option<NotificationPreferences>> {
        Ok(*self.record.read().await)
    }

    async fn save(&self, preferences: &NotificationPreferences) -> Result<()> {
        *self.record.write().await = Some(*preferences);
        Ok(())
    }
}
