use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::submissions::models::{PendingFile, ReportDraft};
use crate::modules::session::SessionStore;

/// Session key for the draft's structured fields
const DRAFT_FIELDS_KEY: &str = "draft_fields";
/// Session key for the pending uploaded photo
const DRAFT_FILE_KEY: &str = "draft_file";

/// Draft State Manager: owns the in-progress report's field values and the
/// pending uploaded file, both in the session store under well-known keys.
///
/// The file lives in its own slot so the rest of the draft stays plain
/// structured data; the split is invisible to callers.
pub struct DraftService {
    store: Arc<dyn SessionStore>,
}

impl DraftService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Current draft fields; a fresh empty draft if none exist.
    /// A malformed stored value is treated as absent rather than a fault.
    pub async fn load(&self, owner: &str) -> Result<ReportDraft> {
        match self.store.get(owner, DRAFT_FIELDS_KEY).await? {
            Some(value) => match serde_json::from_value(value) {
                Ok(draft) => Ok(draft),
                Err(e) => {
                    tracing::warn!("Discarding malformed draft for {}: {}", owner, e);
                    Ok(ReportDraft::default())
                }
            },
            None => Ok(ReportDraft::default()),
        }
    }

    /// Whether a draft has been started (step 2/3 precondition)
    pub async fn exists(&self, owner: &str) -> Result<bool> {
        Ok(self.store.get(owner, DRAFT_FIELDS_KEY).await?.is_some())
    }

    /// Replace the stored field set
    pub async fn save(&self, owner: &str, draft: &ReportDraft) -> Result<()> {
        let value = serde_json::to_value(draft)
            .map_err(|e| AppError::Internal(format!("Failed to serialize draft: {}", e)))?;
        self.store.put(owner, DRAFT_FIELDS_KEY, value).await
    }

    /// Drop stale geolocation left over from a previous, abandoned attempt.
    /// No-op when no draft exists.
    pub async fn clear_coordinates(&self, owner: &str) -> Result<()> {
        if self.store.get(owner, DRAFT_FIELDS_KEY).await?.is_none() {
            return Ok(());
        }

        let mut draft = self.load(owner).await?;
        if draft.has_coordinates() {
            draft.clear_coordinates();
            self.save(owner, &draft).await?;
        }
        Ok(())
    }

    pub async fn load_pending_file(&self, owner: &str) -> Result<Option<PendingFile>> {
        match self.store.get(owner, DRAFT_FILE_KEY).await? {
            Some(value) => match serde_json::from_value(value) {
                Ok(file) => Ok(Some(file)),
                Err(e) => {
                    tracing::warn!("Discarding malformed pending file for {}: {}", owner, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Store the pending photo, replacing any previous one
    pub async fn save_pending_file(&self, owner: &str, file: &PendingFile) -> Result<()> {
        let value = serde_json::to_value(file)
            .map_err(|e| AppError::Internal(format!("Failed to serialize pending file: {}", e)))?;
        self.store.put(owner, DRAFT_FILE_KEY, value).await
    }

    pub async fn clear_pending_file(&self, owner: &str) -> Result<()> {
        self.store.remove(owner, DRAFT_FILE_KEY).await
    }

    /// Remove both the field map and the pending file. Used after a
    /// successful commit and by the validation-failure discard rule.
    pub async fn clear(&self, owner: &str) -> Result<()> {
        self.store.remove(owner, DRAFT_FIELDS_KEY).await?;
        self.store.remove(owner, DRAFT_FILE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::session::MemorySessionStore;

    const OWNER: &str = "user-1";

    fn service() -> DraftService {
        DraftService::new(Arc::new(MemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_load_without_draft_is_empty() {
        let svc = service();
        assert!(!svc.exists(OWNER).await.unwrap());
        assert_eq!(svc.load(OWNER).await.unwrap(), ReportDraft::default());
        assert!(svc.load_pending_file(OWNER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_preserves_existing_coordinates() {
        let svc = service();

        // a prior pass left coordinates behind
        let draft = ReportDraft {
            latitude: Some("35.689".to_string()),
            longitude: Some("139.692".to_string()),
            ..Default::default()
        };
        svc.save(OWNER, &draft).await.unwrap();

        // step 1 merges new fields into the loaded draft, not a fresh one
        let mut merged = svc.load(OWNER).await.unwrap();
        merged.comment = Some("broken streetlight".to_string());
        merged.tag_ids = vec![2];
        svc.save(OWNER, &merged).await.unwrap();

        let reloaded = svc.load(OWNER).await.unwrap();
        assert_eq!(reloaded.latitude.as_deref(), Some("35.689"));
        assert_eq!(reloaded.longitude.as_deref(), Some("139.692"));
        assert_eq!(reloaded.comment.as_deref(), Some("broken streetlight"));
        assert_eq!(reloaded.tag_ids, vec![2]);
    }

    #[tokio::test]
    async fn test_clear_coordinates_on_existing_draft_only() {
        let svc = service();

        // no draft: no-op, still no draft afterwards
        svc.clear_coordinates(OWNER).await.unwrap();
        assert!(!svc.exists(OWNER).await.unwrap());

        let draft = ReportDraft {
            comment: Some("old attempt".to_string()),
            latitude: Some("1.0".to_string()),
            longitude: Some("2.0".to_string()),
            ..Default::default()
        };
        svc.save(OWNER, &draft).await.unwrap();

        svc.clear_coordinates(OWNER).await.unwrap();
        let reloaded = svc.load(OWNER).await.unwrap();
        assert!(!reloaded.has_coordinates());
        // other fields survive
        assert_eq!(reloaded.comment.as_deref(), Some("old attempt"));
    }

    #[tokio::test]
    async fn test_pending_file_replace_and_clear() {
        let svc = service();

        let first = PendingFile::from_bytes("a.jpg", "image/jpeg", b"first");
        svc.save_pending_file(OWNER, &first).await.unwrap();

        let second = PendingFile::from_bytes("b.png", "image/png", b"second");
        svc.save_pending_file(OWNER, &second).await.unwrap();

        let loaded = svc.load_pending_file(OWNER).await.unwrap().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.decode_bytes().unwrap(), b"second");

        svc.clear_pending_file(OWNER).await.unwrap();
        assert!(svc.load_pending_file(OWNER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_both_slots() {
        let svc = service();

        svc.save(OWNER, &ReportDraft::default()).await.unwrap();
        svc.save_pending_file(OWNER, &PendingFile::from_bytes("p.jpg", "image/jpeg", b"x"))
            .await
            .unwrap();

        svc.clear(OWNER).await.unwrap();
        assert!(!svc.exists(OWNER).await.unwrap());
        assert!(svc.load_pending_file(OWNER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_drafts_are_scoped_per_owner() {
        let svc = service();

        let draft = ReportDraft {
            comment: Some("mine".to_string()),
            ..Default::default()
        };
        svc.save("user-a", &draft).await.unwrap();

        assert!(!svc.exists("user-b").await.unwrap());
        assert_eq!(svc.load("user-b").await.unwrap(), ReportDraft::default());
    }
}
