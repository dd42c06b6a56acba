//! Commits the live draft to the backend and keeps cached post collections
//! consistent with the outcome.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use crate::api::{ApiClient, ApiError};
use crate::hashtags;
use crate::models::{DraftField, LiveDraft, PostStatus};
use crate::notify::{Notice, Notify};
use crate::posts::{self, SharedPostCache};
use crate::store::SharedStore;

/// Why a commit did not happen.
#[derive(Debug)]
pub enum SaveError {
    /// Schedule timestamp earlier than now; rejected before any network call
    ScheduleInPast,
    /// No target platform toggled on; rejected before any network call
    NoPlatformSelected,
    Api(ApiError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::ScheduleInPast => write!(f, "schedule time is in the past"),
            SaveError::NoPlatformSelected => write!(f, "no platform selected"),
            SaveError::Api(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<ApiError> for SaveError {
    fn from(value: ApiError) -> Self {
        SaveError::Api(value)
    }
}

/// Commits drafts and single-field updates, one shot each: no retry, no
/// backoff, every failure surfaced through the notice seam.
pub struct DraftSynchronizer {
    api: Arc<ApiClient>,
    store: SharedStore,
    cache: SharedPostCache,
    notifier: Arc<dyn Notify>,
}

impl DraftSynchronizer {
    pub fn new(
        api: Arc<ApiClient>,
        store: SharedStore,
        cache: SharedPostCache,
        notifier: Arc<dyn Notify>,
    ) -> Self {
        Self {
            api,
            store,
            cache,
            notifier,
        }
    }

    /// Commits the live draft with the requested status.
    ///
    /// Rejected locally, with no network call, when no platform is selected
    /// or the schedule time is already past. On success the post cache for
    /// the active window is resynchronized, the editor closes and the draft
    /// resets; on failure the draft is left untouched for retry.
    pub async fn save(&self, status: PostStatus) -> Result<(), SaveError> {
        let mut draft = {
            let store = self.store.lock().await;
            store.live_draft().clone()
        };

        if draft.platform.is_empty() {
            let verb = match status {
                PostStatus::Schedule => "schedule",
                _ => "save",
            };
            self.notifier.notify(Notice::error(
                "Select Platform",
                format!("Please select at least one platform to {verb} your post."),
            ));
            return Err(SaveError::NoPlatformSelected);
        }

        if draft.schedule_date < Utc::now() {
            self.notifier.notify(Notice::error(
                "Invalid Date/Time",
                "Please select a future date and time.",
            ));
            return Err(SaveError::ScheduleInPast);
        }

        draft.hashtag = hashtags::format_for_submission(&draft.hashtag);
        draft.status = status;

        match self.commit(&draft).await {
            Ok(()) => {
                self.store.lock().await.close_editor();
                let description = match status {
                    PostStatus::Schedule => "Post scheduled successfully!",
                    _ => "Post saved as draft!",
                };
                self.notifier.notify(Notice::info("Success", description));
                Ok(())
            }
            Err(err) => {
                warn!("save failed: {err}");
                self.notifier
                    .notify(Notice::error("Post cannot be saved", err.to_string()));
                Err(SaveError::Api(err))
            }
        }
    }

    /// Deletes the persisted post behind the live draft. A draft with no
    /// identity yet is a local no-op guard, not surfaced to the user.
    pub async fn delete(&self) -> Result<(), SaveError> {
        let id = {
            let store = self.store.lock().await;
            store.live_draft().id.clone()
        };
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            debug!("delete skipped: draft has no identity");
            return Ok(());
        };

        let result = async {
            self.api.delete_post(&id).await?;
            posts::resync(&self.cache, &self.api).await
        }
        .await;

        match result {
            Ok(()) => {
                self.store.lock().await.close_editor();
                self.notifier
                    .notify(Notice::info("Success", "Post deleted successfully"));
                Ok(())
            }
            Err(err) => {
                warn!("delete failed: {err}");
                self.notifier
                    .notify(Notice::error("Post cannot be deleted", err.to_string()));
                Err(SaveError::Api(err))
            }
        }
    }

    /// Pushes a single-field update outside the full save flow: the whole
    /// draft is sent with the one field overridden, and the server's
    /// canonical copy then replaces the live draft so derived fields are
    /// kept.
    pub async fn patch_field(&self, field: DraftField) -> Result<(), SaveError> {
        let mut draft = {
            let store = self.store.lock().await;
            store.live_draft().clone()
        };
        field.apply(&mut draft);

        match self.api.upsert_post(&draft).await {
            Ok(saved) => {
                self.store
                    .lock()
                    .await
                    .replace_live_draft(LiveDraft::from(&saved));
                Ok(())
            }
            Err(err) => {
                warn!("field update failed: {err}");
                self.notifier
                    .notify(Notice::error("Error", err.to_string()));
                Err(SaveError::Api(err))
            }
        }
    }

    async fn commit(&self, draft: &LiveDraft) -> Result<(), ApiError> {
        self.api.upsert_post(draft).await?;
        posts::resync(&self.cache, &self.api).await
    }
}
