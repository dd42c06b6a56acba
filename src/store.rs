//! Shared in-memory state for the post being composed and its transcript.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::{ChatMessage, DraftPatch, LiveDraft, PersistedPost};

/// Handle shared between the composer, the chat controller and the
/// persistence synchronizer.
pub type SharedStore = Arc<Mutex<PostStore>>;

/// Single source of truth for the live draft and the chat transcript.
///
/// Exactly one live draft exists per store. Every component mutates it
/// through `set_live_draft`, which merges at field granularity: the last
/// caller to supply a field wins, and fields a call leaves out are never
/// touched.
#[derive(Debug)]
pub struct PostStore {
    draft: LiveDraft,
    messages: Vec<ChatMessage>,
    thinking: bool,
    editor_open: bool,
    /// Captured once at construction so every reset restores the identical
    /// empty draft, schedule time included.
    baseline: LiveDraft,
}

impl PostStore {
    pub fn new() -> Self {
        let baseline = LiveDraft::empty();
        Self {
            draft: baseline.clone(),
            messages: Vec::new(),
            thinking: false,
            editor_open: false,
            baseline,
        }
    }

    /// Store wrapped for sharing across async tasks.
    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn live_draft(&self) -> &LiveDraft {
        &self.draft
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn thinking(&self) -> bool {
        self.thinking
    }

    pub fn editor_open(&self) -> bool {
        self.editor_open
    }

    /// Shallow-merges the supplied fields into the live draft.
    pub fn set_live_draft(&mut self, patch: DraftPatch) {
        if let Some(title) = patch.title {
            self.draft.title = title;
        }
        if let Some(content) = patch.content {
            self.draft.content = content;
        }
        if let Some(hashtag) = patch.hashtag {
            self.draft.hashtag = hashtag;
        }
        if let Some(media_url) = patch.media_url {
            self.draft.media_url = media_url;
        }
        if let Some(platform) = patch.platform {
            self.draft.platform = platform;
        }
        if let Some(post_type) = patch.post_type {
            self.draft.post_type = Some(post_type);
        }
        if let Some(status) = patch.status {
            self.draft.status = status;
        }
        if let Some(schedule_date) = patch.schedule_date {
            self.draft.schedule_date = schedule_date;
        }
    }

    /// Replaces the whole draft with the server's canonical copy.
    pub fn replace_live_draft(&mut self, draft: LiveDraft) {
        self.draft = draft;
    }

    /// Restores the default empty draft. Idempotent.
    pub fn reset_live_draft(&mut self) {
        self.draft = self.baseline.clone();
    }

    pub fn append_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Replaces the transcript wholesale (history load, explicit reset).
    pub fn replace_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
    }

    /// Opens the editor over an existing post, or over a fresh draft.
    pub fn open_editor(&mut self, post: Option<&PersistedPost>) {
        self.draft = match post {
            Some(post) => LiveDraft::from(post),
            None => self.baseline.clone(),
        };
        self.editor_open = true;
    }

    /// Closes the editor and drops whatever was being edited.
    pub fn close_editor(&mut self) {
        self.editor_open = false;
        self.reset_live_draft();
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}
