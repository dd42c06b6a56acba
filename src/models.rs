//! Model definitions shared across the engine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SCHEDULE_OFFSET_MINS;

/// Social platforms a post can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    Tiktok,
    Linkedin,
    Facebook,
    Youtube,
}

/// Post format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Post,
    Story,
    Reel,
}

/// Lifecycle status, using the wire vocabulary the backend stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Schedule,
    Public,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Schedule => "schedule",
            PostStatus::Public => "public",
        }
    }
}

/// Dashboard tabs and the status each one queries for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Past,
    Upcoming,
    Drafts,
}

impl DashboardTab {
    pub fn status(&self) -> PostStatus {
        match self {
            DashboardTab::Past => PostStatus::Public,
            DashboardTab::Upcoming => PostStatus::Schedule,
            DashboardTab::Drafts => PostStatus::Draft,
        }
    }
}

/// Where the user currently is, as far as the engine needs to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Composer,
    Dashboard,
    Calendar,
    Mind,
}

/// The post under composition. Exactly one of these exists per store; its
/// identity stays `None` until the first successful persistence, after which
/// every save is an update keyed by that identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDraft {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub hashtag: String,
    #[serde(default)]
    pub media_url: Vec<String>,
    #[serde(default)]
    pub platform: Vec<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostKind>,
    pub status: PostStatus,
    pub schedule_date: DateTime<Utc>,
    #[serde(default)]
    pub instagram_location_id: String,
    #[serde(default)]
    pub facebook_location_id: String,
}

impl LiveDraft {
    /// Default draft a composer session starts from: no identity, draft
    /// status, nothing selected, scheduled a little into the future.
    pub fn empty() -> Self {
        Self {
            id: None,
            user_id: String::new(),
            title: String::new(),
            content: String::new(),
            hashtag: String::new(),
            media_url: Vec::new(),
            platform: Vec::new(),
            post_type: None,
            status: PostStatus::Draft,
            schedule_date: Utc::now() + Duration::minutes(DEFAULT_SCHEDULE_OFFSET_MINS),
            instagram_location_id: String::new(),
            facebook_location_id: String::new(),
        }
    }
}

/// Partial field set shallow-merged into the live draft. Only fields set to
/// `Some` change; everything else is left untouched.
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub hashtag: Option<String>,
    pub media_url: Option<Vec<String>>,
    pub platform: Option<Vec<Platform>>,
    pub post_type: Option<PostKind>,
    pub status: Option<PostStatus>,
    pub schedule_date: Option<DateTime<Utc>>,
}

/// Closed set of single-field updates pushed outside the full save flow.
/// Platform membership is managed at the account layer and deliberately has
/// no variant here.
#[derive(Debug, Clone)]
pub enum DraftField {
    Kind(PostKind),
    Title(String),
    Content(String),
    Hashtag(String),
    Media(Vec<String>),
    ScheduleDate(DateTime<Utc>),
    InstagramLocation(String),
    FacebookLocation(String),
}

impl DraftField {
    pub(crate) fn apply(&self, draft: &mut LiveDraft) {
        match self {
            DraftField::Kind(kind) => draft.post_type = Some(*kind),
            DraftField::Title(title) => draft.title = title.clone(),
            DraftField::Content(content) => draft.content = content.clone(),
            DraftField::Hashtag(hashtag) => draft.hashtag = hashtag.clone(),
            DraftField::Media(urls) => draft.media_url = urls.clone(),
            DraftField::ScheduleDate(when) => draft.schedule_date = *when,
            DraftField::InstagramLocation(id) => draft.instagram_location_id = id.clone(),
            DraftField::FacebookLocation(id) => draft.facebook_location_id = id.clone(),
        }
    }
}

/// Canonical server copy of a post. The backend owns this; the client only
/// trusts its local draft once a round-trip hands one of these back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPost {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub hashtag: String,
    #[serde(default)]
    pub media_url: Vec<String>,
    #[serde(default)]
    pub platform: Vec<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostKind>,
    pub status: PostStatus,
    #[serde(default)]
    pub schedule_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub instagram_location_id: String,
    #[serde(default)]
    pub facebook_location_id: String,
}

impl PersistedPost {
    /// The date a post is displayed and counted under: its schedule time,
    /// falling back to creation time for posts that never had one.
    pub fn display_date(&self) -> Option<DateTime<Utc>> {
        self.schedule_date.or(self.created_at)
    }
}

impl From<&PersistedPost> for LiveDraft {
    fn from(post: &PersistedPost) -> Self {
        LiveDraft {
            id: Some(post.id.clone()),
            user_id: post.user_id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            hashtag: post.hashtag.clone(),
            media_url: post.media_url.clone(),
            platform: post.platform.clone(),
            post_type: post.post_type,
            status: post.status,
            schedule_date: post
                .display_date()
                .unwrap_or_else(|| Utc::now() + Duration::minutes(DEFAULT_SCHEDULE_OFFSET_MINS)),
            instagram_location_id: post.instagram_location_id.clone(),
            facebook_location_id: post.facebook_location_id.clone(),
        }
    }
}

/// Message sender roles as the transcript stores them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Mark,
    System,
}

/// Affordance carried by a system notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageAction {
    OpenComposer,
}

/// One turn of the transcript. Append-only: never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<MessageAction>,
}

impl ChatMessage {
    fn new(text: impl Into<String>, sender: Sender) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            text: text.into(),
            sender,
            timestamp: now,
            action: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn mark(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Mark)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(text, Sender::System)
    }

    pub fn system_with_action(text: impl Into<String>, action: MessageAction) -> Self {
        let mut message = Self::new(text, Sender::System);
        message.action = Some(action);
        message
    }
}
