//! Async client for the scheduling backend's chat and post endpoints.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::models::{ChatMessage, LiveDraft, PersistedPost, PostStatus};

/// Errors that can occur while interacting with the scheduling backend.
#[derive(Debug)]
pub enum ApiError {
    Http(reqwest::Error),
    UnexpectedStatus { status: StatusCode, body: String },
    /// A 2xx envelope whose `success` flag was false
    Rejected(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(err) => write!(f, "http error: {err}"),
            ApiError::UnexpectedStatus { status, body } => {
                write!(f, "unexpected status {status}: {body}")
            }
            ApiError::Rejected(reason) => write!(f, "request rejected: {reason}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Http(value)
    }
}

/// Request body for one chat turn: the user's message plus the draft the
/// assistant should work against, schedule timestamp in ISO-8601 form.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub post: LiveDraft,
}

/// Assistant reply envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub bot: Option<BotReply>,
    #[serde(rename = "hasPost", default)]
    pub has_post: bool,
    #[serde(default)]
    pub post: Option<DraftPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotReply {
    #[serde(default)]
    pub text: Option<String>,
}

/// Post fields the assistant may hand back alongside its reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub hashtag: Option<Hashtags>,
}

/// Hashtags arrive either as one raw string or as an array of tags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Hashtags {
    One(String),
    Many(Vec<String>),
}

impl Hashtags {
    /// Single raw string: arrays are joined with spaces.
    pub fn joined(&self) -> String {
        match self {
            Hashtags::One(raw) => raw.clone(),
            Hashtags::Many(tags) => tags.join(" "),
        }
    }
}

/// Success envelope returned by post mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct PostEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<PersistedPost>,
}

/// Async API client for the scheduling backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Creates a new client targeting the provided base URL.
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            auth_token,
        })
    }

    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One conversational exchange with the assistant at `POST /chat`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = format!("{}/chat", self.base_url);
        let response = self.authorized(self.http.post(url).json(request)).send().await?;
        Self::json_body(response).await
    }

    /// Prior transcript for the current session from `GET /chat/history`.
    pub async fn chat_history(&self) -> Result<Vec<ChatMessage>, ApiError> {
        let url = format!("{}/chat/history", self.base_url);
        let response = self.authorized(self.http.get(url)).send().await?;
        Self::json_body(response).await
    }

    /// Creates or updates a post. An absent or empty identity means create
    /// (`POST /posts`); otherwise the identity keys an update
    /// (`PUT /posts/{id}`).
    pub async fn upsert_post(&self, draft: &LiveDraft) -> Result<PersistedPost, ApiError> {
        let request = match draft.id.as_deref() {
            Some(id) if !id.is_empty() => {
                self.http.put(format!("{}/posts/{}", self.base_url, id))
            }
            _ => self.http.post(format!("{}/posts", self.base_url)),
        };
        let response = self.authorized(request.json(draft)).send().await?;
        let envelope: PostEnvelope = Self::json_body(response).await?;

        if !envelope.success {
            return Err(ApiError::Rejected("post was not saved".to_string()));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Rejected("response carried no post".to_string()))
    }

    /// Deletes a post by identity via `DELETE /posts/{id}`.
    pub async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/posts/{}", self.base_url, id);
        let response = self.authorized(self.http.delete(url)).send().await?;
        let envelope: PostEnvelope = Self::json_body(response).await?;

        if !envelope.success {
            return Err(ApiError::Rejected("post was not deleted".to_string()));
        }
        Ok(())
    }

    /// Lists posts with the given status inside an inclusive date range
    /// (`GET /posts?status=&startDate=&endDate=`, bounds in `YYYY-MM-DD`).
    pub async fn list_posts(
        &self,
        status: PostStatus,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PersistedPost>, ApiError> {
        let url = format!("{}/posts", self.base_url);
        let request = self.http.get(url).query(&[
            ("status", status.as_str().to_string()),
            ("startDate", start.format("%Y-%m-%d").to_string()),
            ("endDate", end.format("%Y-%m-%d").to_string()),
        ]);
        let response = self.authorized(request).send().await?;
        Self::json_body(response).await
    }

    async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus { status, body });
        }
        response.json().await.map_err(ApiError::from)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.auth_token {
            request.header(AUTHORIZATION, format!("Bearer {}", token))
        } else {
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn hashtag_payload_accepts_string_or_array() {
        let one: DraftPayload =
            serde_json::from_value(json!({"hashtag": "#sale #today"})).expect("parse");
        assert_eq!(one.hashtag.expect("hashtag").joined(), "#sale #today");

        let many: DraftPayload =
            serde_json::from_value(json!({"hashtag": ["#sale", "#today"]})).expect("parse");
        assert_eq!(many.hashtag.expect("hashtag").joined(), "#sale #today");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/history"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).expect("client");
        let err = client.chat_history().await.expect_err("must fail");
        match err {
            ApiError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn list_posts_sends_status_and_date_bounds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("status", "schedule"))
            .and(query_param("startDate", "2025-05-01"))
            .and(query_param("endDate", "2025-05-31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).expect("client");
        let posts = client
            .list_posts(
                PostStatus::Schedule,
                NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            )
            .await
            .expect("list");
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), None).expect("client");
        let err = client
            .upsert_post(&LiveDraft::empty())
            .await
            .expect_err("must be rejected");
        assert!(matches!(err, ApiError::Rejected(_)));
    }
}
