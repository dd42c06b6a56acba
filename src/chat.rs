//! One conversational exchange with the assistant and its effect on the
//! draft store.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use tokio::time::sleep;

use crate::api::{ApiClient, ApiError, ChatRequest, ChatResponse};
use crate::constants::{KICKOFF_PROMPT, POST_READY_NOTICE, THINKING_DELAY_MS, UNPROCESSABLE_REPLY};
use crate::hashtags;
use crate::models::{ChatMessage, DraftPatch, MessageAction, View};
use crate::store::SharedStore;

/// What a finished chat turn produced. The shell reacts to this: re-enable
/// input, navigate on `DraftUpdated`, refresh onboarding state after a
/// `Replied` turn on the mind page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Assistant replied and handed back post fields that were merged
    DraftUpdated,
    /// Assistant replied with text only
    Replied,
    /// Reply carried neither text nor a post payload
    Unprocessable,
    /// Transport or service failure, surfaced in the transcript
    Failed,
}

/// Runs chat turns against the assistant and folds replies into the store.
///
/// Turns are not serialized against each other: each in-flight call applies
/// its own merge when it resolves, so when turns overlap the later-resolving
/// one wins the draft merge regardless of send order.
pub struct ChatTurnController {
    api: Arc<ApiClient>,
    store: SharedStore,
}

impl ChatTurnController {
    pub fn new(api: Arc<ApiClient>, store: SharedStore) -> Self {
        Self { api, store }
    }

    /// Loads the prior transcript into the store.
    pub async fn load_history(&self) -> Result<(), ApiError> {
        let history = self.api.chat_history().await?;
        self.store.lock().await.replace_messages(history);
        Ok(())
    }

    /// One full user turn: the message is appended to the transcript before
    /// any network activity, then exchanged with the assistant.
    pub async fn send(&self, text: &str, view: View) -> TurnOutcome {
        let message = text.trim().to_string();
        self.store
            .lock()
            .await
            .append_message(ChatMessage::user(message.clone()));
        self.exchange(&message, view).await
    }

    /// Session-start exchange using the canned greeting prompt. Nothing is
    /// appended for the user side.
    pub async fn kickoff(&self, view: View) -> TurnOutcome {
        self.exchange(KICKOFF_PROMPT, view).await
    }

    async fn exchange(&self, message: &str, view: View) -> TurnOutcome {
        let request = {
            let store = self.store.lock().await;
            ChatRequest {
                message: message.to_string(),
                post: store.live_draft().clone(),
            }
        };

        // Deferred indicator: only shows if the call is still in flight
        // after the delay, so fast replies never flash the loading state.
        let thinking_store = self.store.clone();
        let timer = tokio::spawn(async move {
            sleep(Duration::from_millis(THINKING_DELAY_MS)).await;
            thinking_store.lock().await.set_thinking(true);
        });

        let result = self.api.chat(&request).await;
        timer.abort();

        let outcome = match result {
            Ok(response) => self.apply(response, view).await,
            Err(err) => {
                warn!("chat turn failed: {err}");
                self.store
                    .lock()
                    .await
                    .append_message(ChatMessage::system(err.to_string()));
                TurnOutcome::Failed
            }
        };

        self.store.lock().await.set_thinking(false);
        outcome
    }

    async fn apply(&self, response: ChatResponse, view: View) -> TurnOutcome {
        let text = response.bot.and_then(|bot| bot.text);
        let Some(text) = text else {
            self.store
                .lock()
                .await
                .append_message(ChatMessage::system(UNPROCESSABLE_REPLY));
            return TurnOutcome::Unprocessable;
        };

        let mut store = self.store.lock().await;
        store.append_message(ChatMessage::mark(text));

        if !response.has_post {
            return TurnOutcome::Replied;
        }

        let payload = response.post.unwrap_or_default();
        let raw_hashtags = payload.hashtag.map(|h| h.joined()).unwrap_or_default();
        store.set_live_draft(DraftPatch {
            title: Some(payload.title.unwrap_or_default()),
            content: Some(payload.content.unwrap_or_default()),
            hashtag: Some(hashtags::format_for_display(&raw_hashtags)),
            ..DraftPatch::default()
        });

        if view != View::Composer {
            store.append_message(ChatMessage::system_with_action(
                POST_READY_NOTICE,
                MessageAction::OpenComposer,
            ));
        }

        TurnOutcome::DraftUpdated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sender;
    use crate::store::PostStore;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn controller(server: &MockServer) -> (ChatTurnController, SharedStore) {
        let api = Arc::new(ApiClient::new(server.uri(), None).expect("client"));
        let store = PostStore::shared();
        (ChatTurnController::new(api, store.clone()), store)
    }

    #[tokio::test]
    async fn reply_with_post_payload_updates_draft_and_transcript() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bot": {"text": "Done!"},
                "hasPost": true,
                "post": {
                    "title": "Sale",
                    "content": "50% off today",
                    "hashtag": ["#sale", "#today"]
                }
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller(&server);
        let outcome = controller.send("make it shorter", View::Composer).await;
        assert_eq!(outcome, TurnOutcome::DraftUpdated);

        let store = store.lock().await;
        let senders: Vec<Sender> = store.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Mark]);
        assert_eq!(store.messages()[1].text, "Done!");

        let draft = store.live_draft();
        assert_eq!(draft.title, "Sale");
        assert_eq!(draft.content, "50% off today");
        assert_eq!(draft.hashtag, "#sale #today");
        assert!(!store.thinking());
    }

    #[tokio::test]
    async fn post_payload_away_from_composer_adds_navigation_notice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bot": {"text": "Here you go"},
                "hasPost": true,
                "post": {"title": "T", "content": "C", "hashtag": "#x"}
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller(&server);
        controller.send("write a post", View::Dashboard).await;

        let store = store.lock().await;
        let last = store.messages().last().expect("system notice");
        assert_eq!(last.sender, Sender::System);
        assert_eq!(last.action, Some(MessageAction::OpenComposer));
    }

    #[tokio::test]
    async fn reply_without_text_or_post_is_unprocessable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"bot": {}, "hasPost": false})),
            )
            .mount(&server)
            .await;

        let (controller, store) = controller(&server);
        let outcome = controller.send("hello?", View::Composer).await;
        assert_eq!(outcome, TurnOutcome::Unprocessable);

        let store = store.lock().await;
        let last = store.messages().last().expect("system notice");
        assert_eq!(last.sender, Sender::System);
        assert_eq!(last.text, UNPROCESSABLE_REPLY);
    }

    #[tokio::test]
    async fn transport_failure_lands_in_the_transcript() {
        let server = MockServer::start().await;
        // No mock mounted for /chat: the server answers 404.
        let (controller, store) = controller(&server);
        let outcome = controller.send("anyone there?", View::Composer).await;
        assert_eq!(outcome, TurnOutcome::Failed);

        let store = store.lock().await;
        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.messages()[1].sender, Sender::System);
        assert!(!store.thinking());
    }

    #[tokio::test]
    async fn kickoff_appends_no_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bot": {"text": "Hi, I'm Mark."},
                "hasPost": false
            })))
            .mount(&server)
            .await;

        let (controller, store) = controller(&server);
        let outcome = controller.kickoff(View::Dashboard).await;
        assert_eq!(outcome, TurnOutcome::Replied);

        let store = store.lock().await;
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].sender, Sender::Mark);
    }

    #[tokio::test]
    async fn load_history_replaces_the_transcript() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chat/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "text": "earlier", "sender": "user",
                 "timestamp": "2025-05-20T10:00:00Z"},
                {"id": "2", "text": "indeed", "sender": "mark",
                 "timestamp": "2025-05-20T10:00:05Z"}
            ])))
            .mount(&server)
            .await;

        let (controller, store) = controller(&server);
        {
            store.lock().await.append_message(ChatMessage::system("stale"));
        }
        controller.load_history().await.expect("history");

        let store = store.lock().await;
        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.messages()[0].text, "earlier");
        assert_eq!(store.messages()[1].sender, Sender::Mark);
    }

    #[tokio::test]
    async fn thinking_indicator_defers_until_the_delay_elapses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"bot": {"text": "slow"}, "hasPost": false}))
                    .set_delay(Duration::from_millis(3000)),
            )
            .mount(&server)
            .await;

        let (controller, store) = controller(&server);
        let controller = Arc::new(controller);
        let turn = tokio::spawn({
            let controller = controller.clone();
            async move { controller.send("take your time", View::Composer).await }
        });

        sleep(Duration::from_millis(500)).await;
        assert!(!store.lock().await.thinking());

        sleep(Duration::from_millis(2100)).await;
        assert!(store.lock().await.thinking());

        let outcome = turn.await.expect("turn task");
        assert_eq!(outcome, TurnOutcome::Replied);
        assert!(!store.lock().await.thinking());
    }

    #[tokio::test]
    async fn later_resolving_turn_wins_the_merge() {
        let server = MockServer::start().await;
        // Turn A resolves last and must win, despite being sent first.
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_string_contains("draft v1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "bot": {"text": "v1 ready"},
                        "hasPost": true,
                        "post": {"title": "A", "content": "v1", "hashtag": ""}
                    }))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_string_contains("draft v2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "bot": {"text": "v2 ready"},
                        "hasPost": true,
                        "post": {"title": "B", "content": "v2", "hashtag": ""}
                    }))
                    .set_delay(Duration::from_millis(50)),
            )
            .mount(&server)
            .await;

        let (controller, store) = controller(&server);
        let (a, b) = tokio::join!(
            controller.send("draft v1", View::Composer),
            controller.send("draft v2", View::Composer),
        );
        assert_eq!(a, TurnOutcome::DraftUpdated);
        assert_eq!(b, TurnOutcome::DraftUpdated);

        let store = store.lock().await;
        assert_eq!(store.live_draft().content, "v1");
        assert_eq!(store.live_draft().title, "A");
    }
}
