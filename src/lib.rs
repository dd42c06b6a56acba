//! Markly - client-side engine for conversational social post scheduling.
//!
//! Reconciles three concurrently-evolving views of one in-progress post -
//! direct user edits, assistant-generated mutations arriving from chat
//! turns, and the persisted server copy - into a single live draft, commits
//! that draft to the backend, and keeps the cached post collections behind
//! the dashboard and calendar views consistent with the committed state.

pub mod api;
pub mod chat;
pub mod constants;
pub mod hashtags;
pub mod models;
pub mod notify;
pub mod period;
pub mod posts;
pub mod store;
pub mod sync;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::chat::ChatTurnController;
use crate::notify::Notify;
use crate::posts::{PostCache, SharedPostCache};
use crate::store::{PostStore, SharedStore};
use crate::sync::DraftSynchronizer;

/// Everything a composer shell needs, wired over one shared store and one
/// shared post cache.
pub struct Engine {
    pub api: Arc<ApiClient>,
    pub store: SharedStore,
    pub cache: SharedPostCache,
    pub chat: ChatTurnController,
    pub sync: DraftSynchronizer,
}

impl Engine {
    /// Wires the engine against a backend client, anchoring the post cache
    /// at `today`.
    pub fn new(api: ApiClient, notifier: Arc<dyn Notify>, today: NaiveDate) -> Self {
        let api = Arc::new(api);
        let store = PostStore::shared();
        let cache = PostCache::shared(today);
        let chat = ChatTurnController::new(api.clone(), store.clone());
        let sync = DraftSynchronizer::new(api.clone(), store.clone(), cache.clone(), notifier);
        Self {
            api,
            store,
            cache,
            chat,
            sync,
        }
    }
}
