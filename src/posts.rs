//! Cached post collections backing the dashboard and calendar views.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::api::{ApiClient, ApiError};
use crate::models::{DashboardTab, PersistedPost, PostStatus};
use crate::period::{self, CalendarView, Direction, PeriodWindow};

/// Handle shared between the dashboard, the calendar and the synchronizer.
pub type SharedPostCache = Arc<Mutex<PostCache>>;

/// Post collection for the active dashboard tab and period window.
///
/// The cache never assumes it reflects committed state after a mutation;
/// `resync` refetches the whole window from the backend.
#[derive(Debug)]
pub struct PostCache {
    view: CalendarView,
    window: PeriodWindow,
    tab: DashboardTab,
    posts: Vec<PersistedPost>,
    stale: bool,
}

impl PostCache {
    /// Cache anchored at `today`, starting on the month view of past posts.
    pub fn new(today: NaiveDate) -> Self {
        let window = period::window_for(CalendarView::Month, today)
            .unwrap_or(PeriodWindow { start: today, end: today });
        Self {
            view: CalendarView::Month,
            window,
            tab: DashboardTab::Past,
            posts: Vec::new(),
            stale: true,
        }
    }

    /// Cache wrapped for sharing across async tasks.
    pub fn shared(today: NaiveDate) -> SharedPostCache {
        Arc::new(Mutex::new(Self::new(today)))
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }

    pub fn window(&self) -> PeriodWindow {
        self.window
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    pub fn posts(&self) -> &[PersistedPost] {
        &self.posts
    }

    /// True once the collection no longer matches its query and needs a
    /// resync.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn contains(&self, id: &str) -> bool {
        self.posts.iter().any(|post| post.id == id)
    }

    /// Switches the dashboard tab.
    pub fn set_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
        self.stale = true;
    }

    /// Switches month/week display, re-anchoring the window at `today`.
    pub fn set_view(&mut self, view: CalendarView, today: NaiveDate) {
        if let Some(window) = period::window_for(view, today) {
            self.view = view;
            self.window = window;
            self.stale = true;
        }
    }

    /// Pages the window one period forward or back.
    pub fn advance(&mut self, direction: Direction) {
        if let Some(next) = period::advance(&self.window, self.view, direction) {
            self.window = next;
            self.stale = true;
        }
    }

    /// Published posts whose display date falls inside the window.
    pub fn published_count(&self) -> usize {
        self.count_with_status(PostStatus::Public)
    }

    /// Scheduled posts whose display date falls inside the window.
    pub fn scheduled_count(&self) -> usize {
        self.count_with_status(PostStatus::Schedule)
    }

    fn count_with_status(&self, status: PostStatus) -> usize {
        self.posts
            .iter()
            .filter(|post| post.status == status)
            .filter(|post| {
                post.display_date()
                    .map(|date| self.window.contains(date.date_naive()))
                    .unwrap_or(false)
            })
            .count()
    }

    pub(crate) fn query(&self) -> (PostStatus, PeriodWindow) {
        (self.tab.status(), self.window)
    }

    pub(crate) fn install(&mut self, posts: Vec<PersistedPost>) {
        self.posts = posts;
        self.stale = false;
    }
}

/// Refetches the cached collection for the cache's active tab and window.
///
/// The query is snapshotted before the fetch and the result installed after
/// it, so the lock is never held across the network call; if the window
/// changes mid-fetch the later resync wins.
pub async fn resync(cache: &SharedPostCache, api: &ApiClient) -> Result<(), ApiError> {
    let (status, window) = {
        let cache = cache.lock().await;
        cache.query()
    };
    let posts = api.list_posts(status, window.start, window.end).await?;
    cache.lock().await.install(posts);
    Ok(())
}
