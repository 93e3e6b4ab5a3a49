//! Paginated list state shared by the active and delivered screens.
//!
//! Like the details workflow, requests are issued with `begin_*` and their
//! answers applied with [`LoadListState::apply`]. Every request carries the
//! generation it was issued under; a refresh bumps the generation so pages
//! that were still in flight are dropped when they land.

use tracing::{debug, info, warn};

use super::load::{Load, LoadPage};
use super::normalize::{compare_pickup_desc, NormalizedLoadView, ViewContext};
use super::status::is_delivered;
use crate::infra::api::{ApiError, LoadApi};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadListKind {
    Active,
    Delivered,
}

impl LoadListKind {
    pub fn context(&self) -> ViewContext {
        match self {
            LoadListKind::Active => ViewContext::ActiveList,
            LoadListKind::Delivered => ViewContext::DeliveredList,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LoadListKind::Active => "Active Loads",
            LoadListKind::Delivered => "Delivered Loads",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            LoadListKind::Active => "Failed to load active loads.",
            LoadListKind::Delivered => "Failed to load delivered loads.",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            LoadListKind::Active => "No active loads assigned to you.",
            LoadListKind::Delivered => "No delivered loads yet.",
        }
    }
}

/// What the list is currently waiting for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListActivity {
    #[default]
    Idle,
    Loading,
    Refreshing,
    FetchingMore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub page: u32,
    pub append: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadListState {
    kind: LoadListKind,
    loads: Vec<Load>,
    current_page: u32,
    total_pages: u32,
    generation: u64,
    activity: ListActivity,
    error: Option<String>,
}

impl LoadListState {
    pub fn new(kind: LoadListKind) -> Self {
        Self {
            kind,
            loads: Vec::new(),
            current_page: 0,
            total_pages: 0,
            generation: 0,
            activity: ListActivity::Idle,
            error: None,
        }
    }

    pub fn kind(&self) -> LoadListKind {
        self.kind
    }

    pub fn activity(&self) -> ListActivity {
        self.activity
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// First page with a full-screen spinner; used when the screen is shown.
    pub fn begin_initial(&mut self) -> PageRequest {
        self.begin_first_page(ListActivity::Loading)
    }

    /// First page with the pull-to-refresh indicator; keeps the old rows
    /// visible until the answer arrives.
    pub fn begin_refresh(&mut self) -> PageRequest {
        self.begin_first_page(ListActivity::Refreshing)
    }

    fn begin_first_page(&mut self, activity: ListActivity) -> PageRequest {
        self.generation += 1;
        self.activity = activity;
        self.error = None;
        PageRequest {
            generation: self.generation,
            page: 1,
            append: false,
        }
    }

    /// Next page, unless the last page is loaded or any fetch is running.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if !self.has_more() || self.activity != ListActivity::Idle {
            return None;
        }
        self.activity = ListActivity::FetchingMore;
        Some(PageRequest {
            generation: self.generation,
            page: self.current_page + 1,
            append: true,
        })
    }

    /// Applies a page answer. Returns `false` when the answer was stale.
    pub fn apply(&mut self, request: PageRequest, response: Result<LoadPage, ApiError>) -> bool {
        if request.generation != self.generation {
            debug!(
                list = ?self.kind,
                page = request.page,
                generation = request.generation,
                current = self.generation,
                "dropping stale page"
            );
            return false;
        }
        self.activity = ListActivity::Idle;

        match response {
            Ok(page) => {
                self.current_page = page.current_page.max(request.page);
                self.total_pages = page.total_pages;
                if request.append {
                    self.loads.extend(page.loads);
                } else {
                    self.loads = page.loads;
                }
                self.error = None;
            }
            Err(error) => {
                warn!(list = ?self.kind, page = request.page, %error, "failed to fetch loads");
                self.error = Some(self.kind.error_message().to_string());
            }
        }
        true
    }

    /// Error shown in place of the list when there are no rows to fall back on.
    pub fn blocking_error(&self) -> Option<&str> {
        self.error().filter(|_| self.visible().is_empty())
    }

    /// Error shown above existing rows, e.g. after a failed next page.
    pub fn inline_error(&self) -> Option<&str> {
        self.error().filter(|_| !self.visible().is_empty())
    }

    /// Rows in display order.
    pub fn visible(&self) -> Vec<&Load> {
        match self.kind {
            LoadListKind::Active => {
                let mut rows: Vec<&Load> = self
                    .loads
                    .iter()
                    .filter(|load| !load.status.as_deref().is_some_and(is_delivered))
                    .collect();
                rows.sort_by(|a, b| compare_pickup_desc(a, b));
                rows
            }
            LoadListKind::Delivered => self.loads.iter().collect(),
        }
    }

    pub fn visible_views(&self) -> Vec<NormalizedLoadView> {
        let context = self.kind.context();
        self.visible()
            .into_iter()
            .map(|load| NormalizedLoadView::from_load(load, context))
            .collect()
    }
}

pub async fn fetch_page(
    api: &dyn LoadApi,
    kind: LoadListKind,
    page: u32,
    limit: u32,
) -> Result<LoadPage, ApiError> {
    let result = match kind {
        LoadListKind::Active => api.get_active_loads(page).await,
        LoadListKind::Delivered => api.get_invoice_loads(page, limit).await,
    };
    if let Ok(ref fetched) = result {
        info!(list = ?kind, page, rows = fetched.loads.len(), "page loaded");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fake::FakeLoadApi;
    use serde_json::json;

    fn load(id: &str, status: &str, pickup: &str) -> Load {
        serde_json::from_value(json!({ "_id": id, "status": status, "pickupDate": pickup }))
            .unwrap()
    }

    async fn run_request(
        state: &mut LoadListState,
        api: &dyn LoadApi,
        request: PageRequest,
        limit: u32,
    ) -> bool {
        let response = fetch_page(api, state.kind(), request.page, limit).await;
        state.apply(request, response)
    }

    fn ids(state: &LoadListState) -> Vec<&str> {
        state.visible().iter().map(|load| load.id.as_str()).collect()
    }

    #[tokio::test]
    async fn active_list_hides_delivered_rows() {
        let api = FakeLoadApi::default()
            .with_active_page(
                1,
                vec![
                    load("a", "Delivered", "2024-03-01"),
                    load("b", "enRoute", "2024-03-02"),
                    load("c", "delivered", "2024-03-03"),
                ],
                1,
            )
            .await;
        let mut state = LoadListState::new(LoadListKind::Active);
        let request = state.begin_initial();
        assert_eq!(state.activity(), ListActivity::Loading);

        assert!(run_request(&mut state, &api, request, 100).await);

        assert_eq!(ids(&state), vec!["b"]);
        assert_eq!(state.activity(), ListActivity::Idle);
        assert!(!state.has_more());
    }

    #[tokio::test]
    async fn active_list_sorts_newest_pickup_first() {
        let api = FakeLoadApi::default()
            .with_active_page(
                1,
                vec![
                    load("old", "enRoute", "2024-01-05"),
                    load("none", "enRoute", "soon"),
                    load("new", "loadCheckIn", "2024-02-10T08:00:00"),
                ],
                1,
            )
            .await;
        let mut state = LoadListState::new(LoadListKind::Active);
        let request = state.begin_initial();
        run_request(&mut state, &api, request, 100).await;

        assert_eq!(ids(&state), vec!["new", "old", "none"]);
    }

    #[tokio::test]
    async fn scrolling_appends_until_last_page() {
        let api = FakeLoadApi::default()
            .with_invoice_page(1, vec![load("1", "Delivered", "")], 3)
            .await
            .with_invoice_page(2, vec![load("2", "Delivered", "")], 3)
            .await
            .with_invoice_page(3, vec![load("3", "Delivered", "")], 3)
            .await;
        let mut state = LoadListState::new(LoadListKind::Delivered);
        let request = state.begin_initial();
        run_request(&mut state, &api, request, 100).await;

        while let Some(request) = state.begin_next_page() {
            assert!(request.append);
            run_request(&mut state, &api, request, 100).await;
        }

        assert_eq!(ids(&state), vec!["1", "2", "3"]);
        assert_eq!(state.current_page(), 3);
        assert_eq!(state.begin_next_page(), None);
        assert_eq!(*api.page_calls.lock().await, vec![1, 2, 3]);
    }

    #[test]
    fn next_page_waits_for_running_fetch() {
        let mut state = LoadListState::new(LoadListKind::Delivered);
        let first = state.begin_initial();
        assert_eq!(state.begin_next_page(), None);

        state.apply(
            first,
            Ok(LoadPage {
                loads: Vec::new(),
                current_page: 1,
                total_pages: 2,
            }),
        );
        let next = state.begin_next_page().unwrap();
        assert_eq!(next.page, 2);
        assert_eq!(state.begin_next_page(), None);
        assert_eq!(state.activity(), ListActivity::FetchingMore);
    }

    #[test]
    fn refresh_drops_pages_from_older_generation() {
        let mut state = LoadListState::new(LoadListKind::Delivered);
        let stale = state.begin_initial();
        let fresh = state.begin_refresh();

        let page = |id: &str| {
            Ok(LoadPage {
                loads: vec![load(id, "Delivered", "")],
                current_page: 1,
                total_pages: 1,
            })
        };
        assert!(state.apply(fresh, page("fresh")));
        assert!(!state.apply(stale, page("stale")));
        assert_eq!(ids(&state), vec!["fresh"]);
    }

    #[tokio::test]
    async fn failed_next_page_keeps_rows_and_reports_inline() {
        let api = FakeLoadApi::default()
            .with_active_page(1, vec![load("a", "enRoute", "2024-03-01")], 3)
            .await;
        let mut state = LoadListState::new(LoadListKind::Active);
        let first = state.begin_initial();
        run_request(&mut state, &api, first, 100).await;

        let next = state.begin_next_page().unwrap();
        run_request(&mut state, &api, next, 100).await;

        assert_eq!(ids(&state), vec!["a"]);
        assert_eq!(state.inline_error(), Some("Failed to load active loads."));
        assert_eq!(state.blocking_error(), None);
        assert!(state.has_more());
        assert_eq!(state.begin_next_page().map(|r| r.page), Some(2));
    }

    #[tokio::test]
    async fn failed_first_page_sets_list_error() {
        let api = FakeLoadApi::default();
        let mut state = LoadListState::new(LoadListKind::Active);
        let request = state.begin_initial();
        run_request(&mut state, &api, request, 100).await;

        assert_eq!(state.error(), Some("Failed to load active loads."));
        assert_eq!(state.blocking_error(), Some("Failed to load active loads."));
        assert_eq!(state.inline_error(), None);
        assert_eq!(state.activity(), ListActivity::Idle);

        let retry = state.begin_refresh();
        assert_eq!(state.error(), None);
        assert_eq!(retry.page, 1);
    }
}
