// View Pipeline - query → sort → paginate, plus the overview numbers
//
// Everything here is recomputed from (store, state) on each call. There is no
// cached view to invalidate when the snapshot or the selections change.

use crate::pagination::{self, Page};
use crate::query::{filter_records, TierFilter};
use crate::record::Record;
use crate::sort::{sort_records, SortKey};
use crate::store::RecordStore;
use crate::summary::GlobalSummary;
use serde::{Deserialize, Serialize};

/// Operator selections for one session; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search: String,
    pub tier_filter: TierFilter,
    pub sort_key: SortKey,
    /// 1-based
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            tier_filter: TierFilter::All,
            sort_key: SortKey::Name,
            page: 1,
        }
    }
}

impl ViewState {
    pub fn new(tier_filter: TierFilter, sort_key: SortKey) -> Self {
        Self {
            tier_filter,
            sort_key,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = pagination::reconcile_page(self.page.saturating_add(1), total_pages);
    }

    pub fn previous_page(&mut self, total_pages: usize) {
        self.page = pagination::reconcile_page(self.page.saturating_sub(1), total_pages);
    }

    /// Pull a stale page back inside [1, total_pages] after the data shrank
    pub fn reconcile(&mut self, total_pages: usize) {
        self.page = pagination::reconcile_page(self.page, total_pages);
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct ViewResult<'a> {
    pub state: ViewState,
    pub page: Page<&'a Record>,
    pub filtered_count: usize,
    pub summary: GlobalSummary,
}

/// Filtered and ordered records: what the table pages over and what export writes
pub fn ordered_view<'a>(store: &'a RecordStore, state: &ViewState) -> Vec<&'a Record> {
    let filtered = filter_records(store.records(), &state.search, state.tier_filter);
    sort_records(&filtered, state.sort_key)
}

pub fn render<'a>(store: &'a RecordStore, state: &ViewState) -> ViewResult<'a> {
    let ordered = ordered_view(store, state);
    let page = pagination::paginate(&ordered, state.page);

    let mut state = state.clone();
    state.page = page.number;

    ViewResult {
        state,
        filtered_count: ordered.len(),
        page,
        summary: GlobalSummary::of_store(store),
    }
}
