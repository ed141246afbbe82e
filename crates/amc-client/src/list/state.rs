//! List state and the pure transitions applied to it.
//!
//! Every function here is synchronous and side-effect free so the controller
//! can run them inside a single `watch` update and tests can drive them
//! directly.

use amc_api_models::{EntityId, ListQuery, PaginationDto, StatusFilter};
use serde::Serialize;

use crate::list::entity::ListEntity;

/// Normalised pagination block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// One-based page index.
    pub current_page: u32,
    /// Total page count, at least 1.
    pub total_pages: u32,
    /// Total matching records across all pages.
    pub total_count: u64,
    /// Rows requested per page.
    pub page_size: u32,
}

impl Pagination {
    /// First page of an empty result.
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            page_size,
        }
    }

    /// Normalise a server pagination block. `page_size` is kept unless the
    /// server echoed a limit.
    #[must_use]
    pub fn from_dto(dto: PaginationDto, page_size: u32) -> Self {
        Self {
            current_page: dto.current_page.max(1),
            total_pages: dto.total_pages.max(1),
            total_count: dto.total,
            page_size: dto.limit.filter(|limit| *limit > 0).unwrap_or(page_size),
        }
    }
}

/// One page returned by a list source.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Rows on the page.
    pub items: Vec<T>,
    /// Server pagination block.
    pub pagination: PaginationDto,
}

/// What an in-flight mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    /// An entity that does not exist yet.
    New,
    /// An existing entity.
    Existing(EntityId),
}

/// Kind of in-flight mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Create.
    Create,
    /// Update.
    Update,
    /// Delete.
    Delete,
}

impl MutationKind {
    /// Stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A write awaiting its server response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationIntent {
    /// Entity targeted.
    pub target: MutationTarget,
    /// Operation.
    pub kind: MutationKind,
    /// Controller-assigned ticket used to retire this exact intent.
    pub ticket: u64,
}

/// Observable state of one paginated, filterable list.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityListState<T> {
    /// Rows from the newest successfully applied fetch, plus local patches.
    pub items: Vec<T>,
    /// Pagination for `items`.
    pub pagination: Pagination,
    /// Free-text search.
    pub search_text: String,
    /// Status filter.
    pub status_filter: StatusFilter,
    /// Whether the newest fetch is still outstanding.
    pub is_loading: bool,
    /// Message from the newest failed fetch.
    pub last_error: Option<String>,
    /// Guard for fetch results. Bumped by every fetch and every query change,
    /// so only a result issued for the current query can match it.
    pub request_seq: u64,
    /// Writes awaiting a response.
    pub pending_mutations: Vec<MutationIntent>,
}

impl<T> EntityListState<T> {
    /// Empty list on page 1 with no filters.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::first(page_size),
            search_text: String::new(),
            status_filter: StatusFilter::All,
            is_loading: false,
            last_error: None,
            request_seq: 0,
            pending_mutations: Vec::new(),
        }
    }

    /// Query for the current filters and page.
    #[must_use]
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.pagination.current_page,
            limit: self.pagination.page_size,
            search: self.search_text.clone(),
            status: self.status_filter,
        }
    }
}

/// Update the search text. Returns `false` when unchanged.
pub fn set_search<T>(state: &mut EntityListState<T>, text: &str) -> bool {
    if state.search_text == text {
        return false;
    }
    text.clone_into(&mut state.search_text);
    state.pagination.current_page = 1;
    retire_in_flight(state);
    true
}

/// Update the status filter. Returns `false` when unchanged.
pub fn set_status_filter<T>(state: &mut EntityListState<T>, filter: StatusFilter) -> bool {
    if state.status_filter == filter {
        return false;
    }
    state.status_filter = filter;
    state.pagination.current_page = 1;
    retire_in_flight(state);
    true
}

/// Move to `page` (clamped to at least 1). Returns `false` when unchanged.
pub fn set_page<T>(state: &mut EntityListState<T>, page: u32) -> bool {
    let page = page.max(1);
    if state.pagination.current_page == page {
        return false;
    }
    state.pagination.current_page = page;
    retire_in_flight(state);
    true
}

/// Change the page size (clamped to at least 1). Returns `false` when unchanged.
pub fn set_page_size<T>(state: &mut EntityListState<T>, page_size: u32) -> bool {
    let page_size = page_size.max(1);
    if state.pagination.page_size == page_size {
        return false;
    }
    state.pagination.page_size = page_size;
    state.pagination.current_page = 1;
    retire_in_flight(state);
    true
}

/// Results of fetches issued before a filter or page change describe a
/// different query and must not land.
const fn retire_in_flight<T>(state: &mut EntityListState<T>) {
    state.request_seq += 1;
}

/// Mark a fetch as issued and return its sequence number.
pub fn begin_fetch<T>(state: &mut EntityListState<T>) -> u64 {
    state.request_seq += 1;
    state.is_loading = true;
    state.last_error = None;
    state.request_seq
}

/// Apply a fetched page if `seq` is still the newest. Returns whether it was
/// applied.
pub fn apply_page<T>(state: &mut EntityListState<T>, seq: u64, page: Page<T>) -> bool {
    if seq != state.request_seq {
        return false;
    }
    state.pagination = Pagination::from_dto(page.pagination, state.pagination.page_size);
    state.items = page.items;
    state.is_loading = false;
    true
}

/// Record a failed fetch if `seq` is still the newest. Items and pagination
/// are kept. Returns whether it was applied.
pub fn apply_failure<T>(state: &mut EntityListState<T>, seq: u64, message: String) -> bool {
    if seq != state.request_seq {
        return false;
    }
    state.last_error = Some(message);
    state.is_loading = false;
    true
}

/// Prepend a created entity. The total count is left for the next fetch.
pub fn apply_create<T>(state: &mut EntityListState<T>, item: T) {
    state.items.insert(0, item);
}

/// Replace the entity with the same id, merging locally known relations.
/// Returns `false` when the id is not on the current page.
pub fn apply_update<T: ListEntity>(state: &mut EntityListState<T>, item: T) -> bool {
    let Some(slot) = state.items.iter_mut().find(|row| row.id() == item.id()) else {
        return false;
    };
    let merged = item.merge_update(slot);
    *slot = merged;
    true
}

/// Remove the entity with `id`. Returns `true` when the page emptied and the
/// controller stepped back a page, meaning a refetch is needed.
pub fn apply_delete<T: ListEntity>(state: &mut EntityListState<T>, id: EntityId) -> bool {
    let before = state.items.len();
    state.items.retain(|row| row.id() != id);
    if state.items.len() == before {
        return false;
    }
    if state.items.is_empty() && state.pagination.current_page > 1 {
        state.pagination.current_page -= 1;
        retire_in_flight(state);
        return true;
    }
    false
}

/// Record a write. Returns `true` when another write for the same existing
/// entity is already in flight.
pub fn begin_mutation<T>(state: &mut EntityListState<T>, intent: MutationIntent) -> bool {
    let duplicate = matches!(intent.target, MutationTarget::Existing(_))
        && state
            .pending_mutations
            .iter()
            .any(|pending| pending.target == intent.target);
    state.pending_mutations.push(intent);
    duplicate
}

/// Retire the write identified by `ticket`.
pub fn finish_mutation<T>(state: &mut EntityListState<T>, ticket: u64) {
    state.pending_mutations.retain(|intent| intent.ticket != ticket);
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_api_models::{AmcStatus, Charger};
    use amc_test_support::fixtures::charger;

    fn page_of(items: Vec<Charger>, current_page: u32, total_pages: u32) -> Page<Charger> {
        let total = items.len() as u64;
        Page {
            items,
            pagination: PaginationDto {
                current_page,
                total_pages,
                total,
                limit: None,
            },
        }
    }

    #[test]
    fn filter_changes_reset_page() {
        let mut state = EntityListState::<Charger>::new(10);
        assert!(set_page(&mut state, 4));
        assert!(set_status_filter(
            &mut state,
            StatusFilter::Only(AmcStatus::Active)
        ));
        assert_eq!(state.pagination.current_page, 1);

        assert!(set_page(&mut state, 2));
        assert!(set_search(&mut state, "acme"));
        assert_eq!(state.pagination.current_page, 1);

        assert!(set_page(&mut state, 2));
        assert!(set_page_size(&mut state, 25));
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.query().limit, 25);
    }

    #[test]
    fn unchanged_values_are_noops() {
        let mut state = EntityListState::<Charger>::new(10);
        assert!(!set_search(&mut state, ""));
        assert!(!set_status_filter(&mut state, StatusFilter::All));
        assert!(!set_page(&mut state, 1));
        assert!(!set_page(&mut state, 0));
        assert!(!set_page_size(&mut state, 10));
    }

    #[test]
    fn stale_pages_are_discarded() {
        let mut state = EntityListState::new(10);
        let older = begin_fetch(&mut state);
        let newer = begin_fetch(&mut state);

        assert!(apply_page(&mut state, newer, page_of(vec![charger(2, "CH-2", None)], 1, 1)));
        assert!(!apply_page(&mut state, older, page_of(vec![charger(1, "CH-1", None)], 1, 1)));
        assert!(!apply_failure(&mut state, older, "boom".to_string()));

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, 2);
        assert!(state.last_error.is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn query_changes_retire_fetches_in_flight() {
        let mut state = EntityListState::new(10);
        assert!(set_page(&mut state, 3));
        let on_page_three = begin_fetch(&mut state);
        assert!(set_status_filter(
            &mut state,
            StatusFilter::Only(AmcStatus::Active)
        ));
        assert!(!apply_page(
            &mut state,
            on_page_three,
            page_of(vec![charger(30, "CH-30", None)], 3, 5)
        ));
        assert!(state.items.is_empty());
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.query().page, 1);

        assert!(set_page(&mut state, 2));
        let on_page_two = begin_fetch(&mut state);
        assert!(set_page(&mut state, 3));
        assert!(!apply_failure(&mut state, on_page_two, "boom".to_string()));
        assert_eq!(state.pagination.current_page, 3);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn failures_keep_previous_rows() {
        let mut state = EntityListState::new(10);
        let seq = begin_fetch(&mut state);
        apply_page(&mut state, seq, page_of(vec![charger(1, "CH-1", None)], 2, 3));
        let seq = begin_fetch(&mut state);
        assert!(state.last_error.is_none());
        assert!(apply_failure(&mut state, seq, "Failed to fetch chargers".to_string()));

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.pagination.current_page, 2);
        assert_eq!(state.last_error.as_deref(), Some("Failed to fetch chargers"));
    }

    #[test]
    fn create_prepends_without_touching_total() {
        let mut state = EntityListState::new(10);
        let seq = begin_fetch(&mut state);
        apply_page(&mut state, seq, page_of(vec![charger(1, "CH-1", None)], 1, 1));
        apply_create(&mut state, charger(9, "CH-9", None));
        assert_eq!(state.items[0].id, 9);
        assert_eq!(state.pagination.total_count, 1);
    }

    #[test]
    fn update_of_missing_id_is_noop() {
        let mut state = EntityListState::new(10);
        state.items = vec![charger(1, "CH-1", None)];
        assert!(!apply_update(&mut state, charger(2, "CH-2", None)));
        assert_eq!(state.items, vec![charger(1, "CH-1", None)]);
    }

    #[test]
    fn deleting_last_row_steps_back_a_page() {
        let mut state = EntityListState::new(10);
        let seq = begin_fetch(&mut state);
        apply_page(&mut state, seq, page_of(vec![charger(7, "CH-7", None)], 3, 3));

        assert!(apply_delete(&mut state, 7));
        assert_eq!(state.pagination.current_page, 2);
        assert!(state.items.is_empty());
    }

    #[test]
    fn deleting_on_first_page_never_steps_back() {
        let mut state = EntityListState::new(10);
        state.items = vec![charger(7, "CH-7", None)];
        assert!(!apply_delete(&mut state, 7));
        assert_eq!(state.pagination.current_page, 1);
        assert!(!apply_delete(&mut state, 7));
    }

    #[test]
    fn duplicate_intents_are_flagged_and_retired_individually() {
        let mut state = EntityListState::<Charger>::new(10);
        let first = MutationIntent {
            target: MutationTarget::Existing(5),
            kind: MutationKind::Update,
            ticket: 1,
        };
        let second = MutationIntent { ticket: 2, ..first };
        let create = MutationIntent {
            target: MutationTarget::New,
            kind: MutationKind::Create,
            ticket: 3,
        };
        assert!(!begin_mutation(&mut state, first));
        assert!(begin_mutation(&mut state, second));
        assert!(!begin_mutation(&mut state, create));
        assert!(!begin_mutation(&mut state, MutationIntent { ticket: 4, ..create }));

        finish_mutation(&mut state, 1);
        assert_eq!(state.pending_mutations.len(), 3);
        assert_eq!(state.pending_mutations[0].ticket, 2);
    }

    #[test]
    fn pagination_prefers_echoed_limit() {
        let dto = PaginationDto {
            current_page: 0,
            total_pages: 0,
            total: 4,
            limit: Some(25),
        };
        let pagination = Pagination::from_dto(dto, 10);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.page_size, 25);
    }
}
