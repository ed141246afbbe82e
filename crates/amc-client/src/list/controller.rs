//! Debounced list synchronization with optimistic write patches.
//!
//! # Design
//! - State lives in a `watch` channel; every transition runs inside one
//!   `send_modify`/`send_if_modified` call so observers never see a torn
//!   update.
//! - Filter and page changes (re)start a debounce timer task. Only the last
//!   change inside the window fires, and the fetch runs in its own task so
//!   aborting a timer never cancels a request already on the wire.
//! - Each fetch takes a sequence number and query changes retire it; only a
//!   fetch issued for the current query may touch `items`, `pagination` or
//!   `last_error`.
//! - Writes for the same entity are not serialized. Overlaps are logged and
//!   each completion is applied in arrival order.
//!
//! Setters spawn tasks and must be called from within a Tokio runtime.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use amc_api_models::{EntityId, ListQuery, StatusFilter};
use amc_config::ListSettings;
use amc_telemetry::{FetchOutcomeLabel, Metrics};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::ApiResult;
use crate::list::entity::ListEntity;
use crate::list::source::ListSource;
use crate::list::state::{self, EntityListState, MutationIntent, MutationKind, MutationTarget};

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page replaced the list contents.
    Applied,
    /// A newer fetch was issued meanwhile; the result was dropped.
    Stale,
}

/// Owns the list state for one entity screen.
pub struct ListController<T: ListEntity> {
    inner: Arc<Inner<T>>,
}

struct Inner<T: ListEntity> {
    state: watch::Sender<EntityListState<T>>,
    source: Arc<dyn ListSource<T>>,
    debounce: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
    next_ticket: AtomicU64,
    metrics: Metrics,
}

impl<T: ListEntity> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Some(timer) = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            timer.abort();
        }
    }
}

impl<T: ListEntity> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ListEntity> std::fmt::Debug for ListController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("entity", &T::KIND)
            .field("debounce", &self.inner.debounce)
            .finish_non_exhaustive()
    }
}

impl<T: ListEntity> ListController<T> {
    /// Controller reading pages from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ListSource<T>>, settings: ListSettings, metrics: Metrics) -> Self {
        let (state, _) = watch::channel(EntityListState::new(settings.page_size));
        Self {
            inner: Arc::new(Inner {
                state,
                source,
                debounce: settings.debounce,
                timer: Mutex::new(None),
                next_ticket: AtomicU64::new(1),
                metrics,
            }),
        }
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EntityListState<T>> {
        self.inner.state.subscribe()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> EntityListState<T> {
        self.inner.state.borrow().clone()
    }

    /// Schedule the initial load after the debounce window.
    pub fn start(&self) {
        self.schedule_fetch();
    }

    /// Change the search text; resets to page 1.
    pub fn set_search(&self, text: impl Into<String>) {
        let text = text.into();
        self.apply_filter(|state| state::set_search(state, &text));
    }

    /// Change the status filter; resets to page 1.
    pub fn set_status(&self, filter: StatusFilter) {
        self.apply_filter(|state| state::set_status_filter(state, filter));
    }

    /// Move to another page.
    pub fn set_page(&self, page: u32) {
        self.apply_filter(|state| state::set_page(state, page));
    }

    /// Change the page size; resets to page 1.
    pub fn set_page_size(&self, page_size: u32) {
        self.apply_filter(|state| state::set_page_size(state, page_size));
    }

    /// Abort a pending debounced fetch, if any.
    pub fn cancel_pending(&self) {
        if let Some(timer) = self.timer_slot().take() {
            timer.abort();
        }
    }

    /// Fetch the current page immediately, bypassing the debounce.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when this was the newest request. A failure of
    /// a superseded request reports [`FetchOutcome::Stale`] instead.
    pub async fn refresh(&self) -> ApiResult<FetchOutcome> {
        let mut seq = 0;
        let mut query = ListQuery::default();
        self.inner.state.send_modify(|state| {
            seq = state::begin_fetch(state);
            query = state.query();
        });
        tracing::debug!(entity = T::KIND, seq, page = query.page, search = %query.search, status = %query.status, "list fetch issued");

        match self.inner.source.fetch_page(&query).await {
            Ok(page) => {
                let applied = self
                    .inner
                    .state
                    .send_if_modified(|state| state::apply_page(state, seq, page));
                Ok(self.record_fetch(seq, applied, FetchOutcomeLabel::Applied))
            }
            Err(err) => {
                let message = err.message_or(&format!("Failed to fetch {}", T::KIND));
                let applied = self
                    .inner
                    .state
                    .send_if_modified(|state| state::apply_failure(state, seq, message));
                if applied {
                    self.record_fetch(seq, true, FetchOutcomeLabel::Failed);
                    tracing::warn!(entity = T::KIND, seq, error = %err, "list fetch failed");
                    Err(err)
                } else {
                    Ok(self.record_fetch(seq, false, FetchOutcomeLabel::Failed))
                }
            }
        }
    }

    /// Run a create call and prepend its result on success.
    ///
    /// # Errors
    ///
    /// Returns the write error; the list is left untouched.
    pub async fn create<F>(&self, write: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>> + Send,
    {
        let ticket = self.begin_mutation(MutationTarget::New, MutationKind::Create);
        let result = write.await;
        self.inner.state.send_modify(|state| {
            state::finish_mutation(state, ticket);
            if let Ok(item) = &result {
                state::apply_create(state, item.clone());
            }
        });
        self.record_mutation(MutationKind::Create, result.is_ok());
        result
    }

    /// Run an update call and merge its result into the matching row.
    ///
    /// # Errors
    ///
    /// Returns the write error; the list is left untouched.
    pub async fn update<F>(&self, id: EntityId, write: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>> + Send,
    {
        let ticket = self.begin_mutation(MutationTarget::Existing(id), MutationKind::Update);
        let result = write.await;
        self.inner.state.send_modify(|state| {
            state::finish_mutation(state, ticket);
            if let Ok(item) = &result
                && !state::apply_update(state, item.clone())
            {
                tracing::debug!(entity = T::KIND, id, "updated row not on the current page");
            }
        });
        self.record_mutation(MutationKind::Update, result.is_ok());
        result
    }

    /// Run a delete call and drop the row on success. Emptying a page past the
    /// first steps back one page and schedules a refetch.
    ///
    /// # Errors
    ///
    /// Returns the write error; the list is left untouched.
    pub async fn delete<F>(&self, id: EntityId, write: F) -> ApiResult<()>
    where
        F: Future<Output = ApiResult<()>> + Send,
    {
        let ticket = self.begin_mutation(MutationTarget::Existing(id), MutationKind::Delete);
        let result = write.await;
        let mut refetch = false;
        self.inner.state.send_modify(|state| {
            state::finish_mutation(state, ticket);
            if result.is_ok() {
                refetch = state::apply_delete(state, id);
            }
        });
        self.record_mutation(MutationKind::Delete, result.is_ok());
        if refetch {
            self.schedule_fetch();
        }
        result
    }

    fn apply_filter(&self, change: impl FnOnce(&mut EntityListState<T>) -> bool) {
        if self.inner.state.send_if_modified(change) {
            self.schedule_fetch();
        }
    }

    fn schedule_fetch(&self) {
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let delay = self.inner.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let controller = ListController { inner };
            tokio::spawn(async move {
                // Errors are already recorded in `last_error`.
                let _ = controller.refresh().await;
            });
        });
        if let Some(previous) = self.timer_slot().replace(timer) {
            previous.abort();
        }
    }

    fn timer_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_mutation(&self, target: MutationTarget, kind: MutationKind) -> u64 {
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed);
        let intent = MutationIntent {
            target,
            kind,
            ticket,
        };
        let mut duplicate = false;
        self.inner.state.send_modify(|state| {
            duplicate = state::begin_mutation(state, intent);
        });
        if duplicate {
            tracing::warn!(
                entity = T::KIND,
                ?target,
                kind = kind.as_str(),
                "another write for this entity is still in flight"
            );
        }
        ticket
    }

    fn record_fetch(&self, seq: u64, applied: bool, label: FetchOutcomeLabel) -> FetchOutcome {
        if applied {
            self.inner.metrics.inc_list_fetch(T::KIND, label);
            FetchOutcome::Applied
        } else {
            self.inner
                .metrics
                .inc_list_fetch(T::KIND, FetchOutcomeLabel::Stale);
            tracing::debug!(entity = T::KIND, seq, "stale list result discarded");
            FetchOutcome::Stale
        }
    }

    fn record_mutation(&self, kind: MutationKind, succeeded: bool) {
        if succeeded {
            self.inner.metrics.inc_mutation(T::KIND, kind.as_str());
        }
    }
}
