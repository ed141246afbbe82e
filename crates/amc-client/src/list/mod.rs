//! Paginated, filterable list synchronization.

pub mod controller;
pub mod entity;
pub mod source;
pub mod state;

pub use controller::{FetchOutcome, ListController};
pub use entity::ListEntity;
pub use source::ListSource;
pub use state::{EntityListState, MutationIntent, MutationKind, MutationTarget, Page, Pagination};

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted list source whose replies are released by the test.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, PoisonError};

    use amc_api_models::{ListQuery, PaginationDto};
    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::{ListEntity, ListSource, Page};
    use crate::error::{ApiError, ApiResult};

    type Reply<T> = oneshot::Receiver<ApiResult<Page<T>>>;

    pub(crate) struct ManualSource<T> {
        calls: Mutex<Vec<ListQuery>>,
        replies: Mutex<VecDeque<Reply<T>>>,
    }

    impl<T: ListEntity> ManualSource<T> {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(VecDeque::new()),
            })
        }

        /// Queue a reply the next call resolves with once the sender fires.
        pub(crate) fn expect_call(&self) -> oneshot::Sender<ApiResult<Page<T>>> {
            let (tx, rx) = oneshot::channel();
            self.replies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(rx);
            tx
        }

        /// Queue a reply that is ready immediately.
        pub(crate) fn reply(&self, result: ApiResult<Page<T>>) {
            let _ = self.expect_call().send(result);
        }

        pub(crate) fn calls(&self) -> Vec<ListQuery> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    #[async_trait]
    impl<T: ListEntity> ListSource<T> for ManualSource<T> {
        async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<T>> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(query.clone());
            let reply = self
                .replies
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            let unscripted = || ApiError::Http {
                status: 599,
                message: "unscripted fetch".to_string(),
            };
            match reply {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(unscripted())),
                None => Err(unscripted()),
            }
        }
    }

    pub(crate) fn page<T>(items: Vec<T>, current_page: u32, total_pages: u32) -> Page<T> {
        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
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
}
