use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use storefront_core::{
    update, Effect, Generation, LoadError, LoaderState, LoaderView, Msg, Page,
    PageRequest, SortDirection,
};
use storefront_logging::{store_debug, store_error, store_warn};
use tokio::task::{Id, JoinError, JoinSet};

use crate::{FailureKind, FetchError, QueryClient};

type Completion<T> = (Generation, Result<Page<T>, FetchError>);

/// Paginated, deduplicated listing backed by a [`QueryClient`].
///
/// All state changes happen on `&mut self`. Fetches run as tokio tasks and
/// are only applied when the owner drains them with [`Self::process_pending`],
/// [`Self::wait_next`] or [`Self::settle`]. Results of superseded listings
/// are dropped on arrival; the requests themselves are not aborted. A task
/// that is cancelled before it reports back is applied as a failure of the
/// generation it was spawned for.
///
/// Methods that start a fetch must be called from within a tokio runtime.
pub struct PagedCollectionLoader<T> {
    client: Arc<dyn QueryClient<T>>,
    state: LoaderState<T>,
    pending: JoinSet<Completion<T>>,
    generations: HashMap<Id, Generation>,
}

impl<T: Send + 'static> PagedCollectionLoader<T> {
    /// Creates an idle loader; nothing is fetched until [`Self::initialize`].
    pub fn new(
        client: Arc<dyn QueryClient<T>>,
        key_of: impl Fn(&T) -> String + Send + Sync + 'static,
        filter: Option<String>,
        sort: SortDirection,
    ) -> Self {
        Self {
            client,
            state: LoaderState::new(key_of, filter, sort),
            pending: JoinSet::new(),
            generations: HashMap::new(),
        }
    }

    /// Creates a loader and immediately requests the first page.
    pub fn start(
        client: Arc<dyn QueryClient<T>>,
        key_of: impl Fn(&T) -> String + Send + Sync + 'static,
        filter: Option<String>,
        sort: SortDirection,
    ) -> Self {
        let mut loader = Self::new(client, key_of, filter.clone(), sort);
        loader.initialize(filter, sort);
        loader
    }

    /// Replaces the listing with a fresh one for `(filter, sort)` and
    /// requests its first page.
    pub fn initialize(&mut self, filter: Option<String>, sort: SortDirection) {
        self.dispatch(Msg::Initialize { filter, sort });
    }

    /// Requests the next page. Ignored while a fetch is in flight or once the
    /// listing is exhausted.
    pub fn load_more(&mut self) {
        self.dispatch(Msg::LoadMore);
    }

    pub fn state(&self) -> &LoaderState<T> {
        &self.state
    }

    pub fn view(&self) -> LoaderView<T>
    where
        T: Clone,
    {
        self.state.view()
    }

    /// Number of spawned fetches not yet drained, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Applies every fetch that has already finished without waiting.
    /// Returns how many completions were drained.
    pub fn process_pending(&mut self) -> usize {
        let mut drained = 0;
        while let Some(joined) = self.pending.try_join_next_with_id() {
            self.complete(joined);
            drained += 1;
        }
        drained
    }

    /// Waits for the next fetch to finish and applies it. Returns false if
    /// nothing was in flight.
    pub async fn wait_next(&mut self) -> bool {
        match self.pending.join_next_with_id().await {
            Some(joined) => {
                self.complete(joined);
                true
            }
            None => false,
        }
    }

    /// Waits until every spawned fetch has finished and been applied.
    pub async fn settle(&mut self) {
        while self.wait_next().await {}
    }

    fn dispatch(&mut self, msg: Msg<T>) {
        let placeholder = LoaderState::with_key_fn(self.state.key_fn(), None, SortDirection::Asc);
        let state = std::mem::replace(&mut self.state, placeholder);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchPage {
                generation,
                request,
            } => {
                store_debug!(
                    "fetch_page generation={} cursor={:?} filter={:?} sort={}",
                    generation,
                    request.cursor,
                    request.filter,
                    request.sort
                );
                let client = Arc::clone(&self.client);
                let handle = self
                    .pending
                    .spawn(async move { (generation, fetch_guarded(client, request).await) });
                self.generations.insert(handle.id(), generation);
            }
        }
    }

    fn complete(&mut self, joined: Result<(Id, Completion<T>), JoinError>) {
        match joined {
            Ok((id, (generation, result))) => {
                self.generations.remove(&id);
                if let Err(err) = &result {
                    store_warn!(
                        "fetch for generation={} failed ({}): {}",
                        generation,
                        err.kind,
                        err
                    );
                }
                self.dispatch(Msg::PageLoaded {
                    generation,
                    result: result.map_err(LoadError::from),
                });
            }
            Err(err) => {
                let Some(generation) = self.generations.remove(&err.id()) else {
                    store_error!("untracked fetch task did not complete: {}", err);
                    return;
                };
                store_error!(
                    "fetch task for generation={} did not complete: {}",
                    generation,
                    err
                );
                self.dispatch(Msg::PageLoaded {
                    generation,
                    result: Err(LoadError::new(format!("fetch task did not complete: {err}"))),
                });
            }
        }
    }
}

/// Runs one query, turning a panicking client into an ordinary failure so
/// the listing never stays stuck in the loading state.
async fn fetch_guarded<T: 'static>(
    client: Arc<dyn QueryClient<T>>,
    request: PageRequest,
) -> Result<Page<T>, FetchError> {
    match AssertUnwindSafe(client.fetch_page(&request))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(_) => Err(FetchError::new(
            FailureKind::ClientPanicked,
            "query client panicked",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item(String);

    /// Never answers the first request; later ones get a single item.
    #[derive(Default)]
    struct StallingClient {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl QueryClient<Item> for StallingClient {
        async fn fetch_page(&self, _request: &PageRequest) -> Result<Page<Item>, FetchError> {
            use std::sync::atomic::Ordering;
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(Page::last(vec![Item("1".to_string())]))
        }
    }

    #[tokio::test]
    async fn cancelled_fetch_is_recorded_as_failure() {
        storefront_logging::initialize_for_tests();
        let mut loader = PagedCollectionLoader::start(
            Arc::new(StallingClient::default()),
            |item: &Item| item.0.clone(),
            None,
            SortDirection::Asc,
        );
        assert!(loader.state().is_loading());

        loader.pending.abort_all();
        loader.settle().await;

        assert!(!loader.state().is_loading());
        let message = loader.state().error().map(ToString::to_string);
        assert!(message.is_some_and(|m| m.starts_with("fetch task did not complete")));
        assert!(loader.generations.is_empty());

        // Failed initial fetch keeps has_more, so load_more retries the first page.
        loader.load_more();
        loader.settle().await;
        assert_eq!(loader.state().items(), &[Item("1".to_string())]);
        assert_eq!(loader.state().error(), None);
    }

    #[tokio::test]
    async fn cancelled_stale_fetch_leaves_current_listing_alone() {
        storefront_logging::initialize_for_tests();
        let mut loader = PagedCollectionLoader::start(
            Arc::new(StallingClient::default()),
            |item: &Item| item.0.clone(),
            None,
            SortDirection::Asc,
        );
        loader.initialize(Some("hats".to_string()), SortDirection::Desc);
        assert_eq!(loader.generations.len(), 2);

        // Only the fresh listing can finish; the stale fetch stalls.
        assert!(loader.wait_next().await);
        assert_eq!(loader.state().items(), &[Item("1".to_string())]);
        loader.pending.abort_all();
        loader.settle().await;
        assert_eq!(loader.state().items(), &[Item("1".to_string())]);
        assert_eq!(loader.state().error(), None);
    }
}
