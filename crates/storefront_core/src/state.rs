use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use storefront_logging::store_debug;

use crate::view_model::LoaderView;
use crate::{Generation, LoadError, Page, PageRequest, SortDirection};

/// Extracts the stable unique key of an item.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Pagination state for one filterable, sortable listing.
///
/// `items` holds each key at most once, in arrival order; `seen` mirrors the
/// keys of `items` so merges do not rescan the list.
#[derive(Clone)]
pub struct LoaderState<T> {
    key_of: KeyFn<T>,
    generation: Generation,
    filter: Option<String>,
    sort: SortDirection,
    items: Vec<T>,
    seen: HashSet<String>,
    cursor: Option<String>,
    has_more: bool,
    loading: bool,
    error: Option<LoadError>,
}

impl<T: fmt::Debug> fmt::Debug for LoaderState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderState")
            .field("generation", &self.generation)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("items", &self.items)
            .field("cursor", &self.cursor)
            .field("has_more", &self.has_more)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> LoaderState<T> {
    /// Creates an idle listing for `(filter, sort)`. Nothing is fetched until
    /// `Msg::Initialize` is applied.
    pub fn new(
        key_of: impl Fn(&T) -> String + Send + Sync + 'static,
        filter: Option<String>,
        sort: SortDirection,
    ) -> Self {
        Self::with_key_fn(Arc::new(key_of), filter, sort)
    }

    /// Like [`Self::new`], sharing an already boxed extractor.
    pub fn with_key_fn(key_of: KeyFn<T>, filter: Option<String>, sort: SortDirection) -> Self {
        Self {
            key_of,
            generation: 0,
            filter,
            sort,
            items: Vec::new(),
            seen: HashSet::new(),
            cursor: None,
            has_more: true,
            loading: false,
            error: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn sort(&self) -> SortDirection {
        self.sort
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn key_fn(&self) -> KeyFn<T> {
        Arc::clone(&self.key_of)
    }

    /// The query that would fetch the next page from the current position.
    pub fn next_request(&self) -> PageRequest {
        PageRequest {
            cursor: self.cursor.clone(),
            filter: self.filter.clone(),
            sort: self.sort,
        }
    }

    pub fn view(&self) -> LoaderView<T>
    where
        T: Clone,
    {
        LoaderView {
            items: self.items.clone(),
            cursor: self.cursor.clone(),
            has_more: self.has_more,
            loading: self.loading,
            error: self.error.clone(),
            filter: self.filter.clone(),
            sort: self.sort,
        }
    }

    /// Replaces the listing with a fresh one for `(filter, sort)` and marks
    /// it loading. Returns the new generation.
    pub(crate) fn reset(&mut self, filter: Option<String>, sort: SortDirection) -> Generation {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            loading: true,
            ..Self::with_key_fn(self.key_fn(), filter, sort)
        };
        generation
    }

    /// Marks the next page as in flight, or returns `None` when a fetch is
    /// already running or the listing is exhausted.
    pub(crate) fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(self.next_request())
    }

    /// Applies a successful page. Items whose key is already present are
    /// dropped; the rest are appended in arrival order.
    pub(crate) fn apply_page(&mut self, page: Page<T>) {
        let before = self.items.len();
        let received = page.items.len();
        for item in page.items {
            if self.seen.insert((self.key_of)(&item)) {
                self.items.push(item);
            }
        }
        let dropped = received - (self.items.len() - before);
        if dropped > 0 {
            store_debug!(
                "generation={} dropped {} duplicate item(s) of {}",
                self.generation,
                dropped,
                received
            );
        }

        self.has_more = page.has_more;
        self.cursor = if page.has_more { page.next_cursor } else { None };
        self.loading = false;
        self.error = None;
    }

    /// Records a failed fetch. Items, cursor and `has_more` keep their
    /// pre-fetch values; after a failed initial fetch that means an empty
    /// listing that still reports more pages.
    pub(crate) fn apply_failure(&mut self, error: LoadError) {
        self.error = Some(error);
        self.loading = false;
    }
}
