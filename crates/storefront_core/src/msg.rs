use crate::{Generation, LoadError, Page, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<T> {
    /// Consumer selected a (new) filter/sort pair; replaces the listing.
    Initialize {
        filter: Option<String>,
        sort: SortDirection,
    },
    /// Consumer asked for the next page.
    LoadMore,
    /// A page query finished.
    PageLoaded {
        generation: Generation,
        result: Result<Page<T>, LoadError>,
    },
}
