use crate::{LoadError, SortDirection};

/// Snapshot of a listing for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderView<T> {
    pub items: Vec<T>,
    pub cursor: Option<String>,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<LoadError>,
    pub filter: Option<String>,
    pub sort: SortDirection,
}
