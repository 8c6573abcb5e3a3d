//! Storefront core: pure paged-listing state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod page;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::LoadError;
pub use msg::Msg;
pub use page::{Generation, Page, PageRequest, SortDirection};
pub use state::{KeyFn, LoaderState};
pub use update::update;
pub use view_model::LoaderView;
