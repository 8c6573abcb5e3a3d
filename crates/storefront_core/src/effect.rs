use crate::{Generation, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one page query; the completion must come back as
    /// `Msg::PageLoaded` carrying the same generation.
    FetchPage {
        generation: Generation,
        request: PageRequest,
    },
}
