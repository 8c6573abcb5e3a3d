use storefront_logging::{store_debug, store_warn};

use crate::{Effect, LoaderState, Msg, PageRequest};

/// Pure update function: applies a message to state and returns any effects.
pub fn update<T>(mut state: LoaderState<T>, msg: Msg<T>) -> (LoaderState<T>, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize { filter, sort } => {
            let generation = state.reset(filter.clone(), sort);
            store_debug!(
                "initialize generation={} filter={:?} sort={}",
                generation,
                filter,
                sort
            );
            vec![Effect::FetchPage {
                generation,
                request: PageRequest {
                    cursor: None,
                    filter,
                    sort,
                },
            }]
        }
        Msg::LoadMore => match state.begin_load_more() {
            Some(request) => vec![Effect::FetchPage {
                generation: state.generation(),
                request,
            }],
            None => {
                store_debug!(
                    "load_more ignored (loading={} has_more={})",
                    state.is_loading(),
                    state.has_more()
                );
                Vec::new()
            }
        },
        Msg::PageLoaded { generation, result } => {
            if generation != state.generation() {
                store_debug!(
                    "discarding stale page for generation={} (current={})",
                    generation,
                    state.generation()
                );
                return (state, Vec::new());
            }
            if !state.is_loading() {
                store_warn!(
                    "page for generation={} arrived with no fetch in flight",
                    generation
                );
                return (state, Vec::new());
            }
            match result {
                Ok(page) => state.apply_page(page),
                Err(error) => {
                    store_debug!("generation={} fetch failed: {}", generation, error);
                    state.apply_failure(error);
                }
            }
            Vec::new()
        }
    };

    (state, effects)
}
