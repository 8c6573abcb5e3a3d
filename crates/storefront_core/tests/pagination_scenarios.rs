use pretty_assertions::assert_eq;
use storefront_core::{update, Effect, LoadError, LoaderState, Msg, Page, PageRequest, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Product {
    id: String,
}

fn product(id: &str) -> Product {
    Product { id: id.to_string() }
}

fn key_of(product: &Product) -> String {
    product.id.clone()
}

/// Plays the effects against a canned list of pages, like a consumer would
/// against a real client.
fn run(
    mut state: LoaderState<Product>,
    msg: Msg<Product>,
    pages: &mut Vec<Result<Page<Product>, LoadError>>,
    requests: &mut Vec<PageRequest>,
) -> LoaderState<Product> {
    let (next, effects) = update(state, msg);
    state = next;
    for effect in effects {
        match effect {
            Effect::FetchPage {
                generation,
                request,
            } => {
                requests.push(request);
                let result = pages.remove(0);
                let (next, _) = update(state, Msg::PageLoaded { generation, result });
                state = next;
            }
        }
    }
    state
}

#[test]
fn two_pages_with_overlap_end_exhausted() {
    let mut pages = vec![
        Ok(Page::with_next(vec![product("1"), product("2")], "c1")),
        Ok(Page::last(vec![product("2"), product("3")])),
    ];
    let mut requests = Vec::new();

    let state = LoaderState::new(key_of, None, SortDirection::Asc);
    let state = run(
        state,
        Msg::Initialize {
            filter: None,
            sort: SortDirection::Asc,
        },
        &mut pages,
        &mut requests,
    );
    let state = run(state, Msg::LoadMore, &mut pages, &mut requests);
    let state = run(state, Msg::LoadMore, &mut pages, &mut requests);

    assert_eq!(
        requests,
        vec![
            PageRequest {
                cursor: None,
                filter: None,
                sort: SortDirection::Asc,
            },
            PageRequest {
                cursor: Some("c1".to_string()),
                filter: None,
                sort: SortDirection::Asc,
            },
        ]
    );
    let view = state.view();
    assert_eq!(view.items, vec![product("1"), product("2"), product("3")]);
    assert!(!view.has_more);
    assert_eq!(view.cursor, None);
    assert!(!view.loading);
}

#[test]
fn failed_initial_fetch_surfaces_error_message() {
    let mut pages = vec![Err(LoadError::new("network down"))];
    let mut requests = Vec::new();

    let state = run(
        LoaderState::new(key_of, None, SortDirection::Asc),
        Msg::Initialize {
            filter: None,
            sort: SortDirection::Asc,
        },
        &mut pages,
        &mut requests,
    );

    let view = state.view();
    assert!(view.items.is_empty());
    assert!(!view.loading);
    assert_eq!(view.error.map(|e| e.message).as_deref(), Some("network down"));
}

#[test]
fn new_listing_starts_idle_until_initialized() {
    let state = LoaderState::new(key_of, Some("sale".to_string()), SortDirection::Desc);
    assert!(!state.is_loading());
    assert!(state.has_more());
    assert_eq!(state.generation(), 0);
    assert_eq!(
        state.next_request(),
        PageRequest {
            cursor: None,
            filter: Some("sale".to_string()),
            sort: SortDirection::Desc,
        }
    );
}
