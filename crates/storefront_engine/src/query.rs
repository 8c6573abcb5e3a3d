use storefront_core::PageRequest;

const PRODUCT_FIELDS: &str = "id title description featuredImage { id url } \
variants(first: 1) { edges { node { price { amount currencyCode } } } }";

/// Builds the catalog page query for `request`.
///
/// Without a filter the products connection is queried at the root; with one
/// it is nested under `collection(id: ...)`.
pub fn products_query(request: &PageRequest, page_size: u32) -> String {
    let mut args = vec![format!("first: {page_size}")];
    if let Some(cursor) = request.cursor.as_deref() {
        args.push(format!("after: {}", graphql_string(cursor)));
    }
    args.push("sortKey: TITLE".to_string());
    args.push(format!("reverse: {}", request.sort.is_reversed()));

    let products = format!(
        "products({}) {{ pageInfo {{ hasNextPage endCursor }} edges {{ node {{ {PRODUCT_FIELDS} }} }} }}",
        args.join(", ")
    );

    match request.filter.as_deref() {
        Some(collection_id) => format!(
            "{{ collection(id: {}) {{ {products} }} }}",
            graphql_string(collection_id)
        ),
        None => format!("{{ {products} }}"),
    }
}

pub fn collections_query(limit: u32) -> String {
    format!("{{ collections(first: {limit}) {{ edges {{ node {{ id title }} }} }} }}")
}

/// JSON path of the products connection inside `data` for `request`.
pub(crate) fn products_path(request: &PageRequest) -> &'static str {
    if request.filter.is_some() {
        "/collection/products"
    } else {
        "/products"
    }
}

/// Quotes `value` as a GraphQL string literal. JSON string escapes are a
/// subset of GraphQL's, so the JSON encoding is used as is.
fn graphql_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
