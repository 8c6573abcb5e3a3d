#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::{Match, Request};

/// Matches GraphQL posts whose `query` text does (or does not) contain a
/// fragment.
pub struct QueryContains {
    fragment: &'static str,
    expected: bool,
}

impl QueryContains {
    pub fn yes(fragment: &'static str) -> Self {
        Self {
            fragment,
            expected: true,
        }
    }

    pub fn no(fragment: &'static str) -> Self {
        Self {
            fragment,
            expected: false,
        }
    }
}

impl Match for QueryContains {
    fn matches(&self, request: &Request) -> bool {
        query_of(request).contains(self.fragment) == self.expected
    }
}

pub fn query_of(request: &Request) -> String {
    let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
    body["query"].as_str().unwrap_or_default().to_string()
}

pub fn product_node(id: &str, amount: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "featuredImage": { "url": format!("http://image{id}.jpg") },
        "variants": { "edges": [
            { "node": { "price": { "amount": amount, "currencyCode": "USD" } } }
        ] }
    })
}

pub fn products_connection(ids: &[&str], end_cursor: Option<&str>, has_next: bool) -> Value {
    let edges: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "node": product_node(id, "10.00") }))
        .collect();
    json!({
        "pageInfo": { "hasNextPage": has_next, "endCursor": end_cursor },
        "edges": edges
    })
}
