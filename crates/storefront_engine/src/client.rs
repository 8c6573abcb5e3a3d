use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_core::{Page, PageRequest};
use storefront_logging::{store_debug, store_warn};

use crate::query::{collections_query, products_path, products_query};
use crate::{Collection, Connection, FailureKind, FetchError, Product};

#[derive(Debug, Clone)]
pub struct GraphqlSettings {
    pub endpoint: String,
    pub page_size: u32,
    pub collections_limit: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for GraphqlSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://mock.shop/api".to_string(),
            page_size: 8,
            collections_limit: 10,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Source of listing pages. The loader only ever talks to this trait.
#[async_trait::async_trait]
pub trait QueryClient<T>: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>, FetchError>;
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Catalog client posting query documents to a single GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    settings: GraphqlSettings,
    endpoint: reqwest::Url,
    http: reqwest::Client,
}

impl GraphqlClient {
    pub fn new(settings: GraphqlSettings) -> Result<Self, FetchError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            http,
        })
    }

    pub fn settings(&self) -> &GraphqlSettings {
        &self.settings
    }

    /// Lists the collections a catalog listing can be filtered by.
    pub async fn fetch_collections(&self) -> Result<Vec<Collection>, FetchError> {
        let query = collections_query(self.settings.collections_limit);
        let data = self.execute(&query).await?;
        let collections = match data.get("collections") {
            Some(value) if !value.is_null() => value.clone(),
            _ => {
                return Err(FetchError::missing(
                    "data.collections",
                    "No collections returned",
                ))
            }
        };
        let connection: Connection<Collection> = decode(collections)?;
        Ok(connection.into_nodes())
    }

    /// Posts `query` and returns the `data` member of the response.
    pub async fn execute(&self, query: &str) -> Result<Value, FetchError> {
        store_debug!("POST {} query_len={}", self.endpoint, query.len());
        let body = serde_json::to_vec(&GraphqlRequest { query })
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            store_warn!("{} answered {}", self.endpoint, status);
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        let envelope: GraphqlResponse = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

        if !envelope.errors.is_empty() {
            let messages: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
            store_warn!("graphql errors: {:?}", messages);
            return Err(FetchError::new(
                FailureKind::GraphqlErrors,
                messages.join("; "),
            ));
        }

        match envelope.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(FetchError::missing("data", "response carried no data")),
        }
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl QueryClient<Product> for GraphqlClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Product>, FetchError> {
        let query = products_query(request, self.settings.page_size);
        let data = self.execute(&query).await?;
        products_page(&data, request)
    }
}

/// Unwraps the products connection for `request` out of a `data` value.
fn products_page(data: &Value, request: &PageRequest) -> Result<Page<Product>, FetchError> {
    let pointer = products_path(request);
    let dotted = format!("data{}", pointer.replace('/', "."));
    let connection = match data.pointer(pointer) {
        Some(value) if !value.is_null() => value.clone(),
        _ => {
            return Err(FetchError::missing(
                &dotted,
                format!("no products returned at {dotted}"),
            ))
        }
    };

    let Connection { edges, page_info } = decode::<Connection<Product>>(connection)?;
    let page_info = page_info.ok_or_else(|| {
        FetchError::missing(
            &format!("{dotted}.pageInfo"),
            format!("no page info returned at {dotted}"),
        )
    })?;

    Ok(Page {
        items: edges.into_iter().map(|edge| edge.node).collect(),
        next_cursor: page_info.end_cursor,
        has_more: page_info.has_next_page,
    })
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storefront_core::SortDirection;

    use super::*;

    fn node(id: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "featuredImage": { "url": format!("https://img/{id}.jpg") },
            "variants": { "edges": [
                { "node": { "price": { "amount": "10.00", "currencyCode": "USD" } } }
            ] }
        })
    }

    #[test]
    fn unwraps_root_products_connection() {
        let data = json!({
            "products": {
                "pageInfo": { "hasNextPage": true, "endCursor": "c1" },
                "edges": [ { "node": node("1") }, { "node": node("2") } ]
            }
        });
        let page = products_page(&data, &PageRequest::default()).unwrap();
        let ids: Vec<_> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(page.next_cursor.as_deref(), Some("c1"));
        assert!(page.has_more);
        assert_eq!(page.items[0].price().unwrap().amount, "10.00");
    }

    #[test]
    fn null_collection_is_missing_data() {
        let request = PageRequest {
            cursor: None,
            filter: Some("gid://unknown".to_string()),
            sort: SortDirection::Asc,
        };
        let err = products_page(&json!({ "collection": null }), &request).unwrap_err();
        assert_eq!(
            err.kind,
            FailureKind::MissingData {
                path: "data.collection.products".to_string()
            }
        );
    }

    #[test]
    fn missing_page_info_is_reported() {
        let data = json!({ "products": { "edges": [] } });
        let err = products_page(&data, &PageRequest::default()).unwrap_err();
        assert_eq!(
            err.kind,
            FailureKind::MissingData {
                path: "data.products.pageInfo".to_string()
            }
        );
    }
}
