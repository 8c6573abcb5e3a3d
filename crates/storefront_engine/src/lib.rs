//! Storefront engine: GraphQL catalog client and the async listing loader.
mod client;
mod loader;
mod model;
mod query;
mod types;

pub use client::{GraphqlClient, GraphqlSettings, QueryClient};
pub use loader::PagedCollectionLoader;
pub use model::{Collection, Connection, Edge, Image, Money, PageInfo, Product, Variant};
pub use query::{collections_query, products_query};
pub use types::{FailureKind, FetchError};
