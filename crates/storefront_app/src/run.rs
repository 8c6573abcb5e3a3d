use std::sync::Arc;

use anyhow::bail;
use storefront_engine::{GraphqlClient, PagedCollectionLoader, Product};
use storefront_logging::{store_info, store_warn};

use crate::cli::Cli;
use crate::render::{collection_line, product_line};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = GraphqlClient::new(cli.settings())?;

    if cli.list_collections {
        let collections = client.fetch_collections().await?;
        for collection in &collections {
            println!("{}", collection_line(collection));
        }
        return Ok(());
    }

    let mut loader: PagedCollectionLoader<Product> = PagedCollectionLoader::start(
        Arc::new(client),
        Product::key,
        cli.collection.clone(),
        cli.sort.into(),
    );
    loader.settle().await;

    let mut pages = 1;
    while pages < cli.pages && loader.state().has_more() && loader.state().error().is_none() {
        loader.load_more();
        loader.settle().await;
        pages += 1;
    }

    let state = loader.state();
    for product in state.items() {
        println!("{}", product_line(product));
    }
    store_info!(
        "listed {} product(s) over {} page(s), more available: {}",
        state.items().len(),
        pages,
        state.has_more()
    );

    if let Some(err) = state.error() {
        store_warn!("listing ended with an error: {}", err);
        bail!("failed to load products: {err}");
    }
    Ok(())
}
