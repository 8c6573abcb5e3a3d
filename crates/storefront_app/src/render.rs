use storefront_engine::{Collection, Product};

/// One terminal line per product: title and first variant price.
pub fn product_line(product: &Product) -> String {
    match product.price() {
        Some(price) => format!(
            "{} - {} {}",
            product.title, price.amount, price.currency_code
        ),
        None => product.title.clone(),
    }
}

pub fn collection_line(collection: &Collection) -> String {
    format!("{}  {}", collection.id, collection.title)
}
