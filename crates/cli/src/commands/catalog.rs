//! Catalog listing command.

use mercado_client::catalog::CatalogApi;
use mercado_client::{ApiClient, Result};

/// List every product in the catalog.
pub async fn list(api: ApiClient) -> Result<()> {
    let products = CatalogApi::new(api).list_products().await?;

    if products.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    for product in products {
        println!("{}  {}  R$ {}", product.id, product.name, product.price);
        if !product.description.is_empty() {
            println!("    {}", product.description);
        }
    }
    Ok(())
}
