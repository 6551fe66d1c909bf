//! Shopping cart commands.

use std::num::NonZeroU32;

use mercado_client::cart::{CartApi, cart_total};
use mercado_client::{ApiClient, Result};
use mercado_core::{CartItemId, ProductId};

/// Show the cart and its total.
pub async fn show(api: ApiClient) -> Result<()> {
    let items = CartApi::new(api).fetch_items().await?;

    if items.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for item in &items {
        println!(
            "{}  {} x{}  R$ {}",
            item.id, item.product.name, item.quantity, item.product.price
        );
    }
    println!("Total: R$ {}", cart_total(&items));
    Ok(())
}

/// Add a product to the cart.
pub async fn add(api: ApiClient, product_id: &str, quantity: NonZeroU32) -> Result<()> {
    CartApi::new(api)
        .add_item(&ProductId::new(product_id), quantity)
        .await?;
    println!("Added {quantity} x {product_id} to the cart.");
    Ok(())
}

/// Set the quantity on a cart line.
pub async fn set_quantity(api: ApiClient, item_id: &str, quantity: NonZeroU32) -> Result<()> {
    CartApi::new(api)
        .update_quantity(&CartItemId::new(item_id), quantity)
        .await?;
    println!("Updated {item_id} to x{quantity}.");
    Ok(())
}

/// Remove a line from the cart.
pub async fn remove(api: ApiClient, item_id: &str) -> Result<()> {
    CartApi::new(api)
        .remove_item(&CartItemId::new(item_id))
        .await?;
    println!("Removed {item_id} from the cart.");
    Ok(())
}
