//! Shopping cart operations and wire-shape reconciliation.
//!
//! The backend's cart contract has changed over time: older deployments
//! return items with a nested `produto` object, newer ones flatten snapshot
//! fields (`produtoId`, `precoUnitario`, `nome`, `quantidade`) onto the item
//! itself. [`RawCartItem`] accepts either (and the canonical camelCase form),
//! and [`RawCartItem::into_canonical`] always emits the one shape the rest of
//! the application sees.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use mercado_core::{CartItemId, Price, ProductId};

use crate::api::{ApiClient, RequestOptions};
use crate::catalog::Product;
use crate::error::Result;

/// Cart collection path.
const CART_PATH: &str = "/carrinho";

/// Display name used when no payload variant carried one.
pub(crate) const PLACEHOLDER_NAME: &str = "Item";

/// A cart line in canonical form: always a full product snapshot and a
/// quantity of at least one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    /// Always >= 1.
    pub quantity: u32,
}

/// A cart item as the backend actually sends it, in any of its observed
/// shapes. Every field is optional; [`Self::into_canonical`] fills the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCartItem {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default, alias = "produto")]
    product: Option<RawProduct>,
    #[serde(default, alias = "produtoId")]
    product_id: Option<String>,
    #[serde(default, alias = "nome")]
    name: Option<String>,
    #[serde(default, alias = "precoUnitario")]
    unit_price: Option<Value>,
    #[serde(default, alias = "quantidade")]
    quantity: Option<Value>,
}

/// Nested product payload inside the older cart-item shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default, alias = "nome")]
    name: Option<String>,
    #[serde(default, alias = "preco")]
    price: Option<Value>,
    #[serde(default, alias = "descricao")]
    description: Option<String>,
    #[serde(default, alias = "urlfoto")]
    photo_url: Option<String>,
}

impl RawCartItem {
    /// Reduce any accepted shape to the canonical [`CartItem`].
    ///
    /// Normalizing an already-canonical item is a fixed point.
    #[must_use]
    pub fn into_canonical(self) -> CartItem {
        let nested = self.product.unwrap_or_default();

        let product_id = nested
            .id
            .or(self.product_id)
            .unwrap_or_default();
        let name = nested
            .name
            .or(self.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
        let price = nested
            .price
            .or(self.unit_price)
            .as_ref()
            .map(Price::coerce)
            .unwrap_or_default();

        CartItem {
            id: CartItemId::new(self.id.unwrap_or_else(|| product_id.clone())),
            product: Product {
                id: ProductId::new(product_id),
                name,
                price,
                description: nested.description.unwrap_or_default(),
                photo_url: nested.photo_url.unwrap_or_default(),
            },
            quantity: coerce_quantity(self.quantity.as_ref()),
        }
    }

    /// Product identifier, whichever shape carried it.
    pub(crate) fn product_key(&self) -> Option<&str> {
        self.product
            .as_ref()
            .and_then(|product| product.id.as_deref())
            .or(self.product_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Display name, whichever shape carried a non-empty one.
    pub(crate) fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.product.as_ref().and_then(|p| p.name.as_deref()))
            .filter(|name| !name.is_empty())
    }

    /// Unit price for aggregation: snapshot field first, nested product
    /// price as fallback, zero when neither parses.
    pub(crate) fn unit_price(&self) -> Decimal {
        self.unit_price
            .as_ref()
            .or_else(|| self.product.as_ref().and_then(|p| p.price.as_ref()))
            .map(Price::coerce)
            .unwrap_or_default()
            .amount()
    }

    /// Quantity for aggregation: zero when missing or non-numeric.
    pub(crate) fn quantity_or_zero(&self) -> u64 {
        self.quantity
            .as_ref()
            .and_then(coerce_number)
            .filter(|q| q.is_finite() && *q >= 0.0)
            .map_or(0, |q| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    q as u64
                }
            })
    }
}

impl From<RawCartItem> for CartItem {
    fn from(raw: RawCartItem) -> Self {
        raw.into_canonical()
    }
}

/// Parse a JSON value as a number, accepting numeric strings.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Quantity for a canonical item: failures and zero both become one.
fn coerce_quantity(value: Option<&Value>) -> u32 {
    let Some(quantity) = value.and_then(coerce_number) else {
        return 1;
    };
    if !quantity.is_finite() || quantity < 1.0 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        quantity.min(f64::from(u32::MAX)) as u32
    }
}

/// Sum of `price * quantity` over canonical items.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Price {
    let total = items
        .iter()
        .map(|item| item.product.price.amount() * Decimal::from(item.quantity))
        .sum();
    Price::new(total)
}

/// Request body for adding a product to the cart.
#[derive(Serialize)]
struct AddItemRequest<'a> {
    #[serde(rename = "produtoId")]
    product_id: &'a str,
    #[serde(rename = "quantidade")]
    quantity: u32,
}

/// Request body for changing a line's quantity.
#[derive(Serialize)]
struct UpdateQuantityRequest {
    #[serde(rename = "quantidade")]
    quantity: u32,
}

/// Cart operations. All endpoints are protected; the shared request path
/// attaches the credential and reacts to rejections.
#[derive(Clone)]
pub struct CartApi {
    api: ApiClient,
}

impl CartApi {
    /// Create a cart handle over the shared client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the current user's cart, normalized.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self))]
    pub async fn fetch_items(&self) -> Result<Vec<CartItem>> {
        let raw: Vec<RawCartItem> = self
            .api
            .get_json(CART_PATH, &RequestOptions::returning_to(CART_PATH))
            .await?;
        Ok(raw.into_iter().map(RawCartItem::into_canonical).collect())
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(&self, product_id: &ProductId, quantity: NonZeroU32) -> Result<()> {
        let body = AddItemRequest {
            product_id: product_id.as_str(),
            quantity: quantity.get(),
        };
        self.api
            .post_json::<Value>(CART_PATH, &body, &RequestOptions::default())
            .await
            .map(drop)
    }

    /// Change the quantity on a cart line.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_quantity(
        &self,
        item_id: &CartItemId,
        quantity: NonZeroU32,
    ) -> Result<()> {
        let body = UpdateQuantityRequest {
            quantity: quantity.get(),
        };
        self.api
            .put_json::<Value>(
                &format!("{CART_PATH}/{item_id}"),
                &body,
                &RequestOptions::returning_to(CART_PATH),
            )
            .await
            .map(drop)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_item(&self, item_id: &CartItemId) -> Result<()> {
        self.api
            .delete(
                &format!("{CART_PATH}/{item_id}"),
                &RequestOptions::returning_to(CART_PATH),
            )
            .await
    }
}
