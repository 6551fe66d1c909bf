//! Product catalog operations.
//!
//! Listing is world-readable; create/update/delete are admin-only by
//! convention and enforced server-side. All calls ride the shared request
//! path, so a present credential is attached automatically.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use mercado_core::{Price, ProductId};
use rust_decimal::Decimal;

use crate::api::{ApiClient, RequestOptions};
use crate::error::Result;

/// Catalog collection path.
const PRODUCTS_PATH: &str = "/produtos";

/// A catalog product.
///
/// The wire form uses the backend's Portuguese field names
/// (`_id`/`nome`/`preco`/`descricao`/`urlfoto`); the canonical form is
/// camelCase. Both deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    #[serde(default, alias = "nome")]
    pub name: String,
    #[serde(default, alias = "preco")]
    pub price: Price,
    #[serde(default, alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "urlfoto")]
    pub photo_url: String,
}

/// Fields for creating or replacing a product. Serializes to the backend's
/// field names.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: Decimal,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "urlfoto")]
    pub photo_url: String,
}

/// Catalog operations.
#[derive(Clone)]
pub struct CatalogApi {
    api: ApiClient,
}

impl CatalogApi {
    /// Create a catalog handle over the shared client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.api
            .get_json(PRODUCTS_PATH, &RequestOptions::default())
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self, input), fields(product = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        self.api
            .post_json(PRODUCTS_PATH, input, &RequestOptions::default())
            .await
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update_product(&self, id: &ProductId, input: &ProductInput) -> Result<Product> {
        self.api
            .put_json(
                &format!("{PRODUCTS_PATH}/{id}"),
                input,
                &RequestOptions::default(),
            )
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ClientError`] on failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.api
            .delete(&format!("{PRODUCTS_PATH}/{id}"), &RequestOptions::default())
            .await
    }
}
