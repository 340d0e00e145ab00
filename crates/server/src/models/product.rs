//! Product domain model.

use chrono::{DateTime, Utc};

use stocklist_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    /// Product's database ID.
    pub id: ProductId,
    /// Display name (at least 3 characters).
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Non-negative price.
    pub price: Price,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Validated data for inserting a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
}

/// Validated data for updating an existing product.
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
}
