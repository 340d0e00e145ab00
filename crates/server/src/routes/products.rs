//! Product CRUD route handlers.
//!
//! Every handler requires authentication. Form state travels in a
//! request-scoped [`ProductForm`] of raw strings; stored products are only
//! written after validation succeeds, so a failed submission never leaves a
//! half-modified entity behind.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use stocklist_core::{Price, PriceError, ProductId};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{Flash, FlashLevel, push_flash, take_flashes};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, NewProduct, Product, ProductChanges};
use crate::state::AppState;

/// Minimum length of a product name.
const MIN_NAME_LENGTH: usize = 3;

// =============================================================================
// Form Types
// =============================================================================

/// Raw product form data, preserved verbatim across failed submissions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
}

impl ProductForm {
    /// Build a form pre-filled from a stored product.
    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
        }
    }

    /// Validate the form, yielding data ready for persistence.
    ///
    /// Checks run in order: name, price presence, price format, price sign.
    /// The first failure wins.
    fn validate(&self) -> std::result::Result<(String, Option<String>, Price), &'static str> {
        if self.name.chars().count() < MIN_NAME_LENGTH {
            return Err("The product name must be at least 3 characters.");
        }

        let price = match Price::parse(&self.price) {
            Ok(price) => price,
            Err(PriceError::Empty) => return Err("The price is required."),
            Err(PriceError::Invalid) => return Err("The price must be a valid number."),
            Err(PriceError::Negative) => return Err("The price cannot be negative."),
        };

        let description = if self.description.trim().is_empty() {
            None
        } else {
            Some(self.description.clone())
        };

        Ok((self.name.clone(), description, price))
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct IndexTemplate {
    pub flashes: Vec<Flash>,
    pub current_user: Option<CurrentUser>,
    pub products: Vec<Product>,
}

/// Product create form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/create.html")]
pub struct CreateTemplate {
    pub flashes: Vec<Flash>,
    pub current_user: Option<CurrentUser>,
    pub form: ProductForm,
}

/// Product edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/edit.html")]
pub struct EditTemplate {
    pub flashes: Vec<Flash>,
    pub current_user: Option<CurrentUser>,
    pub product_id: ProductId,
    pub form: ProductForm,
}

// =============================================================================
// Listing
// =============================================================================

/// Display all products, oldest first.
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let products = state.products().list().await?;

    Ok(IndexTemplate {
        flashes: take_flashes(&session).await,
        current_user: Some(user),
        products,
    }
    .into_response())
}

// =============================================================================
// Create
// =============================================================================

/// Display the product create form.
pub async fn create_page(RequireAuth(user): RequireAuth, session: Session) -> Response {
    CreateTemplate {
        flashes: take_flashes(&session).await,
        current_user: Some(user),
        form: ProductForm::default(),
    }
    .into_response()
}

/// Handle product create form submission.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Response {
    let (name, description, price) = match form.validate() {
        Ok(valid) => valid,
        Err(message) => return create_failure(&session, user, form, message).await,
    };

    let new_product = NewProduct {
        name,
        description,
        price,
    };

    match state.products().insert(&new_product).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product created");

            if let Err(e) =
                push_flash(&session, FlashLevel::Success, "Product created successfully.").await
            {
                tracing::error!("Failed to queue flash message: {}", e);
            }

            Redirect::to("/products").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create product: {}", e);
            create_failure(&session, user, form, format!("Error creating the product: {e}")).await
        }
    }
}

/// Re-render the create form with a danger flash and the submitted values.
async fn create_failure(
    session: &Session,
    user: CurrentUser,
    form: ProductForm,
    message: impl Into<String>,
) -> Response {
    let mut flashes = take_flashes(session).await;
    flashes.push(Flash {
        message: message.into(),
        level: FlashLevel::Danger,
    });

    CreateTemplate {
        flashes,
        current_user: Some(user),
        form,
    }
    .into_response()
}

// =============================================================================
// Edit
// =============================================================================

/// Display the product edit form, pre-filled from the stored product.
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let product = state
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(EditTemplate {
        flashes: take_flashes(&session).await,
        current_user: Some(user),
        product_id: id,
        form: ProductForm::from_product(&product),
    }
    .into_response())
}

/// Handle product edit form submission.
///
/// The stored product is never mutated with unvalidated input; a failed
/// submission re-renders from the submitted form values alone.
pub async fn edit(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = ProductId::new(id);

    // Unknown ids are a 404 regardless of the form contents.
    state
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let (name, description, price) = match form.validate() {
        Ok(valid) => valid,
        Err(message) => return Ok(edit_failure(&session, user, id, form, message).await),
    };

    let changes = ProductChanges {
        name,
        description,
        price,
    };

    match state.products().update(id, &changes).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "product updated");

            if let Err(e) =
                push_flash(&session, FlashLevel::Success, "Product updated successfully.").await
            {
                tracing::error!("Failed to queue flash message: {}", e);
            }

            Ok(Redirect::to("/products").into_response())
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => {
            tracing::error!("Failed to update product: {}", e);
            Ok(edit_failure(
                &session,
                user,
                id,
                form,
                format!("Error updating the product: {e}"),
            )
            .await)
        }
    }
}

/// Re-render the edit form with a danger flash and the submitted values.
async fn edit_failure(
    session: &Session,
    user: CurrentUser,
    product_id: ProductId,
    form: ProductForm,
    message: impl Into<String>,
) -> Response {
    let mut flashes = take_flashes(session).await;
    flashes.push(Flash {
        message: message.into(),
        level: FlashLevel::Danger,
    });

    EditTemplate {
        flashes,
        current_user: Some(user),
        product_id,
        form,
    }
    .into_response()
}

// =============================================================================
// Delete
// =============================================================================

/// Handle product deletion.
///
/// Success and repository failure both flash and return to the list;
/// only an unknown id is a 404.
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response> {
    let id = ProductId::new(id);

    match state.products().delete(id).await {
        Ok(true) => {
            tracing::info!(product_id = %id, "product deleted");

            if let Err(e) =
                push_flash(&session, FlashLevel::Success, "Product deleted successfully.").await
            {
                tracing::error!("Failed to queue flash message: {}", e);
            }

            Ok(Redirect::to("/products").into_response())
        }
        Ok(false) => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => {
            tracing::error!("Failed to delete product: {}", e);

            if let Err(e) = push_flash(
                &session,
                FlashLevel::Danger,
                format!("Error deleting the product: {e}"),
            )
            .await
            {
                tracing::error!("Failed to queue flash message: {}", e);
            }

            Ok(Redirect::to("/products").into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, description: &str, price: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            description: description.to_string(),
            price: price.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_valid_form() {
        let (name, description, price) = form("Widget", "A fine widget", "19.99")
            .validate()
            .expect("valid form");
        assert_eq!(name, "Widget");
        assert_eq!(description.as_deref(), Some("A fine widget"));
        assert_eq!(price.to_string(), "19.99");
    }

    #[test]
    fn test_validate_empty_description_becomes_none() {
        let (_, description, _) = form("Widget", "   ", "5").validate().expect("valid form");
        assert!(description.is_none());
    }

    #[test]
    fn test_validate_short_name() {
        let err = form("ab", "", "5").validate().unwrap_err();
        assert_eq!(err, "The product name must be at least 3 characters.");
    }

    #[test]
    fn test_validate_name_checked_before_price() {
        // Both fields are bad; the name failure wins.
        let err = form("", "", "abc").validate().unwrap_err();
        assert_eq!(err, "The product name must be at least 3 characters.");
    }

    #[test]
    fn test_validate_missing_price() {
        let err = form("Widget", "", "").validate().unwrap_err();
        assert_eq!(err, "The price is required.");
    }

    #[test]
    fn test_validate_non_numeric_price() {
        let err = form("Widget", "", "abc").validate().unwrap_err();
        assert_eq!(err, "The price must be a valid number.");
    }

    #[test]
    fn test_validate_negative_price() {
        let err = form("Widget", "", "-5").validate().unwrap_err();
        assert_eq!(err, "The price cannot be negative.");
    }
}
