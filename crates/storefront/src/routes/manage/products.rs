//! Product management handlers.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use carrito_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ProductPayload;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::{MessageQuery, page_chrome, redirect_with};
use crate::state::AppState;
use crate::views::{PageChrome, ProductView};

const MANAGE_PATH: &str = "/manage-products";

/// Create/update product form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub nombre: String,
    pub precio: String,
    #[serde(default)]
    pub imagen: String,
}

impl ProductForm {
    /// Validate the form into an API payload.
    fn into_payload(self) -> std::result::Result<ProductPayload, &'static str> {
        let nombre = self.nombre.trim().to_string();
        if nombre.is_empty() {
            return Err("Name is required");
        }

        let amount = Decimal::from_str(self.precio.trim()).map_err(|_| "Price must be a number")?;
        let precio = Price::new(amount).map_err(|_| "Price cannot be negative")?;

        let imagen = self.imagen.trim();
        Ok(ProductPayload {
            nombre,
            precio,
            imagen: (!imagen.is_empty()).then(|| imagen.to_string()),
        })
    }
}

/// Product management template.
#[derive(Template, WebTemplate)]
#[template(path = "manage/products.html")]
pub struct ManageProductsTemplate {
    pub chrome: PageChrome,
    pub products: Vec<ProductView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// List products with edit forms and a create form.
#[instrument(skip(state, session, access))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(access): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<ManageProductsTemplate> {
    let products = state.catalog().refresh().await;

    Ok(ManageProductsTemplate {
        chrome: page_chrome(&session, &access, MANAGE_PATH).await?,
        products: products.iter().map(ProductView::from).collect(),
        error: query.error,
        success: query.success,
    })
}

/// Create a product.
#[instrument(skip(state, _admin))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(message) => return Ok(redirect_with(MANAGE_PATH, "error", message)),
    };

    if let Err(e) = state.api().create_product(&payload).await {
        tracing::warn!(error = %e, "Product create failed");
        return Ok(redirect_with(MANAGE_PATH, "error", "The product could not be created"));
    }

    state.catalog().refresh().await;
    add_breadcrumb("manage", "Created product", Some(&[("name", payload.nombre.as_str())]));

    Ok(redirect_with(MANAGE_PATH, "success", "Product created"))
}

/// Update a product.
#[instrument(skip(state, _admin))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let id = ProductId::from(id);
    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(message) => return Ok(redirect_with(MANAGE_PATH, "error", message)),
    };

    if let Err(e) = state.api().update_product(&id, &payload).await {
        tracing::warn!(product_id = %id, error = %e, "Product update failed");
        return Ok(redirect_with(MANAGE_PATH, "error", "The product could not be updated"));
    }

    state.catalog().refresh().await;

    Ok(redirect_with(MANAGE_PATH, "success", "Product updated"))
}

/// Delete a product. Carts that hold it keep their copy.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = ProductId::from(id);

    if let Err(e) = state.api().delete_product(&id).await {
        tracing::warn!(product_id = %id, error = %e, "Product delete failed");
        return Ok(redirect_with(MANAGE_PATH, "error", "The product could not be deleted"));
    }

    state.catalog().refresh().await;
    add_breadcrumb("manage", "Deleted product", Some(&[("product_id", id.as_str())]));

    Ok(redirect_with(MANAGE_PATH, "success", "Product deleted"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(nombre: &str, precio: &str, imagen: &str) -> ProductForm {
        ProductForm {
            nombre: nombre.to_string(),
            precio: precio.to_string(),
            imagen: imagen.to_string(),
        }
    }

    #[test]
    fn test_product_form_valid() {
        let payload = form(" Tea ", "4.50", "").into_payload().unwrap();
        assert_eq!(payload.nombre, "Tea");
        assert_eq!(payload.precio.display(), "$4.50");
        assert_eq!(payload.imagen, None);
    }

    #[test]
    fn test_product_form_rejects_bad_input() {
        assert_eq!(
            form("", "1", "").into_payload().unwrap_err(),
            "Name is required"
        );
        assert_eq!(
            form("Tea", "cheap", "").into_payload().unwrap_err(),
            "Price must be a number"
        );
        assert_eq!(
            form("Tea", "-1", "").into_payload().unwrap_err(),
            "Price cannot be negative"
        );
    }
}
