//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Each action loads it, applies one
//! state transition and stores it back before redirecting, so a page reload
//! never repeats the action.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use carrito_core::{ProductId, Quantity, ReduceOutcome};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::AccessContext;
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;
use crate::views::{CartView, PageChrome, local_redirect_target};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Raw number input; blank means one unit.
    pub quantity: Option<String>,
    pub return_to: Option<String>,
}

/// Form data for actions on a single cart line.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: String,
    pub return_to: Option<String>,
}

/// Close drawer form data.
#[derive(Debug, Deserialize)]
pub struct CloseDrawerForm {
    pub return_to: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub chrome: PageChrome,
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Display cart page.
#[instrument(skip(session, access))]
pub async fn show(session: Session, access: AccessContext) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        chrome: PageChrome::new(&cart, &access, "/cart"),
        cart: CartView::from(cart.cart()),
    })
}

/// Add a product to the cart and open the drawer.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let quantity = parse_quantity(form.quantity.as_deref())?;
    let product_id = ProductId::from(form.product_id);

    let product = state
        .catalog()
        .find_or_refresh(&product_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut cart = load_cart(&session).await?;
    let total = cart.add_to_cart(product, quantity);
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    tracing::info!(%product_id, added = quantity.get(), total = total.get(), "Added to cart");

    Ok(Redirect::to(&local_redirect_target(
        form.return_to.as_deref(),
        "/",
    )))
}

/// Remove a product from the cart. Unknown products are ignored.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<CartLineForm>) -> Result<Redirect> {
    let product_id = ProductId::from(form.product_id);

    let mut cart = load_cart(&session).await?;
    if cart.remove_from_cart(&product_id).is_some() {
        save_cart(&session, &cart).await?;
        tracing::info!(%product_id, "Removed from cart");
    } else {
        tracing::debug!(%product_id, "Remove for product not in cart");
    }

    Ok(Redirect::to(&local_redirect_target(
        form.return_to.as_deref(),
        "/cart",
    )))
}

/// Take one unit off a product; the last unit removes it.
#[instrument(skip(session))]
pub async fn reduce(session: Session, Form(form): Form<CartLineForm>) -> Result<Redirect> {
    let product_id = ProductId::from(form.product_id);

    let mut cart = load_cart(&session).await?;
    match cart.reduce_quantity(&product_id) {
        ReduceOutcome::Reduced(quantity) => {
            save_cart(&session, &cart).await?;
            tracing::info!(%product_id, quantity = quantity.get(), "Reduced cart quantity");
        }
        ReduceOutcome::Removed => {
            save_cart(&session, &cart).await?;
            tracing::info!(%product_id, "Removed last unit from cart");
        }
        ReduceOutcome::NotFound => {
            tracing::debug!(%product_id, "Reduce for product not in cart");
        }
    }

    Ok(Redirect::to(&local_redirect_target(
        form.return_to.as_deref(),
        "/cart",
    )))
}

/// Close the cart drawer.
#[instrument(skip(session))]
pub async fn close(session: Session, Form(form): Form<CloseDrawerForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    if cart.is_drawer_visible() {
        cart.close_cart_menu();
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to(&local_redirect_target(
        form.return_to.as_deref(),
        "/",
    )))
}

/// Parse the quantity field of the add form.
fn parse_quantity(raw: Option<&str>) -> Result<Quantity> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(Quantity::ONE);
    }

    let value: u32 = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid quantity: {raw}")))?;
    Quantity::new(value).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.cart().len(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_defaults_to_one() {
        assert_eq!(parse_quantity(None).unwrap(), Quantity::ONE);
        assert_eq!(parse_quantity(Some("")).unwrap(), Quantity::ONE);
        assert_eq!(parse_quantity(Some("  ")).unwrap(), Quantity::ONE);
    }

    #[test]
    fn test_parse_quantity_accepts_whole_numbers() {
        assert_eq!(parse_quantity(Some(" 3 ")).unwrap().get(), 3);
    }

    #[test]
    fn test_parse_quantity_rejects_bad_input() {
        for raw in ["0", "-1", "abc", "1.5"] {
            assert!(
                matches!(parse_quantity(Some(raw)), Err(AppError::BadRequest(_))),
                "{raw}"
            );
        }
    }
}
