//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Product listing (refreshes catalog)
//! GET  /health                        - Health check
//!
//! # Cart
//! GET  /cart                          - Cart page
//! POST /cart/add                      - Add to cart (opens drawer)
//! POST /cart/remove                   - Remove a product
//! POST /cart/reduce                   - Take one unit off a product
//! POST /cart/close                    - Close the cart drawer
//! GET  /cart/count                    - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /invoice                       - Checkout form
//! POST /invoice                       - Store payment info, place order
//! GET  /invoice-pdf                   - Printable invoice
//!
//! # Reports & orders
//! GET  /sales-report                  - Sales chart
//! GET  /pedidos                       - Orders list
//!
//! # Account
//! GET  /register                      - Register page
//! POST /register                      - Register action
//! GET  /login                         - Login page
//! POST /login                         - Login action
//! POST /logout                        - Logout action
//! GET  /update-user                   - Profile page
//! POST /update-user                   - Profile update
//!
//! # Management (role-gated)
//! GET  /manage-products               - Product list + create form
//! POST /manage-products               - Create product
//! POST /manage-products/{id}          - Update product
//! POST /manage-products/{id}/delete   - Delete product
//! GET  /manage-orders                 - Order list
//! POST /manage-orders/{id}/status     - Change order status
//! POST /manage-orders/{id}/delete     - Delete order
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod manage;
pub mod orders;
pub mod sales;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::AccessContext;
use crate::models::session::load_cart;
use crate::state::AppState;
use crate::views::PageChrome;

/// Query parameters for error/success display after a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` with a message in the query string.
pub(crate) fn redirect_with(path: &str, key: &str, message: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("{path}?{key}={encoded}"))
}

/// Load the header/drawer data for a page.
pub(crate) async fn page_chrome(
    session: &Session,
    access: &AccessContext,
    current_path: &str,
) -> Result<PageChrome> {
    let cart = load_cart(session).await?;
    Ok(PageChrome::new(&cart, access, current_path))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/reduce", post(cart::reduce))
        .route("/close", post(cart::close))
        .route("/count", get(cart::count))
}

/// Create the product management routes router.
pub fn manage_product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(manage::products::index).post(manage::products::create),
        )
        .route("/{id}", post(manage::products::update))
        .route("/{id}/delete", post(manage::products::delete))
}

/// Create the order management routes router.
pub fn manage_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(manage::orders::index))
        .route("/{id}/status", post(manage::orders::update_status))
        .route("/{id}/delete", post(manage::orders::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Listing
        .route("/", get(home::home))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route(
            "/invoice",
            get(checkout::invoice_page).post(checkout::submit_invoice),
        )
        .route("/invoice-pdf", get(checkout::invoice_print))
        // Reports & orders
        .route("/sales-report", get(sales::report))
        .route("/pedidos", get(orders::index))
        // Account
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route(
            "/update-user",
            get(auth::update_user_page).post(auth::update_user),
        )
        // Management
        .nest("/manage-products", manage_product_routes())
        .nest("/manage-orders", manage_order_routes())
}
