//! Order management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use carrito_core::OrderId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ORDER_STATUSES;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::orders::{OrderView, load_orders};
use crate::routes::{MessageQuery, page_chrome, redirect_with};
use crate::state::AppState;
use crate::views::PageChrome;

const MANAGE_PATH: &str = "/manage-orders";

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub estado: String,
}

/// Order management template.
#[derive(Template, WebTemplate)]
#[template(path = "manage/orders.html")]
pub struct ManageOrdersTemplate {
    pub chrome: PageChrome,
    pub orders: Vec<OrderView>,
    pub statuses: &'static [&'static str],
    pub error: Option<String>,
    pub success: Option<String>,
}

/// List orders with status and delete controls.
#[instrument(skip(state, session, access))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(access): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<ManageOrdersTemplate> {
    let (orders, load_error) = load_orders(&state).await;

    Ok(ManageOrdersTemplate {
        chrome: page_chrome(&session, &access, MANAGE_PATH).await?,
        orders,
        statuses: ORDER_STATUSES,
        error: query.error.or(load_error),
        success: query.success,
    })
}

/// Change an order's status.
#[instrument(skip(state, _admin))]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    if !ORDER_STATUSES.contains(&form.estado.as_str()) {
        return Ok(redirect_with(MANAGE_PATH, "error", "Unknown order status"));
    }
    let id = OrderId::from(id);

    if let Err(e) = state.api().update_order_status(&id, &form.estado).await {
        tracing::warn!(order_id = %id, error = %e, "Order status update failed");
        return Ok(redirect_with(MANAGE_PATH, "error", "The order could not be updated"));
    }

    tracing::info!(order_id = %id, status = %form.estado, "Order status changed");

    Ok(redirect_with(MANAGE_PATH, "success", "Order updated"))
}

/// Delete an order.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = OrderId::from(id);

    if let Err(e) = state.api().delete_order(&id).await {
        tracing::warn!(order_id = %id, error = %e, "Order delete failed");
        return Ok(redirect_with(MANAGE_PATH, "error", "The order could not be deleted"));
    }

    Ok(redirect_with(MANAGE_PATH, "success", "Order deleted"))
}
