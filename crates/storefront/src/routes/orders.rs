//! Orders list route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::OrderRecord;
use crate::error::Result;
use crate::filters;
use crate::middleware::AccessContext;
use crate::state::AppState;
use crate::views::PageChrome;

/// Order line display data for templates.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub date: String,
    pub status: String,
    pub customer: Option<String>,
    pub total: String,
    pub lines: Vec<OrderLineView>,
}

impl OrderView {
    /// Whether the order is currently in `status`.
    #[must_use]
    pub fn has_status(&self, status: &str) -> bool {
        self.status == status
    }
}

impl From<&OrderRecord> for OrderView {
    fn from(order: &OrderRecord) -> Self {
        Self {
            id: order.id.to_string(),
            date: order.fecha.clone().unwrap_or_default(),
            status: order
                .estado
                .clone()
                .unwrap_or_else(|| "pendiente".to_string()),
            customer: order
                .cliente
                .as_ref()
                .and_then(|c| c.get("nombre").or_else(|| c.get("email")))
                .map(String::from),
            total: order.total().display(),
            lines: order
                .productos
                .iter()
                .map(|line| OrderLineView {
                    name: line.nombre.clone(),
                    quantity: line.cantidad,
                    price: line.precio.display(),
                })
                .collect(),
        }
    }
}

/// Fetch orders for display, logging failures instead of failing the page.
pub(crate) async fn load_orders(state: &AppState) -> (Vec<OrderView>, Option<String>) {
    match state.api().list_orders().await {
        Ok(orders) => (orders.iter().map(OrderView::from).collect(), None),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch orders");
            (Vec::new(), Some("Orders could not be loaded right now.".to_string()))
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub chrome: PageChrome,
    pub orders: Vec<OrderView>,
    pub error: Option<String>,
}

/// Display the orders list.
#[instrument(skip(state, session, access))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    access: AccessContext,
) -> Result<OrdersTemplate> {
    let (orders, error) = load_orders(&state).await;

    Ok(OrdersTemplate {
        chrome: super::page_chrome(&session, &access, "/pedidos").await?,
        orders,
        error,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_view_defaults() {
        let order: OrderRecord = serde_json::from_value(serde_json::json!({
            "_id": "o1",
            "productos": [{ "producto": "p1", "nombre": "Tea", "precio": 4.5, "cantidad": 2 }],
            "cliente": { "email": "ana@example.com" }
        }))
        .unwrap();

        let view = OrderView::from(&order);
        assert_eq!(view.status, "pendiente");
        assert_eq!(view.customer.as_deref(), Some("ana@example.com"));
        assert_eq!(view.total, "$9.00");
        assert_eq!(view.lines[0].price, "$4.50");
        assert!(view.date.is_empty());
    }
}
