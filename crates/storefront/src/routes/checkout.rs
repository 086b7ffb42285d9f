//! Checkout and invoice route handlers.
//!
//! The checkout form is free-form: whatever fields it posts are stored as the
//! session's payment info, replacing the previous submission. Submitting also
//! places an order with the API; if that fails the invoice is still shown,
//! just without an order number.

use std::collections::BTreeMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use carrito_core::{Cart, PaymentInfo};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{OrderLineRecord, OrderPayload};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::AccessContext;
use crate::models::session::{
    load_cart, load_last_order, load_payment_info, save_last_order, save_payment_info,
};
use crate::routes::MessageQuery;
use crate::state::AppState;
use crate::views::{CartView, PageChrome};

/// A checkout form field.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub value: String,
}

/// Fields offered on the checkout form.
const CHECKOUT_FIELDS: &[(&str, &str, &str)] = &[
    ("nombre", "Full name", "text"),
    ("email", "Email", "email"),
    ("direccion", "Address", "text"),
    ("ciudad", "City", "text"),
    ("telefono", "Phone", "tel"),
    ("metodo_pago", "Payment method", "text"),
];

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/invoice.html")]
pub struct InvoiceFormTemplate {
    pub chrome: PageChrome,
    pub cart: CartView,
    pub fields: Vec<FieldView>,
    pub error: Option<String>,
}

/// Printable invoice template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/invoice_print.html")]
pub struct InvoicePrintTemplate {
    pub cart: CartView,
    pub payment: Vec<(String, String)>,
    pub order_id: Option<String>,
    pub issued_on: String,
}

/// Build the order sent to the API from the cart and checkout form.
#[must_use]
pub fn order_payload(cart: &Cart, payment: &PaymentInfo) -> OrderPayload {
    OrderPayload {
        productos: cart
            .entries()
            .iter()
            .map(|entry| OrderLineRecord {
                producto: entry.product.id.clone(),
                nombre: entry.product.name.clone(),
                precio: entry.product.price,
                cantidad: entry.quantity.get(),
            })
            .collect(),
        total: cart.subtotal(),
        cliente: payment.clone(),
    }
}

/// Display the checkout form, prefilled from the last submission.
#[instrument(skip(session, access))]
pub async fn invoice_page(
    session: Session,
    access: AccessContext,
    Query(query): Query<MessageQuery>,
) -> Result<InvoiceFormTemplate> {
    let cart = load_cart(&session).await?;
    let payment = load_payment_info(&session).await?;

    let fields = CHECKOUT_FIELDS
        .iter()
        .map(|&(name, label, kind)| FieldView {
            name,
            label,
            kind,
            value: payment.get(name).unwrap_or_default().to_string(),
        })
        .collect();

    Ok(InvoiceFormTemplate {
        chrome: PageChrome::new(&cart, &access, "/invoice"),
        cart: CartView::from(cart.cart()),
        fields,
        error: query.error,
    })
}

/// Store the checkout form and place the order.
#[instrument(skip(state, session, fields))]
pub async fn submit_invoice(
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.cart().is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let payment = PaymentInfo::from(fields);
    save_payment_info(&session, &payment).await?;

    let order = order_payload(cart.cart(), &payment);
    let order_id = match state.api().create_order(&order).await {
        Ok(id) => {
            tracing::info!(order_id = ?id, lines = order.productos.len(), "Order placed");
            id
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to place order, showing invoice without it");
            None
        }
    };
    save_last_order(&session, order_id.as_ref()).await?;

    add_breadcrumb("checkout", "Submitted invoice form", None);

    Ok(Redirect::to("/invoice-pdf").into_response())
}

/// Display the printable invoice.
#[instrument(skip(session))]
pub async fn invoice_print(session: Session) -> Result<InvoicePrintTemplate> {
    let cart = load_cart(&session).await?;
    let payment = load_payment_info(&session).await?;
    let order_id = load_last_order(&session).await?;

    Ok(InvoicePrintTemplate {
        cart: CartView::from(cart.cart()),
        payment: payment
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        order_id: order_id.map(|id| id.to_string()),
        issued_on: chrono::Local::now().format("%Y-%m-%d").to_string(),
    })
}
