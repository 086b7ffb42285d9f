//! Wire types for the remote REST API.
//!
//! The API speaks Spanish field names (`nombre`, `precio`, ...). Records are
//! deserialized here and converted into core types at the edge so nothing
//! past this module sees the wire shape.

use carrito_core::{OrderId, PaymentInfo, Price, Product, ProductId, Role, UserId};
use serde::{Deserialize, Serialize};

/// Order statuses offered in the order management screen.
pub const ORDER_STATUSES: &[&str] = &["pendiente", "enviado", "entregado", "cancelado"];

/// A product record from `GET /api/productos`.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub nombre: String,
    pub precio: Price,
    #[serde(default)]
    pub imagen: Option<String>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.nombre,
            price: record.precio,
            image_ref: record.imagen.filter(|s| !s.is_empty()),
        }
    }
}

/// Body for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPayload {
    pub nombre: String,
    pub precio: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    pub producto: ProductId,
    pub nombre: String,
    pub precio: Price,
    pub cantidad: u32,
}

/// An order record from `GET /api/pedidos`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub productos: Vec<OrderLineRecord>,
    #[serde(default)]
    pub total: Option<Price>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub cliente: Option<PaymentInfo>,
}

impl OrderRecord {
    /// The stored total, or the sum of line totals when the API omits it.
    #[must_use]
    pub fn total(&self) -> Price {
        self.total.unwrap_or_else(|| {
            self.productos
                .iter()
                .filter_map(|line| {
                    carrito_core::Quantity::new(line.cantidad)
                        .ok()
                        .map(|qty| line.precio.line_total(qty))
                })
                .sum()
        })
    }
}

/// Body for `POST /api/pedidos`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    pub productos: Vec<OrderLineRecord>,
    pub total: Price,
    pub cliente: PaymentInfo,
}

/// Body for `PUT /api/pedidos/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusPayload {
    pub estado: String,
}

/// Body for `POST /api/usuarios/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /api/usuarios/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Body for `PUT /api/usuarios/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserPayload {
    pub nombre: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A user record returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub nombre: String,
    pub email: String,
    #[serde(alias = "role")]
    pub rol: Role,
}

/// Login responses come either flat or wrapped in `usuario`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LoginResponse {
    Wrapped { usuario: UserRecord },
    Flat(UserRecord),
}

impl From<LoginResponse> for UserRecord {
    fn from(response: LoginResponse) -> Self {
        match response {
            LoginResponse::Wrapped { usuario } | LoginResponse::Flat(usuario) => usuario,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_record_maps_to_product() {
        let record: ProductRecord = serde_json::from_value(serde_json::json!({
            "_id": "64f0c0ffee",
            "nombre": "Café molido",
            "precio": 12.5,
            "imagen": "/img/cafe.png",
            "stock": 40,
            "__v": 0
        }))
        .unwrap();

        let product = Product::from(record);
        assert_eq!(product.id.as_str(), "64f0c0ffee");
        assert_eq!(product.name, "Café molido");
        assert_eq!(product.price, Price::from_cents(1250).unwrap());
        assert_eq!(product.image_ref.as_deref(), Some("/img/cafe.png"));
    }

    #[test]
    fn test_product_record_without_image() {
        let record: ProductRecord = serde_json::from_value(serde_json::json!({
            "_id": "a1", "nombre": "Té", "precio": 3, "imagen": ""
        }))
        .unwrap();

        assert_eq!(Product::from(record).image_ref, None);
    }

    #[test]
    fn test_product_payload_sends_numeric_price() {
        let payload = ProductPayload {
            nombre: "Té".to_string(),
            precio: Price::from_cents(350).unwrap(),
            imagen: None,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "nombre": "Té", "precio": 3.5 }));
    }

    #[test]
    fn test_order_total_falls_back_to_lines() {
        let order: OrderRecord = serde_json::from_value(serde_json::json!({
            "_id": "o1",
            "productos": [
                { "producto": "p1", "nombre": "A", "precio": 2, "cantidad": 3 },
                { "producto": "p2", "nombre": "B", "precio": 1.5, "cantidad": 2 }
            ]
        }))
        .unwrap();

        assert_eq!(order.total().display(), "$9.00");
        assert_eq!(order.estado, None);
    }

    #[test]
    fn test_login_response_shapes() {
        let flat: LoginResponse = serde_json::from_value(serde_json::json!({
            "_id": "u1", "nombre": "Ana", "email": "ana@example.com", "rol": "admin"
        }))
        .unwrap();
        assert_eq!(UserRecord::from(flat).rol, Role::Admin);

        let wrapped: LoginResponse = serde_json::from_value(serde_json::json!({
            "token": "t",
            "usuario": { "_id": "u2", "nombre": "Luis", "email": "l@example.com", "role": "cliente" }
        }))
        .unwrap();
        let user = UserRecord::from(wrapped);
        assert_eq!(user.id.as_str(), "u2");
        assert_eq!(user.rol, Role::Other("cliente".to_string()));
    }
}
