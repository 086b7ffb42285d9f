//! Client for the remote catalog/orders/users REST API.
//!
//! # Endpoints
//!
//! ```text
//! GET    /api/productos            - Catalog
//! POST   /api/productos            - Create product
//! PUT    /api/productos/{id}       - Update product
//! DELETE /api/productos/{id}       - Delete product
//! GET    /api/pedidos              - Orders
//! POST   /api/pedidos              - Place order
//! PUT    /api/pedidos/{id}         - Update order status
//! DELETE /api/pedidos/{id}         - Delete order
//! POST   /api/usuarios/register    - Register user
//! POST   /api/usuarios/login       - Log in, returns user with role
//! PUT    /api/usuarios/{id}        - Update user
//! ```
//!
//! The API is the source of truth for everything except carts, which live in
//! the visitor's session.

pub mod types;

use std::sync::Arc;

use carrito_core::{OrderId, Product, ProductId, UserId};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ApiConfig;

pub use types::{
    LoginPayload, ORDER_STATUSES, OrderLineRecord, OrderPayload, OrderRecord, OrderStatusPayload,
    ProductPayload, ProductRecord, RegisterPayload, UpdateUserPayload, UserRecord,
};

/// Errors that can occur when talking to the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Whether the API rejected the request itself (4xx other than 404).
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status, .. } if status.is_client_error())
    }
}

/// Client for the REST API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                token: config.token.clone(),
            }),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.client.request(method, url);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(self.request(Method::GET, path), path).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        self.send(self.request(method, path).json(body), path).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let records: Vec<ProductRecord> = self.get_json("/api/productos").await?;
        debug!(count = records.len(), "Fetched catalog");
        Ok(records.into_iter().map(Product::from).collect())
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or is unreachable.
    #[instrument(skip(self, product), fields(name = %product.nombre))]
    pub async fn create_product(&self, product: &ProductPayload) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/api/productos", product)
            .await
            .map(drop)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or a transport error.
    #[instrument(skip(self, product), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        product: &ProductPayload,
    ) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &format!("/api/productos/{id}"), product)
            .await
            .map(drop)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or a transport error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let path = format!("/api/productos/{id}");
        self.send(self.request(Method::DELETE, &path), &path)
            .await
            .map(drop)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an order list.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>, ApiError> {
        self.get_json("/api/pedidos").await
    }

    /// Place an order. Returns the new order's id when the API reports one.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or is unreachable.
    #[instrument(skip(self, order), fields(lines = order.productos.len()))]
    pub async fn create_order(&self, order: &OrderPayload) -> Result<Option<OrderId>, ApiError> {
        let body = self.send_json(Method::POST, "/api/pedidos", order).await?;
        let id = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("_id").and_then(|id| id.as_str()).map(OrderId::from));
        Ok(id)
    }

    /// Change an order's status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or a transport error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn update_order_status(&self, id: &OrderId, status: &str) -> Result<(), ApiError> {
        let body = OrderStatusPayload {
            estado: status.to_string(),
        };
        self.send_json(Method::PUT, &format!("/api/pedidos/{id}"), &body)
            .await
            .map(drop)
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or a transport error.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        let path = format!("/api/pedidos/{id}");
        self.send(self.request(Method::DELETE, &path), &path)
            .await
            .map(drop)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration or is unreachable.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &RegisterPayload) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/api/usuarios/register", user)
            .await
            .map(drop)
    }

    /// Log in and return the user, including their role.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with a 4xx status for bad credentials.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginPayload) -> Result<UserRecord, ApiError> {
        let body = self
            .send_json(Method::POST, "/api/usuarios/login", credentials)
            .await?;
        let response: types::LoginResponse = serde_json::from_str(&body)?;
        Ok(response.into())
    }

    /// Update a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or a transport error.
    #[instrument(skip(self, user), fields(user_id = %id))]
    pub async fn update_user(&self, id: &UserId, user: &UpdateUserPayload) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &format!("/api/usuarios/{id}"), user)
            .await
            .map(drop)
    }
}
