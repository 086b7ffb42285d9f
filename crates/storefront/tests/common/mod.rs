//! Shared fixtures for storefront integration tests.
//!
//! Each test gets its own storefront and its own mock REST API, both bound to
//! an ephemeral loopback port. The mock keeps everything in memory so tests
//! can inspect what the storefront sent.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use carrito_storefront::{app, config::StorefrontConfig, state::AppState};
use reqwest::{Client, redirect::Policy};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const CUSTOMER_EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "secret1";

/// In-memory stand-in for the REST API.
#[derive(Clone, Default)]
pub struct MockApi {
    products: Arc<Mutex<Vec<Value>>>,
    orders: Arc<Mutex<Vec<Value>>>,
    failing: Arc<AtomicBool>,
}

impl MockApi {
    fn seeded() -> Self {
        let api = Self::default();
        *api.products.lock().unwrap() = vec![
            json!({ "_id": "p1", "nombre": "Green Tea", "precio": 4.5, "imagen": "/img/tea.png" }),
            json!({ "_id": "p2", "nombre": "Mug", "precio": 10, "imagen": "" }),
        ];
        api
    }

    /// Make every product and order request answer 503.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }

    pub fn products(&self) -> Vec<Value> {
        self.products.lock().unwrap().clone()
    }

    pub fn orders(&self) -> Vec<Value> {
        self.orders.lock().unwrap().clone()
    }

    pub fn push_order(&self, order: Value) {
        self.orders.lock().unwrap().push(order);
    }
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "down").into_response()
}

async fn list_products(State(api): State<MockApi>) -> Response {
    if api.is_failing() {
        return unavailable();
    }
    Json(api.products()).into_response()
}

async fn create_product(State(api): State<MockApi>, Json(mut body): Json<Value>) -> Response {
    let mut products = api.products.lock().unwrap();
    body["_id"] = json!(format!("p{}", products.len() + 1));
    products.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_product(
    State(api): State<MockApi>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut products = api.products.lock().unwrap();
    let Some(product) = products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    for key in ["nombre", "precio", "imagen"] {
        if let Some(value) = body.get(key) {
            product[key] = value.clone();
        }
    }
    Json(product.clone()).into_response()
}

async fn delete_product(State(api): State<MockApi>, Path(id): Path<String>) -> StatusCode {
    let mut products = api.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p["_id"] != id.as_str());
    if products.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn list_orders(State(api): State<MockApi>) -> Response {
    if api.is_failing() {
        return unavailable();
    }
    Json(api.orders()).into_response()
}

async fn create_order(State(api): State<MockApi>, Json(mut body): Json<Value>) -> Response {
    if api.is_failing() {
        return unavailable();
    }
    let mut orders = api.orders.lock().unwrap();
    body["_id"] = json!(format!("o{}", orders.len() + 1));
    body["estado"] = json!("pendiente");
    orders.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_order(
    State(api): State<MockApi>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut orders = api.orders.lock().unwrap();
    let Some(order) = orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    order["estado"] = body["estado"].clone();
    Json(order.clone()).into_response()
}

async fn delete_order(State(api): State<MockApi>, Path(id): Path<String>) -> StatusCode {
    let mut orders = api.orders.lock().unwrap();
    let before = orders.len();
    orders.retain(|o| o["_id"] != id.as_str());
    if orders.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == ADMIN_EMAIL {
        return (StatusCode::CONFLICT, "email taken").into_response();
    }
    (StatusCode::CREATED, Json(json!({ "_id": "u9" }))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (StatusCode::UNAUTHORIZED, "bad credentials").into_response();
    }
    match body["email"].as_str() {
        // Wrapped shape with `rol`
        Some(ADMIN_EMAIL) => Json(json!({
            "token": "t",
            "usuario": { "_id": "u1", "nombre": "Admin", "email": ADMIN_EMAIL, "rol": "admin" }
        }))
        .into_response(),
        // Flat shape with `role`
        Some(CUSTOMER_EMAIL) => Json(json!({
            "_id": "u2", "nombre": "Ana", "email": CUSTOMER_EMAIL, "role": "cliente"
        }))
        .into_response(),
        _ => (StatusCode::UNAUTHORIZED, "bad credentials").into_response(),
    }
}

async fn update_user(Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    Json(json!({ "_id": id, "nombre": body["nombre"], "email": body["email"] })).into_response()
}

fn mock_router(api: MockApi) -> Router {
    Router::new()
        .route("/api/productos", get(list_products).post(create_product))
        .route(
            "/api/productos/{id}",
            put(update_product).delete(delete_product),
        )
        .route("/api/pedidos", get(list_orders).post(create_order))
        .route("/api/pedidos/{id}", put(update_order).delete(delete_order))
        .route("/api/usuarios/register", post(register))
        .route("/api/usuarios/login", post(login))
        .route("/api/usuarios/{id}", put(update_user))
        .with_state(api)
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A running storefront wired to a mock API.
pub struct TestApp {
    pub url: String,
    pub api: MockApi,
    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let api = MockApi::seeded();
        let api_url = serve(mock_router(api.clone())).await;

        let config = StorefrontConfig::local(Url::parse(&api_url).unwrap());
        let state = AppState::new(config).expect("state");
        let url = serve(app(state)).await;

        Self {
            url,
            api,
            client: new_client(),
        }
    }

    /// A second visitor with their own cookie jar.
    pub fn new_visitor(&self) -> Client {
        new_client()
    }

    pub fn at(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.at(path)).send().await.unwrap()
    }

    pub async fn get_text(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "GET {path}");
        response.text().await.unwrap()
    }

    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.at(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, email: &str) -> reqwest::Response {
        self.post("/login", &[("email", email), ("password", PASSWORD)])
            .await
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a redirect response.
pub fn location(response: &reqwest::Response) -> String {
    assert!(
        response.status().is_redirection(),
        "expected redirect, got {}",
        response.status()
    );
    response.headers()["location"].to_str().unwrap().to_string()
}
