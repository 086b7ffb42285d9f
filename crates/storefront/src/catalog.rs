//! In-memory catalog snapshot.
//!
//! The listing page refreshes the snapshot from the API every time it is
//! visited. A failed refresh is logged and the previous snapshot is kept, so
//! visitors keep seeing the last known products instead of an error page.

use std::sync::Arc;

use carrito_core::{Product, ProductId};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::api::ApiClient;

/// Last successfully fetched product list.
#[derive(Clone)]
pub struct Catalog {
    api: ApiClient,
    products: Arc<RwLock<Arc<Vec<Product>>>>,
}

impl Catalog {
    /// Create an empty catalog backed by `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            products: Arc::new(RwLock::new(Arc::new(Vec::new()))),
        }
    }

    /// Current snapshot without contacting the API.
    pub async fn snapshot(&self) -> Arc<Vec<Product>> {
        Arc::clone(&*self.products.read().await)
    }

    /// Fetch the catalog and replace the snapshot.
    ///
    /// On failure the previous snapshot is returned unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Arc<Vec<Product>> {
        match self.api.list_products().await {
            Ok(products) => {
                let products = Arc::new(products);
                *self.products.write().await = Arc::clone(&products);
                tracing::debug!(count = products.len(), "Catalog refreshed");
                products
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch products, keeping previous catalog");
                self.snapshot().await
            }
        }
    }

    /// Find a product in the current snapshot.
    pub async fn find(&self, id: &ProductId) -> Option<Product> {
        self.products
            .read()
            .await
            .iter()
            .find(|product| &product.id == id)
            .cloned()
    }

    /// Find a product, refreshing once if the snapshot does not have it.
    pub async fn find_or_refresh(&self, id: &ProductId) -> Option<Product> {
        if let Some(product) = self.find(id).await {
            return Some(product);
        }

        self.refresh()
            .await
            .iter()
            .find(|product| &product.id == id)
            .cloned()
    }
}
