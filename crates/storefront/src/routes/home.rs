//! Product listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::AccessContext;
use crate::state::AppState;
use crate::views::{PageChrome, ProductView};

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    pub products: Vec<ProductView>,
}

/// Display the product listing.
///
/// Every visit refreshes the catalog; if the API is down the last fetched
/// products are shown.
#[instrument(skip(state, session, access))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    access: AccessContext,
) -> Result<HomeTemplate> {
    let products = state.catalog().refresh().await;

    Ok(HomeTemplate {
        chrome: super::page_chrome(&session, &access, "/").await?,
        products: products.iter().map(ProductView::from).collect(),
    })
}
