//! Sales report route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use carrito_core::sales::ChartBar;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::AccessContext;
use crate::state::AppState;
use crate::views::PageChrome;

/// Plotting area of the chart, in SVG user units.
const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 240.0;

/// Sales report template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/report.html")]
pub struct SalesReportTemplate {
    pub chrome: PageChrome,
    pub bars: Vec<ChartBar>,
    pub total: u64,
    pub peak: u32,
    pub chart_width: f64,
    pub chart_height: f64,
}

/// Display the sales chart.
#[instrument(skip(state, session, access))]
pub async fn report(
    State(state): State<AppState>,
    session: Session,
    access: AccessContext,
) -> Result<SalesReportTemplate> {
    let series = state.sales();

    Ok(SalesReportTemplate {
        chrome: super::page_chrome(&session, &access, "/sales-report").await?,
        bars: series.bars(CHART_WIDTH, CHART_HEIGHT),
        total: series.total(),
        peak: series.max_value(),
        chart_width: CHART_WIDTH,
        chart_height: CHART_HEIGHT,
    })
}
