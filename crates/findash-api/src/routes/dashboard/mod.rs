//! Dashboard routes - charts, KPIs and their data
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: full page and HTMX partials

pub mod api;
pub mod page;

pub use api::{api_compositions, api_kpis, api_months, api_records, api_summary};
pub use page::{htmx_dashboard_content, htmx_portfolio, page_dashboard};
