//! Analysis routes - generated commentary on the selected range
//!
//! Structure:
//! - api.rs: JSON endpoint and the shared request logic
//! - page.rs: HTMX panel rendering

pub mod api;
pub mod page;

pub use api::api_analysis;
pub use page::htmx_analysis;
