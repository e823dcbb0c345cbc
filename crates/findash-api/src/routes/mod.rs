//! Route modules for the API server
//!
//! - dashboard: dashboard page, partials and data endpoints
//! - analysis: generated analysis of a range
//! - settings: settings page
//! - range: month range query and selector
//!
//! Each feature module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page rendering

pub mod analysis;
pub mod dashboard;
pub mod range;
pub mod settings;
