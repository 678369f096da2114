//! Tool Savings library crate.
//!
//! This crate compares what an organisation spends on point-solution
//! tools against the unified platform's pricing.  External
//! applications may depend on the `tool_savings` crate and call
//! `engine::compare` directly or embed the API via `api::build_router`.

pub mod api;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod format;
pub mod models;

pub use catalog::{PricingConfig, ToolCatalog};
pub use engine::{compare, compare_batch};
pub use error::{CatalogError, ComparisonError};
