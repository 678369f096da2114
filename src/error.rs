//! Error types for the comparator.
//!
//! Two classes of failure exist.  [`ComparisonError`] covers malformed
//! requests and is returned per call so the caller can correct the
//! request and retry.  [`CatalogError`] covers broken configuration
//! and is meant to stop the application before it serves anything.

use crate::models::Category;
use rust_decimal::Decimal;
use thiserror::Error;

/// A request could not be evaluated.  Every variant is an
/// "invalid input" condition; no other failure modes exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    /// Team size is outside the supported range.
    #[error("team size {value} is outside the supported range {min}..={max}")]
    InvalidTeamSize { value: i64, min: i64, max: i64 },
    /// A selection was keyed by a category that does not exist.
    #[error("unrecognized category `{0}`")]
    UnrecognizedCategory(String),
    /// No tool was selected for a known category.
    #[error("no tool selected for category `{0}`")]
    MissingCategory(Category),
    /// The selected tool id is not in the catalog for that category.
    #[error("unknown tool `{tool}` for category `{category}`")]
    UnknownTool { category: Category, tool: String },
}

impl ComparisonError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> String {
        match self {
            ComparisonError::InvalidTeamSize { .. } => "team_size".to_string(),
            ComparisonError::UnrecognizedCategory(key) => format!("selected_tools.{key}"),
            ComparisonError::MissingCategory(category)
            | ComparisonError::UnknownTool { category, .. } => {
                format!("selected_tools.{category}")
            }
        }
    }
}

/// The static catalog or pricing model is unusable.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no tools in category `{0}`")]
    EmptyCategory(Category),
    #[error("catalog has no zero-cost option in category `{0}`")]
    NoZeroCostOption(Category),
    #[error("tool `{tool}` in category `{category}` has negative cost {cost}")]
    NegativeCost {
        category: Category,
        tool: String,
        cost: Decimal,
    },
    #[error("tool `{tool}` in category `{category}` costs {cost} per user, above the maximum {max}")]
    CostTooLarge {
        category: Category,
        tool: String,
        cost: Decimal,
        max: Decimal,
    },
    #[error("tool `{tool}` appears more than once in category `{category}`")]
    DuplicateTool { category: Category, tool: String },
    #[error("platform pricing field `{field}` is negative ({value})")]
    NegativePricing { field: &'static str, value: Decimal },
    #[error("platform pricing field `{field}` is {value}, above the maximum {max}")]
    PricingTooLarge {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },
    #[error("failed to read pricing config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse pricing config: {0}")]
    Parse(#[from] serde_json::Error),
}
