//! Static tool catalog and pricing configuration.
//!
//! The `catalog` module holds the read-only reference data fed into
//! the comparator: the tools an organisation may currently pay for and
//! the platform's own pricing model.  Both are validated once, when
//! they are built, so a broken configuration fails at startup rather
//! than on every request.

use crate::error::CatalogError;
use crate::models::{Category, PlatformPricingModel, ToolCatalogEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Upper bound on any per-user annual cost, tool or platform.  Keeps
/// every total in `compare` far inside `Decimal`'s range.
pub const MAX_ANNUAL_COST_PER_USER: i64 = 1_000_000;

fn max_annual_cost() -> Decimal {
    Decimal::from(MAX_ANNUAL_COST_PER_USER)
}

/// A validated set of tools.  Every category has at least one entry
/// and a zero-cost option, so an all-zero baseline is always
/// selectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ToolCatalog {
    entries: Vec<ToolCatalogEntry>,
}

impl ToolCatalog {
    pub fn new(entries: Vec<ToolCatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.annual_cost_per_user < Decimal::ZERO {
                return Err(CatalogError::NegativeCost {
                    category: entry.category,
                    tool: entry.id.clone(),
                    cost: entry.annual_cost_per_user,
                });
            }
            if entry.annual_cost_per_user > max_annual_cost() {
                return Err(CatalogError::CostTooLarge {
                    category: entry.category,
                    tool: entry.id.clone(),
                    cost: entry.annual_cost_per_user,
                    max: max_annual_cost(),
                });
            }
            if !seen.insert((entry.category, entry.id.as_str())) {
                return Err(CatalogError::DuplicateTool {
                    category: entry.category,
                    tool: entry.id.clone(),
                });
            }
        }
        for category in Category::ALL {
            let mut in_category = entries.iter().filter(|e| e.category == category).peekable();
            if in_category.peek().is_none() {
                return Err(CatalogError::EmptyCategory(category));
            }
            if !in_category.any(|e| e.annual_cost_per_user.is_zero()) {
                return Err(CatalogError::NoZeroCostOption(category));
            }
        }
        Ok(Self { entries })
    }

    /// Finds the tool `id` within `category`.
    pub fn lookup(&self, category: Category, id: &str) -> Option<&ToolCatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.id == id)
    }

    pub fn entries_for(&self, category: Category) -> impl Iterator<Item = &ToolCatalogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolCatalogEntry> {
        self.entries.iter()
    }
}

impl PlatformPricingModel {
    /// Rejects negative or oversized fields.
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        let fields = [
            ("monthly_billing_annual_per_user", self.monthly_billing_annual_per_user),
            ("annual_billing_annual_per_user", self.annual_billing_annual_per_user),
            ("estimated_usage_annual_per_user", self.estimated_usage_annual_per_user),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(CatalogError::NegativePricing { field, value });
            }
            if value > max_annual_cost() {
                return Err(CatalogError::PricingTooLarge {
                    field,
                    value,
                    max: max_annual_cost(),
                });
            }
        }
        Ok(())
    }
}

/// The configuration injected into the comparator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingConfig {
    pub tools: ToolCatalog,
    pub pricing: PlatformPricingModel,
}

/// On-disk shape of a pricing config before validation.
#[derive(Debug, Deserialize)]
struct RawPricingConfig {
    tools: Vec<ToolCatalogEntry>,
    pricing: PlatformPricingModel,
}

impl PricingConfig {
    pub fn new(tools: ToolCatalog, pricing: PlatformPricingModel) -> Self {
        Self { tools, pricing }
    }

    /// The reference catalog and pricing shipped with the product.
    pub fn builtin() -> Self {
        let tools = vec![
            ToolCatalogEntry::new("none", Category::Email, "None", Decimal::ZERO),
            ToolCatalogEntry::new("superhuman", Category::Email, "Superhuman", usd(360)),
            ToolCatalogEntry::new("none", Category::Calendar, "None", Decimal::ZERO),
            ToolCatalogEntry::new("calendly", Category::Calendar, "Calendly", usd(96)),
            ToolCatalogEntry::new("none", Category::Meeting, "None", Decimal::ZERO),
            ToolCatalogEntry::new("otter", Category::Meeting, "Otter", usd(200)),
            ToolCatalogEntry::new("none", Category::Productivity, "None", Decimal::ZERO),
            ToolCatalogEntry::new("notion", Category::Productivity, "Notion", usd(96)),
        ];
        // 30/mo billed monthly, 24/mo billed yearly, ~5.50/mo of usage.
        let pricing = PlatformPricingModel::annualised(usd(30), usd(24), Decimal::new(55, 1));
        Self {
            tools: ToolCatalog { entries: tools },
            pricing,
        }
    }
}

fn usd(amount: i64) -> Decimal {
    Decimal::from(amount)
}

/// Parse and validate a JSON pricing config of the form
/// `{"tools": [...], "pricing": {...}}`.
pub fn parse_config(data: &str) -> Result<PricingConfig, CatalogError> {
    let raw: RawPricingConfig = serde_json::from_str(data)?;
    Ok(PricingConfig::new(ToolCatalog::new(raw.tools)?, raw.pricing))
}

/// Load a pricing config from a JSON file.
pub fn load_config_from_file(path: &Path) -> Result<PricingConfig, CatalogError> {
    let data = std::fs::read_to_string(path)?;
    let config = parse_config(&data)?;
    debug!(
        path = %path.display(),
        tools = config.tools.iter().count(),
        "loaded pricing config"
    );
    Ok(config)
}
