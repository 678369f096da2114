//! Data models for the tool savings comparator.
//!
//! The `models` module defines the serialisable structs and enums
//! describing point-solution tools, the platform's pricing, and the
//! request/result pair exchanged with the comparator.  Monetary values
//! are [`Decimal`]s so that totals are exact; rounding is left to the
//! [`format`](crate::format) module.

use crate::error::{CatalogError, ComparisonError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A functional grouping of substitutable tools.  Exactly one tool is
/// active per category for a given organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Email,
    Calendar,
    Meeting,
    Productivity,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Email,
        Category::Calendar,
        Category::Meeting,
        Category::Productivity,
    ];

    /// The lowercase key used on the wire and in request maps.
    pub fn key(self) -> &'static str {
        match self {
            Category::Email => "email",
            Category::Calendar => "calendar",
            Category::Meeting => "meeting",
            Category::Productivity => "productivity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = ComparisonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| ComparisonError::UnrecognizedCategory(s.to_string()))
    }
}

/// One substitutable point-solution tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCatalogEntry {
    /// Stable slug, unique within its category (e.g. `"superhuman"`).
    /// The zero-cost option is conventionally `"none"`.
    pub id: String,
    pub category: Category,
    /// Human-readable display name.
    pub label: String,
    /// Cost of one user-year of this tool.
    pub annual_cost_per_user: Decimal,
}

impl ToolCatalogEntry {
    pub fn new(id: &str, category: Category, label: &str, annual_cost_per_user: Decimal) -> Self {
        Self {
            id: id.to_string(),
            category,
            label: label.to_string(),
            annual_cost_per_user,
        }
    }
}

/// Rate structure under which the platform's per-user fee applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCadence {
    Monthly,
    Annual,
}

/// The unified platform's own cost, per user per year.
///
/// Only constructed through validation, so every field is known to be
/// within `0..=MAX_ANNUAL_COST_PER_USER`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PricingFields")]
pub struct PlatformPricingModel {
    /// Per-user annual cost when billed month to month.
    pub(crate) monthly_billing_annual_per_user: Decimal,
    /// Per-user annual cost when billed yearly.
    pub(crate) annual_billing_annual_per_user: Decimal,
    /// Estimated variable cost (e.g. third-party inference) per user
    /// per year, charged on top of the platform fee.
    pub(crate) estimated_usage_annual_per_user: Decimal,
}

/// Wire shape of [`PlatformPricingModel`] before validation.
#[derive(Deserialize)]
struct PricingFields {
    monthly_billing_annual_per_user: Decimal,
    annual_billing_annual_per_user: Decimal,
    estimated_usage_annual_per_user: Decimal,
}

impl TryFrom<PricingFields> for PlatformPricingModel {
    type Error = CatalogError;

    fn try_from(fields: PricingFields) -> Result<Self, Self::Error> {
        PlatformPricingModel::new(
            fields.monthly_billing_annual_per_user,
            fields.annual_billing_annual_per_user,
            fields.estimated_usage_annual_per_user,
        )
    }
}

impl PlatformPricingModel {
    pub fn new(
        monthly_billing_annual_per_user: Decimal,
        annual_billing_annual_per_user: Decimal,
        estimated_usage_annual_per_user: Decimal,
    ) -> Result<Self, CatalogError> {
        let model = Self {
            monthly_billing_annual_per_user,
            annual_billing_annual_per_user,
            estimated_usage_annual_per_user,
        };
        model.validate()?;
        Ok(model)
    }

    /// Builds a model from the monthly sticker prices shown to buyers.
    pub fn from_monthly_rates(
        monthly_billing: Decimal,
        annual_billing: Decimal,
        estimated_usage: Decimal,
    ) -> Result<Self, CatalogError> {
        let model = Self::annualised(monthly_billing, annual_billing, estimated_usage);
        model.validate()?;
        Ok(model)
    }

    /// Unchecked; only for rates already known to be in range.
    pub(crate) fn annualised(
        monthly_billing: Decimal,
        annual_billing: Decimal,
        estimated_usage: Decimal,
    ) -> Self {
        let annualise = |monthly: Decimal| {
            monthly
                .checked_mul(Decimal::from(12))
                .map(|annual| annual.normalize())
                .unwrap_or(Decimal::MAX)
        };
        Self {
            monthly_billing_annual_per_user: annualise(monthly_billing),
            annual_billing_annual_per_user: annualise(annual_billing),
            estimated_usage_annual_per_user: annualise(estimated_usage),
        }
    }

    /// Platform fee for one user-year under `cadence`.
    pub fn per_user_annual(&self, cadence: BillingCadence) -> Decimal {
        match cadence {
            BillingCadence::Monthly => self.monthly_billing_annual_per_user,
            BillingCadence::Annual => self.annual_billing_annual_per_user,
        }
    }

    pub fn estimated_usage_annual_per_user(&self) -> Decimal {
        self.estimated_usage_annual_per_user
    }
}

/// Input to the comparator.  Built fresh for every evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Number of users.  Signed so that non-positive values can be
    /// reported instead of failing deserialisation.
    pub team_size: i64,
    /// Category key to selected tool id, one entry per category.
    pub selected_tools: BTreeMap<String, String>,
    pub billing_cadence: BillingCadence,
}

impl ComparisonRequest {
    /// Convenience constructor from typed selections.
    pub fn new(
        team_size: i64,
        selections: impl IntoIterator<Item = (Category, &'static str)>,
        billing_cadence: BillingCadence,
    ) -> Self {
        Self {
            team_size,
            selected_tools: selections
                .into_iter()
                .map(|(category, tool)| (category.key().to_string(), tool.to_string()))
                .collect(),
            billing_cadence,
        }
    }
}

/// Current spend attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub category: Category,
    pub tool_id: String,
    pub label: String,
    /// `annual_cost_per_user * team_size`.
    pub annual_cost: Decimal,
}

/// The output of a comparison.  Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub team_size: u32,
    pub billing_cadence: BillingCadence,
    /// Sum of the selected tools' annual cost for the whole team.
    pub current_annual_total: Decimal,
    /// Platform fee plus estimated usage for the whole team.
    pub platform_annual_total: Decimal,
    /// `current_annual_total - platform_annual_total`; positive means
    /// the platform saves money.
    pub annual_delta: Decimal,
    /// Per-category breakdown of `current_annual_total`, in
    /// [`Category::ALL`] order.
    pub breakdown: Vec<LineItem>,
}

impl ComparisonResult {
    pub fn outcome(&self) -> Outcome {
        if self.annual_delta > Decimal::ZERO {
            Outcome::Savings(self.annual_delta)
        } else if self.annual_delta < Decimal::ZERO {
            Outcome::AddedCost(-self.annual_delta)
        } else {
            Outcome::BreakEven
        }
    }
}

/// Sign of the annual delta, with the magnitude carried alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Outcome {
    Savings(Decimal),
    AddedCost(Decimal),
    BreakEven,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_keys_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>(), Ok(category));
        }
        assert_eq!(
            "crm".parse::<Category>(),
            Err(ComparisonError::UnrecognizedCategory("crm".into()))
        );
    }

    #[test]
    fn monthly_rates_are_annualised() {
        let pricing = PlatformPricingModel::from_monthly_rates(
            Decimal::from(30),
            Decimal::from(24),
            Decimal::new(55, 1),
        )
        .unwrap();
        assert_eq!(pricing.per_user_annual(BillingCadence::Annual), Decimal::from(288));
        assert_eq!(pricing.per_user_annual(BillingCadence::Monthly), Decimal::from(360));
        assert_eq!(pricing.estimated_usage_annual_per_user(), Decimal::from(66));
    }

    #[test]
    fn outcome_follows_sign_of_delta() {
        let mut result = ComparisonResult {
            team_size: 1,
            billing_cadence: BillingCadence::Annual,
            current_annual_total: Decimal::from(100),
            platform_annual_total: Decimal::from(400),
            annual_delta: Decimal::from(-300),
            breakdown: Vec::new(),
        };
        assert_eq!(result.outcome(), Outcome::AddedCost(Decimal::from(300)));
        result.annual_delta = Decimal::from(5);
        assert_eq!(result.outcome(), Outcome::Savings(Decimal::from(5)));
        result.annual_delta = Decimal::ZERO;
        assert_eq!(result.outcome(), Outcome::BreakEven);
    }

    #[test]
    fn request_deserialises_from_wire_format() {
        let req: ComparisonRequest = serde_json::from_str(
            r#"{"team_size": -5, "selected_tools": {"email": "none"}, "billing_cadence": "monthly"}"#,
        )
        .unwrap();
        assert_eq!(req.team_size, -5);
        assert_eq!(req.billing_cadence, BillingCadence::Monthly);
        assert_eq!(req.selected_tools.get("email").map(String::as_str), Some("none"));
    }
}
