//! Cost comparison engine.
//!
//! The `engine` module turns a [`ComparisonRequest`] into a
//! [`ComparisonResult`].  A comparison is a pure function of the
//! request, the [`ToolCatalog`] and the [`PlatformPricingModel`]: no
//! shared state is read or written, so any number of comparisons may
//! run at once.  [`compare_batch`] uses [`rayon`] to do exactly that.

use crate::catalog::ToolCatalog;
use crate::error::ComparisonError;
use crate::models::{
    Category, ComparisonRequest, ComparisonResult, LineItem, PlatformPricingModel,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::trace;

/// Smallest supported team.
pub const MIN_TEAM_SIZE: i64 = 1;
/// Largest supported team.
pub const MAX_TEAM_SIZE: i64 = 10_000;

/// Compares the current tool spend described by `request` against the
/// platform's pricing.
///
/// Validation is all-or-nothing: the team size is checked first, then
/// every selection key, then every selected tool id, and finally that
/// each category has a selection.  The first violation is returned.
///
/// Catalog and pricing construction caps every per-user cost at
/// [`crate::catalog::MAX_ANNUAL_COST_PER_USER`], so totals for any
/// valid team size cannot overflow.
pub fn compare(
    request: &ComparisonRequest,
    tools: &ToolCatalog,
    pricing: &PlatformPricingModel,
) -> Result<ComparisonResult, ComparisonError> {
    let team_size = validate_team_size(request.team_size)?;

    let mut selected = Vec::with_capacity(Category::ALL.len());
    for (key, tool_id) in &request.selected_tools {
        let category: Category = key.parse()?;
        let entry = tools
            .lookup(category, tool_id)
            .ok_or_else(|| ComparisonError::UnknownTool {
                category,
                tool: tool_id.clone(),
            })?;
        selected.push(entry);
    }
    let breakdown = Category::ALL
        .into_iter()
        .map(|category| {
            let entry = selected
                .iter()
                .find(|e| e.category == category)
                .ok_or(ComparisonError::MissingCategory(category))?;
            Ok(LineItem {
                category,
                tool_id: entry.id.clone(),
                label: entry.label.clone(),
                annual_cost: entry.annual_cost_per_user * Decimal::from(team_size),
            })
        })
        .collect::<Result<Vec<_>, ComparisonError>>()?;

    let current_annual_total: Decimal = breakdown.iter().map(|item| item.annual_cost).sum();
    let platform_per_user = pricing.per_user_annual(request.billing_cadence)
        + pricing.estimated_usage_annual_per_user();
    let platform_annual_total = platform_per_user * Decimal::from(team_size);
    let annual_delta = current_annual_total - platform_annual_total;

    trace!(
        team_size,
        %current_annual_total,
        %platform_annual_total,
        %annual_delta,
        "comparison computed"
    );

    Ok(ComparisonResult {
        team_size,
        billing_cadence: request.billing_cadence,
        current_annual_total,
        platform_annual_total,
        annual_delta,
        breakdown,
    })
}

/// Runs many independent comparisons in parallel.  The output has one
/// entry per request, in request order.
pub fn compare_batch(
    requests: &[ComparisonRequest],
    tools: &ToolCatalog,
    pricing: &PlatformPricingModel,
) -> Vec<Result<ComparisonResult, ComparisonError>> {
    requests
        .par_iter()
        .map(|request| compare(request, tools, pricing))
        .collect()
}

/// Evaluates one tool selection at several team sizes, e.g. to plot
/// savings against headcount.  The team size in `template` is ignored.
pub fn team_size_sweep(
    template: &ComparisonRequest,
    team_sizes: &[i64],
    tools: &ToolCatalog,
    pricing: &PlatformPricingModel,
) -> Vec<Result<ComparisonResult, ComparisonError>> {
    let requests: Vec<ComparisonRequest> = team_sizes
        .iter()
        .map(|&team_size| ComparisonRequest {
            team_size,
            ..template.clone()
        })
        .collect();
    compare_batch(&requests, tools, pricing)
}

fn validate_team_size(value: i64) -> Result<u32, ComparisonError> {
    if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&value) {
        return Err(ComparisonError::InvalidTeamSize {
            value,
            min: MIN_TEAM_SIZE,
            max: MAX_TEAM_SIZE,
        });
    }
    u32::try_from(value).map_err(|_| ComparisonError::InvalidTeamSize {
        value,
        min: MIN_TEAM_SIZE,
        max: MAX_TEAM_SIZE,
    })
}
