//! Dashboard stats: one aggregate read over the distribution history.

use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use smartmeet_core::entities::{DeliveryMethod, DeliveryStatus, Distribution};
use smartmeet_store::DistributionFilter;

use crate::errors::ApiError;
use crate::state::AppState;

/// How many recent distributions the stats payload carries.
const RECENT_LIMIT: usize = 5;

/// Query params for `GET /api/dashboard/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Restrict the stats to one owner's distributions.
    pub owner: Option<String>,
}

/// Aggregated send activity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Total distributions.
    pub total_distributions: usize,
    /// Distributions with `sent` status.
    pub sent: usize,
    /// Distributions with `failed` status.
    pub failed: usize,
    /// Distributions with `pending` status.
    pub pending: usize,
    /// Email distributions.
    pub by_email: usize,
    /// Messaging distributions.
    pub by_messaging: usize,
    /// Recipients attempted across all sends. Each distribution carries its
    /// template's accumulated history, so each template counts once.
    pub total_recipients: usize,
    /// Most recent distributions, newest first.
    pub recent: Vec<Distribution>,
}

/// `GET /api/dashboard/stats`
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<DashboardStats>, ApiError> {
    let filter = DistributionFilter {
        owner: query.owner,
        ..DistributionFilter::default()
    };
    let distributions = state.store.distributions(&filter)?;

    let count_status =
        |status: DeliveryStatus| distributions.iter().filter(|d| d.status == status).count();
    let count_method =
        |method: DeliveryMethod| distributions.iter().filter(|d| d.method == method).count();

    let stats = DashboardStats {
        total_distributions: distributions.len(),
        sent: count_status(DeliveryStatus::Sent),
        failed: count_status(DeliveryStatus::Failed),
        pending: count_status(DeliveryStatus::Pending),
        by_email: count_method(DeliveryMethod::Email),
        by_messaging: count_method(DeliveryMethod::Messaging),
        total_recipients: {
            let mut seen = HashSet::new();
            distributions
                .iter()
                .filter(|d| seen.insert(d.template_id.as_str()))
                .map(|d| d.recipients.len())
                .sum()
        },
        recent: distributions.into_iter().take(RECENT_LIMIT).collect(),
    };
    Ok(Json(stats))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
