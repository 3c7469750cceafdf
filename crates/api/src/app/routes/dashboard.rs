use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;

use blackbox_messaging::{DASHBOARD_MESSAGE_LIMIT, most_recent};
use blackbox_pipeline::{DealStatus, Granularity, compute_growth_stats};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

/// How many in-progress deals the dashboard lists.
const DASHBOARD_DEAL_LIMIT: usize = 5;

pub fn router() -> Router {
    Router::new().route("/", get(dashboard))
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// day/week/month (daily/weekly/monthly accepted). Defaults to week.
    pub granularity: Option<String>,
}

/// One-call dashboard payload: growth stats for the selected granularity,
/// the freshest in-progress deals and the inbox preview.
pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<DashboardQuery>,
) -> axum::response::Response {
    let granularity = match query.granularity.as_deref() {
        Some(raw) => match errors::parse_granularity(raw) {
            Ok(granularity) => granularity,
            Err(resp) => return resp,
        },
        None => Granularity::Week,
    };

    let deals = match services.deals.list(user.user_id()).await {
        Ok(deals) => deals,
        Err(e) => return errors::repository_error_to_response(e),
    };
    let contacts = match services.contacts.list(user.user_id()).await {
        Ok(contacts) => contacts,
        Err(e) => return errors::repository_error_to_response(e),
    };
    let messages = match services.messages.list(user.user_id()).await {
        Ok(messages) => messages,
        Err(e) => return errors::repository_error_to_response(e),
    };

    let stats = compute_growth_stats(&deals, granularity, Utc::now());

    let mut in_progress: Vec<_> = deals
        .iter()
        .filter(|d| d.status == DealStatus::InProgress)
        .collect();
    in_progress.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let in_progress: Vec<_> = in_progress
        .into_iter()
        .take(DASHBOARD_DEAL_LIMIT)
        .map(|deal| {
            let contact = deal
                .contact_id
                .and_then(|id| contacts.iter().find(|c| c.id == id));
            dto::deal_summary_json(deal, contact)
        })
        .collect();

    let messages: Vec<_> = most_recent(messages, DASHBOARD_MESSAGE_LIMIT)
        .iter()
        .map(dto::message_to_json)
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "granularity": granularity,
            "stats": stats,
            "in_progress_deals": in_progress,
            "recent_messages": messages,
        })),
    )
        .into_response()
}
