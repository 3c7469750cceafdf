use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use blackbox_pricing::{CUSTOM_UNIT_RATE, custom_quote, plans};

pub fn router() -> Router {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/quote", get(quote))
}

pub async fn list_plans() -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "plans": plans() })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    /// Number of additional users; zero or negative prices at 0.
    pub units: i64,
}

pub async fn quote(Query(query): Query<QuoteQuery>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "units": query.units,
            "unit_rate": CUSTOM_UNIT_RATE,
            "total": custom_quote(query.units),
        })),
    )
        .into_response()
}
