use axum::{Router, routing::get};

pub mod contacts;
pub mod dashboard;
pub mod invoices;
pub mod messages;
pub mod pipelines;
pub mod pricing;
pub mod system;

/// Router for all identified (user-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/contacts", contacts::router())
        .nest("/pipelines", pipelines::router())
        .nest("/invoices", invoices::router())
        .nest("/messages", messages::router())
        .nest("/dashboard", dashboard::router())
        .nest("/pricing", pricing::router())
}
