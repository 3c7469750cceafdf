use std::sync::Arc;

use sqlx::PgPool;

use blackbox_infra::{
    ContactRepository, DealRepository, InMemoryContactRepository, InMemoryDealRepository,
    InMemoryInvoiceRepository, InMemoryMessageRepository, InvoiceRepository, MessageRepository,
    PostgresContactRepository, PostgresDealRepository, PostgresInvoiceRepository,
    PostgresMessageRepository,
};

/// Origin used for share links when `APP_ORIGIN` is not set.
pub const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:8080";

/// Shared handles passed to every handler via an [`axum::Extension`] layer.
#[derive(Clone)]
pub struct AppServices {
    pub contacts: Arc<dyn ContactRepository>,
    pub deals: Arc<dyn DealRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub messages: Arc<dyn MessageRepository>,
    share_origin: String,
}

impl AppServices {
    /// Public origin prefixed onto invoice share links.
    pub fn share_origin(&self) -> &str {
        &self.share_origin
    }
}

/// Build services from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects the Postgres repositories (requires
/// `DATABASE_URL`); anything else selects the in-memory repositories used
/// for dev and tests.
pub async fn build_services() -> AppServices {
    let share_origin = std::env::var("APP_ORIGIN").unwrap_or_else(|_| {
        tracing::warn!("APP_ORIGIN not set; share links use {DEFAULT_SHARE_ORIGIN}");
        DEFAULT_SHARE_ORIGIN.to_string()
    });

    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        build_persistent_services(share_origin).await
    } else {
        build_in_memory_services(share_origin)
    }
}

fn build_in_memory_services(share_origin: String) -> AppServices {
    AppServices {
        contacts: Arc::new(InMemoryContactRepository::new()),
        deals: Arc::new(InMemoryDealRepository::new()),
        invoices: Arc::new(InMemoryInvoiceRepository::new()),
        messages: Arc::new(InMemoryMessageRepository::new()),
        share_origin,
    }
}

async fn build_persistent_services(share_origin: String) -> AppServices {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    AppServices {
        contacts: Arc::new(PostgresContactRepository::new(pool.clone())),
        deals: Arc::new(PostgresDealRepository::new(pool.clone())),
        invoices: Arc::new(PostgresInvoiceRepository::new(pool.clone())),
        messages: Arc::new(PostgresMessageRepository::new(pool)),
        share_origin,
    }
}
