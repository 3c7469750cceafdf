//! Infrastructure layer: repositories over in-memory and Postgres storage.

pub mod repository;

pub use repository::{
    ContactRepository, DealRepository, InvoiceRepository, MessageRepository, RepositoryError,
    RepositoryResult,
};
pub use repository::memory::{
    InMemoryContactRepository, InMemoryDealRepository, InMemoryInvoiceRepository,
    InMemoryMessageRepository,
};
pub use repository::postgres::{
    PostgresContactRepository, PostgresDealRepository, PostgresInvoiceRepository,
    PostgresMessageRepository,
};
