//! Repository interface over the four record stores.
//!
//! Every operation is scoped to the owning user: a record belonging to
//! another user behaves exactly like a missing record. Listings come back
//! newest first; deletes are hard deletes.

use async_trait::async_trait;
use thiserror::Error;

use blackbox_contacts::{Contact, ContactId};
use blackbox_core::UserId;
use blackbox_invoicing::{Invoice, InvoiceId};
use blackbox_messaging::{Message, MessageId};
use blackbox_pipeline::{Deal, DealId};

pub mod memory;
pub mod postgres;

/// Result type used across the repository layer.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage-level error, backend agnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The record does not exist for this user.
    #[error("record not found")]
    NotFound,

    /// A uniqueness or reference constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed; the operation may be retried by the caller.
    #[error("storage failure in {operation}: {message}")]
    Storage { operation: String, message: String },
}

impl RepositoryError {
    pub fn storage(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Contact>>;
    async fn get(&self, user_id: UserId, id: ContactId) -> RepositoryResult<Option<Contact>>;
    async fn create(&self, user_id: UserId, contact: Contact) -> RepositoryResult<()>;
    /// Replaces the stored record; `NotFound` when it does not exist.
    async fn update(&self, user_id: UserId, contact: Contact) -> RepositoryResult<()>;
    async fn delete(&self, user_id: UserId, id: ContactId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait DealRepository: Send + Sync {
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Deal>>;
    async fn get(&self, user_id: UserId, id: DealId) -> RepositoryResult<Option<Deal>>;
    async fn create(&self, user_id: UserId, deal: Deal) -> RepositoryResult<()>;
    async fn update(&self, user_id: UserId, deal: Deal) -> RepositoryResult<()>;
    async fn delete(&self, user_id: UserId, id: DealId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Invoice>>;
    async fn get(&self, user_id: UserId, id: InvoiceId) -> RepositoryResult<Option<Invoice>>;
    async fn create(&self, user_id: UserId, invoice: Invoice) -> RepositoryResult<()>;
    async fn update(&self, user_id: UserId, invoice: Invoice) -> RepositoryResult<()>;
    async fn delete(&self, user_id: UserId, id: InvoiceId) -> RepositoryResult<()>;
}

/// Messages have no editing surface, so this interface carries no `update`.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Message>>;
    async fn get(&self, user_id: UserId, id: MessageId) -> RepositoryResult<Option<Message>>;
    async fn create(&self, user_id: UserId, message: Message) -> RepositoryResult<()>;
    async fn delete(&self, user_id: UserId, id: MessageId) -> RepositoryResult<()>;
}
