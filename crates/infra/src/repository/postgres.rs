//! Postgres-backed repositories.
//!
//! Storage lives in four row-scoped tables (schema managed outside this
//! crate): `contacts`, `sales_pipelines`, `invoices` and `messages`. Every
//! table carries a `user_id` column and every query filters on it, so a
//! record owned by another user is indistinguishable from a missing one.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `RepositoryError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError | Scenario |
//! |------------|----------------------|-----------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate id or serial number |
//! | Database (foreign key violation) | `23503` | `Conflict` | Link to a missing contact/deal |
//! | Database (other) | Any other | `Storage` | Constraint or data errors |
//! | Anything else | N/A | `Storage` | Pool closed, network failures, ... |
//!
//! ## Thread Safety
//!
//! All repositories share the SQLx connection pool, which handles
//! thread-safe connection management; the repository values themselves are
//! cheap to clone.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use blackbox_contacts::{Contact, ContactId};
use blackbox_core::{RecordId, UserId};
use blackbox_invoicing::{Invoice, InvoiceId, InvoiceStatus};
use blackbox_messaging::{Message, MessageId};
use blackbox_pipeline::{Deal, DealId, DealStatus};

use super::{
    ContactRepository, DealRepository, InvoiceRepository, MessageRepository, RepositoryError,
    RepositoryResult,
};

/// Map SQLx errors to RepositoryError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                // Unique violation: duplicate id / serial.
                Some("23505") => RepositoryError::Conflict(msg),
                // Foreign key violation: link to a missing record.
                Some("23503") => RepositoryError::Conflict(msg),
                _ => RepositoryError::storage(operation, msg),
            }
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::storage(operation, "connection pool closed".to_string())
        }
        other => RepositoryError::storage(operation, other.to_string()),
    }
}

fn decode_error(operation: &str, err: impl core::fmt::Display) -> RepositoryError {
    RepositoryError::storage(operation, format!("failed to decode row: {err}"))
}

// SQLx row types

#[derive(Debug)]
struct ContactRow {
    id: Uuid,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    company: Option<String>,
    ranking: i16,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ContactRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(ContactRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            company: row.try_get("company")?,
            ranking: row.try_get("ranking")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: ContactId::new(RecordId::from_uuid(row.id)),
            name: row.name,
            phone: row.phone,
            email: row.email,
            company: row.company,
            // Constrained to 1..=5 by the schema.
            ranking: row.ranking as u8,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct DealRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    contact_id: Option<Uuid>,
    status: String,
    notes: Option<String>,
    amount: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for DealRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(DealRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            contact_id: row.try_get("contact_id")?,
            status: row.try_get("status")?,
            notes: row.try_get("notes")?,
            amount: row.try_get("amount")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn deal_from_row(operation: &str, row: DealRow) -> RepositoryResult<Deal> {
    let status = DealStatus::from_str(&row.status).map_err(|e| decode_error(operation, e))?;
    Ok(Deal {
        id: DealId::new(RecordId::from_uuid(row.id)),
        title: row.title,
        description: row.description,
        contact_id: row.contact_id.map(|id| ContactId::new(RecordId::from_uuid(id))),
        status,
        notes: row.notes,
        // Constrained to >= 0 by the schema.
        amount: row.amount as u64,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[derive(Debug)]
struct InvoiceRow {
    id: Uuid,
    serial_number: String,
    contact_id: Option<Uuid>,
    sales_pipeline_id: Option<Uuid>,
    status: String,
    amount: i64,
    invoice_date: NaiveDate,
    due_date: Option<NaiveDate>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for InvoiceRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(InvoiceRow {
            id: row.try_get("id")?,
            serial_number: row.try_get("serial_number")?,
            contact_id: row.try_get("contact_id")?,
            sales_pipeline_id: row.try_get("sales_pipeline_id")?,
            status: row.try_get("status")?,
            amount: row.try_get("amount")?,
            invoice_date: row.try_get("invoice_date")?,
            due_date: row.try_get("due_date")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn invoice_from_row(operation: &str, row: InvoiceRow) -> RepositoryResult<Invoice> {
    let status = InvoiceStatus::from_str(&row.status).map_err(|e| decode_error(operation, e))?;
    Ok(Invoice {
        id: InvoiceId::new(RecordId::from_uuid(row.id)),
        serial_number: row.serial_number,
        contact_id: row.contact_id.map(|id| ContactId::new(RecordId::from_uuid(id))),
        deal_id: row
            .sales_pipeline_id
            .map(|id| DealId::new(RecordId::from_uuid(id))),
        status,
        amount: row.amount as u64,
        invoice_date: row.invoice_date,
        due_date: row.due_date,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[derive(Debug)]
struct MessageRow {
    id: Uuid,
    sender_name: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for MessageRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(MessageRow {
            id: row.try_get("id")?,
            sender_name: row.try_get("sender_name")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: MessageId::new(RecordId::from_uuid(row.id)),
            sender_name: row.sender_name,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

// Repositories

/// Postgres-backed contact repository.
#[derive(Debug, Clone)]
pub struct PostgresContactRepository {
    pool: Arc<PgPool>,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()), err)]
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Contact>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, email, company, ranking, created_at, updated_at
            FROM contacts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_contacts", e))?;

        let mut contacts = Vec::with_capacity(rows.len());
        for row in rows {
            let row = ContactRow::from_row(&row).map_err(|e| decode_error("list_contacts", e))?;
            contacts.push(row.into());
        }
        Ok(contacts)
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), contact_id = %id), err)]
    async fn get(&self, user_id: UserId, id: ContactId) -> RepositoryResult<Option<Contact>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, email, company, ranking, created_at, updated_at
            FROM contacts
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Uuid::from(id.0))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_contact", e))?;

        match row {
            Some(row) => {
                let row = ContactRow::from_row(&row).map_err(|e| decode_error("get_contact", e))?;
                Ok(Some(row.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, contact), fields(user_id = %user_id.as_uuid(), contact_id = %contact.id), err)]
    async fn create(&self, user_id: UserId, contact: Contact) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, user_id, name, phone, email, company, ranking, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::from(contact.id.0))
        .bind(user_id.as_uuid())
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(&contact.company)
        .bind(contact.ranking as i16)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_contact", e))?;

        Ok(())
    }

    #[instrument(skip(self, contact), fields(user_id = %user_id.as_uuid(), contact_id = %contact.id), err)]
    async fn update(&self, user_id: UserId, contact: Contact) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE contacts
            SET name = $3, phone = $4, email = $5, company = $6, ranking = $7, updated_at = $8
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Uuid::from(contact.id.0))
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(&contact.company)
        .bind(contact.ranking as i16)
        .bind(contact.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_contact", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), contact_id = %id), err)]
    async fn delete(&self, user_id: UserId, id: ContactId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_uuid())
            .bind(Uuid::from(id.0))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_contact", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Postgres-backed deal repository over the `sales_pipelines` table.
#[derive(Debug, Clone)]
pub struct PostgresDealRepository {
    pool: Arc<PgPool>,
}

impl PostgresDealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl DealRepository for PostgresDealRepository {
    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()), err)]
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Deal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, contact_id, status, notes, amount, created_at, updated_at
            FROM sales_pipelines
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_deals", e))?;

        let mut deals = Vec::with_capacity(rows.len());
        for row in rows {
            let row = DealRow::from_row(&row).map_err(|e| decode_error("list_deals", e))?;
            deals.push(deal_from_row("list_deals", row)?);
        }
        Ok(deals)
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), deal_id = %id), err)]
    async fn get(&self, user_id: UserId, id: DealId) -> RepositoryResult<Option<Deal>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, contact_id, status, notes, amount, created_at, updated_at
            FROM sales_pipelines
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Uuid::from(id.0))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_deal", e))?;

        match row {
            Some(row) => {
                let row = DealRow::from_row(&row).map_err(|e| decode_error("get_deal", e))?;
                Ok(Some(deal_from_row("get_deal", row)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, deal), fields(user_id = %user_id.as_uuid(), deal_id = %deal.id), err)]
    async fn create(&self, user_id: UserId, deal: Deal) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sales_pipelines
                (id, user_id, title, description, contact_id, status, notes, amount, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(Uuid::from(deal.id.0))
        .bind(user_id.as_uuid())
        .bind(&deal.title)
        .bind(&deal.description)
        .bind(deal.contact_id.map(|id| Uuid::from(id.0)))
        .bind(deal.status.as_str())
        .bind(&deal.notes)
        .bind(deal.amount as i64)
        .bind(deal.created_at)
        .bind(deal.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_deal", e))?;

        Ok(())
    }

    #[instrument(skip(self, deal), fields(user_id = %user_id.as_uuid(), deal_id = %deal.id), err)]
    async fn update(&self, user_id: UserId, deal: Deal) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE sales_pipelines
            SET title = $3, description = $4, contact_id = $5, status = $6, notes = $7,
                amount = $8, updated_at = $9
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Uuid::from(deal.id.0))
        .bind(&deal.title)
        .bind(&deal.description)
        .bind(deal.contact_id.map(|id| Uuid::from(id.0)))
        .bind(deal.status.as_str())
        .bind(&deal.notes)
        .bind(deal.amount as i64)
        .bind(deal.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_deal", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), deal_id = %id), err)]
    async fn delete(&self, user_id: UserId, id: DealId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM sales_pipelines WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_uuid())
            .bind(Uuid::from(id.0))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_deal", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Postgres-backed invoice repository.
#[derive(Debug, Clone)]
pub struct PostgresInvoiceRepository {
    pool: Arc<PgPool>,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()), err)]
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Invoice>> {
        let rows = sqlx::query(
            r#"
            SELECT id, serial_number, contact_id, sales_pipeline_id, status, amount,
                   invoice_date, due_date, description, created_at, updated_at
            FROM invoices
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_invoices", e))?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            let row = InvoiceRow::from_row(&row).map_err(|e| decode_error("list_invoices", e))?;
            invoices.push(invoice_from_row("list_invoices", row)?);
        }
        Ok(invoices)
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), invoice_id = %id), err)]
    async fn get(&self, user_id: UserId, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
        let row = sqlx::query(
            r#"
            SELECT id, serial_number, contact_id, sales_pipeline_id, status, amount,
                   invoice_date, due_date, description, created_at, updated_at
            FROM invoices
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Uuid::from(id.0))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_invoice", e))?;

        match row {
            Some(row) => {
                let row = InvoiceRow::from_row(&row).map_err(|e| decode_error("get_invoice", e))?;
                Ok(Some(invoice_from_row("get_invoice", row)?))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, invoice), fields(user_id = %user_id.as_uuid(), invoice_id = %invoice.id), err)]
    async fn create(&self, user_id: UserId, invoice: Invoice) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices
                (id, user_id, serial_number, contact_id, sales_pipeline_id, status, amount,
                 invoice_date, due_date, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(Uuid::from(invoice.id.0))
        .bind(user_id.as_uuid())
        .bind(&invoice.serial_number)
        .bind(invoice.contact_id.map(|id| Uuid::from(id.0)))
        .bind(invoice.deal_id.map(|id| Uuid::from(id.0)))
        .bind(invoice.status.as_str())
        .bind(invoice.amount as i64)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(&invoice.description)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_invoice", e))?;

        Ok(())
    }

    #[instrument(skip(self, invoice), fields(user_id = %user_id.as_uuid(), invoice_id = %invoice.id), err)]
    async fn update(&self, user_id: UserId, invoice: Invoice) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET serial_number = $3, contact_id = $4, sales_pipeline_id = $5, status = $6,
                amount = $7, invoice_date = $8, due_date = $9, description = $10, updated_at = $11
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Uuid::from(invoice.id.0))
        .bind(&invoice.serial_number)
        .bind(invoice.contact_id.map(|id| Uuid::from(id.0)))
        .bind(invoice.deal_id.map(|id| Uuid::from(id.0)))
        .bind(invoice.status.as_str())
        .bind(invoice.amount as i64)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(&invoice.description)
        .bind(invoice.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_invoice", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), invoice_id = %id), err)]
    async fn delete(&self, user_id: UserId, id: InvoiceId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_uuid())
            .bind(Uuid::from(id.0))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_invoice", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Postgres-backed message repository.
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: Arc<PgPool>,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()), err)]
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Message>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_name, content, created_at
            FROM messages
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_messages", e))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            let row = MessageRow::from_row(&row).map_err(|e| decode_error("list_messages", e))?;
            messages.push(row.into());
        }
        Ok(messages)
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), message_id = %id), err)]
    async fn get(&self, user_id: UserId, id: MessageId) -> RepositoryResult<Option<Message>> {
        let row = sqlx::query(
            r#"
            SELECT id, sender_name, content, created_at
            FROM messages
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Uuid::from(id.0))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_message", e))?;

        match row {
            Some(row) => {
                let row = MessageRow::from_row(&row).map_err(|e| decode_error("get_message", e))?;
                Ok(Some(row.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, message), fields(user_id = %user_id.as_uuid(), message_id = %message.id), err)]
    async fn create(&self, user_id: UserId, message: Message) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, user_id, sender_name, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::from(message.id.0))
        .bind(user_id.as_uuid())
        .bind(&message.sender_name)
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_message", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid(), message_id = %id), err)]
    async fn delete(&self, user_id: UserId, id: MessageId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM messages WHERE user_id = $1 AND id = $2")
            .bind(user_id.as_uuid())
            .bind(Uuid::from(id.0))
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_message", e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
