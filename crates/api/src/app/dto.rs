use chrono::NaiveDate;
use serde::Deserialize;

use blackbox_contacts::Contact;
use blackbox_invoicing::{Invoice, InvoiceStatus};
use blackbox_messaging::Message;
use blackbox_pipeline::{Deal, DealStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub ranking: Option<u8>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub ranking: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    pub description: Option<String>,
    pub contact_id: Option<String>,
    pub status: Option<DealStatus>,
    pub notes: Option<String>,
    pub amount: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateDealRequest {
    pub description: Option<String>,
    pub contact_id: Option<String>,
    pub status: Option<DealStatus>,
    pub notes: Option<String>,
    pub amount: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub serial_number: Option<String>,
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub status: Option<InvoiceStatus>,
    /// Falls back to the linked deal's amount when absent.
    pub amount: Option<u64>,
    /// Defaults to today.
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateInvoiceRequest {
    pub serial_number: Option<String>,
    pub contact_id: Option<String>,
    pub deal_id: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub amount: Option<u64>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub sender_name: String,
    pub content: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn contact_to_json(contact: &Contact) -> serde_json::Value {
    serde_json::json!({
        "id": contact.id.to_string(),
        "name": contact.name,
        "phone": contact.phone,
        "email": contact.email,
        "company": contact.company,
        "ranking": contact.ranking,
        "created_at": contact.created_at,
        "updated_at": contact.updated_at,
    })
}

/// The contact fields pipeline responses embed.
pub fn contact_summary_json(contact: &Contact) -> serde_json::Value {
    serde_json::json!({
        "id": contact.id.to_string(),
        "name": contact.name,
        "company": contact.company,
        "phone": contact.phone,
    })
}

pub fn deal_to_json(
    deal: &Deal,
    contact: Option<&Contact>,
    latest_invoice_status: Option<InvoiceStatus>,
) -> serde_json::Value {
    serde_json::json!({
        "id": deal.id.to_string(),
        "title": deal.title,
        "description": deal.description,
        "contact_id": deal.contact_id.map(|id| id.to_string()),
        "contact": contact.map(contact_summary_json),
        "status": deal.status,
        "status_label": deal.status.label(),
        "notes": deal.notes,
        "amount": deal.amount,
        "latest_invoice_status": latest_invoice_status,
        "created_at": deal.created_at,
        "updated_at": deal.updated_at,
    })
}

/// Compact shape used by the dashboard's in-progress list.
pub fn deal_summary_json(deal: &Deal, contact: Option<&Contact>) -> serde_json::Value {
    serde_json::json!({
        "id": deal.id.to_string(),
        "title": deal.title,
        "amount": deal.amount,
        "status": deal.status,
        "contact_name": contact.map(|c| c.name.clone()),
        "contact_company": contact.and_then(|c| c.company.clone()),
        "created_at": deal.created_at,
    })
}

pub fn invoice_to_json(invoice: &Invoice) -> serde_json::Value {
    serde_json::json!({
        "id": invoice.id.to_string(),
        "serial_number": invoice.serial_number,
        "contact_id": invoice.contact_id.map(|id| id.to_string()),
        "deal_id": invoice.deal_id.map(|id| id.to_string()),
        "status": invoice.status,
        "amount": invoice.amount,
        "invoice_date": invoice.invoice_date,
        "due_date": invoice.due_date,
        "description": invoice.description,
        "created_at": invoice.created_at,
        "updated_at": invoice.updated_at,
    })
}

pub fn message_to_json(message: &Message) -> serde_json::Value {
    serde_json::json!({
        "id": message.id.to_string(),
        "sender_name": message.sender_name,
        "content": message.content,
        "created_at": message.created_at,
    })
}
