use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use blackbox_contacts::ContactId;
use blackbox_core::{DomainError, DomainResult, Entity, RecordId};
use blackbox_pipeline::DealId;

/// Invoice identifier (rows are scoped to their owning user in storage).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub RecordId);

impl InvoiceId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
}

impl InvoiceStatus {
    /// Wire/storage name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Unpaid => "unpaid",
        }
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(InvoiceStatus::Paid),
            "unpaid" => Ok(InvoiceStatus::Unpaid),
            _ => Err(DomainError::validation(format!("unknown invoice status: {s}"))),
        }
    }
}

/// An invoice record, optionally linked to a contact and a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Generated serial, e.g. `INV-483920`; callers may supply their own.
    pub serial_number: String,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
    pub status: InvoiceStatus,
    /// Amount due in smallest currency unit (e.g., cents).
    pub amount: u64,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    /// Generated from the creation instant when absent.
    pub serial_number: Option<String>,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
    /// Defaults to `unpaid` when absent.
    pub status: Option<InvoiceStatus>,
    pub amount: u64,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Partial update; `None` fields keep their existing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePatch {
    pub serial_number: Option<String>,
    pub contact_id: Option<ContactId>,
    pub deal_id: Option<DealId>,
    pub status: Option<InvoiceStatus>,
    pub amount: Option<u64>,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl Invoice {
    /// Validate and build an invoice from a creation payload.
    pub fn create(id: InvoiceId, new: NewInvoice, now: DateTime<Utc>) -> DomainResult<Invoice> {
        let serial_number = match new.serial_number {
            Some(serial) => validate_serial(&serial)?,
            None => invoice_serial(now),
        };

        Ok(Invoice {
            id,
            serial_number,
            contact_id: new.contact_id,
            deal_id: new.deal_id,
            status: new.status.unwrap_or(InvoiceStatus::Unpaid),
            amount: new.amount,
            invoice_date: new.invoice_date,
            due_date: new.due_date,
            description: normalize_optional(new.description),
            created_at: now,
            updated_at: None,
        })
    }

    /// Apply a partial update. Validates first; on error the record is left
    /// untouched.
    pub fn apply_patch(&mut self, patch: InvoicePatch, now: DateTime<Utc>) -> DomainResult<()> {
        let serial_number = match patch.serial_number {
            Some(serial) => validate_serial(&serial)?,
            None => self.serial_number.clone(),
        };

        self.serial_number = serial_number;
        if let Some(contact_id) = patch.contact_id {
            self.contact_id = Some(contact_id);
        }
        if let Some(deal_id) = patch.deal_id {
            self.deal_id = Some(deal_id);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(invoice_date) = patch.invoice_date {
            self.invoice_date = invoice_date;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(description) = patch.description {
            self.description = normalize_optional(Some(description));
        }
        self.updated_at = Some(now);
        Ok(())
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Serial number: `INV-` + last six digits of the creation instant in
/// milliseconds.
pub fn invoice_serial(created_at: DateTime<Utc>) -> String {
    let millis = created_at.timestamp_millis().unsigned_abs() % 1_000_000;
    format!("INV-{millis:06}")
}

fn validate_serial(serial: &str) -> DomainResult<String> {
    let trimmed = serial.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("serial number cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_invoice_id() -> InvoiceId {
        InvoiceId::new(RecordId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn new_invoice(amount: u64) -> NewInvoice {
        NewInvoice {
            serial_number: None,
            contact_id: None,
            deal_id: None,
            status: None,
            amount,
            invoice_date: test_date(),
            due_date: None,
            description: None,
        }
    }

    #[test]
    fn create_defaults_status_to_unpaid_and_generates_serial() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let invoice = Invoice::create(test_invoice_id(), new_invoice(12_000), created).unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert!(!invoice.is_paid());
        assert!(invoice.serial_number.starts_with("INV-"));
        assert_eq!(invoice.serial_number.len(), "INV-".len() + 6);
        assert!(
            invoice.serial_number["INV-".len()..]
                .chars()
                .all(|c| c.is_ascii_digit())
        );
    }

    #[test]
    fn create_keeps_caller_supplied_serial() {
        let mut new = new_invoice(100);
        new.serial_number = Some("INV-CUSTOM-01".to_string());

        let invoice = Invoice::create(test_invoice_id(), new, test_time()).unwrap();
        assert_eq!(invoice.serial_number, "INV-CUSTOM-01");
    }

    #[test]
    fn create_rejects_blank_serial() {
        let mut new = new_invoice(100);
        new.serial_number = Some("   ".to_string());

        let err = Invoice::create(test_invoice_id(), new, test_time()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank serial"),
        }
    }

    #[test]
    fn serial_is_deterministic_per_instant() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(invoice_serial(at), invoice_serial(at));
    }

    #[test]
    fn patch_marks_invoice_paid_and_sets_updated_at() {
        let mut invoice = Invoice::create(test_invoice_id(), new_invoice(100), test_time()).unwrap();
        let now = test_time();

        let patch = InvoicePatch {
            status: Some(InvoiceStatus::Paid),
            due_date: Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            ..InvoicePatch::default()
        };
        invoice.apply_patch(patch, now).unwrap();

        assert!(invoice.is_paid());
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(invoice.updated_at, Some(now));
    }

    #[test]
    fn patch_rejects_blank_serial_and_leaves_record_unchanged() {
        let mut invoice = Invoice::create(test_invoice_id(), new_invoice(100), test_time()).unwrap();
        let before = invoice.clone();

        let patch = InvoicePatch {
            serial_number: Some(" ".to_string()),
            amount: Some(999),
            ..InvoicePatch::default()
        };
        let err = invoice.apply_patch(patch, test_time()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank serial"),
        }
        assert_eq!(invoice, before);
    }
}
