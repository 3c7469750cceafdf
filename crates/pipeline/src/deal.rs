use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blackbox_contacts::ContactId;
use blackbox_core::{DomainError, DomainResult, Entity, RecordId};

/// Deal identifier (rows are scoped to their owning user in storage).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(pub RecordId);

impl DealId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DealId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Funnel stage of a deal. Transitions are user-driven; no ordering is
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Contacted,
    Qualified,
    InProgress,
    ClosedWon,
    ClosedLost,
}

impl DealStatus {
    /// Every stage, in funnel order. Kanban columns follow this order.
    pub const ALL: [DealStatus; 5] = [
        DealStatus::Contacted,
        DealStatus::Qualified,
        DealStatus::InProgress,
        DealStatus::ClosedWon,
        DealStatus::ClosedLost,
    ];

    pub fn is_closed(self) -> bool {
        matches!(self, DealStatus::ClosedWon | DealStatus::ClosedLost)
    }

    /// Wire/storage name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            DealStatus::Contacted => "contacted",
            DealStatus::Qualified => "qualified",
            DealStatus::InProgress => "in_progress",
            DealStatus::ClosedWon => "closed_won",
            DealStatus::ClosedLost => "closed_lost",
        }
    }

    /// Human-readable column label.
    pub fn label(self) -> &'static str {
        match self {
            DealStatus::Contacted => "Contacted",
            DealStatus::Qualified => "Qualified",
            DealStatus::InProgress => "In progress",
            DealStatus::ClosedWon => "Closed won",
            DealStatus::ClosedLost => "Closed lost",
        }
    }
}

impl core::str::FromStr for DealStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown deal status: {s}")))
    }
}

/// A sales pipeline record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    /// Generated serial title, e.g. `SP-483920XK7`.
    pub title: String,
    pub description: Option<String>,
    pub contact_id: Option<ContactId>,
    pub status: DealStatus,
    pub notes: Option<String>,
    /// Deal value in smallest currency unit (e.g., cents).
    pub amount: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a deal. The title is generated server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeal {
    pub description: Option<String>,
    pub contact_id: Option<ContactId>,
    /// Defaults to `contacted` when absent.
    pub status: Option<DealStatus>,
    pub notes: Option<String>,
    /// Deal value in smallest currency unit.
    pub amount: u64,
}

/// Partial update; `None` fields keep their existing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPatch {
    pub description: Option<String>,
    pub contact_id: Option<ContactId>,
    pub status: Option<DealStatus>,
    pub notes: Option<String>,
    pub amount: Option<u64>,
}

impl Deal {
    /// Build a deal from a creation payload, generating its serial title.
    pub fn create(id: DealId, new: NewDeal, now: DateTime<Utc>) -> Deal {
        Deal {
            id,
            title: deal_serial(id, now),
            description: normalize_optional(new.description),
            contact_id: new.contact_id,
            status: new.status.unwrap_or(DealStatus::Contacted),
            notes: normalize_optional(new.notes),
            amount: new.amount,
            created_at: now,
            updated_at: None,
        }
    }

    /// Apply a partial update. Closed deals keep their amount.
    pub fn apply_patch(&mut self, patch: DealPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(amount) = patch.amount {
            if self.status.is_closed() && amount != self.amount {
                return Err(DomainError::validation(
                    "amount of a closed deal cannot change",
                ));
            }
            self.amount = amount;
        }

        if let Some(description) = patch.description {
            self.description = normalize_optional(Some(description));
        }
        if let Some(notes) = patch.notes {
            self.notes = normalize_optional(Some(notes));
        }
        if let Some(contact_id) = patch.contact_id {
            self.contact_id = Some(contact_id);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Some(now);
        Ok(())
    }
}

impl Entity for Deal {
    type Id = DealId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

const SERIAL_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Serial title: `SP-` + last six digits of the creation instant in
/// milliseconds + three `[A-Z0-9]` characters drawn from the id entropy.
/// Deterministic for a given `(id, created_at)` pair.
pub fn deal_serial(id: DealId, created_at: DateTime<Utc>) -> String {
    let millis = created_at.timestamp_millis().unsigned_abs() % 1_000_000;
    let uuid = Uuid::from(id.0);
    let entropy: String = uuid.as_bytes()[13..16]
        .iter()
        .map(|b| SERIAL_CHARSET[*b as usize % SERIAL_CHARSET.len()] as char)
        .collect();
    format!("SP-{millis:06}{entropy}")
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One kanban column: a funnel stage and its deals, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealColumn {
    pub status: DealStatus,
    pub label: String,
    pub deals: Vec<Deal>,
}

/// Deals grouped into kanban columns, one per funnel stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealBoard {
    pub columns: Vec<DealColumn>,
}

impl DealBoard {
    /// Group deals by stage. Every stage yields a column, empty or not;
    /// deals within a column are ordered newest first.
    pub fn from_deals(mut deals: Vec<Deal>) -> DealBoard {
        deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let columns = DealStatus::ALL
            .into_iter()
            .map(|status| DealColumn {
                status,
                label: status.label().to_string(),
                deals: deals.iter().filter(|d| d.status == status).cloned().collect(),
            })
            .collect();

        DealBoard { columns }
    }
}
