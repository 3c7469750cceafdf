use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blackbox_core::{DomainError, DomainResult, Entity, RecordId};

/// Contact identifier (rows are scoped to their owning user in storage).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub RecordId);

impl ContactId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ContactId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Fixed page size for contact listings.
pub const CONTACTS_PER_PAGE: usize = 25;

const MIN_RANKING: u8 = 1;
const MAX_RANKING: u8 = 5;

/// A person or company record in the address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    /// Priority ranking, 1 (lowest) to 5 (highest).
    pub ranking: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    /// Defaults to 1 when absent.
    pub ranking: Option<u8>,
}

/// Partial update; `None` fields keep their existing values. An optional
/// field set to an empty string is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub ranking: Option<u8>,
}

impl Contact {
    /// Validate and build a contact from a creation payload.
    pub fn create(id: ContactId, new: NewContact, now: DateTime<Utc>) -> DomainResult<Contact> {
        let name = validate_name(&new.name)?;
        let ranking = validate_ranking(new.ranking.unwrap_or(MIN_RANKING))?;

        Ok(Contact {
            id,
            name,
            phone: normalize_optional(new.phone),
            email: normalize_optional(new.email),
            company: normalize_optional(new.company),
            ranking,
            created_at: now,
            updated_at: None,
        })
    }

    /// Apply a partial update. Validates the whole candidate first; on error
    /// the record is left untouched.
    pub fn apply_patch(&mut self, patch: ContactPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let name = match patch.name {
            Some(name) => validate_name(&name)?,
            None => self.name.clone(),
        };
        let ranking = match patch.ranking {
            Some(ranking) => validate_ranking(ranking)?,
            None => self.ranking,
        };

        self.name = name;
        self.ranking = ranking;
        if let Some(phone) = patch.phone {
            self.phone = normalize_optional(Some(phone));
        }
        if let Some(email) = patch.email {
            self.email = normalize_optional(Some(email));
        }
        if let Some(company) = patch.company {
            self.company = normalize_optional(Some(company));
        }
        self.updated_at = Some(now);
        Ok(())
    }

    /// Case-insensitive substring match over name, company, email and phone.
    ///
    /// A blank query matches every contact.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let fields = [
            Some(self.name.as_str()),
            self.company.as_deref(),
            self.email.as_deref(),
            self.phone.as_deref(),
        ];
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Entity for Contact {
    type Id = ContactId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_ranking(ranking: u8) -> DomainResult<u8> {
    if !(MIN_RANKING..=MAX_RANKING).contains(&ranking) {
        return Err(DomainError::validation("ranking must be between 1 and 5"));
    }
    Ok(ranking)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Number of pages a listing of `total` contacts occupies (0 when empty).
pub fn page_count(total: usize) -> usize {
    total.div_ceil(CONTACTS_PER_PAGE)
}

/// The 1-based `page` of an already-filtered listing. Out-of-range pages
/// yield an empty slice.
pub fn page_slice(contacts: &[Contact], page: usize) -> &[Contact] {
    if page == 0 {
        return &[];
    }
    let from = (page - 1) * CONTACTS_PER_PAGE;
    if from >= contacts.len() {
        return &[];
    }
    let to = (from + CONTACTS_PER_PAGE).min(contacts.len());
    &contacts[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_contact_id() -> ContactId {
        ContactId::new(RecordId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn new_contact(name: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            phone: None,
            email: None,
            company: None,
            ranking: None,
        }
    }

    fn stored_contact(name: &str) -> Contact {
        Contact::create(test_contact_id(), new_contact(name), test_time()).unwrap()
    }

    #[test]
    fn create_defaults_ranking_to_one() {
        let contact = stored_contact("Ada Lovelace");
        assert_eq!(contact.ranking, 1);
        assert_eq!(contact.name, "Ada Lovelace");
        assert!(contact.updated_at.is_none());
    }

    #[test]
    fn create_rejects_blank_name() {
        let err =
            Contact::create(test_contact_id(), new_contact("   "), test_time()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank name"),
        }
    }

    #[test]
    fn create_rejects_out_of_range_ranking() {
        for ranking in [0u8, 6, 200] {
            let mut new = new_contact("Ada Lovelace");
            new.ranking = Some(ranking);
            let err = Contact::create(test_contact_id(), new, test_time()).unwrap_err();
            match err {
                DomainError::Validation(_) => {}
                _ => panic!("Expected Validation error for ranking {ranking}"),
            }
        }
    }

    #[test]
    fn create_normalizes_blank_optional_fields() {
        let mut new = new_contact("Ada Lovelace");
        new.phone = Some("  ".to_string());
        new.email = Some(" ada@example.com ".to_string());
        new.company = None;

        let contact = Contact::create(test_contact_id(), new, test_time()).unwrap();
        assert_eq!(contact.phone, None);
        assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
        assert_eq!(contact.company, None);
    }

    #[test]
    fn patch_updates_fields_and_sets_updated_at() {
        let mut contact = stored_contact("Ada Lovelace");
        let now = test_time();
        let patch = ContactPatch {
            name: Some("Ada King".to_string()),
            company: Some("Analytical Engines Ltd".to_string()),
            ranking: Some(5),
            ..ContactPatch::default()
        };

        contact.apply_patch(patch, now).unwrap();
        assert_eq!(contact.name, "Ada King");
        assert_eq!(contact.company.as_deref(), Some("Analytical Engines Ltd"));
        assert_eq!(contact.ranking, 5);
        assert_eq!(contact.updated_at, Some(now));
    }

    #[test]
    fn patch_clears_optional_field_on_empty_string() {
        let mut contact = stored_contact("Ada Lovelace");
        contact.phone = Some("+4412345".to_string());

        let patch = ContactPatch {
            phone: Some(String::new()),
            ..ContactPatch::default()
        };
        contact.apply_patch(patch, test_time()).unwrap();
        assert_eq!(contact.phone, None);
    }

    #[test]
    fn patch_rejects_invalid_values_and_leaves_record_unchanged() {
        let mut contact = stored_contact("Ada Lovelace");
        let before = contact.clone();

        let patch = ContactPatch {
            name: Some("  ".to_string()),
            ranking: Some(9),
            ..ContactPatch::default()
        };
        let err = contact.apply_patch(patch, test_time()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for invalid patch"),
        }
        assert_eq!(contact, before);
    }

    #[test]
    fn matches_query_searches_all_fields_case_insensitively() {
        let mut contact = stored_contact("Ada Lovelace");
        contact.company = Some("Analytical Engines Ltd".to_string());
        contact.email = Some("ada@example.com".to_string());
        contact.phone = Some("+44 1234 567".to_string());

        assert!(contact.matches_query("LOVELACE"));
        assert!(contact.matches_query("engines"));
        assert!(contact.matches_query("ADA@EXAMPLE"));
        assert!(contact.matches_query("1234"));
        assert!(contact.matches_query(""));
        assert!(contact.matches_query("   "));
        assert!(!contact.matches_query("babbage"));
    }

    #[test]
    fn page_slice_splits_on_page_size() {
        let contacts: Vec<Contact> = (0..30).map(|i| stored_contact(&format!("c{i}"))).collect();

        assert_eq!(page_count(contacts.len()), 2);
        assert_eq!(page_slice(&contacts, 1).len(), CONTACTS_PER_PAGE);
        assert_eq!(page_slice(&contacts, 2).len(), 5);
        assert!(page_slice(&contacts, 3).is_empty());
        assert!(page_slice(&contacts, 0).is_empty());
    }

    #[test]
    fn page_count_is_zero_for_empty_listing() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(25), 1);
        assert_eq!(page_count(26), 2);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn ranking_in_range_is_always_accepted(ranking in 1u8..=5) {
                let mut new = new_contact("Ada Lovelace");
                new.ranking = Some(ranking);
                let contact = Contact::create(test_contact_id(), new, test_time()).unwrap();
                prop_assert_eq!(contact.ranking, ranking);
            }

            #[test]
            fn name_substring_always_matches(name in "[a-z]{3,12}") {
                let contact = stored_contact(&name);
                let fragment = &name[1..name.len() - 1];
                prop_assert!(contact.matches_query(fragment));
                prop_assert!(contact.matches_query(&fragment.to_uppercase()));
            }

            #[test]
            fn page_slices_cover_listing_without_overlap(total in 0usize..120) {
                let contacts: Vec<Contact> =
                    (0..total).map(|i| stored_contact(&format!("c{i}"))).collect();
                let pages = page_count(total);

                let mut seen = 0usize;
                for page in 1..=pages {
                    let slice = page_slice(&contacts, page);
                    prop_assert!(!slice.is_empty());
                    prop_assert!(slice.len() <= CONTACTS_PER_PAGE);
                    seen += slice.len();
                }
                prop_assert_eq!(seen, total);
                prop_assert!(page_slice(&contacts, pages + 1).is_empty());
            }
        }
    }
}
