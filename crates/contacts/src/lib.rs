//! `blackbox-contacts` — contact records: validation, search, paging rules.

pub mod contact;

pub use contact::{
    CONTACTS_PER_PAGE, Contact, ContactId, ContactPatch, NewContact, page_count, page_slice,
};
