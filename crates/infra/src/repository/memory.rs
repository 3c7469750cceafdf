//! In-memory repositories for dev and tests.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use async_trait::async_trait;

use blackbox_contacts::{Contact, ContactId};
use blackbox_core::{Entity, UserId};
use blackbox_invoicing::{Invoice, InvoiceId};
use blackbox_messaging::{Message, MessageId};
use blackbox_pipeline::{Deal, DealId};

use super::{
    ContactRepository, DealRepository, InvoiceRepository, MessageRepository, RepositoryError,
    RepositoryResult,
};

/// User-scoped key/value table backing the in-memory repositories.
#[derive(Debug)]
struct UserScopedTable<K, V> {
    inner: RwLock<HashMap<(UserId, K), V>>,
}

impl<K, V> Default for UserScopedTable<K, V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> UserScopedTable<K, V>
where
    K: Clone + Eq + Hash,
    V: Entity + Clone,
{
    fn get(&self, user_id: UserId, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&(user_id, key.clone())).cloned()
    }

    fn insert_new(&self, user_id: UserId, key: K, value: V) -> RepositoryResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| RepositoryError::storage("insert", "table lock poisoned"))?;
        if map.contains_key(&(user_id, key.clone())) {
            return Err(RepositoryError::Conflict("record already exists".to_string()));
        }
        map.insert((user_id, key), value);
        Ok(())
    }

    fn replace(&self, user_id: UserId, key: K, value: V) -> RepositoryResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| RepositoryError::storage("update", "table lock poisoned"))?;
        match map.get_mut(&(user_id, key)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove(&self, user_id: UserId, key: &K) -> RepositoryResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| RepositoryError::storage("delete", "table lock poisoned"))?;
        match map.remove(&(user_id, key.clone())) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }

    /// All of the user's records, newest first.
    fn list(&self, user_id: UserId) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut records: Vec<V> = map
            .iter()
            .filter_map(|((u, _k), v)| if *u == user_id { Some(v.clone()) } else { None })
            .collect();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        records
    }
}

macro_rules! impl_in_memory_repository {
    ($repo:ident, $trait_name:ident, $record:ty, $id:ty) => {
        #[derive(Debug, Default)]
        pub struct $repo {
            table: UserScopedTable<$id, $record>,
        }

        impl $repo {
            pub fn new() -> Self {
                Self::default()
            }
        }

        #[async_trait]
        impl $trait_name for $repo {
            async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<$record>> {
                Ok(self.table.list(user_id))
            }

            async fn get(
                &self,
                user_id: UserId,
                id: $id,
            ) -> RepositoryResult<Option<$record>> {
                Ok(self.table.get(user_id, &id))
            }

            async fn create(&self, user_id: UserId, record: $record) -> RepositoryResult<()> {
                self.table.insert_new(user_id, *record.id(), record)
            }

            async fn update(&self, user_id: UserId, record: $record) -> RepositoryResult<()> {
                self.table.replace(user_id, *record.id(), record)
            }

            async fn delete(&self, user_id: UserId, id: $id) -> RepositoryResult<()> {
                self.table.remove(user_id, &id)
            }
        }
    };
}

impl_in_memory_repository!(InMemoryContactRepository, ContactRepository, Contact, ContactId);
impl_in_memory_repository!(InMemoryDealRepository, DealRepository, Deal, DealId);
impl_in_memory_repository!(InMemoryInvoiceRepository, InvoiceRepository, Invoice, InvoiceId);

/// Messages carry no `update`, so the macro does not fit.
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    table: UserScopedTable<MessageId, Message>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn list(&self, user_id: UserId) -> RepositoryResult<Vec<Message>> {
        Ok(self.table.list(user_id))
    }

    async fn get(&self, user_id: UserId, id: MessageId) -> RepositoryResult<Option<Message>> {
        Ok(self.table.get(user_id, &id))
    }

    async fn create(&self, user_id: UserId, message: Message) -> RepositoryResult<()> {
        self.table.insert_new(user_id, message.id, message)
    }

    async fn delete(&self, user_id: UserId, id: MessageId) -> RepositoryResult<()> {
        self.table.remove(user_id, &id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackbox_contacts::NewContact;
    use blackbox_core::RecordId;
    use chrono::{Duration, Utc};

    fn test_user_id() -> UserId {
        UserId::new()
    }

    fn stored_contact(name: &str) -> Contact {
        Contact::create(
            ContactId::new(RecordId::new()),
            NewContact {
                name: name.to_string(),
                phone: None,
                email: None,
                company: None,
                ranking: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = InMemoryContactRepository::new();
        let user_id = test_user_id();
        let contact = stored_contact("Ada Lovelace");

        repo.create(user_id, contact.clone()).await.unwrap();
        let fetched = repo.get(user_id, contact.id).await.unwrap();
        assert_eq!(fetched, Some(contact));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let repo = InMemoryContactRepository::new();
        let user_id = test_user_id();
        let contact = stored_contact("Ada Lovelace");

        repo.create(user_id, contact.clone()).await.unwrap();
        let err = repo.create(user_id, contact).await.unwrap_err();
        match err {
            RepositoryError::Conflict(_) => {}
            _ => panic!("Expected Conflict for duplicate create"),
        }
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let repo = InMemoryContactRepository::new();
        let user_id = test_user_id();

        let base = Utc::now();
        for i in 0..3 {
            let mut contact = stored_contact(&format!("contact {i}"));
            contact.created_at = base + Duration::minutes(i);
            repo.create(user_id, contact).await.unwrap();
        }

        let listed = repo.list(user_id).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].name, "contact 2");
        assert_eq!(listed[2].name, "contact 0");
    }

    #[tokio::test]
    async fn records_are_scoped_to_their_user() {
        let repo = InMemoryContactRepository::new();
        let owner = test_user_id();
        let stranger = test_user_id();
        let contact = stored_contact("Ada Lovelace");

        repo.create(owner, contact.clone()).await.unwrap();

        assert_eq!(repo.get(stranger, contact.id).await.unwrap(), None);
        assert!(repo.list(stranger).await.unwrap().is_empty());
        let err = repo.delete(stranger, contact.id).await.unwrap_err();
        assert_eq!(err, RepositoryError::NotFound);
        // The owner still sees the record.
        assert!(repo.get(owner, contact.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_replaces_existing_record_only() {
        let repo = InMemoryContactRepository::new();
        let user_id = test_user_id();
        let mut contact = stored_contact("Ada Lovelace");

        let err = repo.update(user_id, contact.clone()).await.unwrap_err();
        assert_eq!(err, RepositoryError::NotFound);

        repo.create(user_id, contact.clone()).await.unwrap();
        contact.name = "Ada King".to_string();
        repo.update(user_id, contact.clone()).await.unwrap();

        let fetched = repo.get(user_id, contact.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ada King");
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let repo = InMemoryContactRepository::new();
        let user_id = test_user_id();
        let contact = stored_contact("Ada Lovelace");

        repo.create(user_id, contact.clone()).await.unwrap();
        repo.delete(user_id, contact.id).await.unwrap();

        assert_eq!(repo.get(user_id, contact.id).await.unwrap(), None);
        let err = repo.delete(user_id, contact.id).await.unwrap_err();
        assert_eq!(err, RepositoryError::NotFound);
    }
}
