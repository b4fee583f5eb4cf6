use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use lomartex_clients::{Client, sort_by_name};
use lomartex_core::{ClientId, DomainError, Entity};
use lomartex_packing::PackingList;

use super::{ClientStore, PackingListStore, StoreError, check_packing_list};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
}

/// Insert `record` under its entity id, refusing to overwrite.
fn insert_new<E>(map: &mut HashMap<E::Id, E>, record: E, kind: &str) -> Result<E, StoreError>
where
    E: Entity + Clone,
    E::Id: core::fmt::Display,
{
    let id = record.id().clone();
    if map.contains_key(&id) {
        return Err(DomainError::conflict(format!("{kind} {id} already exists")).into());
    }
    map.insert(id, record.clone());
    Ok(record)
}

/// In-memory client store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    inner: RwLock<HashMap<ClientId, Client>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn create(&self, client: Client) -> Result<Client, StoreError> {
        client.validate()?;
        insert_new(&mut *write(&self.inner)?, client, "client")
    }

    async fn get(&self, id: ClientId) -> Result<Client, StoreError> {
        read(&self.inner)?.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, client: Client) -> Result<Client, StoreError> {
        client.validate()?;
        let mut map = write(&self.inner)?;
        match map.get_mut(&client.id) {
            Some(existing) => {
                *existing = client.clone();
                Ok(client)
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn upsert(&self, client: Client) -> Result<Client, StoreError> {
        client.validate()?;
        write(&self.inner)?.insert(client.id, client.clone());
        Ok(client)
    }

    async fn delete(&self, id: ClientId) -> Result<(), StoreError> {
        write(&self.inner)?.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Client>, StoreError> {
        let mut clients: Vec<Client> = read(&self.inner)?.values().cloned().collect();
        sort_by_name(&mut clients);
        Ok(clients)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Client>, StoreError> {
        let mut clients: Vec<Client> = read(&self.inner)?
            .values()
            .filter(|c| c.matches(query))
            .cloned()
            .collect();
        sort_by_name(&mut clients);
        clients.truncate(limit);
        Ok(clients)
    }
}

/// In-memory packing-list store for tests/dev, keyed by code.
#[derive(Debug, Default)]
pub struct InMemoryPackingListStore {
    inner: RwLock<HashMap<String, PackingList>>,
}

impl InMemoryPackingListStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut lists: Vec<PackingList>) -> Vec<PackingList> {
        lists.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.code.cmp(&a.code))
        });
        lists
    }
}

#[async_trait]
impl PackingListStore for InMemoryPackingListStore {
    async fn create(&self, mut list: PackingList) -> Result<PackingList, StoreError> {
        check_packing_list(&list)?;
        let now = Utc::now();
        list.created_at = Some(now);
        list.updated_at = Some(now);
        insert_new(&mut *write(&self.inner)?, list, "packing list")
    }

    async fn get(&self, code: &str) -> Result<PackingList, StoreError> {
        read(&self.inner)?.get(code).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, code: &str, mut list: PackingList) -> Result<PackingList, StoreError> {
        list.code = code.to_string();
        check_packing_list(&list)?;
        let mut map = write(&self.inner)?;
        let existing = map.get_mut(code).ok_or(StoreError::NotFound)?;
        list.created_at = existing.created_at;
        list.updated_at = Some(Utc::now());
        *existing = list.clone();
        Ok(list)
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        write(&self.inner)?.remove(code).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<PackingList>, StoreError> {
        let lists = read(&self.inner)?.values().cloned().collect();
        Ok(Self::newest_first(lists))
    }

    async fn search(&self, query: &str) -> Result<Vec<PackingList>, StoreError> {
        let needle = query.trim().to_lowercase();
        let lists = read(&self.inner)?
            .values()
            .filter(|l| l.code.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::newest_first(lists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lomartex_clients::Address;
    use lomartex_packing::{BoxModel, ShippingBox};

    fn test_address() -> Address {
        Address {
            street: "Rua das Flores 12".to_string(),
            postal_code: "4000-123".to_string(),
            city: "Porto".to_string(),
            state: "Porto".to_string(),
            country: "Portugal".to_string(),
        }
    }

    fn test_client(name: &str, email: &str) -> Client {
        Client::new(name, email, "+351 900 000 000", test_address())
    }

    fn test_list(code: &str) -> PackingList {
        PackingList {
            code: code.to_string(),
            client: test_client("Acme", "orders@acme.test"),
            boxes: vec![ShippingBox {
                box_number: 1,
                models: vec![BoxModel::new("R1", "Tee", "Navy").with_quantity("M", 3)],
                ..ShippingBox::default()
            }],
            ..PackingList::default()
        }
    }

    #[tokio::test]
    async fn client_crud_round_trip() {
        let store = InMemoryClientStore::new();
        let created = store.create(test_client("Acme", "orders@acme.test")).await.unwrap();
        assert_eq!(store.get(created.id).await.unwrap(), created);

        let mut changed = created.clone();
        changed.phone = "+351 911 111 111".to_string();
        store.update(changed.clone()).await.unwrap();
        assert_eq!(store.get(created.id).await.unwrap().phone, "+351 911 111 111");

        store.delete(created.id).await.unwrap();
        assert_eq!(store.get(created.id).await.unwrap_err(), StoreError::NotFound);
        assert_eq!(store.delete(created.id).await.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn invalid_client_is_rejected_before_write() {
        let store = InMemoryClientStore::new();
        let mut client = test_client("Acme", "orders@acme.test");
        client.email = String::new();
        assert!(matches!(store.create(client).await, Err(StoreError::Validation(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_of_missing_client_is_not_found() {
        let store = InMemoryClientStore::new();
        let err = store.update(test_client("Acme", "a@acme.test")).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound);
        let upserted = store.upsert(test_client("Acme", "a@acme.test")).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![upserted]);
    }

    #[tokio::test]
    async fn client_search_matches_name_or_email_with_limit() {
        let store = InMemoryClientStore::new();
        store.create(test_client("Zeta Wear", "z@zeta.test")).await.unwrap();
        store.create(test_client("Acme Apparel", "orders@northwind.test")).await.unwrap();
        store.create(test_client("Beta", "beta@acme.test")).await.unwrap();

        let names = |clients: Vec<Client>| clients.into_iter().map(|c| c.name).collect::<Vec<_>>();
        assert_eq!(names(store.search("ACME", 5).await.unwrap()), vec!["Acme Apparel", "Beta"]);
        assert_eq!(names(store.search("acme", 1).await.unwrap()), vec!["Acme Apparel"]);
        assert_eq!(
            names(store.list().await.unwrap()),
            vec!["Acme Apparel", "Beta", "Zeta Wear"]
        );
    }

    #[tokio::test]
    async fn duplicate_code_is_a_conflict() {
        let store = InMemoryPackingListStore::new();
        store.create(test_list("LOMPL160126143005")).await.unwrap();
        let err = store.create(test_list("LOMPL160126143005")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn malformed_code_is_an_invalid_id() {
        let store = InMemoryPackingListStore::new();
        let err = store.create(test_list("PL-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_code() {
        let store = InMemoryPackingListStore::new();
        let created = store.create(test_list("LOMPL160126143005")).await.unwrap();

        let mut changed = test_list("LOMPL999999999999");
        changed.po = Some("PO-1".to_string());
        let updated = store.update("LOMPL160126143005", changed).await.unwrap();

        assert_eq!(updated.code, "LOMPL160126143005");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.get("LOMPL160126143005").await.unwrap().po.as_deref(), Some("PO-1"));
        assert_eq!(
            store.update("LOMPL010101000000", test_list("LOMPL010101000000")).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_search_is_by_code() {
        let store = InMemoryPackingListStore::new();
        store.create(test_list("LOMPL010126090000")).await.unwrap();
        store.create(test_list("LOMPL020126090000")).await.unwrap();
        store.create(test_list("LOMPL030126090000")).await.unwrap();

        let codes = |lists: Vec<PackingList>| lists.into_iter().map(|l| l.code).collect::<Vec<_>>();
        assert_eq!(
            codes(store.list().await.unwrap()),
            vec!["LOMPL030126090000", "LOMPL020126090000", "LOMPL010126090000"]
        );
        assert_eq!(codes(store.search("lompl02").await.unwrap()), vec!["LOMPL020126090000"]);
        assert_eq!(store.search("").await.unwrap().len(), 3);

        store.delete("LOMPL020126090000").await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
