//! StateStore — redb-backed persistence for centerlink.
//!
//! Provides typed CRUD operations over centers and orders. Values are
//! JSON-serialized into redb's `&[u8]` value columns under `u64` keys.
//! The store supports both on-disk and in-memory backends (the latter for
//! testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(CENTERS).map_err(map_err!(Table))?;
        txn.open_table(ORDERS).map_err(map_err!(Table))?;
        txn.open_table(SEQUENCES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Centers ────────────────────────────────────────────────────

    /// Store a new center under a freshly allocated id.
    pub fn insert_center(&self, new: NewCenter) -> StateResult<Center> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let id = next_id(&txn, CENTER_SEQ)?;
        let center = new.with_id(id);
        write_record(&txn, CENTERS, id, &center)?;
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id, name = %center.name, "center created");
        Ok(center)
    }

    /// Insert or update a center by id.
    pub fn put_center(&self, center: &Center) -> StateResult<()> {
        self.put_record(CENTERS, center.id, center)?;
        debug!(
            id = center.id,
            load = center.current_load,
            max = center.max_capacity,
            "center stored"
        );
        Ok(())
    }

    /// Get a center by id.
    pub fn get_center(&self, id: CenterId) -> StateResult<Option<Center>> {
        self.get_record(CENTERS, id)
    }

    /// List all centers, ascending by id.
    pub fn list_centers(&self) -> StateResult<Vec<Center>> {
        self.list_records(CENTERS)
    }

    /// Find the center sitting at exactly these coordinates, if any.
    pub fn find_center_at(&self, coordinates: Coordinates) -> StateResult<Option<Center>> {
        Ok(self
            .list_centers()?
            .into_iter()
            .find(|c| c.coordinates == coordinates))
    }

    /// Delete a center by id. Returns true if it existed.
    pub fn delete_center(&self, id: CenterId) -> StateResult<bool> {
        let existed = self.delete_record(CENTERS, id)?;
        debug!(id, existed, "center deleted");
        Ok(existed)
    }

    // ── Orders ─────────────────────────────────────────────────────

    /// Store a new pending order under a freshly allocated id.
    pub fn insert_order(&self, new: NewOrder) -> StateResult<Order> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let id = next_id(&txn, ORDER_SEQ)?;
        let order = new.with_id(id);
        write_record(&txn, ORDERS, id, &order)?;
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id, size = %order.size, "order created");
        Ok(order)
    }

    /// Insert or update an order by id.
    pub fn put_order(&self, order: &Order) -> StateResult<()> {
        self.put_record(ORDERS, order.id, order)?;
        debug!(id = order.id, status = ?order.status, "order stored");
        Ok(())
    }

    /// Get an order by id.
    pub fn get_order(&self, id: OrderId) -> StateResult<Option<Order>> {
        self.get_record(ORDERS, id)
    }

    /// List all orders, ascending by id.
    pub fn list_orders(&self) -> StateResult<Vec<Order>> {
        self.list_records(ORDERS)
    }

    /// List orders in the given status, ascending by id.
    pub fn list_orders_by_status(&self, status: OrderStatus) -> StateResult<Vec<Order>> {
        let mut orders = self.list_orders()?;
        orders.retain(|o| o.status == status);
        Ok(orders)
    }

    // ── Record helpers ─────────────────────────────────────────────

    fn put_record<T: Serialize>(&self, table: RecordTable, id: u64, record: &T) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        write_record(&txn, table, id, record)?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn get_record<T: DeserializeOwned>(&self, table: RecordTable, id: u64) -> StateResult<Option<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(table).map_err(map_err!(Table))?;
        match table.get(id).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: T =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn list_records<T: DeserializeOwned>(&self, table: RecordTable) -> StateResult<Vec<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(table).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: T =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(record);
        }
        Ok(results)
    }

    fn delete_record(&self, table: RecordTable, id: u64) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(table).map_err(map_err!(Table))?;
            existed = table.remove(id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(existed)
    }
}

/// Bump and return the sequence for `seq` inside an open write transaction.
fn next_id(txn: &WriteTransaction, seq: &str) -> StateResult<u64> {
    let mut table = txn.open_table(SEQUENCES).map_err(map_err!(Table))?;
    let last = table
        .get(seq)
        .map_err(map_err!(Read))?
        .map(|guard| guard.value())
        .unwrap_or(0);
    let next = last + 1;
    table.insert(seq, next).map_err(map_err!(Write))?;
    Ok(next)
}

fn write_record<T: Serialize>(
    txn: &WriteTransaction,
    table: RecordTable,
    id: u64,
    record: &T,
) -> StateResult<()> {
    let value = serde_json::to_vec(record).map_err(map_err!(Serialize))?;
    let mut table = txn.open_table(table).map_err(map_err!(Table))?;
    table
        .insert(id, value.as_slice())
        .map_err(map_err!(Write))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_center(name: &str, lat: f64, lon: f64) -> NewCenter {
        NewCenter {
            name: name.to_string(),
            capacity: "MS".to_string(),
            status: CenterStatus::Available,
            max_capacity: 10,
            current_load: 0,
            coordinates: Coordinates::new(lat, lon),
        }
    }

    fn new_order(customer_id: u64, size: &str) -> NewOrder {
        NewOrder {
            customer_id,
            size: size.to_string(),
            coordinates: Coordinates::new(40.0, -3.0),
        }
    }

    // ── Center CRUD ────────────────────────────────────────────────

    #[test]
    fn center_insert_and_get() {
        let store = StateStore::open_in_memory().unwrap();
        let center = store.insert_center(new_center("Madrid", 40.4, -3.7)).unwrap();

        assert_eq!(center.id, 1);
        let retrieved = store.get_center(center.id).unwrap();
        assert_eq!(retrieved, Some(center));
    }

    #[test]
    fn center_get_nonexistent_returns_none() {
        let store = StateStore::open_in_memory().unwrap();
        assert!(store.get_center(42).unwrap().is_none());
    }

    #[test]
    fn center_ids_are_monotonic() {
        let store = StateStore::open_in_memory().unwrap();
        let a = store.insert_center(new_center("a", 1.0, 1.0)).unwrap();
        let b = store.insert_center(new_center("b", 2.0, 2.0)).unwrap();
        store.delete_center(b.id).unwrap();
        let c = store.insert_center(new_center("c", 3.0, 3.0)).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        // Deleted ids are never reused.
        assert_eq!(c.id, 3);
    }

    #[test]
    fn center_update_in_place() {
        let store = StateStore::open_in_memory().unwrap();
        let mut center = store.insert_center(new_center("Madrid", 40.4, -3.7)).unwrap();

        center.current_load = 7;
        center.status = CenterStatus::Occupied;
        store.put_center(&center).unwrap();

        let retrieved = store.get_center(center.id).unwrap().unwrap();
        assert_eq!(retrieved.current_load, 7);
        assert_eq!(retrieved.status, CenterStatus::Occupied);
        assert_eq!(store.list_centers().unwrap().len(), 1);
    }

    #[test]
    fn center_list_is_ordered_by_id() {
        let store = StateStore::open_in_memory().unwrap();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            store.insert_center(new_center(name, i as f64, 0.0)).unwrap();
        }

        let ids: Vec<CenterId> = store.list_centers().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn center_find_at_coordinates() {
        let store = StateStore::open_in_memory().unwrap();
        store.insert_center(new_center("Madrid", 40.4, -3.7)).unwrap();

        let hit = store.find_center_at(Coordinates::new(40.4, -3.7)).unwrap();
        assert_eq!(hit.map(|c| c.name), Some("Madrid".to_string()));

        let miss = store.find_center_at(Coordinates::new(40.4, -3.8)).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn center_delete() {
        let store = StateStore::open_in_memory().unwrap();
        let center = store.insert_center(new_center("Madrid", 40.4, -3.7)).unwrap();

        assert!(store.delete_center(center.id).unwrap());
        assert!(!store.delete_center(center.id).unwrap());
        assert!(store.get_center(center.id).unwrap().is_none());
    }

    // ── Order CRUD ─────────────────────────────────────────────────

    #[test]
    fn order_insert_starts_pending() {
        let store = StateStore::open_in_memory().unwrap();
        let order = store.insert_order(new_order(1, "M")).unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.assigned_center.is_none());
        assert_eq!(store.get_order(1).unwrap(), Some(order));
    }

    #[test]
    fn order_and_center_sequences_are_independent() {
        let store = StateStore::open_in_memory().unwrap();
        store.insert_center(new_center("a", 1.0, 1.0)).unwrap();
        store.insert_center(new_center("b", 2.0, 2.0)).unwrap();

        let order = store.insert_order(new_order(1, "S")).unwrap();
        assert_eq!(order.id, 1);
    }

    #[test]
    fn order_list_by_status() {
        let store = StateStore::open_in_memory().unwrap();
        store.insert_order(new_order(1, "S")).unwrap();
        let mut second = store.insert_order(new_order(2, "M")).unwrap();
        store.insert_order(new_order(3, "B")).unwrap();

        second.assign_to("Madrid");
        store.put_order(&second).unwrap();

        let pending = store.list_orders_by_status(OrderStatus::Pending).unwrap();
        let ids: Vec<OrderId> = pending.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let assigned = store.list_orders_by_status(OrderStatus::Assigned).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].assigned_center.as_deref(), Some("Madrid"));
    }

    // ── Persistence (on-disk) ──────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        {
            let store = StateStore::open(&db_path).unwrap();
            store.insert_center(new_center("Madrid", 40.4, -3.7)).unwrap();
            store.insert_order(new_order(1, "S")).unwrap();
        }

        // Reopen the same database file; the sequence must carry on.
        let store = StateStore::open(&db_path).unwrap();
        assert_eq!(store.get_center(1).unwrap().unwrap().name, "Madrid");
        let order = store.insert_order(new_order(2, "M")).unwrap();
        assert_eq!(order.id, 2);
    }

    // ── Edge cases ─────────────────────────────────────────────────

    #[test]
    fn empty_store_operations() {
        let store = StateStore::open_in_memory().unwrap();

        assert!(store.list_centers().unwrap().is_empty());
        assert!(store.list_orders().unwrap().is_empty());
        assert!(store.list_orders_by_status(OrderStatus::Pending).unwrap().is_empty());
        assert!(store.find_center_at(Coordinates::new(0.0, 0.0)).unwrap().is_none());
        assert!(!store.delete_center(1).unwrap());
    }
}
