//! redb table definitions for the centerlink state store.
//!
//! Entity tables use `u64` keys and `&[u8]` values (JSON-serialized domain
//! types). The sequence table holds the last identifier handed out per
//! entity table.

use redb::TableDefinition;

/// Entity table shape: `u64` id → JSON bytes.
pub type RecordTable = TableDefinition<'static, u64, &'static [u8]>;

/// Logistics centers keyed by center id.
pub const CENTERS: RecordTable = TableDefinition::new("centers");

/// Delivery orders keyed by order id.
pub const ORDERS: RecordTable = TableDefinition::new("orders");

/// Last allocated id keyed by entity table name.
pub const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Sequence key for center ids.
pub const CENTER_SEQ: &str = "centers";

/// Sequence key for order ids.
pub const ORDER_SEQ: &str = "orders";
