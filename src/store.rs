//! Named substitution-table store.
//!
//! The cipher cores never look tables up themselves; a caller resolves a
//! name against a store and passes the table in by value. This keeps the
//! engine pure while letting a frontend offer saved custom tables.
//! Persistence behind the trait is a caller concern.

use std::collections::HashMap;

use crate::sbox::{AesSbox, DesSboxes};

/// A stored table: either an AES 256-entry box or a DES table set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedTable {
    /// Raw forward table; the inverse is derived on use.
    Aes([u8; 256]),
    /// Eight 4x16 tables.
    Des(DesSboxes),
}

impl NamedTable {
    /// Builds an [`AesSbox`] when this entry holds an AES table.
    pub fn as_aes(&self) -> Option<AesSbox> {
        match self {
            NamedTable::Aes(table) => Some(AesSbox::from_table(*table)),
            NamedTable::Des(_) => None,
        }
    }

    /// The DES table set, when this entry holds one.
    pub fn as_des(&self) -> Option<&DesSboxes> {
        match self {
            NamedTable::Des(sboxes) => Some(sboxes),
            NamedTable::Aes(_) => None,
        }
    }
}

/// Get/put/delete contract for named tables.
pub trait SboxStore {
    /// Resolves a name to its table, if present.
    fn get(&self, name: &str) -> Option<&NamedTable>;
    /// Inserts or replaces a table under `name`.
    fn put(&mut self, name: &str, table: NamedTable);
    /// Removes a table; returns whether it existed.
    fn delete(&mut self, name: &str) -> bool;
}

/// In-memory store, preloaded with the standard tables.
#[derive(Debug, Clone)]
pub struct MemorySboxStore {
    tables: HashMap<String, NamedTable>,
}

impl MemorySboxStore {
    /// Store name of the standard AES S-box.
    pub const STANDARD_AES: &'static str = "standard-aes";
    /// Store name of the standard DES table set.
    pub const STANDARD_DES: &'static str = "standard-des";

    /// Creates a store containing `standard-aes` and `standard-des`.
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            Self::STANDARD_AES.to_string(),
            NamedTable::Aes(*AesSbox::standard().table()),
        );
        tables.insert(
            Self::STANDARD_DES.to_string(),
            NamedTable::Des(DesSboxes::standard()),
        );
        MemorySboxStore { tables }
    }
}

impl Default for MemorySboxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SboxStore for MemorySboxStore {
    fn get(&self, name: &str) -> Option<&NamedTable> {
        self.tables.get(name)
    }

    fn put(&mut self, name: &str, table: NamedTable) {
        self.tables.insert(name.to_string(), table);
    }

    fn delete(&mut self, name: &str) -> bool {
        self.tables.remove(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbox::AES_STANDARD_SBOX;

    #[test]
    fn test_standard_tables_preloaded() {
        let store = MemorySboxStore::new();
        let aes = store.get(MemorySboxStore::STANDARD_AES).unwrap();
        assert_eq!(aes.as_aes().unwrap().table(), &AES_STANDARD_SBOX);
        let des = store.get(MemorySboxStore::STANDARD_DES).unwrap();
        assert_eq!(des.as_des().unwrap(), &DesSboxes::standard());
    }

    #[test]
    fn test_put_get_delete() {
        let mut store = MemorySboxStore::new();
        assert!(store.get("mine").is_none());

        store.put("mine", NamedTable::Aes([7u8; 256]));
        assert!(store.get("mine").is_some());

        assert!(store.delete("mine"));
        assert!(!store.delete("mine"));
        assert!(store.get("mine").is_none());
    }

    #[test]
    fn test_put_replaces() {
        let mut store = MemorySboxStore::new();
        store.put("slot", NamedTable::Aes([1u8; 256]));
        store.put("slot", NamedTable::Aes([2u8; 256]));
        match store.get("slot").unwrap() {
            NamedTable::Aes(table) => assert_eq!(table[0], 2),
            NamedTable::Des(_) => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_variant_accessors() {
        let aes = NamedTable::Aes([0u8; 256]);
        assert!(aes.as_aes().is_some());
        assert!(aes.as_des().is_none());
        let des = NamedTable::Des(DesSboxes::standard());
        assert!(des.as_des().is_some());
        assert!(des.as_aes().is_none());
    }
}
