//! The key-value store collaborator.
//!
//! The executor and chain coordinator depend on an externally provided
//! store that can run their operations atomically with respect to a
//! single batch. [`LedgerStore`] is the trait boundary for that
//! collaborator; [`MemoryStore`] is a reference, in-process
//! implementation used by tests and by `ledger-web` — it is not a
//! production backend (see DESIGN.md).

use std::collections::BTreeMap;

/// Store primitives the core depends on.
///
/// All operations are synchronous: the executor assumes each call is
/// atomic with respect to the batch currently being processed, and
/// never yields mid-batch.
pub trait LedgerStore {
    /// Whole-value fetch; `None` if the key does not exist.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Overwrite or create a key.
    fn set(&mut self, key: &[u8], value: &[u8]);

    /// Remove a key. A no-op if it does not exist.
    fn delete(&mut self, key: &[u8]);

    /// Existence test.
    fn exists(&self, key: &[u8]) -> bool;

    /// Append to a byte string, creating it if absent.
    fn append(&mut self, key: &[u8], bytes: &[u8]);

    /// Inclusive byte range `[start, end]`. Returns an empty vec for a
    /// missing key or an out-of-range request.
    fn get_range(&self, key: &[u8], start: usize, end: usize) -> Vec<u8>;

    /// Byte length; 0 if absent.
    fn length(&self, key: &[u8]) -> usize;

    /// Batch fetch for query paths.
    fn bulk_get(&self, keys: &[Vec<u8>]) -> Vec<Option<Vec<u8>>> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Monotonic server time, in nanoseconds.
    fn clock(&mut self) -> u64;
}

/// Reference in-process implementation of [`LedgerStore`].
///
/// Backed by a `BTreeMap` for deterministic key ordering; clock is a
/// strictly-increasing counter seeded from wall-clock time so
/// timestamps are monotonic both within and across batches without
/// depending on OS clock resolution.
pub struct MemoryStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    clock: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1);
        Self {
            data: BTreeMap::new(),
            clock: seed,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.data.insert(key.to_vec(), value.to_vec());
    }

    fn delete(&mut self, key: &[u8]) {
        self.data.remove(key);
    }

    fn exists(&self, key: &[u8]) -> bool {
        self.data.contains_key(key)
    }

    fn append(&mut self, key: &[u8], bytes: &[u8]) {
        self.data.entry(key.to_vec()).or_default().extend_from_slice(bytes);
    }

    fn get_range(&self, key: &[u8], start: usize, end: usize) -> Vec<u8> {
        match self.data.get(key) {
            Some(value) if start <= end && start < value.len() => {
                let end = end.min(value.len().saturating_sub(1));
                value[start..=end].to_vec()
            }
            _ => Vec::new(),
        }
    }

    fn length(&self, key: &[u8]) -> usize {
        self.data.get(key).map(Vec::len).unwrap_or(0)
    }

    fn clock(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Build the store key for an account record: `account:{raw 16-byte id}`.
pub fn account_key(id: u128) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 16);
    key.extend_from_slice(b"account:");
    key.extend_from_slice(&id.to_le_bytes());
    key
}

/// Build the store key for a transfer record: `transfer:{lowercase hex id}`.
///
/// The hex suffix is kept for store-compatibility even though the
/// value is a 16-byte integer internally; every lookup funnels through
/// this one function.
pub fn transfer_key(id: u128) -> Vec<u8> {
    format!("transfer:{}", crate::codec::id_to_hex(id)).into_bytes()
}

/// Build the store key for an account's transfer index.
pub fn transfer_index_key(account_id: u128) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 16 + 11);
    key.extend_from_slice(b"account:");
    key.extend_from_slice(&account_id.to_le_bytes());
    key.extend_from_slice(b":transfers");
    key
}

/// Build the store key for an account's balance history.
pub fn balance_history_key(account_id: u128) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 16 + 16);
    key.extend_from_slice(b"account:");
    key.extend_from_slice(&account_id.to_le_bytes());
    key.extend_from_slice(b":balance_history");
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut store = MemoryStore::new();
        store.set(b"a", b"hello");
        assert_eq!(store.get(b"a"), Some(b"hello".to_vec()));
        assert_eq!(store.get(b"missing"), None);
    }

    #[test]
    fn test_exists_delete() {
        let mut store = MemoryStore::new();
        store.set(b"a", b"x");
        assert!(store.exists(b"a"));
        store.delete(b"a");
        assert!(!store.exists(b"a"));
    }

    #[test]
    fn test_append_and_length() {
        let mut store = MemoryStore::new();
        store.append(b"idx", &[1, 2, 3, 4]);
        store.append(b"idx", &[5, 6]);
        assert_eq!(store.length(b"idx"), 6);
        assert_eq!(store.get(b"idx"), Some(vec![1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_get_range() {
        let mut store = MemoryStore::new();
        store.set(b"k", &[10, 20, 30, 40, 50]);
        assert_eq!(store.get_range(b"k", 1, 3), vec![20, 30, 40]);
        assert_eq!(store.get_range(b"missing", 0, 2), Vec::<u8>::new());
    }

    #[test]
    fn test_clock_monotonic() {
        let mut store = MemoryStore::new();
        let a = store.clock();
        let b = store.clock();
        assert!(b > a);
    }

    #[test]
    fn test_bulk_get() {
        let mut store = MemoryStore::new();
        store.set(b"a", b"1");
        store.set(b"b", b"2");
        let results = store.bulk_get(&[b"a".to_vec(), b"missing".to_vec(), b"b".to_vec()]);
        assert_eq!(results, vec![Some(b"1".to_vec()), None, Some(b"2".to_vec())]);
    }

    #[test]
    fn test_key_naming() {
        assert_eq!(account_key(1), [b"account:".as_slice(), &1u128.to_le_bytes()].concat());
        assert_eq!(transfer_key(255), b"transfer:000000000000000000000000000000ff".to_vec());
        assert!(String::from_utf8(transfer_index_key(7)).unwrap().ends_with(":transfers"));
        assert!(String::from_utf8(balance_history_key(7)).unwrap().ends_with(":balance_history"));
    }
}
