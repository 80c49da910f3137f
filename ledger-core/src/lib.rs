//! A double-entry ledger event processor.
//!
//! This crate validates and applies `Account` and `Transfer` events
//! against a caller-provided key-value store (the [`LedgerStore`]
//! trait), the same way a single ledger node applies a batch of
//! client-submitted events: each event is checked against the data
//! model's invariants in order, and either committed in full or left
//! with no effect at all. Chains of events joined by the `linked` flag
//! are all-or-nothing as a unit (see [`mod@chain`]).
//!
//! # Quick start
//!
//! ```
//! use ledger_core::{create_account, create_transfer, Account, MemoryStore, Transfer};
//!
//! let mut store = MemoryStore::new();
//!
//! let alice = Account { id: 1, ledger: 1, code: 1, ..Default::default() };
//! let bob = Account { id: 2, ledger: 1, code: 1, ..Default::default() };
//! assert_eq!(create_account(&mut store, alice), ledger_core::CreateAccountResult::Ok);
//! assert_eq!(create_account(&mut store, bob), ledger_core::CreateAccountResult::Ok);
//!
//! let payment = Transfer { id: 100, debit_account_id: 1, credit_account_id: 2, amount: 500, ledger: 1, code: 1, ..Default::default() };
//! assert_eq!(create_transfer(&mut store, payment), ledger_core::CreateTransferResult::Ok);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

mod amount;
mod chain;
mod codec;
pub mod error;
mod executor;
mod index;
pub mod protocol;
mod query;
mod store;
pub mod wire;

pub use error::{LedgerError, Result};
pub use protocol::{
    Account, AccountBalance, AccountFilter, AccountFilterFlags, AccountFlags, CreateAccountResult,
    CreateTransferResult, Transfer, TransferFlags,
};
pub use store::{LedgerStore, MemoryStore};

/// Validate and apply a single account-creation event.
///
/// Rejects the event outright (`linked_event_chain_open`) if `linked`
/// is set — use [`create_chained_accounts`] for chains.
pub fn create_account(store: &mut dyn LedgerStore, account: Account) -> CreateAccountResult {
    executor::create_account(store, account, false)
}

/// Validate and apply a single transfer-creation event.
///
/// Rejects the event outright (`linked_event_chain_open`) if `linked`
/// is set — use [`create_chained_transfers`] for chains.
pub fn create_transfer(store: &mut dyn LedgerStore, transfer: Transfer) -> CreateTransferResult {
    match executor::create_transfer(store, transfer, false) {
        Ok((code, ..)) => code,
        Err(code) => code,
    }
}

/// Apply a batch of account-creation events as one or more `linked` chains.
///
/// Returns one result per input event, in order.
pub fn create_chained_accounts(store: &mut dyn LedgerStore, events: &[Account]) -> Vec<CreateAccountResult> {
    chain::create_chained_accounts(store, events)
}

/// Apply a batch of transfer-creation events as one or more `linked` chains.
///
/// Returns one result per input event, in order.
pub fn create_chained_transfers(store: &mut dyn LedgerStore, events: &[Transfer]) -> Vec<CreateTransferResult> {
    chain::create_chained_transfers(store, events)
}

/// Look up an account by id.
pub fn lookup_account(store: &dyn LedgerStore, id: u128) -> Option<Account> {
    store.get(&store::account_key(id)).and_then(|bytes| codec::decode_account(&bytes).ok())
}

/// Look up a transfer by id.
pub fn lookup_transfer(store: &dyn LedgerStore, id: u128) -> Option<Transfer> {
    store.get(&store::transfer_key(id)).and_then(|bytes| codec::decode_transfer(&bytes).ok())
}

/// Query the transfers an account participated in.
pub fn get_account_transfers(store: &dyn LedgerStore, filter: &AccountFilter) -> Vec<Transfer> {
    query::get_account_transfers(store, filter)
}

/// Query the balance-history snapshots recorded for an account.
pub fn get_account_balances(store: &dyn LedgerStore, filter: &AccountFilter) -> Vec<AccountBalance> {
    query::get_account_balances(store, filter)
}

/// Generate a unique id suitable for an account or transfer: a
/// timestamp in the high 64 bits, random bits in the low 64, so ids
/// sort roughly by creation order without a central counter.
///
/// # Example
///
/// ```
/// let account_id = ledger_core::id();
/// let transfer_id = ledger_core::id();
/// assert_ne!(account_id, transfer_id);
/// ```
pub fn id() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos() as u64;
    let random: u64 = rand::random();

    ((timestamp as u128) << 64) | (random as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_uniqueness() {
        let ids: Vec<u128> = (0..1000).map(|_| id()).collect();
        for (i, a) in ids.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &ids[..i] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_id_temporal_ordering() {
        let id1 = id();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = id();
        assert!((id2 >> 64) >= (id1 >> 64));
    }

    #[test]
    fn test_end_to_end_linked_chain_rollback_on_unclosed_account() {
        let mut store = MemoryStore::new();
        let events = vec![Account {
            id: 1,
            ledger: 1,
            code: 1,
            flags: AccountFlags::LINKED,
            ..Default::default()
        }];
        let results = create_chained_accounts(&mut store, &events);
        assert_eq!(results, vec![CreateAccountResult::LinkedEventChainOpen]);
        assert!(lookup_account(&store, 1).is_none());
    }

    #[test]
    fn test_closed_account_end_to_end() {
        let mut store = MemoryStore::new();
        create_account(&mut store, Account { id: 1, ledger: 1, code: 1, flags: AccountFlags::CLOSED, ..Default::default() });
        create_account(&mut store, Account { id: 2, ledger: 1, code: 1, ..Default::default() });
        let result = create_transfer(
            &mut store,
            Transfer { id: 10, debit_account_id: 1, credit_account_id: 2, amount: 1, ledger: 1, code: 1, ..Default::default() },
        );
        assert_eq!(result, CreateTransferResult::AccountClosed);
    }
}
