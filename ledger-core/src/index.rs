//! Index and balance-history materialization.
//!
//! Every successfully applied transfer is appended to both the debit
//! and credit account's transfer index, and — for accounts with the
//! `history` flag — a balance snapshot is appended to that account's
//! balance history. Both are append-only, which is what lets the chain
//! coordinator undo them by truncating back to a captured length rather
//! than tracking individual writes.

use crate::codec;
use crate::protocol::{Account, AccountFlags, Transfer};
use crate::store::{self, LedgerStore};

/// Record a transfer into the indexes and, where enabled, balance
/// history of the two accounts it touched. Call this only after the
/// transfer and both accounts have been durably written.
pub fn record(store: &mut dyn LedgerStore, transfer: &Transfer, debit_account: &Account, credit_account: &Account) {
    store.append(&store::transfer_index_key(transfer.debit_account_id), &transfer.id.to_le_bytes());
    store.append(&store::transfer_index_key(transfer.credit_account_id), &transfer.id.to_le_bytes());

    if debit_account.flags.contains(AccountFlags::HISTORY) {
        append_balance_snapshot(store, transfer.debit_account_id, transfer.timestamp, debit_account);
    }
    if credit_account.flags.contains(AccountFlags::HISTORY) {
        append_balance_snapshot(store, transfer.credit_account_id, transfer.timestamp, credit_account);
    }
}

fn append_balance_snapshot(store: &mut dyn LedgerStore, account_id: u128, timestamp: u64, account: &Account) {
    let balance = crate::protocol::AccountBalance {
        debits_pending: account.debits_pending,
        debits_posted: account.debits_posted,
        credits_pending: account.credits_pending,
        credits_posted: account.credits_posted,
        timestamp,
        reserved: [0; 56],
    };
    store.append(&store::balance_history_key(account_id), &codec::encode_account_balance(&balance));
}

/// Read every transfer id recorded in an account's transfer index, in
/// the order they were appended (ascending timestamp).
pub fn read_transfer_ids(store: &dyn LedgerStore, account_id: u128) -> Vec<u128> {
    let bytes = store.get(&store::transfer_index_key(account_id)).unwrap_or_default();
    bytes
        .chunks_exact(16)
        .map(|chunk| u128::from_le_bytes(chunk.try_into().expect("chunk is 16 bytes")))
        .collect()
}

/// Read every balance snapshot recorded in an account's balance
/// history, in the order they were appended (ascending timestamp).
pub fn read_balance_history(store: &dyn LedgerStore, account_id: u128) -> Vec<crate::protocol::AccountBalance> {
    let bytes = store.get(&store::balance_history_key(account_id)).unwrap_or_default();
    bytes
        .chunks_exact(128)
        .map(|chunk| codec::decode_account_balance(chunk).expect("chunk is 128 bytes"))
        .collect()
}
