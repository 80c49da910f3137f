//! Linked-chain atomicity: all-or-nothing batches of accounts or transfers.
//!
//! Events in a batch are processed one at a time in order. Setting the
//! `linked` flag on an event joins it with the next event into a chain;
//! the chain closes on the first event without `linked` set. If any
//! event in the chain fails validation, every event already applied by
//! that chain is rolled back and reported `linked_event_failed`, and any
//! events in the chain not yet reached are reported
//! `linked_event_chain_open` without being evaluated at all.
//!
//! A chain ending on the last event of the batch without having been
//! closed (trailing `linked` flag) is itself an error: every event in
//! that dangling chain is reported `linked_event_chain_open`.

use std::collections::HashMap;

use crate::executor;
use crate::protocol::{Account, AccountFlags, CreateAccountResult, CreateTransferResult, Transfer, TransferFlags};
use crate::store::{self, LedgerStore};

/// Captures enough pre-chain state to undo every write a chain made.
///
/// `modified_accounts` maps an account id to its encoded bytes *before*
/// the chain touched it, or `None` if the chain created the account —
/// rollback either restores the bytes or deletes the key, uniformly.
#[derive(Default)]
struct ChainRollback {
    modified_accounts: HashMap<u128, Option<[u8; 128]>>,
    index_original_lengths: HashMap<Vec<u8>, usize>,
    created_transfers: Vec<u128>,
}

impl ChainRollback {
    fn capture_account(&mut self, store: &dyn LedgerStore, id: u128) {
        self.modified_accounts.entry(id).or_insert_with(|| {
            store
                .get(&store::account_key(id))
                .map(|bytes| bytes.try_into().expect("stored account is 128 bytes"))
        });
    }

    fn capture_index_len(&mut self, store: &dyn LedgerStore, key: Vec<u8>) {
        let len = store.length(&key);
        self.index_original_lengths.entry(key).or_insert(len);
    }

    fn rollback(self, store: &mut dyn LedgerStore) {
        for (id, pre_image) in self.modified_accounts {
            match pre_image {
                Some(bytes) => store.set(&store::account_key(id), &bytes),
                None => store.delete(&store::account_key(id)),
            }
        }
        for id in self.created_transfers {
            store.delete(&store::transfer_key(id));
        }
        for (key, original_len) in self.index_original_lengths {
            if original_len == 0 {
                store.delete(&key);
            } else {
                let trimmed = store.get_range(&key, 0, original_len - 1);
                store.set(&key, &trimmed);
            }
        }
    }
}

/// Apply a batch of account-create events, honoring `linked` chains.
pub fn create_chained_accounts(store: &mut dyn LedgerStore, events: &[Account]) -> Vec<CreateAccountResult> {
    let mut results = vec![CreateAccountResult::Ok; events.len()];
    let mut i = 0;
    while i < events.len() {
        let (end, dangling) = find_chain_span(i, events.len(), |k| events[k].flags.contains(AccountFlags::LINKED));
        let span = i..end;

        if dangling {
            for j in span {
                results[j] = CreateAccountResult::LinkedEventChainOpen;
            }
            break;
        }

        let mut rollback = ChainRollback::default();
        let mut failed_at: Option<usize> = None;
        for j in span.clone() {
            rollback.capture_account(store, events[j].id);
            let outcome = executor::create_account(store, events[j], true);
            results[j] = outcome;
            if outcome != CreateAccountResult::Ok {
                failed_at = Some(j);
                break;
            }
        }

        if let Some(failed) = failed_at {
            tracing::debug!(chain_start = i, failed_at = failed, result = ?results[failed], "rolling back account chain");
            rollback.rollback(store);
            for j in span {
                if j < failed {
                    results[j] = CreateAccountResult::LinkedEventFailed;
                } else if j > failed {
                    results[j] = CreateAccountResult::LinkedEventChainOpen;
                }
            }
        }

        i = end;
    }
    results
}

/// Apply a batch of transfer-create events, honoring `linked` chains.
pub fn create_chained_transfers(store: &mut dyn LedgerStore, events: &[Transfer]) -> Vec<CreateTransferResult> {
    let mut results = vec![CreateTransferResult::Ok; events.len()];
    let mut i = 0;
    while i < events.len() {
        let (end, dangling) = find_chain_span(i, events.len(), |k| events[k].flags.contains(TransferFlags::LINKED));
        let span = i..end;

        if dangling {
            for j in span {
                results[j] = CreateTransferResult::LinkedEventChainOpen;
            }
            break;
        }

        let mut rollback = ChainRollback::default();
        let mut failed_at: Option<usize> = None;
        for j in span.clone() {
            let event = events[j];
            rollback.capture_account(store, event.debit_account_id);
            rollback.capture_account(store, event.credit_account_id);
            rollback.capture_index_len(store, store::transfer_index_key(event.debit_account_id));
            rollback.capture_index_len(store, store::transfer_index_key(event.credit_account_id));
            rollback.capture_index_len(store, store::balance_history_key(event.debit_account_id));
            rollback.capture_index_len(store, store::balance_history_key(event.credit_account_id));

            match executor::create_transfer(store, event, true) {
                Ok((code, applied_transfer, _applied)) => {
                    results[j] = code;
                    rollback.created_transfers.push(applied_transfer.id);
                }
                Err(code) => {
                    results[j] = code;
                    failed_at = Some(j);
                    break;
                }
            }
        }

        if let Some(failed) = failed_at {
            tracing::debug!(chain_start = i, failed_at = failed, result = ?results[failed], "rolling back transfer chain");
            rollback.rollback(store);
            for j in span {
                if j < failed {
                    results[j] = CreateTransferResult::LinkedEventFailed;
                } else if j > failed {
                    results[j] = CreateTransferResult::LinkedEventChainOpen;
                }
            }
        }

        i = end;
    }
    results
}

/// Find the span of the chain starting at `start`: scans forward while
/// `linked` stays set. Returns the exclusive end index and whether the
/// chain ran off the end of the batch without ever clearing `linked`
/// (a dangling chain, itself a failure for every event in it).
fn find_chain_span(start: usize, len: usize, is_linked: impl Fn(usize) -> bool) -> (usize, bool) {
    let mut j = start;
    while j < len && is_linked(j) {
        j += 1;
    }
    if j == len {
        (len, true)
    } else {
        (j + 1, false)
    }
}
