//! Account-scoped transfer and balance-history queries.
//!
//! Both entry points share the same shape: read an account's index,
//! bulk-fetch the referenced records, filter by the criteria in an
//! [`AccountFilter`], sort by timestamp (ascending, or descending with
//! the `reversed` flag), and truncate to `limit`.

use crate::codec;
use crate::index;
use crate::protocol::{AccountBalance, AccountFilter, AccountFilterFlags, Transfer};
use crate::store::{self, LedgerStore};

/// Fetch the transfers an account participated in, per `filter`.
///
/// A `limit` of zero is a caller error, not "unbounded" — it returns no
/// results, matching the other query entry point.
pub fn get_account_transfers(store: &dyn LedgerStore, filter: &AccountFilter) -> Vec<Transfer> {
    if filter.limit == 0 {
        return Vec::new();
    }
    let ids = index::read_transfer_ids(store, filter.account_id);
    let keys: Vec<Vec<u8>> = ids.iter().map(|id| store::transfer_key(*id)).collect();
    let records = store.bulk_get(&keys);

    let mut transfers: Vec<Transfer> = records
        .into_iter()
        .flatten()
        .filter_map(|bytes| codec::decode_transfer(&bytes).ok())
        .filter(|t| matches_side(t, filter))
        .filter(|t| matches_common(t.user_data_128, t.user_data_64, t.user_data_32, t.code, t.timestamp, filter))
        .collect();

    sort_and_truncate(&mut transfers, filter, |t| t.timestamp);
    transfers
}

fn matches_side(transfer: &Transfer, filter: &AccountFilter) -> bool {
    let want_debits = filter.flags.contains(AccountFilterFlags::DEBITS);
    let want_credits = filter.flags.contains(AccountFilterFlags::CREDITS);
    // Neither flag set means "both sides", the same "absent means
    // unfiltered" convention every other AccountFilter field follows.
    let (want_debits, want_credits) = if !want_debits && !want_credits {
        (true, true)
    } else {
        (want_debits, want_credits)
    };
    (want_debits && transfer.debit_account_id == filter.account_id)
        || (want_credits && transfer.credit_account_id == filter.account_id)
}

/// Fetch the balance-history snapshots recorded for an account, per `filter`.
///
/// Only meaningful for accounts created with the `history` flag; an
/// account without history simply has an empty index and returns no
/// results.
pub fn get_account_balances(store: &dyn LedgerStore, filter: &AccountFilter) -> Vec<AccountBalance> {
    if filter.limit == 0 {
        return Vec::new();
    }
    let mut balances = index::read_balance_history(store, filter.account_id);
    balances.retain(|b| matches_common(0, 0, 0, 0, b.timestamp, filter));
    sort_and_truncate(&mut balances, filter, |b| b.timestamp);
    balances
}

fn matches_common(user_data_128: u128, user_data_64: u64, user_data_32: u32, code: u16, timestamp: u64, filter: &AccountFilter) -> bool {
    if filter.user_data_128 != 0 && filter.user_data_128 != user_data_128 {
        return false;
    }
    if filter.user_data_64 != 0 && filter.user_data_64 != user_data_64 {
        return false;
    }
    if filter.user_data_32 != 0 && filter.user_data_32 != user_data_32 {
        return false;
    }
    if filter.code != 0 && filter.code != code {
        return false;
    }
    if filter.timestamp_min != 0 && timestamp < filter.timestamp_min {
        return false;
    }
    // max=0 or >= 2^63 both mean "unbounded".
    if filter.timestamp_max != 0 && filter.timestamp_max < (1u64 << 63) && timestamp > filter.timestamp_max {
        return false;
    }
    true
}

fn sort_and_truncate<T>(items: &mut Vec<T>, filter: &AccountFilter, key: impl Fn(&T) -> u64) {
    if filter.flags.contains(AccountFilterFlags::REVERSED) {
        items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    } else {
        items.sort_by_key(&key);
    }
    items.truncate(filter.limit as usize);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor;
    use crate::protocol::{Account, AccountFlags, TransferFlags};
    use crate::store::MemoryStore;

    fn account(id: u128, flags: AccountFlags) -> Account {
        Account {
            id,
            ledger: 700,
            code: 1,
            flags,
            ..Default::default()
        }
    }

    fn transfer(id: u128, debit: u128, credit: u128, amount: u128) -> Transfer {
        Transfer {
            id,
            debit_account_id: debit,
            credit_account_id: credit,
            amount,
            ledger: 700,
            code: 1,
            flags: TransferFlags::empty(),
            ..Default::default()
        }
    }

    fn setup(store: &mut MemoryStore) {
        executor::create_account(store, account(1, AccountFlags::HISTORY), false);
        executor::create_account(store, account(2, AccountFlags::empty()), false);
        executor::create_transfer(store, transfer(10, 1, 2, 100), false).unwrap();
        executor::create_transfer(store, transfer(11, 2, 1, 50), false).unwrap();
        executor::create_transfer(store, transfer(12, 1, 2, 25), false).unwrap();
    }

    #[test]
    fn test_get_account_transfers_both_sides() {
        let mut store = MemoryStore::new();
        setup(&mut store);
        let filter = AccountFilter {
            account_id: 1,
            limit: u32::MAX,
            ..Default::default()
        };
        let transfers = get_account_transfers(&store, &filter);
        assert_eq!(transfers.iter().map(|t| t.id).collect::<Vec<_>>(), vec![10, 11, 12]);
    }

    #[test]
    fn test_get_account_transfers_debits_only() {
        let mut store = MemoryStore::new();
        setup(&mut store);
        let filter = AccountFilter {
            account_id: 1,
            flags: AccountFilterFlags::DEBITS,
            limit: u32::MAX,
            ..Default::default()
        };
        let transfers = get_account_transfers(&store, &filter);
        assert_eq!(transfers.iter().map(|t| t.id).collect::<Vec<_>>(), vec![10, 12]);
    }

    #[test]
    fn test_get_account_transfers_zero_limit_is_empty() {
        let mut store = MemoryStore::new();
        setup(&mut store);
        let filter = AccountFilter {
            account_id: 1,
            ..Default::default()
        };
        assert!(get_account_transfers(&store, &filter).is_empty());
    }

    #[test]
    fn test_get_account_transfers_reversed_and_limit() {
        let mut store = MemoryStore::new();
        setup(&mut store);
        let filter = AccountFilter {
            account_id: 1,
            flags: AccountFilterFlags::REVERSED,
            limit: 2,
            ..Default::default()
        };
        let transfers = get_account_transfers(&store, &filter);
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].id, 12);
        assert_eq!(transfers[1].id, 11);
    }

    #[test]
    fn test_get_account_balances_only_for_history_accounts() {
        let mut store = MemoryStore::new();
        setup(&mut store);
        let filter_history = AccountFilter {
            account_id: 1,
            limit: u32::MAX,
            ..Default::default()
        };
        let balances = get_account_balances(&store, &filter_history);
        assert_eq!(balances.len(), 2);

        let filter_no_history = AccountFilter {
            account_id: 2,
            limit: u32::MAX,
            ..Default::default()
        };
        assert!(get_account_balances(&store, &filter_no_history).is_empty());
    }
}
