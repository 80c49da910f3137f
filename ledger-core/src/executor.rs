//! Validates and applies a single Account or Transfer event.
//!
//! This is the heart of the ledger: every rule in the data model's
//! invariants and the two-phase transfer state machine is enforced
//! here. A failing event leaves the store untouched; a succeeding
//! event writes back the mutated account(s), the new transfer record
//! (unless it's an account event), the per-account transfer index, and
//! — for accounts opted into it — a balance history snapshot.

use crate::amount;
use crate::protocol::{Account, AccountFlags, CreateAccountResult, CreateTransferResult, Transfer, TransferFlags};
use crate::store::{self, LedgerStore};

/// Validate and apply a create-account event.
///
/// `allow_linked` is `false` for the single-event entry point (which
/// rejects `linked`) and `true` for the chained entry point.
pub fn create_account(
    store: &mut dyn LedgerStore,
    mut account: Account,
    allow_linked: bool,
) -> CreateAccountResult {
    if account.id == 0 {
        return CreateAccountResult::IdMustNotBeZero;
    }
    if account.ledger == 0 {
        return CreateAccountResult::LedgerMustNotBeZero;
    }
    if account.code == 0 {
        return CreateAccountResult::CodeMustNotBeZero;
    }
    if account
        .flags
        .contains(AccountFlags::DEBITS_MUST_NOT_EXCEED_CREDITS | AccountFlags::CREDITS_MUST_NOT_EXCEED_DEBITS)
    {
        return CreateAccountResult::FlagsAreMutuallyExclusive;
    }
    if account.debits_pending != 0 {
        return CreateAccountResult::DebitsPendingMustBeZero;
    }
    if account.debits_posted != 0 {
        return CreateAccountResult::DebitsPostedMustBeZero;
    }
    if account.credits_pending != 0 {
        return CreateAccountResult::CreditsPendingMustBeZero;
    }
    if account.credits_posted != 0 {
        return CreateAccountResult::CreditsPostedMustBeZero;
    }
    if !allow_linked && account.flags.contains(AccountFlags::LINKED) {
        return CreateAccountResult::LinkedEventChainOpen;
    }
    if store.exists(&store::account_key(account.id)) {
        return CreateAccountResult::Exists;
    }

    if account.flags.contains(AccountFlags::IMPORTED) {
        if account.timestamp == 0 {
            return CreateAccountResult::ImportedEventTimestampMustNotBeZero;
        }
    } else {
        account.timestamp = store.clock();
    }

    store.set(&store::account_key(account.id), &crate::codec::encode_account(&account));
    CreateAccountResult::Ok
}

/// Outcome of a successful create-transfer apply: the two accounts as
/// they now stand, used by the caller to append indexes/history.
pub struct TransferApplied {
    pub debit_account: Account,
    pub credit_account: Account,
}

/// Validate and apply a create-transfer event.
///
/// On success, also appends the transfer id to both touched accounts'
/// transfer indexes and, for accounts with the `history` flag, a
/// balance snapshot — see [`crate::index`].
pub fn create_transfer(
    store: &mut dyn LedgerStore,
    mut transfer: Transfer,
    allow_linked: bool,
) -> Result<(CreateTransferResult, Transfer, TransferApplied), CreateTransferResult> {
    macro_rules! fail {
        ($code:expr) => {
            return Err($code)
        };
    }

    if transfer.id == 0 {
        fail!(CreateTransferResult::IdMustNotBeZero);
    }
    if transfer.debit_account_id == transfer.credit_account_id {
        fail!(CreateTransferResult::AccountsMustBeDifferent);
    }
    if !allow_linked && transfer.flags.contains(TransferFlags::LINKED) {
        fail!(CreateTransferResult::LinkedEventChainOpen);
    }
    if transfer.ledger == 0 {
        fail!(CreateTransferResult::LedgerMustNotBeZero);
    }
    if transfer.code == 0 {
        fail!(CreateTransferResult::CodeMustNotBeZero);
    }
    if store.exists(&store::transfer_key(transfer.id)) {
        fail!(CreateTransferResult::Exists);
    }

    let debit_key = store::account_key(transfer.debit_account_id);
    let credit_key = store::account_key(transfer.credit_account_id);

    let Some(debit_bytes) = store.get(&debit_key) else {
        fail!(CreateTransferResult::DebitAccountNotFound);
    };
    let Some(credit_bytes) = store.get(&credit_key) else {
        fail!(CreateTransferResult::CreditAccountNotFound);
    };
    let mut debit_account = crate::codec::decode_account(&debit_bytes).expect("stored account is well-formed");
    let mut credit_account = crate::codec::decode_account(&credit_bytes).expect("stored account is well-formed");

    if debit_account.flags.contains(AccountFlags::CLOSED) || credit_account.flags.contains(AccountFlags::CLOSED) {
        tracing::warn!(transfer_id = transfer.id, debit = transfer.debit_account_id, credit = transfer.credit_account_id, "transfer rejected: account closed");
        fail!(CreateTransferResult::AccountClosed);
    }
    if transfer.ledger != debit_account.ledger || transfer.ledger != credit_account.ledger {
        fail!(CreateTransferResult::TransferMustHaveTheSameLedgerAsAccounts);
    }

    let two_phase = transfer.flags
        & (TransferFlags::PENDING | TransferFlags::POST_PENDING_TRANSFER | TransferFlags::VOID_PENDING_TRANSFER);

    if two_phase == TransferFlags::PENDING {
        apply_pending(&mut debit_account, &mut credit_account, transfer.amount)?;
    } else if two_phase == TransferFlags::POST_PENDING_TRANSFER || two_phase == TransferFlags::VOID_PENDING_TRANSFER {
        if transfer.pending_id == 0 {
            fail!(CreateTransferResult::PendingIdRequired);
        }
        let Some(pending_bytes) = store.get(&store::transfer_key(transfer.pending_id)) else {
            fail!(CreateTransferResult::PendingTransferNotFound);
        };
        let pending = crate::codec::decode_transfer(&pending_bytes).expect("stored transfer is well-formed");
        if !pending.flags.contains(TransferFlags::PENDING) {
            fail!(CreateTransferResult::PendingTransferNotPending);
        }
        if pending.debit_account_id != transfer.debit_account_id {
            fail!(CreateTransferResult::PendingTransferHasDifferentDebitAccountId);
        }
        if pending.credit_account_id != transfer.credit_account_id {
            fail!(CreateTransferResult::PendingTransferHasDifferentCreditAccountId);
        }
        if transfer.amount != pending.amount {
            fail!(CreateTransferResult::PendingTransferHasDifferentAmount);
        }

        if two_phase == TransferFlags::POST_PENDING_TRANSFER {
            apply_post(&mut debit_account, &mut credit_account, transfer.amount)?;
        } else {
            apply_void(&mut debit_account, &mut credit_account, transfer.amount)?;
        }
    } else if two_phase.is_empty() {
        apply_posted(&mut debit_account, &mut credit_account, transfer.amount)?;
    } else {
        fail!(CreateTransferResult::FlagsAreMutuallyExclusive);
    }

    check_balance_constraints(&debit_account, &credit_account)?;

    if transfer.flags.contains(TransferFlags::IMPORTED) {
        if transfer.timestamp == 0 {
            fail!(CreateTransferResult::ImportedEventTimestampMustNotBeZero);
        }
    } else {
        transfer.timestamp = store.clock();
    }

    store.set(&debit_key, &crate::codec::encode_account(&debit_account));
    store.set(&credit_key, &crate::codec::encode_account(&credit_account));
    store.set(&store::transfer_key(transfer.id), &crate::codec::encode_transfer(&transfer));
    crate::index::record(store, &transfer, &debit_account, &credit_account);

    Ok((
        CreateTransferResult::Ok,
        transfer,
        TransferApplied {
            debit_account,
            credit_account,
        },
    ))
}

fn apply_pending(debit: &mut Account, credit: &mut Account, amount: u128) -> Result<(), CreateTransferResult> {
    let (sum, overflow) = amount::add(debit.debits_pending.to_le_bytes(), amount.to_le_bytes());
    if overflow {
        return Err(CreateTransferResult::OverflowsDebitsPending);
    }
    debit.debits_pending = u128::from_le_bytes(sum);

    let (sum, overflow) = amount::add(credit.credits_pending.to_le_bytes(), amount.to_le_bytes());
    if overflow {
        return Err(CreateTransferResult::OverflowsCreditsPending);
    }
    credit.credits_pending = u128::from_le_bytes(sum);
    Ok(())
}

fn apply_posted(debit: &mut Account, credit: &mut Account, amount: u128) -> Result<(), CreateTransferResult> {
    let (sum, overflow) = amount::add(debit.debits_posted.to_le_bytes(), amount.to_le_bytes());
    if overflow {
        return Err(CreateTransferResult::OverflowsDebitsPosted);
    }
    debit.debits_posted = u128::from_le_bytes(sum);

    let (sum, overflow) = amount::add(credit.credits_posted.to_le_bytes(), amount.to_le_bytes());
    if overflow {
        return Err(CreateTransferResult::OverflowsCreditsPosted);
    }
    credit.credits_posted = u128::from_le_bytes(sum);
    Ok(())
}

fn apply_post(debit: &mut Account, credit: &mut Account, amount: u128) -> Result<(), CreateTransferResult> {
    let Some(diff) = amount::sub(debit.debits_pending.to_le_bytes(), amount.to_le_bytes()) else {
        return Err(CreateTransferResult::PendingTransferAlreadyPosted);
    };
    let Some(diff2) = amount::sub(credit.credits_pending.to_le_bytes(), amount.to_le_bytes()) else {
        return Err(CreateTransferResult::PendingTransferAlreadyPosted);
    };
    debit.debits_pending = u128::from_le_bytes(diff);
    credit.credits_pending = u128::from_le_bytes(diff2);
    apply_posted(debit, credit, amount)
}

fn apply_void(debit: &mut Account, credit: &mut Account, amount: u128) -> Result<(), CreateTransferResult> {
    let Some(diff) = amount::sub(debit.debits_pending.to_le_bytes(), amount.to_le_bytes()) else {
        return Err(CreateTransferResult::PendingTransferAlreadyVoided);
    };
    let Some(diff2) = amount::sub(credit.credits_pending.to_le_bytes(), amount.to_le_bytes()) else {
        return Err(CreateTransferResult::PendingTransferAlreadyVoided);
    };
    debit.debits_pending = u128::from_le_bytes(diff);
    credit.credits_pending = u128::from_le_bytes(diff2);
    Ok(())
}

fn check_balance_constraints(debit: &Account, credit: &Account) -> Result<(), CreateTransferResult> {
    if debit.flags.contains(AccountFlags::DEBITS_MUST_NOT_EXCEED_CREDITS) {
        let (debits, overflow) = amount::add(debit.debits_pending.to_le_bytes(), debit.debits_posted.to_le_bytes());
        if overflow {
            return Err(CreateTransferResult::OverflowsDebitsPosted);
        }
        let (credits, overflow) = amount::add(debit.credits_pending.to_le_bytes(), debit.credits_posted.to_le_bytes());
        if overflow {
            return Err(CreateTransferResult::OverflowsCreditsPosted);
        }
        if amount::compare(debits, credits) == std::cmp::Ordering::Greater {
            return Err(CreateTransferResult::ExceedsCredits);
        }
    }
    if credit.flags.contains(AccountFlags::CREDITS_MUST_NOT_EXCEED_DEBITS) {
        let (credits, overflow) = amount::add(credit.credits_pending.to_le_bytes(), credit.credits_posted.to_le_bytes());
        if overflow {
            return Err(CreateTransferResult::OverflowsCreditsPosted);
        }
        let (debits, overflow) = amount::add(credit.debits_pending.to_le_bytes(), credit.debits_posted.to_le_bytes());
        if overflow {
            return Err(CreateTransferResult::OverflowsDebitsPosted);
        }
        if amount::compare(credits, debits) == std::cmp::Ordering::Greater {
            return Err(CreateTransferResult::ExceedsDebits);
        }
    }
    Ok(())
}
