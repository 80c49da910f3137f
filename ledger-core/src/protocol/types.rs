//! Ledger wire data types.
//!
//! These types match the exact byte layout of the ledger's binary
//! contract (see the data model section of the design). All types use
//! `#[repr(C)]` to ensure a stable, C-compatible memory layout, since
//! their byte offsets are part of the wire contract rather than an
//! implementation detail.

use bitflags::bitflags;

/// Account (128 bytes).
///
/// Accounts are the fundamental unit of accounting in the ledger. They
/// track debits and credits with pending and posted balances.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Account {
    /// Unique identifier for the account.
    pub id: u128,
    /// Sum of pending debit transfers.
    pub debits_pending: u128,
    /// Sum of posted debit transfers.
    pub debits_posted: u128,
    /// Sum of pending credit transfers.
    pub credits_pending: u128,
    /// Sum of posted credit transfers.
    pub credits_posted: u128,
    /// Opaque user data for external linking (128-bit indexed).
    pub user_data_128: u128,
    /// Opaque user data for external linking (64-bit indexed).
    pub user_data_64: u64,
    /// Opaque user data for external linking (32-bit indexed).
    pub user_data_32: u32,
    /// Reserved; must be zero on stored records.
    pub reserved: u32,
    /// The ledger this account belongs to.
    pub ledger: u32,
    /// Chart of accounts code describing the account type.
    pub code: u16,
    /// Account flags.
    pub flags: AccountFlags,
    /// Timestamp when the account was created (set by the server unless imported).
    pub timestamp: u64,
}

const _: () = assert!(std::mem::size_of::<Account>() == 128);

bitflags! {
    /// Flags for Account configuration.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct AccountFlags: u16 {
        /// Link this account with the next in a chain.
        const LINKED = 1 << 0;
        /// Enforce that debits do not exceed credits.
        const DEBITS_MUST_NOT_EXCEED_CREDITS = 1 << 1;
        /// Enforce that credits do not exceed debits.
        const CREDITS_MUST_NOT_EXCEED_DEBITS = 1 << 2;
        /// Enable balance history for this account.
        const HISTORY = 1 << 3;
        /// Mark this account as imported (client-supplied timestamp).
        const IMPORTED = 1 << 4;
        /// Mark this account as closed; blocks further transfers.
        const CLOSED = 1 << 5;
    }
}

/// Transfer (128 bytes).
///
/// Transfers move value between accounts by debiting one and crediting
/// another within a single ledger.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Transfer {
    /// Unique identifier for the transfer.
    pub id: u128,
    /// Account ID to debit.
    pub debit_account_id: u128,
    /// Account ID to credit.
    pub credit_account_id: u128,
    /// Amount to transfer.
    pub amount: u128,
    /// ID of the pending transfer to post or void (0 if not applicable).
    pub pending_id: u128,
    /// Opaque user data for external linking (128-bit indexed).
    pub user_data_128: u128,
    /// Opaque user data for external linking (64-bit indexed).
    pub user_data_64: u64,
    /// Opaque user data for external linking (32-bit indexed).
    pub user_data_32: u32,
    /// Timeout in seconds for pending transfers. Stored but never
    /// evaluated by the executor; expiry is an external concern.
    pub timeout: u32,
    /// The ledger this transfer operates on.
    pub ledger: u32,
    /// Chart of accounts code describing the transfer type.
    pub code: u16,
    /// Transfer flags.
    pub flags: TransferFlags,
    /// Timestamp when the transfer was created (set by the server unless imported).
    pub timestamp: u64,
}

const _: () = assert!(std::mem::size_of::<Transfer>() == 128);

bitflags! {
    /// Flags for Transfer configuration.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TransferFlags: u16 {
        /// Link this transfer with the next in a chain.
        const LINKED = 1 << 0;
        /// Create a pending (two-phase) transfer.
        const PENDING = 1 << 1;
        /// Post a pending transfer.
        const POST_PENDING_TRANSFER = 1 << 2;
        /// Void a pending transfer.
        const VOID_PENDING_TRANSFER = 1 << 3;
        /// Reserved: balance the debit side. Accepted and stored, never
        /// evaluated by the executor (see Open Questions in DESIGN.md).
        const BALANCING_DEBIT = 1 << 4;
        /// Reserved: balance the credit side. Accepted and stored, never
        /// evaluated by the executor (see Open Questions in DESIGN.md).
        const BALANCING_CREDIT = 1 << 5;
        /// Mark this transfer as imported (client-supplied timestamp).
        const IMPORTED = 1 << 8;
    }
}

/// Account balance at a point in time (128 bytes).
///
/// Used for historical balance queries against accounts with the
/// `history` flag set.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccountBalance {
    /// Pending debits at this timestamp.
    pub debits_pending: u128,
    /// Posted debits at this timestamp.
    pub debits_posted: u128,
    /// Pending credits at this timestamp.
    pub credits_pending: u128,
    /// Posted credits at this timestamp.
    pub credits_posted: u128,
    /// Timestamp of this balance snapshot (the transfer's timestamp).
    pub timestamp: u64,
    /// Reserved; must be zero.
    pub reserved: [u8; 56],
}

impl Default for AccountBalance {
    fn default() -> Self {
        Self {
            debits_pending: 0,
            debits_posted: 0,
            credits_pending: 0,
            credits_posted: 0,
            timestamp: 0,
            reserved: [0; 56],
        }
    }
}

const _: () = assert!(std::mem::size_of::<AccountBalance>() == 128);

/// Filter for account-scoped transfer/balance queries (128 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct AccountFilter {
    /// Account ID to query.
    pub account_id: u128,
    /// Filter by `user_data_128` (0 for no filter).
    pub user_data_128: u128,
    /// Filter by `user_data_64` (0 for no filter).
    pub user_data_64: u64,
    /// Filter by `user_data_32` (0 for no filter).
    pub user_data_32: u32,
    /// Reserved; must be zero.
    pub reserved_1: u16,
    /// Filter by code (0 for no filter).
    pub code: u16,
    /// Minimum timestamp, inclusive (0 for unbounded).
    pub timestamp_min: u64,
    /// Maximum timestamp, inclusive (0 or >= 2^63 for unbounded).
    pub timestamp_max: u64,
    /// Maximum number of results. Zero is a caller error and yields no
    /// results, not "unbounded" — callers must set it explicitly.
    pub limit: u32,
    /// Query flags.
    pub flags: AccountFilterFlags,
    /// Reserved; must be zero.
    pub reserved_2: [u8; 56],
}

impl Default for AccountFilter {
    fn default() -> Self {
        Self {
            account_id: 0,
            user_data_128: 0,
            user_data_64: 0,
            user_data_32: 0,
            reserved_1: 0,
            code: 0,
            timestamp_min: 0,
            timestamp_max: 0,
            limit: 0,
            flags: AccountFilterFlags::empty(),
            reserved_2: [0; 56],
        }
    }
}

const _: () = assert!(std::mem::size_of::<AccountFilter>() == 128);

bitflags! {
    /// Flags for AccountFilter queries.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct AccountFilterFlags: u32 {
        /// Include transfers where the account is the debit side.
        const DEBITS = 1 << 0;
        /// Include transfers where the account is the credit side.
        const CREDITS = 1 << 1;
        /// Return results in descending timestamp order.
        const REVERSED = 1 << 2;
    }
}

/// Create-account result codes.
///
/// Numeric values follow the richer of the two tables the source
/// ledger engine carries (see DESIGN.md Open Questions).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreateAccountResult {
    /// Account created successfully.
    Ok = 0,
    /// A linked event in the batch failed, so this event was not applied.
    LinkedEventFailed = 1,
    /// A linked event chain was not closed properly.
    LinkedEventChainOpen = 2,
    /// Account ID must not be zero.
    IdMustNotBeZero = 6,
    /// Mutually exclusive flags were set together.
    FlagsAreMutuallyExclusive = 8,
    /// `debits_pending` must be zero on creation.
    DebitsPendingMustBeZero = 9,
    /// `debits_posted` must be zero on creation.
    DebitsPostedMustBeZero = 10,
    /// `credits_pending` must be zero on creation.
    CreditsPendingMustBeZero = 11,
    /// `credits_posted` must be zero on creation.
    CreditsPostedMustBeZero = 12,
    /// Ledger must not be zero.
    LedgerMustNotBeZero = 13,
    /// Code must not be zero.
    CodeMustNotBeZero = 14,
    /// An `imported` account must carry a non-zero client-supplied timestamp.
    ImportedEventTimestampMustNotBeZero = 15,
    /// Account with this id already exists.
    Exists = 21,
    /// Buffer size was not exactly 128 bytes.
    InvalidDataSize = 32,
}

/// Create-transfer result codes.
///
/// Numeric values follow the richer of the two tables the source
/// ledger engine carries (see DESIGN.md Open Questions).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreateTransferResult {
    /// Transfer created successfully.
    Ok = 0,
    /// A linked event in the batch failed, so this event was not applied.
    LinkedEventFailed = 1,
    /// A linked event chain was not closed properly.
    LinkedEventChainOpen = 2,
    /// More than one of `pending`/`post_pending_transfer`/`void_pending_transfer` was set.
    FlagsAreMutuallyExclusive = 8,
    /// Transfer ID must not be zero.
    IdMustNotBeZero = 5,
    /// Ledger must not be zero.
    LedgerMustNotBeZero = 13,
    /// Code must not be zero.
    CodeMustNotBeZero = 14,
    /// An `imported` transfer must carry a non-zero client-supplied timestamp.
    ImportedEventTimestampMustNotBeZero = 15,
    /// `pending_id` is required for post/void transfers.
    PendingIdRequired = 33,
    /// Debit account not found.
    DebitAccountNotFound = 38,
    /// Credit account not found.
    CreditAccountNotFound = 39,
    /// Debit and credit accounts must be different.
    AccountsMustBeDifferent = 40,
    /// Transfer, debit account, and credit account ledgers must match.
    TransferMustHaveTheSameLedgerAsAccounts = 52,
    /// Transfer exceeds the credit account's available credits
    /// (`debits_must_not_exceed_credits` violated).
    ExceedsCredits = 54,
    /// Transfer exceeds the debit account's available debits
    /// (`credits_must_not_exceed_debits` violated).
    ExceedsDebits = 55,
    /// Transfer with this id already exists.
    Exists = 46,
    /// Transfer with this id already exists with different field values.
    ExistsWithDifferentFlags = 29,
    /// Referenced pending transfer not found.
    PendingTransferNotFound = 34,
    /// Referenced transfer does not have the `pending` flag set.
    PendingTransferNotPending = 35,
    /// Referenced pending transfer has a different `debit_account_id`.
    PendingTransferHasDifferentDebitAccountId = 60,
    /// Referenced pending transfer has a different `credit_account_id`.
    PendingTransferHasDifferentCreditAccountId = 61,
    /// Referenced pending transfer has a different `amount`.
    PendingTransferHasDifferentAmount = 62,
    /// Referenced pending transfer has already been posted.
    PendingTransferAlreadyPosted = 36,
    /// Referenced pending transfer has already been voided.
    PendingTransferAlreadyVoided = 37,
    /// Transfer would cause `debits_pending` to overflow u128.
    OverflowsDebitsPending = 47,
    /// Transfer would cause `credits_pending` to overflow u128.
    OverflowsCreditsPending = 48,
    /// Transfer would cause `debits_posted` to overflow u128.
    OverflowsDebitsPosted = 49,
    /// Transfer would cause `credits_posted` to overflow u128.
    OverflowsCreditsPosted = 50,
    /// Debit or credit account has the `closed` flag set.
    ///
    /// Split out from the legacy path's conflation of "closed" with
    /// "not found" into its own explicit code. See DESIGN.md.
    AccountClosed = 69,
    /// Buffer size was not exactly 128 bytes.
    InvalidDataSize = 32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_size() {
        assert_eq!(std::mem::size_of::<Account>(), 128);
        assert_eq!(std::mem::align_of::<Account>(), 16);
    }

    #[test]
    fn test_transfer_size() {
        assert_eq!(std::mem::size_of::<Transfer>(), 128);
        assert_eq!(std::mem::align_of::<Transfer>(), 16);
    }

    #[test]
    fn test_account_balance_size() {
        assert_eq!(std::mem::size_of::<AccountBalance>(), 128);
    }

    #[test]
    fn test_account_filter_size() {
        assert_eq!(std::mem::size_of::<AccountFilter>(), 128);
    }

    #[test]
    fn test_account_flags() {
        let flags = AccountFlags::LINKED | AccountFlags::HISTORY;
        assert_eq!(flags.bits(), 0b1001);
    }

    #[test]
    fn test_transfer_flags() {
        let flags = TransferFlags::PENDING | TransferFlags::LINKED;
        assert_eq!(flags.bits(), 0b11);
    }

    #[test]
    fn test_result_codes_fit_in_u8() {
        assert_eq!(CreateAccountResult::Exists as u8, 21);
        assert_eq!(CreateTransferResult::ExceedsCredits as u8, 54);
    }
}
