//! Fixed-layout encode/decode for `Account`, `Transfer`, `AccountFilter`,
//! and `AccountBalance`.
//!
//! Encoding/decoding is done field-by-field rather than by reinterpreting
//! the struct's memory directly: the structs embed `bitflags!`-generated
//! flag types, which (unlike the plain-integer fields) don't carry a
//! `#[repr(C)]`-safe byte pattern guarantee across bitflags versions, so
//! a raw `transmute` would be fragile. Field-level encode/decode is the
//! same cost (one pass over 128 bytes) and keeps the reserved-byte
//! zeroing explicit.

use crate::protocol::{Account, AccountBalance, AccountFilter, AccountFlags, Transfer, TransferFlags};

/// A buffer's length did not match the expected fixed size for its type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidDataSize {
    /// The size the buffer should have been.
    pub expected: usize,
    /// The size the buffer actually was.
    pub actual: usize,
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap())
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
}

fn read_u64(buf: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(buf[offset..offset + 8].try_into().unwrap())
}

fn read_u128(buf: &[u8], offset: usize) -> u128 {
    u128::from_le_bytes(buf[offset..offset + 16].try_into().unwrap())
}

fn write_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn write_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn write_u128(buf: &mut [u8], offset: usize, value: u128) {
    buf[offset..offset + 16].copy_from_slice(&value.to_le_bytes());
}

/// Decode a 128-byte buffer into an [`Account`].
pub fn decode_account(buf: &[u8]) -> Result<Account, InvalidDataSize> {
    if buf.len() != 128 {
        return Err(InvalidDataSize {
            expected: 128,
            actual: buf.len(),
        });
    }
    Ok(Account {
        id: read_u128(buf, 0),
        debits_pending: read_u128(buf, 16),
        debits_posted: read_u128(buf, 32),
        credits_pending: read_u128(buf, 48),
        credits_posted: read_u128(buf, 64),
        user_data_128: read_u128(buf, 80),
        user_data_64: read_u64(buf, 96),
        user_data_32: read_u32(buf, 104),
        reserved: 0,
        ledger: read_u32(buf, 112),
        code: read_u16(buf, 116),
        flags: AccountFlags::from_bits_truncate(read_u16(buf, 118)),
        timestamp: read_u64(buf, 120),
    })
}

/// Encode an [`Account`] into a 128-byte buffer, preserving the
/// reserved bytes as zero.
pub fn encode_account(account: &Account) -> [u8; 128] {
    let mut buf = [0u8; 128];
    write_u128(&mut buf, 0, account.id);
    write_u128(&mut buf, 16, account.debits_pending);
    write_u128(&mut buf, 32, account.debits_posted);
    write_u128(&mut buf, 48, account.credits_pending);
    write_u128(&mut buf, 64, account.credits_posted);
    write_u128(&mut buf, 80, account.user_data_128);
    write_u64(&mut buf, 96, account.user_data_64);
    write_u32(&mut buf, 104, account.user_data_32);
    // offset 108..112 stays zero (reserved)
    write_u32(&mut buf, 112, account.ledger);
    write_u16(&mut buf, 116, account.code);
    write_u16(&mut buf, 118, account.flags.bits());
    write_u64(&mut buf, 120, account.timestamp);
    buf
}

/// Decode a 128-byte buffer into a [`Transfer`].
pub fn decode_transfer(buf: &[u8]) -> Result<Transfer, InvalidDataSize> {
    if buf.len() != 128 {
        return Err(InvalidDataSize {
            expected: 128,
            actual: buf.len(),
        });
    }
    Ok(Transfer {
        id: read_u128(buf, 0),
        debit_account_id: read_u128(buf, 16),
        credit_account_id: read_u128(buf, 32),
        amount: read_u128(buf, 48),
        pending_id: read_u128(buf, 64),
        user_data_128: read_u128(buf, 80),
        user_data_64: read_u64(buf, 96),
        user_data_32: read_u32(buf, 104),
        timeout: read_u32(buf, 108),
        ledger: read_u32(buf, 112),
        code: read_u16(buf, 116),
        flags: TransferFlags::from_bits_truncate(read_u16(buf, 118)),
        timestamp: read_u64(buf, 120),
    })
}

/// Encode a [`Transfer`] into a 128-byte buffer.
pub fn encode_transfer(transfer: &Transfer) -> [u8; 128] {
    let mut buf = [0u8; 128];
    write_u128(&mut buf, 0, transfer.id);
    write_u128(&mut buf, 16, transfer.debit_account_id);
    write_u128(&mut buf, 32, transfer.credit_account_id);
    write_u128(&mut buf, 48, transfer.amount);
    write_u128(&mut buf, 64, transfer.pending_id);
    write_u128(&mut buf, 80, transfer.user_data_128);
    write_u64(&mut buf, 96, transfer.user_data_64);
    write_u32(&mut buf, 104, transfer.user_data_32);
    write_u32(&mut buf, 108, transfer.timeout);
    write_u32(&mut buf, 112, transfer.ledger);
    write_u16(&mut buf, 116, transfer.code);
    write_u16(&mut buf, 118, transfer.flags.bits());
    write_u64(&mut buf, 120, transfer.timestamp);
    buf
}

/// Decode a 128-byte buffer into an [`AccountFilter`].
pub fn decode_account_filter(buf: &[u8]) -> Result<AccountFilter, InvalidDataSize> {
    if buf.len() != 128 {
        return Err(InvalidDataSize {
            expected: 128,
            actual: buf.len(),
        });
    }
    Ok(AccountFilter {
        account_id: read_u128(buf, 0),
        user_data_128: read_u128(buf, 16),
        user_data_64: read_u64(buf, 32),
        user_data_32: read_u32(buf, 40),
        reserved_1: 0,
        code: read_u16(buf, 46),
        timestamp_min: read_u64(buf, 48),
        timestamp_max: read_u64(buf, 56),
        limit: read_u32(buf, 64),
        flags: crate::protocol::AccountFilterFlags::from_bits_truncate(read_u32(buf, 68)),
        reserved_2: [0; 56],
    })
}

/// Encode an [`AccountFilter`] into a 128-byte buffer.
pub fn encode_account_filter(filter: &AccountFilter) -> [u8; 128] {
    let mut buf = [0u8; 128];
    write_u128(&mut buf, 0, filter.account_id);
    write_u128(&mut buf, 16, filter.user_data_128);
    write_u64(&mut buf, 32, filter.user_data_64);
    write_u32(&mut buf, 40, filter.user_data_32);
    write_u16(&mut buf, 44, 0);
    write_u16(&mut buf, 46, filter.code);
    write_u64(&mut buf, 48, filter.timestamp_min);
    write_u64(&mut buf, 56, filter.timestamp_max);
    write_u32(&mut buf, 64, filter.limit);
    write_u32(&mut buf, 68, filter.flags.bits());
    // offset 72..128 stays zero (reserved)
    buf
}

/// Decode a 128-byte buffer into an [`AccountBalance`].
pub fn decode_account_balance(buf: &[u8]) -> Result<AccountBalance, InvalidDataSize> {
    if buf.len() != 128 {
        return Err(InvalidDataSize {
            expected: 128,
            actual: buf.len(),
        });
    }
    Ok(AccountBalance {
        debits_pending: read_u128(buf, 0),
        debits_posted: read_u128(buf, 16),
        credits_pending: read_u128(buf, 32),
        credits_posted: read_u128(buf, 48),
        timestamp: read_u64(buf, 64),
        reserved: [0; 56],
    })
}

/// Encode an [`AccountBalance`] into a 128-byte buffer.
pub fn encode_account_balance(balance: &AccountBalance) -> [u8; 128] {
    let mut buf = [0u8; 128];
    write_u128(&mut buf, 0, balance.debits_pending);
    write_u128(&mut buf, 16, balance.debits_posted);
    write_u128(&mut buf, 32, balance.credits_pending);
    write_u128(&mut buf, 48, balance.credits_posted);
    write_u64(&mut buf, 64, balance.timestamp);
    // offset 72..128 stays zero (reserved)
    buf
}

/// Render a 16-byte id as lowercase hex, for stores that require
/// printable keys (transfer keys; see the key-naming section of the design).
pub fn id_to_hex(id: u128) -> String {
    format!("{:032x}", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AccountFilterFlags;

    #[test]
    fn test_account_round_trip() {
        let account = Account {
            id: 42,
            debits_pending: 1,
            debits_posted: 2,
            credits_pending: 3,
            credits_posted: 4,
            user_data_128: 5,
            user_data_64: 6,
            user_data_32: 7,
            reserved: 0,
            ledger: 700,
            code: 10,
            flags: AccountFlags::HISTORY,
            timestamp: 12345,
        };
        let buf = encode_account(&account);
        let decoded = decode_account(&buf).unwrap();
        assert_eq!(account, decoded);
    }

    #[test]
    fn test_transfer_round_trip() {
        let transfer = Transfer {
            id: 99,
            debit_account_id: 10,
            credit_account_id: 11,
            amount: 1000,
            pending_id: 0,
            user_data_128: 0,
            user_data_64: 0,
            user_data_32: 0,
            timeout: 0,
            ledger: 700,
            code: 10,
            flags: TransferFlags::empty(),
            timestamp: 99999,
        };
        let buf = encode_transfer(&transfer);
        let decoded = decode_transfer(&buf).unwrap();
        assert_eq!(transfer, decoded);
    }

    #[test]
    fn test_account_filter_round_trip() {
        let filter = AccountFilter {
            account_id: 10,
            limit: 5,
            flags: AccountFilterFlags::DEBITS | AccountFilterFlags::REVERSED,
            ..Default::default()
        };
        let buf = encode_account_filter(&filter);
        let decoded = decode_account_filter(&buf).unwrap();
        assert_eq!(filter.account_id, decoded.account_id);
        assert_eq!(filter.limit, decoded.limit);
        assert_eq!(filter.flags, decoded.flags);
    }

    #[test]
    fn test_account_balance_round_trip() {
        let balance = AccountBalance {
            debits_pending: 1,
            debits_posted: 2,
            credits_pending: 3,
            credits_posted: 4,
            timestamp: 555,
            reserved: [0; 56],
        };
        let buf = encode_account_balance(&balance);
        let decoded = decode_account_balance(&buf).unwrap();
        assert_eq!(balance, decoded);
    }

    #[test]
    fn test_invalid_data_size() {
        let short = [0u8; 64];
        let err = decode_account(&short).unwrap_err();
        assert_eq!(err, InvalidDataSize { expected: 128, actual: 64 });
    }

    #[test]
    fn test_reserved_bytes_are_zero() {
        let account = Account {
            id: 1,
            ledger: 1,
            code: 1,
            ..Default::default()
        };
        let buf = encode_account(&account);
        assert_eq!(&buf[108..112], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_id_to_hex() {
        assert_eq!(id_to_hex(0), "0".repeat(32));
        assert_eq!(id_to_hex(255), "000000000000000000000000000000ff");
    }
}
