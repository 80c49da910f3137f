//! Byte-buffer entry points matching the binary wire contract.
//!
//! [`crate`]'s primary API takes and returns the typed [`Account`] and
//! [`Transfer`] structs directly, which is the natural Rust surface.
//! This module is the thin adapter for callers that only have raw
//! fixed-size buffers — e.g. a network-facing frontend decoding a
//! batch straight off the wire — decoding each event, delegating to the
//! typed API, and re-encoding the dense per-event result codes.

use crate::error::{LedgerError, Result};
use crate::protocol::{Account, AccountFilter, CreateAccountResult, CreateTransferResult, Transfer};
use crate::store::LedgerStore;
use crate::{codec, query};

/// Decode and apply a single 128-byte account-creation event.
pub fn create_account(store: &mut dyn LedgerStore, buf: &[u8]) -> Result<CreateAccountResult> {
    let account = codec::decode_account(buf).map_err(LedgerError::from)?;
    Ok(crate::create_account(store, account))
}

/// Decode and apply a single 128-byte transfer-creation event.
pub fn create_transfer(store: &mut dyn LedgerStore, buf: &[u8]) -> Result<CreateTransferResult> {
    let transfer = codec::decode_transfer(buf).map_err(LedgerError::from)?;
    Ok(crate::create_transfer(store, transfer))
}

/// Decode and apply a batch of 128-byte account-creation events as one
/// or more `linked` chains.
pub fn create_chained_accounts(store: &mut dyn LedgerStore, bufs: &[&[u8]]) -> Result<Vec<CreateAccountResult>> {
    let events = bufs
        .iter()
        .map(|buf| codec::decode_account(buf).map_err(LedgerError::from))
        .collect::<Result<Vec<Account>>>()?;
    Ok(crate::create_chained_accounts(store, &events))
}

/// Decode and apply a batch of 128-byte transfer-creation events as
/// one or more `linked` chains.
pub fn create_chained_transfers(store: &mut dyn LedgerStore, bufs: &[&[u8]]) -> Result<Vec<CreateTransferResult>> {
    let events = bufs
        .iter()
        .map(|buf| codec::decode_transfer(buf).map_err(LedgerError::from))
        .collect::<Result<Vec<Transfer>>>()?;
    Ok(crate::create_chained_transfers(store, &events))
}

/// Look up an account by id, re-encoded as a 128-byte buffer.
pub fn lookup_account(store: &dyn LedgerStore, id: u128) -> Option<[u8; 128]> {
    crate::lookup_account(store, id).map(|account| codec::encode_account(&account))
}

/// Look up a transfer by id, re-encoded as a 128-byte buffer.
pub fn lookup_transfer(store: &dyn LedgerStore, id: u128) -> Option<[u8; 128]> {
    crate::lookup_transfer(store, id).map(|transfer| codec::encode_transfer(&transfer))
}

/// Decode a 128-byte filter and return matching transfers, each
/// re-encoded as a 128-byte buffer.
pub fn get_account_transfers(store: &dyn LedgerStore, filter_buf: &[u8]) -> Result<Vec<[u8; 128]>> {
    let filter = codec::decode_account_filter(filter_buf).map_err(LedgerError::from)?;
    Ok(query::get_account_transfers(store, &filter).iter().map(codec::encode_transfer).collect())
}

/// Decode a 128-byte filter and return matching balance snapshots,
/// each re-encoded as a 128-byte buffer.
pub fn get_account_balances(store: &dyn LedgerStore, filter_buf: &[u8]) -> Result<Vec<[u8; 128]>> {
    let filter: AccountFilter = codec::decode_account_filter(filter_buf).map_err(LedgerError::from)?;
    Ok(query::get_account_balances(store, &filter)
        .iter()
        .map(codec::encode_account_balance)
        .collect::<Vec<_>>())
}
