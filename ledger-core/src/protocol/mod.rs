//! Ledger wire-format types.
//!
//! This module contains the fixed-layout record types that make up the
//! binary contract described in the data model: accounts, transfers,
//! filters, and their result codes.

pub mod types;

pub use types::{
    Account, AccountBalance, AccountFilter, AccountFilterFlags, AccountFlags, CreateAccountResult,
    CreateTransferResult, Transfer, TransferFlags,
};
