//! JSON-serializable API request/response types.
//!
//! u128 values are serialized as 32-hex-digit strings to avoid
//! JavaScript/JSON-number precision issues; result codes are rendered
//! as their `snake_case` name rather than their numeric value.

use serde::{Deserialize, Serialize};

use ledger_core::{Account, AccountBalance, AccountFlags, CreateAccountResult, CreateTransferResult, Transfer, TransferFlags};

fn parse_hex_id(s: &str) -> Result<u128, String> {
    u128::from_str_radix(s, 16).map_err(|_| format!("invalid id: {}", s))
}

fn parse_decimal_amount(s: &str) -> Result<u128, String> {
    s.parse::<u128>().map_err(|_| format!("invalid amount: {}", s))
}

/// Render a `CreateAccountResult`/`CreateTransferResult` variant name
/// (e.g. `IdMustNotBeZero`) as `snake_case` (e.g. `id_must_not_be_zero`).
pub fn result_code_name(debug: impl std::fmt::Debug) -> String {
    let pascal = format!("{:?}", debug);
    let mut snake = String::with_capacity(pascal.len() + 4);
    for (i, ch) in pascal.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}

/// Request body for `POST /accounts`.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub id: String,
    #[serde(default)]
    pub user_data_128: Option<String>,
    #[serde(default)]
    pub user_data_64: u64,
    #[serde(default)]
    pub user_data_32: u32,
    pub ledger: u32,
    pub code: u16,
    #[serde(default)]
    pub debits_must_not_exceed_credits: bool,
    #[serde(default)]
    pub credits_must_not_exceed_debits: bool,
    #[serde(default)]
    pub history: bool,
}

impl TryFrom<CreateAccountRequest> for Account {
    type Error = String;

    fn try_from(req: CreateAccountRequest) -> Result<Self, String> {
        let mut flags = AccountFlags::empty();
        if req.debits_must_not_exceed_credits {
            flags |= AccountFlags::DEBITS_MUST_NOT_EXCEED_CREDITS;
        }
        if req.credits_must_not_exceed_debits {
            flags |= AccountFlags::CREDITS_MUST_NOT_EXCEED_DEBITS;
        }
        if req.history {
            flags |= AccountFlags::HISTORY;
        }
        Ok(Account {
            id: parse_hex_id(&req.id)?,
            user_data_128: req.user_data_128.as_deref().map(parse_hex_id).transpose()?.unwrap_or(0),
            user_data_64: req.user_data_64,
            user_data_32: req.user_data_32,
            ledger: req.ledger,
            code: req.code,
            flags,
            ..Default::default()
        })
    }
}

/// Request body for `POST /transfers`.
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub id: String,
    pub debit_account_id: String,
    pub credit_account_id: String,
    pub amount: String,
    #[serde(default)]
    pub pending_id: Option<String>,
    pub ledger: u32,
    pub code: u16,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub post_pending_transfer: bool,
    #[serde(default)]
    pub void_pending_transfer: bool,
}

impl TryFrom<CreateTransferRequest> for Transfer {
    type Error = String;

    fn try_from(req: CreateTransferRequest) -> Result<Self, String> {
        let mut flags = TransferFlags::empty();
        if req.pending {
            flags |= TransferFlags::PENDING;
        }
        if req.post_pending_transfer {
            flags |= TransferFlags::POST_PENDING_TRANSFER;
        }
        if req.void_pending_transfer {
            flags |= TransferFlags::VOID_PENDING_TRANSFER;
        }
        Ok(Transfer {
            id: parse_hex_id(&req.id)?,
            debit_account_id: parse_hex_id(&req.debit_account_id)?,
            credit_account_id: parse_hex_id(&req.credit_account_id)?,
            amount: parse_decimal_amount(&req.amount)?,
            pending_id: req.pending_id.as_deref().map(parse_hex_id).transpose()?.unwrap_or(0),
            ledger: req.ledger,
            code: req.code,
            flags,
            ..Default::default()
        })
    }
}

/// Response body for a create-account/create-transfer request.
#[derive(Debug, Serialize)]
pub struct CreateResultResponse {
    pub result: String,
}

impl From<CreateAccountResult> for CreateResultResponse {
    fn from(code: CreateAccountResult) -> Self {
        Self { result: result_code_name(code) }
    }
}

impl From<CreateTransferResult> for CreateResultResponse {
    fn from(code: CreateTransferResult) -> Self {
        Self { result: result_code_name(code) }
    }
}

/// Account response type.
#[derive(Debug, Serialize)]
pub struct ApiAccount {
    pub id: String,
    pub debits_pending: String,
    pub debits_posted: String,
    pub credits_pending: String,
    pub credits_posted: String,
    pub user_data_128: String,
    pub user_data_64: u64,
    pub user_data_32: u32,
    pub ledger: u32,
    pub code: u16,
    pub flags: u16,
    pub timestamp: u64,
}

impl From<&Account> for ApiAccount {
    fn from(a: &Account) -> Self {
        Self {
            id: format!("{:032x}", a.id),
            debits_pending: a.debits_pending.to_string(),
            debits_posted: a.debits_posted.to_string(),
            credits_pending: a.credits_pending.to_string(),
            credits_posted: a.credits_posted.to_string(),
            user_data_128: format!("{:032x}", a.user_data_128),
            user_data_64: a.user_data_64,
            user_data_32: a.user_data_32,
            ledger: a.ledger,
            code: a.code,
            flags: a.flags.bits(),
            timestamp: a.timestamp,
        }
    }
}

/// Transfer response type.
#[derive(Debug, Serialize)]
pub struct ApiTransfer {
    pub id: String,
    pub debit_account_id: String,
    pub credit_account_id: String,
    pub amount: String,
    pub pending_id: String,
    pub user_data_128: String,
    pub user_data_64: u64,
    pub user_data_32: u32,
    pub timeout: u32,
    pub ledger: u32,
    pub code: u16,
    pub flags: u16,
    pub timestamp: u64,
}

impl From<&Transfer> for ApiTransfer {
    fn from(t: &Transfer) -> Self {
        Self {
            id: format!("{:032x}", t.id),
            debit_account_id: format!("{:032x}", t.debit_account_id),
            credit_account_id: format!("{:032x}", t.credit_account_id),
            amount: t.amount.to_string(),
            pending_id: format!("{:032x}", t.pending_id),
            user_data_128: format!("{:032x}", t.user_data_128),
            user_data_64: t.user_data_64,
            user_data_32: t.user_data_32,
            timeout: t.timeout,
            ledger: t.ledger,
            code: t.code,
            flags: t.flags.bits(),
            timestamp: t.timestamp,
        }
    }
}

/// Account balance response type.
#[derive(Debug, Serialize)]
pub struct ApiAccountBalance {
    pub debits_pending: String,
    pub debits_posted: String,
    pub credits_pending: String,
    pub credits_posted: String,
    pub timestamp: u64,
}

impl From<&AccountBalance> for ApiAccountBalance {
    fn from(b: &AccountBalance) -> Self {
        Self {
            debits_pending: b.debits_pending.to_string(),
            debits_posted: b.debits_posted.to_string(),
            credits_pending: b.credits_pending.to_string(),
            credits_posted: b.credits_posted.to_string(),
            timestamp: b.timestamp,
        }
    }
}

/// Paginated transfers response.
#[derive(Debug, Serialize)]
pub struct TransfersResponse {
    pub transfers: Vec<ApiTransfer>,
}

/// Account balances response.
#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub balances: Vec<ApiAccountBalance>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_code_name_snake_case() {
        assert_eq!(result_code_name(CreateAccountResult::Ok), "ok");
        assert_eq!(result_code_name(CreateAccountResult::IdMustNotBeZero), "id_must_not_be_zero");
        assert_eq!(result_code_name(CreateTransferResult::ExceedsCredits), "exceeds_credits");
    }
}
