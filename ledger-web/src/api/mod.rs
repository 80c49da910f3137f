//! JSON request/response types for the HTTP API.

mod types;

pub use types::{
    ApiAccount, ApiAccountBalance, ApiTransfer, BalancesResponse, CreateAccountRequest, CreateResultResponse,
    CreateTransferRequest, HealthResponse, TransfersResponse,
};
