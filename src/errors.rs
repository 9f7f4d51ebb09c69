use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use ethers::providers::ProviderError;
use thiserror::Error;

use crate::models::api_response::ErrorResponse;

/// Failures while talking to the node or decoding what it returned.
#[derive(Error, Debug)]
pub enum CustomError {
    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Block not found: {0}")]
    BlockNotFoundError(u64),

    #[error("Invalid address: {0}")]
    InvalidAddressError(String),
}

/// Errors surfaced at the HTTP boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid Ethereum address")]
    InvalidAddress,

    #[error("Error fetching balance: {0}")]
    Balance(#[source] CustomError),

    #[error("Error fetching historical balance: {0}")]
    HistoricalBalance(#[source] CustomError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidAddress => StatusCode::BAD_REQUEST,
            ApiError::Balance(_) | ApiError::HistoricalBalance(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
