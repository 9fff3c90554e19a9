//! Network operations consumed by the voucher form.
//!
//! The form only depends on the [`VoucherApi`] trait; [`HttpVoucherApi`] is the
//! reqwest-backed implementation used by the binary.

pub mod client;
pub mod models;

pub use client::HttpVoucherApi;
pub use models::{
    CheckVoucherRequest, CheckVoucherResponse, ErrorResponse, GenerateVoucherRequest,
    GenerateVoucherResponse, GetVoucherRequest, GetVoucherResponse, RegenerateSeatRequest,
    RegenerateSeatResponse, Voucher,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// The four voucher operations. Dates are always canonical `YYYY-MM-DD`.
#[async_trait::async_trait]
pub trait VoucherApi: Send + Sync {
    async fn check_existence(
        &self,
        request: &CheckVoucherRequest,
    ) -> Result<CheckVoucherResponse, ApiError>;

    async fn generate(
        &self,
        request: &GenerateVoucherRequest,
    ) -> Result<GenerateVoucherResponse, ApiError>;

    async fn get_voucher(&self, request: &GetVoucherRequest)
        -> Result<GetVoucherResponse, ApiError>;

    async fn regenerate_seat(
        &self,
        request: &RegenerateSeatRequest,
    ) -> Result<RegenerateSeatResponse, ApiError>;
}
