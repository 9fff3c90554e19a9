use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::models::{
    CheckVoucherRequest, CheckVoucherResponse, ErrorResponse, GenerateVoucherRequest,
    GenerateVoucherResponse, GetVoucherRequest, GetVoucherResponse, RegenerateSeatRequest,
    RegenerateSeatResponse,
};
use super::{ApiError, VoucherApi};
use crate::config::ClientConfig;

const CHECK_PATH: &str = "/api/check";
const GENERATE_PATH: &str = "/api/generate";
const VOUCHER_PATH: &str = "/api/voucher";
const REGENERATE_SEAT_PATH: &str = "/api/regenerate-seat";

/// JSON-over-HTTP client for the voucher server.
#[derive(Clone)]
pub struct HttpVoucherApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVoucherApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_idle_timeout(std::time::Duration::from_secs(900))
            .user_agent(concat!("crew-voucher-form/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            return serde_json::from_str(&text)
                .map_err(|e| ApiError::MalformedResponse(format!("{}: {}", path, e)));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        debug!("POST {} returned {}: {}", url, status, message);

        if status == StatusCode::CONFLICT {
            Err(ApiError::Conflict(message))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl VoucherApi for HttpVoucherApi {
    async fn check_existence(
        &self,
        request: &CheckVoucherRequest,
    ) -> Result<CheckVoucherResponse, ApiError> {
        self.post(CHECK_PATH, request).await
    }

    async fn generate(
        &self,
        request: &GenerateVoucherRequest,
    ) -> Result<GenerateVoucherResponse, ApiError> {
        self.post(GENERATE_PATH, request).await
    }

    async fn get_voucher(
        &self,
        request: &GetVoucherRequest,
    ) -> Result<GetVoucherResponse, ApiError> {
        self.post(VOUCHER_PATH, request).await
    }

    async fn regenerate_seat(
        &self,
        request: &RegenerateSeatRequest,
    ) -> Result<RegenerateSeatResponse, ApiError> {
        self.post(REGENERATE_SEAT_PATH, request).await
    }
}
