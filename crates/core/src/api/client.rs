//! Reqwest-backed distribution API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::credentials::{AuthContext, SessionType};

use super::{
    ApiConfig, ApiError, DistributionApi, FareCalculationRequest, FareCalculationResult,
    PnrLookupResult, RefundResult, SubmitResponse,
};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the airline-distribution backend.
///
/// The API key is read from the shared [`AuthContext`] on every request, so
/// credential changes take effect immediately without rebuilding the client.
pub struct DistributionClient {
    client: Client,
    config: ApiConfig,
    auth: AuthContext,
}

impl DistributionClient {
    pub fn new(config: ApiConfig, auth: AuthContext) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            auth,
        }
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn map_transport_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::ConnectionFailed(e.to_string())
        } else {
            ApiError::InvalidResponse(e.to_string())
        }
    }

    /// Submit an asynchronous operation via POST; terminal code and session
    /// type always travel as query parameters.
    async fn post_submit<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError> {
        let url = format!("{}{}", self.base_url(), endpoint);
        debug!(endpoint = endpoint, "Submitting operation");

        let mut request = self
            .client
            .post(&url)
            .query(&[
                ("terminalCode", terminal_code),
                ("sessionType", session_type.as_str()),
            ])
            .json(body);

        if let Some(key) = self.auth.api_key() {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(Self::map_transport_error)?;
        Self::read_json(response).await
    }

    /// Fetch an operation's current status/result.
    async fn get_operation<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        operation_id: &str,
    ) -> Result<R, ApiError> {
        let url = format!("{}{}/{}", self.base_url(), endpoint, operation_id);

        let mut request = self.client.get(&url);
        if let Some(key) = self.auth.api_key() {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(Self::map_transport_error)?;
        Self::read_json(response).await
    }

    async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl DistributionApi for DistributionClient {
    async fn submit_pnr_lookup(
        &self,
        reservation_reference: &str,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError> {
        let body = json!({ "reservationReference": reservation_reference });
        self.post_submit(
            "/async/common-pnr-info-requests",
            &body,
            terminal_code,
            session_type,
        )
        .await
    }

    async fn poll_pnr_lookup(&self, operation_id: &str) -> Result<PnrLookupResult, ApiError> {
        self.get_operation("/operations/pnr-info-requests", operation_id)
            .await
    }

    async fn submit_fare_calculation(
        &self,
        request: &FareCalculationRequest,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError> {
        self.post_submit(
            "/async/refund-fare-requests",
            request,
            terminal_code,
            session_type,
        )
        .await
    }

    async fn poll_fare_calculation(
        &self,
        operation_id: &str,
    ) -> Result<FareCalculationResult, ApiError> {
        self.get_operation("/operations/refund-fare-requests", operation_id)
            .await
    }

    async fn submit_refund(
        &self,
        fare_calculation_order_reference: &str,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError> {
        let body = json!({ "fareCalculationOrderReference": fare_calculation_order_reference });
        self.post_submit("/async/refunds", &body, terminal_code, session_type)
            .await
    }

    async fn poll_refund(&self, operation_id: &str) -> Result<RefundResult, ApiError> {
        self.get_operation("/operations/refunds", operation_id)
            .await
    }
}
