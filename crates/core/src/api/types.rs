use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::credentials::SessionType;
use crate::poller::StatusCarrier;

/// HTTP client configuration for the distribution backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the distribution API.
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u32 {
    30
}

/// Errors from the distribution backend or the transport underneath it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Could not connect to the backend.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}, body: {body}")]
    Http { status: u16, body: String },

    /// Response body could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Processing state reported by an asynchronous operation.
///
/// Only `Waiting` and `Processing` are non-terminal; every other code,
/// including ones this client has never seen, stops polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingStatus {
    Waiting,
    Processing,
    Completed,
    Failed,
    Unknown(String),
}

impl ProcessingStatus {
    pub fn parse(code: &str) -> Self {
        match code {
            "waiting" => ProcessingStatus::Waiting,
            "processing" => ProcessingStatus::Processing,
            "completed" => ProcessingStatus::Completed,
            "failed" => ProcessingStatus::Failed,
            other => ProcessingStatus::Unknown(other.to_string()),
        }
    }

    /// Whether the operation is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, ProcessingStatus::Waiting | ProcessingStatus::Processing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProcessingStatus::Waiting => "waiting",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
            ProcessingStatus::Unknown(code) => code,
        }
    }
}

/// The `status` block present on every poll response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationStatus {
    #[serde(rename = "processingStatusCode")]
    pub processing_status_code: String,
}

impl OperationStatus {
    pub fn processing_status(&self) -> ProcessingStatus {
        ProcessingStatus::parse(&self.processing_status_code)
    }
}

/// Response to a submit request. The identifier is optional on the wire;
/// a success without one is a recoverable condition, not a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "operationIdentifier", default)]
    pub operation_identifier: Option<String>,
}

/// Body of a fare-calculation submission. Ticket/EMD identifier arrays are
/// always sent, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareCalculationRequest {
    #[serde(rename = "reservationReference")]
    pub reservation_reference: String,
    #[serde(rename = "ticketNumbers")]
    pub ticket_numbers: Vec<String>,
    #[serde(rename = "emdNumbers")]
    pub emd_numbers: Vec<String>,
    #[serde(rename = "passengerIndexes")]
    pub passenger_indexes: Vec<u32>,
    #[serde(rename = "segmentNumbers")]
    pub segment_numbers: Vec<u32>,
}

/// A passenger on the reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traveller {
    #[serde(rename = "travellerIdentifier", default)]
    pub traveller_identifier: Option<u32>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "birthDate", default)]
    pub birth_date: Option<String>,
}

/// A flight segment on the reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationSegment {
    #[serde(rename = "segmentNumber", default)]
    pub segment_number: Option<u32>,
    #[serde(rename = "carrierCode", default)]
    pub carrier_code: Option<String>,
    #[serde(rename = "flightNumber", default)]
    pub flight_number: Option<String>,
    #[serde(rename = "departureDate", default)]
    pub departure_date: Option<String>,
    #[serde(rename = "arrivalDate", default)]
    pub arrival_date: Option<String>,
    #[serde(rename = "fromAirport", default)]
    pub from_airport: Option<String>,
    #[serde(rename = "toAirport", default)]
    pub to_airport: Option<String>,
}

/// Reservation payload returned by a resolved PNR lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationData {
    #[serde(default)]
    pub travellers: Vec<Traveller>,
    #[serde(rename = "reservationSegments", default)]
    pub reservation_segments: Vec<ReservationSegment>,
}

/// Poll response for a PNR lookup operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnrLookupResult {
    pub status: OperationStatus,
    #[serde(rename = "reservationData", default)]
    pub reservation_data: Option<ReservationData>,
    /// Remaining response fields, kept raw for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Poll response for a fare-calculation operation. The fare payload is
/// backend-defined and retained raw for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareCalculationResult {
    pub status: OperationStatus,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Poll response for a refund-execution operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundResult {
    pub status: OperationStatus,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl StatusCarrier for PnrLookupResult {
    fn processing_status(&self) -> ProcessingStatus {
        self.status.processing_status()
    }
}

impl StatusCarrier for FareCalculationResult {
    fn processing_status(&self) -> ProcessingStatus {
        self.status.processing_status()
    }
}

impl StatusCarrier for RefundResult {
    fn processing_status(&self) -> ProcessingStatus {
        self.status.processing_status()
    }
}

/// The six remote operations consumed by the refund workflow.
#[async_trait]
pub trait DistributionApi: Send + Sync {
    async fn submit_pnr_lookup(
        &self,
        reservation_reference: &str,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError>;

    async fn poll_pnr_lookup(&self, operation_id: &str) -> Result<PnrLookupResult, ApiError>;

    async fn submit_fare_calculation(
        &self,
        request: &FareCalculationRequest,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError>;

    async fn poll_fare_calculation(
        &self,
        operation_id: &str,
    ) -> Result<FareCalculationResult, ApiError>;

    async fn submit_refund(
        &self,
        fare_calculation_order_reference: &str,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError>;

    async fn poll_refund(&self, operation_id: &str) -> Result<RefundResult, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_status_parse() {
        assert_eq!(ProcessingStatus::parse("waiting"), ProcessingStatus::Waiting);
        assert_eq!(
            ProcessingStatus::parse("processing"),
            ProcessingStatus::Processing
        );
        assert_eq!(
            ProcessingStatus::parse("completed"),
            ProcessingStatus::Completed
        );
        assert_eq!(ProcessingStatus::parse("failed"), ProcessingStatus::Failed);
        assert_eq!(
            ProcessingStatus::parse("rejected"),
            ProcessingStatus::Unknown("rejected".to_string())
        );
    }

    #[test]
    fn test_only_waiting_and_processing_are_pending() {
        assert!(ProcessingStatus::Waiting.is_pending());
        assert!(ProcessingStatus::Processing.is_pending());
        assert!(!ProcessingStatus::Completed.is_pending());
        assert!(!ProcessingStatus::Failed.is_pending());
        assert!(!ProcessingStatus::Unknown("rejected".to_string()).is_pending());
    }

    #[test]
    fn test_submit_response_without_identifier() {
        let resp: SubmitResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.operation_identifier, None);

        let resp: SubmitResponse =
            serde_json::from_str(r#"{"operationIdentifier":"op-1"}"#).unwrap();
        assert_eq!(resp.operation_identifier, Some("op-1".to_string()));
    }

    #[test]
    fn test_pnr_result_deserialization() {
        let json = r#"{
            "status": {"processingStatusCode": "completed"},
            "reservationData": {
                "travellers": [
                    {"travellerIdentifier": 1, "lastName": "IVANOV", "firstName": "IVAN", "birthDate": "1990-01-01"}
                ],
                "reservationSegments": [
                    {"segmentNumber": 2, "carrierCode": "SU", "flightNumber": "100",
                     "departureDate": "2026-09-01", "arrivalDate": "2026-09-01",
                     "fromAirport": "SVO", "toAirport": "LED"}
                ]
            },
            "reservationReference": "AB12C3"
        }"#;

        let result: PnrLookupResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.processing_status(), ProcessingStatus::Completed);

        let data = result.reservation_data.as_ref().unwrap();
        assert_eq!(data.travellers.len(), 1);
        assert_eq!(data.travellers[0].traveller_identifier, Some(1));
        assert_eq!(data.reservation_segments[0].segment_number, Some(2));
        assert_eq!(
            result.extra.get("reservationReference"),
            Some(&Value::String("AB12C3".to_string()))
        );
    }

    #[test]
    fn test_pnr_result_pending_without_data() {
        let json = r#"{"status": {"processingStatusCode": "waiting"}}"#;
        let result: PnrLookupResult = serde_json::from_str(json).unwrap();
        assert!(result.processing_status().is_pending());
        assert!(result.reservation_data.is_none());
    }

    #[test]
    fn test_fare_result_keeps_raw_payload() {
        let json = r#"{
            "status": {"processingStatusCode": "completed"},
            "totalAmount": "1234.00",
            "currency": "RUB"
        }"#;
        let result: FareCalculationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.processing_status(), ProcessingStatus::Completed);
        assert_eq!(
            result.payload.get("currency"),
            Some(&Value::String("RUB".to_string()))
        );
    }

    #[test]
    fn test_fare_request_wire_names() {
        let request = FareCalculationRequest {
            reservation_reference: "AB12C3".to_string(),
            ticket_numbers: vec![],
            emd_numbers: vec![],
            passenger_indexes: vec![1, 2],
            segment_numbers: vec![],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["reservationReference"], "AB12C3");
        assert_eq!(json["passengerIndexes"], serde_json::json!([1, 2]));
        assert_eq!(json["ticketNumbers"], serde_json::json!([]));
        assert_eq!(json["emdNumbers"], serde_json::json!([]));
        assert_eq!(json["segmentNumbers"], serde_json::json!([]));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Http {
            status: 422,
            body: "{\"message\":\"bad reference\"}".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 422, body: {\"message\":\"bad reference\"}");
    }
}
