//! Test doubles and fixtures shared across unit and integration tests.

mod mock_api;

pub use mock_api::{MockDistributionApi, RecordedRequest};

pub mod fixtures {
    //! Canned wire payloads for the refund workflow.

    use serde_json::Map;

    use crate::api::{
        FareCalculationResult, OperationStatus, PnrLookupResult, RefundResult, ReservationData,
        ReservationSegment, SubmitResponse, Traveller,
    };

    pub fn status(code: &str) -> OperationStatus {
        OperationStatus {
            processing_status_code: code.to_string(),
        }
    }

    pub fn submit_ok(operation_id: &str) -> SubmitResponse {
        SubmitResponse {
            operation_identifier: Some(operation_id.to_string()),
        }
    }

    pub fn submit_without_id() -> SubmitResponse {
        SubmitResponse {
            operation_identifier: None,
        }
    }

    pub fn traveller() -> Traveller {
        Traveller {
            traveller_identifier: Some(1),
            last_name: Some("IVANOV".to_string()),
            first_name: Some("IVAN".to_string()),
            birth_date: Some("1990-01-01".to_string()),
        }
    }

    pub fn segment() -> ReservationSegment {
        ReservationSegment {
            segment_number: Some(2),
            carrier_code: Some("SU".to_string()),
            flight_number: Some("100".to_string()),
            departure_date: Some("2026-09-01".to_string()),
            arrival_date: Some("2026-09-01".to_string()),
            from_airport: Some("SVO".to_string()),
            to_airport: Some("LED".to_string()),
        }
    }

    pub fn reservation_data() -> ReservationData {
        ReservationData {
            travellers: vec![traveller()],
            reservation_segments: vec![segment()],
        }
    }

    pub fn pending_lookup() -> PnrLookupResult {
        PnrLookupResult {
            status: status("processing"),
            reservation_data: None,
            extra: Map::new(),
        }
    }

    pub fn completed_lookup() -> PnrLookupResult {
        PnrLookupResult {
            status: status("completed"),
            reservation_data: Some(reservation_data()),
            extra: Map::new(),
        }
    }

    pub fn pending_fare() -> FareCalculationResult {
        FareCalculationResult {
            status: status("waiting"),
            payload: Map::new(),
        }
    }

    pub fn completed_fare() -> FareCalculationResult {
        FareCalculationResult {
            status: status("completed"),
            payload: Map::new(),
        }
    }

    pub fn completed_refund() -> RefundResult {
        RefundResult {
            status: status("completed"),
            payload: Map::new(),
        }
    }
}
