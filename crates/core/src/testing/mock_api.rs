//! Scriptable in-memory [`DistributionApi`] implementation.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, DistributionApi, FareCalculationRequest, FareCalculationResult, PnrLookupResult,
    RefundResult, SubmitResponse,
};
use crate::credentials::SessionType;

/// One call observed by the mock, with the arguments it received.
#[derive(Debug, Clone)]
pub enum RecordedRequest {
    PnrLookup {
        reservation_reference: String,
        terminal_code: String,
        session_type: SessionType,
    },
    PollPnrLookup {
        operation_id: String,
    },
    FareCalculation {
        request: FareCalculationRequest,
        terminal_code: String,
        session_type: SessionType,
    },
    PollFareCalculation {
        operation_id: String,
    },
    Refund {
        fare_calculation_order_reference: String,
        terminal_code: String,
        session_type: SessionType,
    },
    PollRefund {
        operation_id: String,
    },
}

/// Mock backend: responses are scripted per operation, calls are recorded.
///
/// An exhausted script answers with [`ApiError::InvalidResponse`], which the
/// poller treats as terminal, so a missing script line fails the test
/// instead of hanging it.
#[derive(Default)]
pub struct MockDistributionApi {
    pnr_submits: Mutex<VecDeque<Result<SubmitResponse, ApiError>>>,
    pnr_polls: Mutex<VecDeque<Result<PnrLookupResult, ApiError>>>,
    fare_submits: Mutex<VecDeque<Result<SubmitResponse, ApiError>>>,
    fare_polls: Mutex<VecDeque<Result<FareCalculationResult, ApiError>>>,
    refund_submits: Mutex<VecDeque<Result<SubmitResponse, ApiError>>>,
    refund_polls: Mutex<VecDeque<Result<RefundResult, ApiError>>>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

impl MockDistributionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pnr_submit(&self, response: Result<SubmitResponse, ApiError>) {
        self.pnr_submits.lock().unwrap().push_back(response);
    }

    pub fn push_pnr_poll(&self, response: Result<PnrLookupResult, ApiError>) {
        self.pnr_polls.lock().unwrap().push_back(response);
    }

    pub fn push_fare_submit(&self, response: Result<SubmitResponse, ApiError>) {
        self.fare_submits.lock().unwrap().push_back(response);
    }

    pub fn push_fare_poll(&self, response: Result<FareCalculationResult, ApiError>) {
        self.fare_polls.lock().unwrap().push_back(response);
    }

    pub fn push_refund_submit(&self, response: Result<SubmitResponse, ApiError>) {
        self.refund_submits.lock().unwrap().push_back(response);
    }

    pub fn push_refund_poll(&self, response: Result<RefundResult, ApiError>) {
        self.refund_polls.lock().unwrap().push_back(response);
    }

    /// All calls observed so far, in order.
    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    /// Body of the most recent fare-calculation submission.
    pub fn last_fare_request(&self) -> Option<FareCalculationRequest> {
        self.recorded()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                RecordedRequest::FareCalculation { request, .. } => Some(request),
                _ => None,
            })
    }

    /// Fare order reference of the most recent refund submission.
    pub fn last_refund_reference(&self) -> Option<String> {
        self.recorded()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                RecordedRequest::Refund {
                    fare_calculation_order_reference,
                    ..
                } => Some(fare_calculation_order_reference),
                _ => None,
            })
    }

    fn record(&self, call: RecordedRequest) {
        self.recorded.lock().unwrap().push(call);
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::InvalidResponse("mock: no scripted response".to_string())))
    }
}

#[async_trait]
impl DistributionApi for MockDistributionApi {
    async fn submit_pnr_lookup(
        &self,
        reservation_reference: &str,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError> {
        self.record(RecordedRequest::PnrLookup {
            reservation_reference: reservation_reference.to_string(),
            terminal_code: terminal_code.to_string(),
            session_type,
        });
        Self::pop(&self.pnr_submits)
    }

    async fn poll_pnr_lookup(&self, operation_id: &str) -> Result<PnrLookupResult, ApiError> {
        self.record(RecordedRequest::PollPnrLookup {
            operation_id: operation_id.to_string(),
        });
        Self::pop(&self.pnr_polls)
    }

    async fn submit_fare_calculation(
        &self,
        request: &FareCalculationRequest,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError> {
        self.record(RecordedRequest::FareCalculation {
            request: request.clone(),
            terminal_code: terminal_code.to_string(),
            session_type,
        });
        Self::pop(&self.fare_submits)
    }

    async fn poll_fare_calculation(
        &self,
        operation_id: &str,
    ) -> Result<FareCalculationResult, ApiError> {
        self.record(RecordedRequest::PollFareCalculation {
            operation_id: operation_id.to_string(),
        });
        Self::pop(&self.fare_polls)
    }

    async fn submit_refund(
        &self,
        fare_calculation_order_reference: &str,
        terminal_code: &str,
        session_type: SessionType,
    ) -> Result<SubmitResponse, ApiError> {
        self.record(RecordedRequest::Refund {
            fare_calculation_order_reference: fare_calculation_order_reference.to_string(),
            terminal_code: terminal_code.to_string(),
            session_type,
        });
        Self::pop(&self.refund_submits)
    }

    async fn poll_refund(&self, operation_id: &str) -> Result<RefundResult, ApiError> {
        self.record(RecordedRequest::PollRefund {
            operation_id: operation_id.to_string(),
        });
        Self::pop(&self.refund_polls)
    }
}
