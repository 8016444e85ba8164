//! Workflow orchestration across the three refund stages.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{
    DistributionApi, FareCalculationRequest, FareCalculationResult, PnrLookupResult,
    RefundResult, ReservationData, SubmitResponse,
};
use crate::credentials::{CredentialStore, Credentials};
use crate::poller::{spawn_poller, PollHandle, PollSnapshot, PollerConfig, StatusCarrier};
use crate::selection::SelectionGate;

use super::pnr::PnrReference;
use super::types::{SubmitOutcome, WorkflowError, WorkflowStage};

/// Drives the refund chain against a [`DistributionApi`].
///
/// The sequencer owns all per-reservation state: the validated reference,
/// the passenger/segment selection, one poll handle per stage, and the
/// reservation payload captured from a resolved lookup. Submitting a stage
/// resets everything downstream of it, so stale results can never leak into
/// a later request.
pub struct WorkflowSequencer {
    api: Arc<dyn DistributionApi>,
    credentials: Arc<CredentialStore>,
    poller_config: PollerConfig,

    reference: Option<PnrReference>,
    selection: SelectionGate,
    stage: WorkflowStage,
    reservation: Option<ReservationData>,

    pnr_operation_id: Option<String>,
    fare_operation_id: Option<String>,
    refund_operation_id: Option<String>,

    pnr_poll: Option<PollHandle<PnrLookupResult>>,
    fare_poll: Option<PollHandle<FareCalculationResult>>,
    refund_poll: Option<PollHandle<RefundResult>>,

    pnr_message: Option<String>,
    fare_message: Option<String>,
    refund_message: Option<String>,
}

impl WorkflowSequencer {
    pub fn new(
        api: Arc<dyn DistributionApi>,
        credentials: Arc<CredentialStore>,
        poller_config: PollerConfig,
    ) -> Self {
        Self {
            api,
            credentials,
            poller_config,
            reference: None,
            selection: SelectionGate::new(),
            stage: WorkflowStage::Idle,
            reservation: None,
            pnr_operation_id: None,
            fare_operation_id: None,
            refund_operation_id: None,
            pnr_poll: None,
            fare_poll: None,
            refund_poll: None,
            pnr_message: None,
            fare_message: None,
            refund_message: None,
        }
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn reference(&self) -> Option<&PnrReference> {
        self.reference.as_ref()
    }

    pub fn reservation(&self) -> Option<&ReservationData> {
        self.reservation.as_ref()
    }

    pub fn selection(&self) -> &SelectionGate {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionGate {
        &mut self.selection
    }

    pub fn pnr_message(&self) -> Option<&str> {
        self.pnr_message.as_deref()
    }

    pub fn fare_message(&self) -> Option<&str> {
        self.fare_message.as_deref()
    }

    pub fn refund_message(&self) -> Option<&str> {
        self.refund_message.as_deref()
    }

    /// Set the reservation reference, resetting the whole chain if it
    /// differs from the current one.
    pub fn set_pnr_reference(&mut self, reference: PnrReference) {
        if self.reference.as_ref() != Some(&reference) {
            self.reset_from(WorkflowStage::Idle);
        }
        self.reference = Some(reference);
    }

    /// Whether a fare calculation can be submitted.
    pub fn fare_available(&self) -> bool {
        self.stage >= WorkflowStage::PnrResolved && self.reservation.is_some()
    }

    /// Whether a refund can still be executed for the resolved fare
    /// calculation. Once a refund has been submitted for it, this stays
    /// false until a new fare calculation resolves.
    pub fn refund_available(&self) -> bool {
        self.stage >= WorkflowStage::FareResolved
            && self.fare_operation_id.is_some()
            && self.refund_operation_id.is_none()
    }

    /// Submit the PNR lookup for the current reference.
    ///
    /// Everything downstream of the reference is reset first, so a
    /// resubmission starts the chain over even for the same reservation.
    pub async fn submit_pnr_lookup(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        let creds = self.active_credentials()?;
        let reference = self
            .reference
            .clone()
            .ok_or(WorkflowError::MissingReference)?;

        self.reset_from(WorkflowStage::Idle);

        let response = self
            .api
            .submit_pnr_lookup(reference.as_str(), &creds.terminal_code, creds.session_type)
            .await;

        let (outcome, message) = Self::classify_submission(response);
        self.pnr_message = Some(message);
        if let SubmitOutcome::Accepted { operation_id } = &outcome {
            info!(reference = %reference, operation_id = %operation_id, "PNR lookup submitted");
            self.stage = WorkflowStage::PnrSubmitted;
            self.pnr_operation_id = Some(operation_id.clone());

            let api = Arc::clone(&self.api);
            self.pnr_poll = Some(spawn_poller(
                &self.poller_config,
                operation_id.clone(),
                move |id| {
                    let api = Arc::clone(&api);
                    async move { api.poll_pnr_lookup(&id).await }
                },
            ));
        }

        Ok(outcome)
    }

    /// Wait for the in-flight PNR lookup to reach a terminal state.
    pub async fn await_pnr_resolution(
        &mut self,
    ) -> Result<PollSnapshot<PnrLookupResult>, WorkflowError> {
        let handle = self
            .pnr_poll
            .as_mut()
            .ok_or(WorkflowError::NoLookupInFlight)?;
        let snapshot = handle.wait_terminal().await;

        if let Some(result) = &snapshot.last {
            if !result.processing_status().is_pending() {
                self.stage = WorkflowStage::PnrResolved;
                self.reservation = result.reservation_data.clone();
                debug!(
                    status = result.processing_status().as_str(),
                    has_reservation = self.reservation.is_some(),
                    "PNR lookup resolved"
                );
            }
        }

        Ok(snapshot)
    }

    /// Submit a fare calculation for the current selection.
    pub async fn submit_fare_calculation(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        let creds = self.active_credentials()?;
        let reference = self
            .reference
            .clone()
            .ok_or(WorkflowError::MissingReference)?;
        if !self.fare_available() {
            return Err(WorkflowError::PnrNotResolved);
        }

        self.reset_from(WorkflowStage::PnrResolved);

        let request = FareCalculationRequest {
            reservation_reference: reference.as_str().to_string(),
            ticket_numbers: Vec::new(),
            emd_numbers: Vec::new(),
            passenger_indexes: self.selection.passenger_ids(),
            segment_numbers: self.selection.segment_numbers(),
        };

        let response = self
            .api
            .submit_fare_calculation(&request, &creds.terminal_code, creds.session_type)
            .await;

        let (outcome, message) = Self::classify_submission(response);
        self.fare_message = Some(message);
        if let SubmitOutcome::Accepted { operation_id } = &outcome {
            info!(operation_id = %operation_id, "Fare calculation submitted");
            self.stage = WorkflowStage::FareSubmitted;
            self.fare_operation_id = Some(operation_id.clone());

            let api = Arc::clone(&self.api);
            self.fare_poll = Some(spawn_poller(
                &self.poller_config,
                operation_id.clone(),
                move |id| {
                    let api = Arc::clone(&api);
                    async move { api.poll_fare_calculation(&id).await }
                },
            ));
        }

        Ok(outcome)
    }

    /// Wait for the in-flight fare calculation to reach a terminal state.
    pub async fn await_fare_resolution(
        &mut self,
    ) -> Result<PollSnapshot<FareCalculationResult>, WorkflowError> {
        let handle = self
            .fare_poll
            .as_mut()
            .ok_or(WorkflowError::NoLookupInFlight)?;
        let snapshot = handle.wait_terminal().await;

        if let Some(result) = &snapshot.last {
            if !result.processing_status().is_pending() {
                self.stage = WorkflowStage::FareResolved;
                debug!(
                    status = result.processing_status().as_str(),
                    "Fare calculation resolved"
                );
            }
        }

        Ok(snapshot)
    }

    /// Execute the refund against the resolved fare calculation.
    ///
    /// This is a one-shot action: once a refund submission has produced an
    /// operation identifier, further attempts fail until a new fare
    /// calculation resolves.
    pub async fn execute_refund(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        let creds = self.active_credentials()?;
        if self.stage < WorkflowStage::FareResolved {
            return Err(WorkflowError::FareNotResolved);
        }
        if self.refund_operation_id.is_some() {
            return Err(WorkflowError::RefundAlreadyExecuted);
        }
        let fare_operation = self
            .fare_operation_id
            .clone()
            .ok_or(WorkflowError::MissingFareOperation)?;

        let response = self
            .api
            .submit_refund(&fare_operation, &creds.terminal_code, creds.session_type)
            .await;

        let (outcome, message) = Self::classify_submission(response);
        self.refund_message = Some(message);
        if let SubmitOutcome::Accepted { operation_id } = &outcome {
            info!(operation_id = %operation_id, "Refund submitted");
            self.stage = WorkflowStage::RefundSubmitted;
            self.refund_operation_id = Some(operation_id.clone());

            let api = Arc::clone(&self.api);
            self.refund_poll = Some(spawn_poller(
                &self.poller_config,
                operation_id.clone(),
                move |id| {
                    let api = Arc::clone(&api);
                    async move { api.poll_refund(&id).await }
                },
            ));
        }

        Ok(outcome)
    }

    /// Wait for the in-flight refund to reach a terminal state.
    pub async fn await_refund_resolution(
        &mut self,
    ) -> Result<PollSnapshot<RefundResult>, WorkflowError> {
        let handle = self
            .refund_poll
            .as_mut()
            .ok_or(WorkflowError::NoLookupInFlight)?;
        let snapshot = handle.wait_terminal().await;

        if let Some(result) = &snapshot.last {
            if !result.processing_status().is_pending() {
                self.stage = WorkflowStage::RefundResolved;
                info!(
                    status = result.processing_status().as_str(),
                    "Refund resolved"
                );
            }
        }

        Ok(snapshot)
    }

    fn active_credentials(&self) -> Result<Credentials, WorkflowError> {
        self.credentials
            .credentials()
            .ok_or(WorkflowError::CredentialsNotSaved)
    }

    fn classify_submission(
        response: Result<SubmitResponse, crate::api::ApiError>,
    ) -> (SubmitOutcome, String) {
        match response {
            Ok(SubmitResponse {
                operation_identifier: Some(id),
            }) => (
                SubmitOutcome::Accepted {
                    operation_id: id.clone(),
                },
                format!("operationId: {}", id),
            ),
            Ok(SubmitResponse {
                operation_identifier: None,
            }) => (
                SubmitOutcome::MissingIdentifier,
                "response contained no operationIdentifier".to_string(),
            ),
            Err(e) => (
                SubmitOutcome::Rejected {
                    message: e.to_string(),
                },
                e.to_string(),
            ),
        }
    }

    /// Reset all state that belongs to stages after `floor`. Poll handles
    /// are dropped, which cancels their tasks.
    fn reset_from(&mut self, floor: WorkflowStage) {
        if floor < WorkflowStage::PnrResolved {
            self.pnr_operation_id = None;
            self.pnr_poll = None;
            self.pnr_message = None;
            self.reservation = None;
            self.selection.reset();
        }
        if floor < WorkflowStage::FareResolved {
            self.fare_operation_id = None;
            self.fare_poll = None;
            self.fare_message = None;
        }
        self.refund_operation_id = None;
        self.refund_poll = None;
        self.refund_message = None;

        self.stage = floor;
        debug!(stage = self.stage.as_str(), "Workflow reset");
    }
}
