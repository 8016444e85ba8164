use thiserror::Error;

/// Progress marker for the refund chain.
///
/// Stages are ordered; a stage is reachable only after every earlier stage
/// has resolved. Resetting the reference drops back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkflowStage {
    Idle,
    PnrSubmitted,
    PnrResolved,
    FareSubmitted,
    FareResolved,
    RefundSubmitted,
    RefundResolved,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Idle => "idle",
            WorkflowStage::PnrSubmitted => "pnr-submitted",
            WorkflowStage::PnrResolved => "pnr-resolved",
            WorkflowStage::FareSubmitted => "fare-submitted",
            WorkflowStage::FareResolved => "fare-resolved",
            WorkflowStage::RefundSubmitted => "refund-submitted",
            WorkflowStage::RefundResolved => "refund-resolved",
        }
    }
}

/// Outcome of submitting one asynchronous operation.
///
/// Only `Accepted` advances the workflow. The other two leave the stage
/// where it was so the operator can retry the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Backend accepted the request and returned an operation identifier.
    Accepted { operation_id: String },
    /// Backend accepted the request but the response carried no identifier,
    /// so there is nothing to poll.
    MissingIdentifier,
    /// Backend or transport rejected the request.
    Rejected { message: String },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// Precondition failures of the refund chain. Backend failures are not
/// errors here; they surface as [`SubmitOutcome`] or poll snapshots.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid reservation reference: {0:?}")]
    InvalidReference(String),

    #[error("credentials must be saved before submitting requests")]
    CredentialsNotSaved,

    #[error("no reservation reference has been set")]
    MissingReference,

    #[error("no operation of this kind is in flight")]
    NoLookupInFlight,

    #[error("PNR lookup has not resolved yet")]
    PnrNotResolved,

    #[error("fare calculation has not resolved yet")]
    FareNotResolved,

    #[error("refund has already been executed for this fare calculation")]
    RefundAlreadyExecuted,

    #[error("fare calculation produced no operation to refund")]
    MissingFareOperation,
}
