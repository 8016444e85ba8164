//! Three-stage refund workflow: PNR lookup, fare calculation, refund.
//!
//! Each stage submits an asynchronous operation and polls it to a terminal
//! state before the next stage unlocks. Changing the reservation reference
//! or resubmitting a stage resets everything downstream of it.

mod pnr;
mod sequencer;
mod types;

pub use pnr::PnrReference;
pub use sequencer::WorkflowSequencer;
pub use types::{SubmitOutcome, WorkflowError, WorkflowStage};
