//! Generic asynchronous-operation poller.
//!
//! All three workflow stages (PNR lookup, fare calculation, refund) share the
//! same resolution protocol: fetch the operation's status immediately, then
//! re-fetch at a fixed interval while the backend reports `waiting` or
//! `processing`, and stop permanently on any other code or on a transport
//! error. The poller implements that protocol once, parameterized by a fetch
//! future and a [`StatusCarrier`] capability on the response type.

mod config;
mod runner;
mod types;

pub use config::PollerConfig;
pub use runner::{spawn_poller, PollHandle};
pub use types::{PollSnapshot, StatusCarrier};
