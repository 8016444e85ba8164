//! Airline-distribution backend client.
//!
//! This module provides a `DistributionApi` trait covering the six remote
//! operations the workflow consumes (submit + poll for PNR lookup, fare
//! calculation, and refund execution), and a reqwest-backed implementation.

mod client;
mod types;

pub use client::DistributionClient;
pub use types::*;
