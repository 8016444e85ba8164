//! Command-line interface definition.

use clap::{Parser, Subcommand};

use faredesk_core::SessionType;

#[derive(Debug, Parser)]
#[command(name = "faredesk", version, about = "Operator console for airline PNR refunds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save and lock operator credentials
    Login {
        /// API key sent with every request
        #[arg(long)]
        api_key: String,
        /// Terminal code identifying the point of sale
        #[arg(long)]
        terminal_code: String,
        /// Backend session flavor
        #[arg(long, default_value = "stateless")]
        session_type: SessionType,
    },
    /// Clear saved credentials
    Logout,
    /// Show credential and configuration state
    Status,
    /// Look up a reservation and print its passengers and segments
    Lookup {
        /// Reservation reference (6 characters)
        reference: String,
    },
    /// Calculate a refund for a reservation; add --execute to perform it
    Refund {
        /// Reservation reference (6 characters)
        reference: String,
        /// Passenger identifiers to refund (comma-separated)
        #[arg(long, value_delimiter = ',')]
        passengers: Vec<u32>,
        /// Segment numbers to refund (comma-separated, excludes --passengers)
        #[arg(long, value_delimiter = ',', conflicts_with = "passengers")]
        segments: Vec<u32>,
        /// Execute the refund after the fare calculation resolves
        #[arg(long)]
        execute: bool,
    },
}
