//! Command execution against the core workflow.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::debug;

use faredesk_core::{
    api::PnrLookupResult, validate_config, AuthContext, Config, CredentialStore, DistributionApi,
    DistributionClient, PnrReference, PollSnapshot, SessionType, SubmitOutcome, WorkflowSequencer,
};

use crate::cli::{Cli, Command};
use crate::output;

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let auth = AuthContext::new();
    let store = Arc::new(CredentialStore::new(
        config.credentials.path.clone(),
        auth.clone(),
    ));

    match cli.command {
        Command::Login {
            api_key,
            terminal_code,
            session_type,
        } => login(&store, &api_key, &terminal_code, session_type),
        Command::Logout => {
            store.logout();
            println!("Credentials cleared.");
            Ok(())
        }
        Command::Status => status(&config, &store),
        Command::Lookup { reference } => {
            let mut sequencer = build_sequencer(&config, auth, store)?;
            lookup(&mut sequencer, &reference).await
        }
        Command::Refund {
            reference,
            passengers,
            segments,
            execute,
        } => {
            let mut sequencer = build_sequencer(&config, auth, store)?;
            refund(&mut sequencer, &reference, &passengers, &segments, execute).await
        }
    }
}

fn login(
    store: &CredentialStore,
    api_key: &str,
    terminal_code: &str,
    session_type: SessionType,
) -> Result<()> {
    store
        .save(api_key, terminal_code, session_type)
        .context("Failed to save credentials")?;
    println!(
        "Credentials saved for terminal {} ({} session).",
        terminal_code, session_type
    );
    Ok(())
}

fn status(config: &Config, store: &CredentialStore) -> Result<()> {
    if config.api.base_url.is_empty() {
        println!("Backend: (not configured)");
    } else {
        println!("Backend: {}", config.api.base_url);
    }
    println!("Poll interval: {} ms", config.poller.interval_ms);

    match store.credentials() {
        Some(creds) => println!(
            "Credentials: locked (terminal {}, {} session)",
            creds.terminal_code, creds.session_type
        ),
        None => println!("Credentials: not saved"),
    }
    Ok(())
}

fn build_sequencer(
    config: &Config,
    auth: AuthContext,
    store: Arc<CredentialStore>,
) -> Result<WorkflowSequencer> {
    validate_config(config).context("Configuration validation failed")?;

    let api: Arc<dyn DistributionApi> =
        Arc::new(DistributionClient::new(config.api.clone(), auth));
    Ok(WorkflowSequencer::new(api, store, config.poller.clone()))
}

/// Submit the PNR lookup and poll it to resolution.
async fn resolve_lookup(
    sequencer: &mut WorkflowSequencer,
    reference: &str,
) -> Result<PollSnapshot<PnrLookupResult>> {
    let reference = PnrReference::parse(reference)?;
    println!("Looking up {} ...", reference);
    sequencer.set_pnr_reference(reference);

    let outcome = sequencer.submit_pnr_lookup().await?;
    expect_accepted(outcome, "lookup")?;

    let snapshot = sequencer.await_pnr_resolution().await?;
    if let Some(error) = &snapshot.error {
        bail!("lookup polling failed: {}", error);
    }
    debug!(polls = snapshot.polls, "Lookup resolved");

    Ok(snapshot)
}

async fn lookup(sequencer: &mut WorkflowSequencer, reference: &str) -> Result<()> {
    let snapshot = resolve_lookup(sequencer, reference).await?;

    match sequencer.reservation() {
        Some(data) => print!("{}", output::render_reservation(data)),
        None => bail!("lookup resolved without reservation data; check the reference"),
    }
    if let Some(result) = &snapshot.last {
        if !result.extra.is_empty() {
            println!("{}", output::render_payload(&result.extra));
        }
    }
    Ok(())
}

async fn refund(
    sequencer: &mut WorkflowSequencer,
    reference: &str,
    passengers: &[u32],
    segments: &[u32],
    execute: bool,
) -> Result<()> {
    resolve_lookup(sequencer, reference).await?;
    if sequencer.reservation().is_none() {
        bail!("lookup resolved without reservation data; check the reference");
    }

    for &id in passengers {
        if !sequencer.selection_mut().toggle_passenger(id) {
            bail!("passenger selection is disabled while segments are selected");
        }
    }
    for &number in segments {
        if !sequencer.selection_mut().toggle_segment(number) {
            bail!("segment selection is disabled while passengers are selected");
        }
    }

    let outcome = sequencer.submit_fare_calculation().await?;
    expect_accepted(outcome, "fare calculation")?;

    let snapshot = sequencer.await_fare_resolution().await?;
    if let Some(error) = &snapshot.error {
        bail!("fare calculation polling failed: {}", error);
    }
    if let Some(result) = &snapshot.last {
        println!("Fare calculation: {}", result.status.processing_status_code);
        println!("{}", output::render_payload(&result.payload));
    }

    if !execute {
        println!("Dry run; pass --execute to perform the refund.");
        return Ok(());
    }

    let outcome = sequencer.execute_refund().await?;
    expect_accepted(outcome, "refund")?;

    let snapshot = sequencer.await_refund_resolution().await?;
    if let Some(error) = &snapshot.error {
        bail!("refund polling failed: {}", error);
    }
    if let Some(result) = &snapshot.last {
        println!("Refund: {}", result.status.processing_status_code);
        println!("{}", output::render_payload(&result.payload));
    }

    Ok(())
}

fn expect_accepted(outcome: SubmitOutcome, what: &str) -> Result<()> {
    match outcome {
        SubmitOutcome::Accepted { operation_id } => {
            println!("Submitted {} (operation {}).", what, operation_id);
            Ok(())
        }
        SubmitOutcome::MissingIdentifier => bail!(
            "backend accepted the {} but returned no operation identifier; try again",
            what
        ),
        SubmitOutcome::Rejected { message } => bail!("{} rejected: {}", what, message),
    }
}
