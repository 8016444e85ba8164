pub mod api;
pub mod config;
pub mod credentials;
pub mod poller;
pub mod selection;
pub mod testing;
pub mod workflow;

pub use api::{
    ApiConfig, ApiError, DistributionApi, DistributionClient, ProcessingStatus, ReservationData,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use credentials::{AuthContext, CredentialError, CredentialStore, Credentials, SessionType};
pub use poller::{spawn_poller, PollHandle, PollSnapshot, PollerConfig, StatusCarrier};
pub use selection::{SelectionGate, SelectionMode};
pub use workflow::{PnrReference, SubmitOutcome, WorkflowError, WorkflowSequencer, WorkflowStage};
