use chain_sol::SolError;
use sol_rpc::RpcError;
use thiserror::Error;

/// Failures a panel can report. Every variant ends up as a notification
/// (or status line) in the UI; none is fatal.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Wallet not connected")]
    NoIdentity,

    #[error("A request is already in progress")]
    Busy,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("{0}")]
    Transport(String),

    #[error("Transaction build failed: {0}")]
    Build(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<SolError> for PanelError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::InvalidAddress(_)
            | SolError::InvalidMetadata(_)
            | SolError::InvalidKeypair(_) => PanelError::InvalidInput(e.to_string()),
            SolError::SigningError(_) => PanelError::Signing(e.to_string()),
            SolError::TransactionBuildError(_) => PanelError::Build(e.to_string()),
        }
    }
}

impl From<RpcError> for PanelError {
    fn from(e: RpcError) -> Self {
        PanelError::Transport(e.to_string())
    }
}
