use crate::deployer::Deployment;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("artifact {name} not found at {}", path.display())]
    ArtifactNotFound { name: String, path: PathBuf },
    #[error("artifact {name} is invalid: {reason}")]
    InvalidArtifact { name: String, reason: String },
    #[error("artifact {name} has no configurable {param} to receive the constructor argument")]
    MissingConstructorParam { name: String, param: String },
    #[error("no accounts available on network {network}")]
    NoAccounts { network: String },
    #[error("invalid configuration {var}: {reason}")]
    Config { var: &'static str, reason: String },
    #[error(transparent)]
    Network(#[from] fuels::types::errors::Error),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The contract is live but the record was not written.
    #[error(
        "deployed {} as {} on {} but failed to record it: {source}",
        deployment.contract, deployment.contract_id, deployment.network
    )]
    Unrecorded {
        deployment: Box<Deployment>,
        #[source]
        source: Box<Error>,
    },
    #[error("malformed deployment record {}: {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
