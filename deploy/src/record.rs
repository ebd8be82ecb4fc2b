use crate::deployer::Deployment;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use fuels::types::{Address, ContractId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentEntry {
    pub contract_id: ContractId,
    pub constructor_arg: Address,
    pub deployed_at: DateTime<Utc>,
}

/// Contracts deployed on one network, keyed by contract name.
pub type NetworkDeployments = BTreeMap<String, DeploymentEntry>;

/// Keeps `<dir>/<network>.json` up to date with the latest deployment of
/// each contract.
#[derive(Debug, Clone)]
pub struct DeploymentLog {
    dir: PathBuf,
}

impl DeploymentLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DeploymentLog { dir: dir.into() }
    }

    pub fn path(&self, network: &str) -> PathBuf {
        self.dir.join(format!("{}.json", network))
    }

    pub fn load(&self, network: &str) -> Result<NetworkDeployments> {
        let path = self.path(network);
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| Error::Record { path, source }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(NetworkDeployments::new()),
            Err(e) => Err(Error::io(path)(e)),
        }
    }

    pub fn record(&self, deployment: &Deployment) -> Result<()> {
        let mut deployments = self.load(&deployment.network)?;
        deployments.insert(
            deployment.contract.clone(),
            DeploymentEntry {
                contract_id: deployment.contract_id,
                constructor_arg: deployment.constructor_arg,
                deployed_at: deployment.deployed_at,
            },
        );
        fs::create_dir_all(&self.dir).map_err(Error::io(&self.dir))?;
        let path = self.path(&deployment.network);
        write_json(&self.dir, &path, &deployments)?;
        info!(path = %path.display(), contract = %deployment.contract, "recorded deployment");
        Ok(())
    }
}

/// Writes to a sibling temp file first so a failed write never truncates the
/// existing record.
fn write_json(dir: &Path, path: &Path, deployments: &NetworkDeployments) -> Result<()> {
    let json = serde_json::to_string_pretty(deployments).map_err(|source| Error::Record {
        path: path.to_path_buf(),
        source,
    })?;
    let mut file = NamedTempFile::new_in(dir).map_err(Error::io(dir))?;
    file.write_all(json.as_bytes()).map_err(Error::io(file.path()))?;
    file.persist(path).map_err(|e| Error::io(path)(e.error))?;
    Ok(())
}
