use crate::artifacts::{Artifact, ArtifactRegistry};
use crate::error::{Error, Result};
use crate::record::DeploymentLog;
use crate::shared::{config, get_wallets};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fuels::prelude::{
    Address,
    Contract,
    ContractId,
    LoadConfiguration,
    StorageConfiguration,
    TxPolicies,
    WalletUnlocked,
};
use rand::Rng;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

pub const EVENT_MANAGER: &str = "EventManager";

/// A network the migration can deploy to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Network: Send + Sync {
    fn id(&self) -> String;

    /// Signing accounts in the order the network provides them.
    fn accounts(&self) -> Vec<Address>;

    /// Deploys `artifact` with `constructor_arg` and returns once the create
    /// transaction is committed.
    async fn deploy(&self, artifact: &Artifact, constructor_arg: Address) -> Result<ContractId>;
}

/// Fuel network reached through a set of unlocked wallets. The first wallet
/// pays for and signs every deployment.
pub struct FuelNetwork {
    id: String,
    wallets: Vec<WalletUnlocked>,
}

impl FuelNetwork {
    pub fn new(id: impl Into<String>, wallets: Vec<WalletUnlocked>) -> Self {
        FuelNetwork {
            id: id.into(),
            wallets,
        }
    }
}

#[async_trait]
impl Network for FuelNetwork {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn accounts(&self) -> Vec<Address> {
        self.wallets.iter().map(|w| w.address().into()).collect()
    }

    async fn deploy(&self, artifact: &Artifact, constructor_arg: Address) -> Result<ContractId> {
        let signer = self.wallets.first().ok_or_else(|| Error::NoAccounts {
            network: self.id.clone(),
        })?;
        let salt = rand::thread_rng().gen::<[u8; 32]>();
        let config = LoadConfiguration::default()
            .with_configurables(artifact.configurables(constructor_arg))
            .with_storage_configuration(
                StorageConfiguration::default().with_autoload(artifact.storage_slots.is_some()),
            );
        let id = Contract::load_from(&artifact.binary, config)?
            .with_salt(salt)
            .deploy(signer, TxPolicies::default())
            .await?;
        Ok(id.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    pub contract: String,
    pub contract_id: ContractId,
    pub constructor_arg: Address,
    pub network: String,
    pub deployed_at: DateTime<Utc>,
}

/// Deploys the EventManager contract with the network's first account as
/// its owner.
#[instrument(skip_all, fields(network = %network.id()))]
pub async fn migrate<N: Network + ?Sized>(
    network: &N,
    registry: &ArtifactRegistry,
) -> Result<Deployment> {
    let artifact = registry.require(EVENT_MANAGER)?;
    let owner = network
        .accounts()
        .first()
        .copied()
        .ok_or_else(|| Error::NoAccounts {
            network: network.id(),
        })?;
    info!(contract = %artifact.name, owner = %owner, "deploying");
    let contract_id = network.deploy(&artifact, owner).await?;
    info!(contract = %artifact.name, contract_id = %contract_id, "deployed");
    Ok(Deployment {
        contract: artifact.name,
        contract_id,
        constructor_arg: owner,
        network: network.id(),
        deployed_at: Utc::now(),
    })
}

pub struct LocalDeployParams {
    pub network: String,
    pub wallets: Vec<WalletUnlocked>,
    pub registry: ArtifactRegistry,
    pub deployments_dir: PathBuf,
}

pub enum DeployTarget {
    Local(LocalDeployParams),
    OnChain,
}

pub async fn deploy(target: DeployTarget) -> Result<Deployment> {
    let (network, registry, log) = match target {
        DeployTarget::Local(p) => (
            FuelNetwork::new(p.network, p.wallets),
            p.registry,
            DeploymentLog::new(p.deployments_dir),
        ),
        DeployTarget::OnChain => {
            let config = config()?;
            let wallets = get_wallets(&config).await?;
            info!(url = %config.fuel_url, accounts = wallets.len(), "connected");
            (
                FuelNetwork::new(config.network.clone(), wallets),
                config.registry(),
                DeploymentLog::new(config.deployments_dir.clone()),
            )
        }
    };
    migrate_and_record(&network, &registry, &log).await
}

/// Runs [`migrate`] and records the result. A record failure still carries
/// the live deployment in [`Error::Unrecorded`].
pub async fn migrate_and_record<N: Network + ?Sized>(
    network: &N,
    registry: &ArtifactRegistry,
    log: &DeploymentLog,
) -> Result<Deployment> {
    let deployment = migrate(network, registry).await?;
    if let Err(source) = log.record(&deployment) {
        warn!(
            contract_id = %deployment.contract_id,
            error = %source,
            "failed to record deployment"
        );
        return Err(Error::Unrecorded {
            deployment: Box::new(deployment),
            source: Box::new(source),
        });
    }
    Ok(deployment)
}
