use anyhow::Context;
use deploy::deployer::{self, DeployTarget};
use deploy::logging::{init_logging, DEFAULT_FILTER};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(DEFAULT_FILTER);
    let deployment = deployer::deploy(DeployTarget::OnChain)
        .await
        .context("EventManager migration failed")?;
    info!(
        contract = %deployment.contract,
        contract_id = %deployment.contract_id,
        owner = %deployment.constructor_arg,
        network = %deployment.network,
        "migration complete"
    );
    Ok(())
}
