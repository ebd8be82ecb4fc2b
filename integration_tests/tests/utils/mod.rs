use std::fs;
use std::path::Path;

use fuels::prelude::*;
use serde_json::json;

const OWNER_OFFSET: u64 = 64;

pub async fn get_custom_wallets(count: u64) -> Vec<WalletUnlocked> {
    launch_custom_provider_and_get_wallets(
        WalletsConfig::new(Some(count), Some(2), Some(1_000_000_000)),
        None,
        None,
    )
        .await
        .unwrap()
}

/// Lays out a build output the way `forc build --release` does.
pub fn write_artifact(root: &Path, name: &str) {
    let out = root.join(name).join("out").join("release");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join(format!("{}.bin", name)), vec![0u8; 128]).unwrap();
    let abi = json!({
        "programType": "contract",
        "specVersion": "1",
        "encodingVersion": "1",
        "concreteTypes": [
            { "type": "b256", "concreteTypeId": "7c5ee1cecf5f8eacd1284feb5f0bf2bdea533a51e2f0c9aabe9236d335989f3b" }
        ],
        "functions": [],
        "configurables": [
            { "name": "OWNER", "concreteTypeId": "7c5ee1cecf5f8eacd1284feb5f0bf2bdea533a51e2f0c9aabe9236d335989f3b", "offset": OWNER_OFFSET }
        ]
    });
    fs::write(out.join(format!("{}-abi.json", name)), abi.to_string()).unwrap();
}
