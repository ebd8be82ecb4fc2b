use std::path::PathBuf;
use std::str::FromStr;
use dotenvy::dotenv;
use fuels::crypto::SecretKey;
use fuels::prelude::{Provider, WalletUnlocked};
use crate::artifacts::{ArtifactRegistry, DEFAULT_CONSTRUCTOR_PARAM};
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct Config {
    pub fuel_url: String,
    pub network: String,
    pub account_pks: Vec<String>,
    pub artifacts_dir: PathBuf,
    pub build_profile: String,
    pub constructor_param: String,
    pub deployments_dir: PathBuf,
}

impl Config {
    pub fn registry(&self) -> ArtifactRegistry {
        ArtifactRegistry::new(self.artifacts_dir.clone())
            .with_profile(self.build_profile.clone())
            .with_constructor_param(self.constructor_param.clone())
    }
}

// keys are never echoed back in errors
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("fuel_url", &self.fuel_url)
            .field("network", &self.network)
            .field("accounts", &self.account_pks.len())
            .field("artifacts_dir", &self.artifacts_dir)
            .field("build_profile", &self.build_profile)
            .field("constructor_param", &self.constructor_param)
            .field("deployments_dir", &self.deployments_dir)
            .finish()
    }
}

/// Reads the configuration from the environment, loading `.env` first when
/// one exists.
pub fn config() -> Result<Config> {
    check_dotenv(dotenv())?;
    from_lookup(|var| std::env::var(var).ok())
}

/// A missing `.env` is fine, everything can come from the real environment.
/// One that exists but does not parse is an error.
fn check_dotenv<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Config {
            var: ".env",
            reason: e.to_string(),
        }),
    }
}

pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let required = |var: &'static str| {
        lookup(var).ok_or(Error::Config {
            var,
            reason: "missing env var".to_string(),
        })
    };
    let or_default =
        |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

    let build_profile = or_default("BUILD_PROFILE", "release");
    if build_profile != "release" && build_profile != "debug" {
        return Err(Error::Config {
            var: "BUILD_PROFILE",
            reason: format!("{} is not one of release, debug", build_profile),
        });
    }
    Ok(Config {
        fuel_url: required("FUEL_URL")?,
        network: or_default("NETWORK", "testnet"),
        account_pks: parse_keys(&required("ACCOUNT_PKS")?),
        artifacts_dir: or_default("ARTIFACTS_DIR", "..").into(),
        build_profile,
        constructor_param: or_default("CONSTRUCTOR_PARAM", DEFAULT_CONSTRUCTOR_PARAM),
        deployments_dir: or_default("DEPLOYMENTS_DIR", "deployments").into(),
    })
}

fn parse_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn get_wallets(config: &Config) -> Result<Vec<WalletUnlocked>> {
    let provider = Provider::connect(&config.fuel_url).await?;
    config
        .account_pks
        .iter()
        .enumerate()
        .map(|(i, pk)| {
            let key = SecretKey::from_str(pk).map_err(|e| Error::Config {
                var: "ACCOUNT_PKS",
                reason: format!("key #{} is not a valid secret key: {}", i, e),
            })?;
            Ok(WalletUnlocked::new_from_private_key(key, Some(provider.clone())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use std::collections::HashMap;

    fn lookup(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |var| vars.get(var).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults() {
        let config = from_lookup(lookup(hashmap! {
            "FUEL_URL" => "https://testnet.fuel.network",
            "ACCOUNT_PKS" => "0x01",
        }))
        .unwrap();

        assert_eq!(config.network, "testnet");
        assert_eq!(config.account_pks, vec!["0x01".to_string()]);
        assert_eq!(config.artifacts_dir, PathBuf::from(".."));
        assert_eq!(config.build_profile, "release");
        assert_eq!(config.constructor_param, "OWNER");
        assert_eq!(config.deployments_dir, PathBuf::from("deployments"));
    }

    #[test]
    fn test_account_keys_keep_order() {
        let config = from_lookup(lookup(hashmap! {
            "FUEL_URL" => "http://127.0.0.1:4000",
            "ACCOUNT_PKS" => " 0x02, 0x01 ,,0x03",
            "NETWORK" => "local",
        }))
        .unwrap();

        assert_eq!(config.network, "local");
        assert_eq!(config.account_pks, vec!["0x02", "0x01", "0x03"]);
    }

    #[test]
    fn test_empty_account_list() {
        let config = from_lookup(lookup(hashmap! {
            "FUEL_URL" => "http://127.0.0.1:4000",
            "ACCOUNT_PKS" => "",
        }))
        .unwrap();
        assert!(config.account_pks.is_empty());
    }

    #[test]
    fn test_missing_url() {
        let err = from_lookup(lookup(hashmap! { "ACCOUNT_PKS" => "0x01" })).unwrap_err();
        assert!(matches!(err, Error::Config { var: "FUEL_URL", .. }));
    }

    #[test]
    fn test_invalid_profile() {
        let err = from_lookup(lookup(hashmap! {
            "FUEL_URL" => "http://127.0.0.1:4000",
            "ACCOUNT_PKS" => "0x01",
            "BUILD_PROFILE" => "fast",
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Config { var: "BUILD_PROFILE", .. }));
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(check_dotenv(dotenvy::from_path(dir.path().join(".env"))).is_ok());
    }

    #[test]
    fn test_malformed_dotenv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "FUEL URL http://127.0.0.1:4000\n").unwrap();

        let err = check_dotenv(dotenvy::from_path(&path)).unwrap_err();
        assert!(matches!(err, Error::Config { var: ".env", .. }));
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = from_lookup(lookup(hashmap! {
            "FUEL_URL" => "http://127.0.0.1:4000",
            "ACCOUNT_PKS" => "0xdeadbeef",
        }))
        .unwrap();
        assert!(!format!("{:?}", config).contains("deadbeef"));
    }
}
