use crate::error::{Error, Result};
use fuels::core::Configurables;
use fuels::types::Address;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONSTRUCTOR_PARAM: &str = "OWNER";

const ADDRESS_LEN: u64 = 32;
const ADDRESS_TYPES: [&str; 2] = ["b256", "struct std::address::Address"];

/// Resolves contract names to Sway build outputs laid out as
/// `<root>/<name>/out/<profile>/<name>.bin`.
#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    root: PathBuf,
    profile: String,
    constructor_param: String,
}

/// The configurable that receives the constructor argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSlot {
    pub name: String,
    pub offset: u64,
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub binary: PathBuf,
    pub storage_slots: Option<PathBuf>,
    pub constructor: ConstructorSlot,
}

impl Artifact {
    /// b256 configurables are stored as their raw 32 bytes.
    pub fn configurables(&self, constructor_arg: Address) -> Configurables {
        Configurables::new(vec![(self.constructor.offset, constructor_arg.to_vec())])
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgramAbi {
    #[serde(default)]
    concrete_types: Vec<ConcreteType>,
    // pre spec-v1 ABIs
    #[serde(default)]
    types: Vec<LegacyType>,
    #[serde(default)]
    configurables: Vec<AbiConfigurable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConcreteType {
    #[serde(rename = "type")]
    type_name: String,
    concrete_type_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyType {
    type_id: u64,
    #[serde(rename = "type")]
    type_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbiConfigurable {
    name: String,
    offset: u64,
    concrete_type_id: Option<String>,
    configurable_type: Option<LegacyTypeRef>,
}

#[derive(Debug, Deserialize)]
struct LegacyTypeRef {
    #[serde(rename = "type")]
    type_id: u64,
}

impl ProgramAbi {
    /// `Ok(None)` when the ABI carries no type for the configurable, an error
    /// when it names a type id the ABI never declares.
    fn type_of(&self, configurable: &AbiConfigurable) -> Result<Option<&str>, String> {
        let dangling = |id: String| {
            format!("configurable {} refers to undeclared type {}", configurable.name, id)
        };
        if let Some(id) = &configurable.concrete_type_id {
            return self
                .concrete_types
                .iter()
                .find(|t| &t.concrete_type_id == id)
                .map(|t| Some(t.type_name.as_str()))
                .ok_or_else(|| dangling(id.clone()));
        }
        let Some(type_ref) = &configurable.configurable_type else {
            return Ok(None);
        };
        self.types
            .iter()
            .find(|t| t.type_id == type_ref.type_id)
            .map(|t| Some(t.type_name.as_str()))
            .ok_or_else(|| dangling(type_ref.type_id.to_string()))
    }
}

impl ArtifactRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactRegistry {
            root: root.into(),
            profile: "release".to_string(),
            constructor_param: DEFAULT_CONSTRUCTOR_PARAM.to_string(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_constructor_param(mut self, param: impl Into<String>) -> Self {
        self.constructor_param = param.into();
        self
    }

    pub fn out_dir(&self, name: &str) -> PathBuf {
        self.root.join(name).join("out").join(&self.profile)
    }

    pub fn require(&self, name: &str) -> Result<Artifact> {
        let out_dir = self.out_dir(name);
        let binary = out_dir.join(format!("{}.bin", name));
        let abi_path = out_dir.join(format!("{}-abi.json", name));
        let storage_slots = out_dir.join(format!("{}-storage_slots.json", name));

        let binary_len = match fs::metadata(&binary) {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => return Err(not_found(name, binary)),
        };
        let abi = read_abi(name, &abi_path)?;

        let configurable = abi
            .configurables
            .iter()
            .find(|c| c.name == self.constructor_param)
            .ok_or_else(|| Error::MissingConstructorParam {
                name: name.to_string(),
                param: self.constructor_param.clone(),
            })?;
        let type_name = abi.type_of(configurable).map_err(|reason| invalid(name, reason))?;
        if let Some(type_name) = type_name {
            if !ADDRESS_TYPES.contains(&type_name) {
                return Err(invalid(
                    name,
                    format!(
                        "configurable {} has type {}, expected an address",
                        configurable.name, type_name
                    ),
                ));
            }
        }
        let fits = configurable
            .offset
            .checked_add(ADDRESS_LEN)
            .is_some_and(|end| end <= binary_len);
        if !fits {
            return Err(invalid(
                name,
                format!(
                    "configurable {} at offset {} lies outside the {} byte binary",
                    configurable.name, configurable.offset, binary_len
                ),
            ));
        }

        debug!(
            artifact = name,
            binary = %binary.display(),
            offset = configurable.offset,
            "resolved artifact"
        );
        Ok(Artifact {
            name: name.to_string(),
            binary,
            storage_slots: storage_slots.is_file().then_some(storage_slots),
            constructor: ConstructorSlot {
                name: configurable.name.clone(),
                offset: configurable.offset,
            },
        })
    }
}

fn read_abi(name: &str, path: &Path) -> Result<ProgramAbi> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(not_found(name, path.to_path_buf()))
        }
        Err(e) => return Err(Error::io(path)(e)),
    };
    serde_json::from_str(&raw).map_err(|e| invalid(name, format!("unreadable abi: {}", e)))
}

fn not_found(name: &str, path: PathBuf) -> Error {
    Error::ArtifactNotFound {
        name: name.to_string(),
        path,
    }
}

fn invalid(name: &str, reason: String) -> Error {
    Error::InvalidArtifact {
        name: name.to_string(),
        reason,
    }
}
