use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::Address;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::ethereum::{contract::ContractProxy, provider::ChainReader};

/// Minimal ERC-20 read surface used for token metadata.
const ERC20_METADATA_ABI: &str = r#"[
  {"type":"function","name":"name","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
  {"type":"function","name":"symbol","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
  {"type":"function","name":"decimals","inputs":[],"outputs":[{"name":"","type":"uint8"}],"stateMutability":"view"}
]"#;

/// Errors raised while loading a contract description file.
#[derive(Debug, Error)]
pub enum AbiLoadError {
    #[error("failed to read contract description {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("contract description {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("contract description {path:?} has no `abi` function list")]
    MissingFunctionList { path: PathBuf },
    #[error("contract description {path:?} contains an invalid ABI: {source}")]
    InvalidAbi {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(rename = "type")]
    ty: String,
}

/// One `function` entry of a description file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub state_mutability: String,
}

impl fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) -> ({}) [{}]",
            self.name,
            self.inputs.join(", "),
            self.outputs.join(", "),
            self.state_mutability
        )
    }
}

/// A contract interface loaded from a local JSON description.
///
/// Function descriptors keep the order of the file; the parsed [`JsonAbi`] is
/// what calls are encoded and decoded against.
#[derive(Debug, Clone)]
pub struct ContractInterface {
    name: String,
    functions: Vec<FunctionDescriptor>,
    abi: JsonAbi,
}

impl ContractInterface {
    /// Load an interface from a description file. The contract name is the
    /// file stem.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, AbiLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| AbiLoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let interface = Self::from_json_str(&name, &content, path)?;
        debug!(
            "Loaded {} with {} functions from {:?}",
            interface.name,
            interface.functions.len(),
            path
        );
        Ok(interface)
    }

    /// Parse either an artifact object carrying an `abi` array or a bare
    /// ABI array.
    pub fn from_json_str(name: &str, content: &str, origin: &Path) -> Result<Self, AbiLoadError> {
        let value: Value = serde_json::from_str(content).map_err(|source| AbiLoadError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let entries = match value {
            Value::Array(items) => Value::Array(items),
            Value::Object(mut artifact) => artifact
                .remove("abi")
                .filter(Value::is_array)
                .ok_or_else(|| AbiLoadError::MissingFunctionList {
                    path: origin.to_path_buf(),
                })?,
            _ => {
                return Err(AbiLoadError::MissingFunctionList {
                    path: origin.to_path_buf(),
                })
            }
        };

        let invalid = |source| AbiLoadError::InvalidAbi {
            path: origin.to_path_buf(),
            source,
        };
        let raw: Vec<RawEntry> = serde_json::from_value(entries.clone()).map_err(invalid)?;
        let abi: JsonAbi = serde_json::from_value(entries).map_err(invalid)?;

        let functions = raw
            .into_iter()
            .filter(|entry| entry.kind.as_deref() == Some("function"))
            .map(|entry| FunctionDescriptor {
                name: entry.name.unwrap_or_default(),
                inputs: entry.inputs.into_iter().map(|p| p.ty).collect(),
                outputs: entry.outputs.into_iter().map(|p| p.ty).collect(),
                state_mutability: entry
                    .state_mutability
                    .unwrap_or_else(|| "unknown".to_string()),
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            functions,
            abi,
        })
    }

    /// The built-in `name`/`symbol`/`decimals` interface.
    pub fn erc20() -> Result<Self, AbiLoadError> {
        Self::from_json_str("ERC20", ERC20_METADATA_ABI, Path::new("<builtin erc20>"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[FunctionDescriptor] {
        &self.functions
    }

    pub fn function_names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name == name)
    }

    /// Resolve the overload of `name` taking `arity` arguments.
    pub fn function(&self, name: &str, arity: usize) -> Option<&Function> {
        self.abi
            .function(name)?
            .iter()
            .find(|f| f.inputs.len() == arity)
    }

    /// Bind this interface to an on-chain address and a client.
    pub fn bind(self: &Arc<Self>, address: Address, reader: Arc<dyn ChainReader>) -> ContractProxy {
        ContractProxy::new(Arc::clone(self), address, reader)
    }
}
