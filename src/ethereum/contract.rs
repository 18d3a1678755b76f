use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    primitives::{Address, U256},
};
use anyhow::{anyhow, bail, Context, Result};
use std::sync::Arc;

use crate::ethereum::{abi::ContractInterface, provider::ChainReader, utils};

/// A contract interface bound to an address and the shared client.
#[derive(Clone)]
pub struct ContractProxy {
    interface: Arc<ContractInterface>,
    address: Address,
    reader: Arc<dyn ChainReader>,
}

impl ContractProxy {
    pub fn new(
        interface: Arc<ContractInterface>,
        address: Address,
        reader: Arc<dyn ChainReader>,
    ) -> Self {
        Self {
            interface,
            address,
            reader,
        }
    }

    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    /// Encode, `eth_call` and decode one read-only function.
    pub async fn call(&self, function_name: &str, args: &[DynSolValue]) -> Result<Vec<DynSolValue>> {
        utils::validate_function_name(function_name)?;

        let function = self
            .interface
            .function(function_name, args.len())
            .ok_or_else(|| {
                anyhow!(
                    "Function '{}' taking {} argument(s) not found in {}. Available functions: {}",
                    function_name,
                    args.len(),
                    self.interface.name(),
                    self.interface.function_names().join(", ")
                )
            })?;

        let calldata = function
            .abi_encode_input(args)
            .map_err(|e| anyhow!("Failed to encode inputs for {}: {}", function_name, e))?;

        tracing::debug!(
            "eth_call {}.{} at {}",
            self.interface.name(),
            function_name,
            self.address
        );
        let output = self
            .reader
            .call(self.address, calldata.into())
            .await
            .with_context(|| {
                format!(
                    "{}.{} at {} failed",
                    self.interface.name(),
                    function_name,
                    self.address
                )
            })?;

        if output.is_empty() {
            bail!(
                "{}.{} at {} returned no data; is there a contract at this address?",
                self.interface.name(),
                function_name,
                self.address
            );
        }

        function
            .abi_decode_output(&output, false)
            .map_err(|e| anyhow!("Failed to decode output of {}: {}", function_name, e))
    }

    /// Call a function that returns exactly one value.
    pub async fn call_single(&self, function_name: &str, args: &[DynSolValue]) -> Result<DynSolValue> {
        let mut values = self.call(function_name, args).await?;
        if values.len() != 1 {
            bail!(
                "{} returned {} values, expected 1",
                function_name,
                values.len()
            );
        }
        Ok(values.remove(0))
    }
}

pub fn to_address(value: &DynSolValue) -> Result<Address> {
    value
        .as_address()
        .ok_or_else(|| anyhow!("Expected an address, got {:?}", value))
}

pub fn to_bool(value: &DynSolValue) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| anyhow!("Expected a bool, got {:?}", value))
}

pub fn to_uint(value: &DynSolValue) -> Result<U256> {
    value
        .as_uint()
        .map(|(n, _)| n)
        .ok_or_else(|| anyhow!("Expected an unsigned integer, got {:?}", value))
}

pub fn to_u8(value: &DynSolValue) -> Result<u8> {
    let n = to_uint(value)?;
    u8::try_from(n).map_err(|_| anyhow!("Value {} does not fit in a uint8", n))
}

pub fn to_u64(value: &DynSolValue) -> Result<u64> {
    let n = to_uint(value)?;
    u64::try_from(n).map_err(|_| anyhow!("Value {} does not fit in 64 bits", n))
}

pub fn to_text(value: &DynSolValue) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Expected a string, got {:?}", value))
}

pub fn to_address_array(value: &DynSolValue) -> Result<Vec<Address>> {
    value
        .as_array()
        .ok_or_else(|| anyhow!("Expected an address array, got {:?}", value))?
        .iter()
        .map(to_address)
        .collect()
}

pub fn to_uint_array(value: &DynSolValue) -> Result<Vec<U256>> {
    value
        .as_array()
        .ok_or_else(|| anyhow!("Expected a uint array, got {:?}", value))?
        .iter()
        .map(to_uint)
        .collect()
}

/// Flatten a single returned struct into its fields; multiple return values
/// are passed through as they are.
pub fn tuple_fields(values: Vec<DynSolValue>) -> Vec<DynSolValue> {
    match <[DynSolValue; 1]>::try_from(values) {
        Ok([DynSolValue::Tuple(fields)]) => fields,
        Ok([single]) => vec![single],
        Err(values) => values,
    }
}
