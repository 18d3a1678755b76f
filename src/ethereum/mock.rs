//! In-memory [`ChainReader`] answering `eth_call` by (address, selector).

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, Selector, U256},
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::ethereum::{abi::ContractInterface, provider::ChainReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub to: Address,
    pub function: String,
}

#[derive(Debug, Default)]
pub struct MockChain {
    responses: HashMap<(Address, Selector), Bytes>,
    names: HashMap<Selector, String>,
    storage: HashMap<(Address, U256), U256>,
    calls: Mutex<Vec<RecordedCall>>,
    storage_reads: Mutex<Vec<(Address, U256)>>,
}

impl MockChain {
    /// Answer `function` on `to` with the ABI encoding of `values`.
    pub fn respond(
        &mut self,
        to: Address,
        interface: &ContractInterface,
        function: &str,
        values: Vec<DynSolValue>,
    ) -> &mut Self {
        let arity = interface
            .functions()
            .iter()
            .find(|f| f.name == function)
            .map(|f| f.inputs.len())
            .unwrap_or_else(|| panic!("{} has no function {}", interface.name(), function));
        let selector = interface
            .function(function, arity)
            .map(|f| f.selector())
            .unwrap_or_else(|| panic!("{} has no function {}", interface.name(), function));

        let encoded = DynSolValue::Tuple(values).abi_encode_params();
        self.responses.insert((to, selector), encoded.into());
        self.names.insert(selector, function.to_string());
        self
    }

    pub fn set_storage(&mut self, address: Address, slot: U256, value: U256) -> &mut Self {
        self.storage.insert((address, slot), value);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, address: Address) -> usize {
        self.calls().iter().filter(|c| c.to == address).count()
    }

    pub fn storage_reads(&self) -> Vec<(Address, U256)> {
        self.storage_reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        if input.len() < 4 {
            return Err(anyhow!("calldata shorter than a selector"));
        }
        let selector = Selector::from_slice(&input[..4]);
        let function = self
            .names
            .get(&selector)
            .cloned()
            .unwrap_or_else(|| format!("0x{}", hex::encode(selector)));
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { to, function });

        self.responses
            .get(&(to, selector))
            .cloned()
            .ok_or_else(|| anyhow!("execution reverted"))
    }

    async fn storage_at(&self, address: Address, slot: U256) -> Result<U256> {
        self.storage_reads.lock().unwrap().push((address, slot));
        Ok(self
            .storage
            .get(&(address, slot))
            .copied()
            .unwrap_or(U256::ZERO))
    }
}
