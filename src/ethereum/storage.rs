//! Raw storage read of `StrategyManager.stakerStrategyShares[staker][strategy]`.
//!
//! The base slot was reverse-engineered against one StrategyManager
//! deployment. Any upgrade that changes the contract's storage layout breaks
//! this check; it verifies the high-level accessor and is not a general way to
//! read mappings.

use alloy::primitives::{keccak256, Address, B256, U256};
use anyhow::{Context, Result};

use crate::ethereum::provider::ChainReader;

/// Storage slot of the `stakerStrategyShares` mapping.
pub const STAKER_STRATEGY_SHARES_SLOT: u64 = 205;

/// Slot of `mapping[key]` for a mapping rooted at `base`:
/// `keccak256(pad32(key) ++ base)`.
pub fn mapping_slot(key: Address, base: B256) -> B256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(key.into_word().as_slice());
    preimage[32..].copy_from_slice(base.as_slice());
    keccak256(preimage)
}

/// Slot holding `stakerStrategyShares[staker][strategy]`.
pub fn staker_strategy_shares_slot(staker: Address, strategy: Address) -> B256 {
    let base = B256::from(U256::from(STAKER_STRATEGY_SHARES_SLOT).to_be_bytes::<32>());
    let outer = mapping_slot(staker, base);
    mapping_slot(strategy, outer)
}

/// Result of comparing the raw slot with the accessor value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCheck {
    pub slot: B256,
    pub raw: U256,
    pub accessor: U256,
}

impl StorageCheck {
    pub fn matches(&self) -> bool {
        self.raw == self.accessor
    }
}

/// Read the raw share balance and pair it with the accessor's answer.
pub async fn cross_check(
    reader: &dyn ChainReader,
    strategy_manager: Address,
    staker: Address,
    strategy: Address,
    accessor: U256,
) -> Result<StorageCheck> {
    let slot = staker_strategy_shares_slot(staker, strategy);
    let raw = reader
        .storage_at(strategy_manager, U256::from_be_bytes(slot.0))
        .await
        .with_context(|| format!("eth_getStorageAt {} slot {} failed", strategy_manager, slot))?;

    Ok(StorageCheck {
        slot,
        raw,
        accessor,
    })
}
