pub mod abi;
pub mod contract;
#[cfg(test)]
pub mod mock;
pub mod provider;
pub mod storage;
pub mod utils;

use alloy::primitives::{utils::format_units, Address, U256};
use std::fmt;

use crate::format::format_number;

/// Average block interval used to turn block counts into wall-clock time.
/// Midpoint of the usual 12-15 s range; not read from the chain.
pub const AVERAGE_BLOCK_TIME_SECS: f64 = 13.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A raw share count together with the decimals it is scaled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareAmount {
    pub raw: U256,
    pub decimals: u8,
}

impl ShareAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Decimal string scaled by `decimals`, falling back to the raw integer.
    pub fn scaled(&self) -> String {
        format_units(self.raw, self.decimals).unwrap_or_else(|_| self.raw.to_string())
    }

    pub fn as_f64(&self) -> f64 {
        self.scaled().parse().unwrap_or(f64::NAN)
    }

    pub fn compact(&self) -> String {
        format_number(self.as_f64())
    }
}

impl fmt::Display for ShareAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, ~{})", self.raw, self.scaled(), self.compact())
    }
}

/// Withdrawal delay expressed in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalDelay {
    pub blocks: u64,
}

impl WithdrawalDelay {
    pub fn from_blocks(blocks: u64) -> Self {
        Self { blocks }
    }

    /// Estimated seconds at [`AVERAGE_BLOCK_TIME_SECS`].
    pub fn seconds(&self) -> f64 {
        self.blocks as f64 * AVERAGE_BLOCK_TIME_SECS
    }

    pub fn minutes(&self) -> f64 {
        self.seconds() / 60.0
    }
}

/// Registration record of an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDetails {
    /// First field of the record: the legacy earnings receiver.
    pub earnings_receiver: Address,
    pub delegation_approver: Address,
    pub staker_opt_out_window_blocks: u64,
}

/// Everything learned about one strategy the operator holds shares in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyPosition {
    pub strategy: Address,
    pub token: TokenMetadata,
    pub total_shares: ShareAmount,
    pub operator_shares: ShareAmount,
    pub operator_underlying: ShareAmount,
    pub staker_shares: ShareAmount,
    pub staker_underlying: ShareAmount,
    pub storage_check: Option<storage::StorageCheck>,
}
