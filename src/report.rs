//! Console rendering of the query results.

use alloy::primitives::{Address, U256};
use std::io::{self, Write};

use crate::ethereum::{
    OperatorDetails, StrategyPosition, WithdrawalDelay, AVERAGE_BLOCK_TIME_SECS,
};

pub fn staker_header<W: Write>(out: &mut W, staker: Address) -> io::Result<()> {
    writeln!(out, "=== Staker {} ===", staker)
}

pub fn no_operator<W: Write>(out: &mut W, staker: Address) -> io::Result<()> {
    writeln!(out, "No operator found for staker {}", staker)
}

pub fn not_registered<W: Write>(out: &mut W, operator: Address) -> io::Result<()> {
    writeln!(out, "Operator {} is not registered", operator)
}

pub fn operator_address<W: Write>(out: &mut W, operator: Address) -> io::Result<()> {
    writeln!(out, "Operator Address: {}", operator)
}

pub fn is_operator<W: Write>(out: &mut W, registered: bool) -> io::Result<()> {
    writeln!(out, "Is Operator: {}", registered)
}

pub fn delegated_shares<W: Write>(
    out: &mut W,
    accessor: &str,
    positions: &[(Address, U256)],
) -> io::Result<()> {
    writeln!(out, "Delegated Shares ({}):", accessor)?;
    if positions.is_empty() {
        writeln!(out, "    (none)")?;
    }
    for (strategy, shares) in positions {
        writeln!(out, "    {}: {}", strategy, shares)?;
    }
    Ok(())
}

pub fn strategy<W: Write>(out: &mut W, position: &StrategyPosition) -> io::Result<()> {
    let token = &position.token;
    writeln!(out, "Strategy {}:", position.strategy)?;
    writeln!(
        out,
        "    Token: {} ({}) at {}, Decimals: {}",
        token.name, token.symbol, token.address, token.decimals
    )?;
    writeln!(out, "    Total Shares: {}", position.total_shares)?;
    writeln!(
        out,
        "    Operator Shares: {} => {} {}",
        position.operator_shares,
        position.operator_underlying.scaled(),
        token.symbol
    )?;
    writeln!(
        out,
        "    Staker Shares: {} => {} {}",
        position.staker_shares,
        position.staker_underlying.scaled(),
        token.symbol
    )?;
    if let Some(check) = &position.storage_check {
        writeln!(
            out,
            "    Storage Slot {}: raw {} vs accessor {} ({})",
            check.slot,
            check.raw,
            check.accessor,
            if check.matches() { "match" } else { "MISMATCH" }
        )?;
    }
    Ok(())
}

pub fn withdrawal_delay<W: Write>(out: &mut W, delay: &WithdrawalDelay) -> io::Result<()> {
    writeln!(out, "Withdrawal Delay:")?;
    writeln!(out, "    - Blocks: {}", delay.blocks)?;
    writeln!(
        out,
        "    - Approximate Time: {:.1} seconds (~{:.1} minutes, assuming {}s blocks)",
        delay.seconds(),
        delay.minutes(),
        AVERAGE_BLOCK_TIME_SECS
    )
}

pub fn operator_details<W: Write>(
    out: &mut W,
    operator: Address,
    details: &OperatorDetails,
) -> io::Result<()> {
    writeln!(out, "Operator Details:")?;
    writeln!(out, "    Operator Address: {}", operator)?;
    writeln!(out, "    Earnings Receiver: {}", details.earnings_receiver)?;
    writeln!(out, "    Delegation Approver: {}", details.delegation_approver)?;
    writeln!(
        out,
        "    Staker Opt-Out Window: {} blocks",
        details.staker_opt_out_window_blocks
    )
}
