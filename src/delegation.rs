//! The delegation query sequence for one staker.
//!
//! Stages run strictly in order: operator lookup, registration check, share
//! enumeration, per-strategy enrichment, withdrawal delay and operator
//! details. Each stage prints its block as soon as it completes, so a failure
//! leaves everything before it on screen.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::ContractsConfig;
use crate::ethereum::{
    abi::{AbiLoadError, ContractInterface},
    contract::{self, ContractProxy},
    provider::ChainReader,
    storage, OperatorDetails, ShareAmount, StrategyPosition, TokenMetadata, WithdrawalDelay,
};
use crate::report;

/// Share accessors in order of preference; newer delegation managers expose
/// `getDepositedShares`, older ones only `getDelegatableShares`.
const SHARE_ACCESSORS: [&str; 2] = ["getDepositedShares", "getDelegatableShares"];

/// Token accessors in order of preference.
const TOKEN_ACCESSORS: [&str; 2] = ["underlyingToken", "token"];

/// How a run for one staker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    NoOperator,
    NotRegistered,
}

/// Interfaces needed by the query sequence.
#[derive(Debug, Clone)]
pub struct ContractSet {
    pub delegation_manager: Arc<ContractInterface>,
    pub strategy: Arc<ContractInterface>,
    pub erc20: Arc<ContractInterface>,
}

impl ContractSet {
    pub async fn load(contracts: &ContractsConfig) -> Result<Self, AbiLoadError> {
        let delegation_manager = ContractInterface::load(contracts.delegation_manager_path()).await?;
        let strategy = ContractInterface::load(contracts.strategy_path()).await?;

        Ok(Self {
            delegation_manager: Arc::new(delegation_manager),
            strategy: Arc::new(strategy),
            erc20: Arc::new(ContractInterface::erc20()?),
        })
    }
}

pub struct DelegationQuery {
    reader: Arc<dyn ChainReader>,
    delegation_manager: ContractProxy,
    contracts: ContractSet,
    strategy_manager: Option<Address>,
}

impl DelegationQuery {
    /// `strategy_manager` enables the raw storage cross-check.
    pub fn new(
        reader: Arc<dyn ChainReader>,
        contracts: ContractSet,
        delegation_manager: Address,
        strategy_manager: Option<Address>,
    ) -> Self {
        let delegation_manager = contracts
            .delegation_manager
            .bind(delegation_manager, Arc::clone(&reader));
        Self {
            reader,
            delegation_manager,
            contracts,
            strategy_manager,
        }
    }

    pub async fn run_for_staker<W: Write>(&self, staker: Address, out: &mut W) -> Result<RunOutcome> {
        report::staker_header(out, staker)?;

        let Some(operator) = self.delegated_operator(staker).await? else {
            warn!("No operator found for staker {}", staker);
            report::no_operator(out, staker)?;
            return Ok(RunOutcome::NoOperator);
        };
        report::operator_address(out, operator)?;

        let registered = self.is_operator(operator).await?;
        if !registered {
            warn!("Operator {} is not registered", operator);
            report::not_registered(out, operator)?;
            return Ok(RunOutcome::NotRegistered);
        }
        report::is_operator(out, registered)?;

        let (accessor, positions) = self.delegated_shares(operator).await?;
        report::delegated_shares(out, accessor, &positions)?;

        for (strategy, operator_shares) in &positions {
            match self.enrich_strategy(staker, *strategy, *operator_shares).await {
                Ok(position) => report::strategy(out, &position)?,
                Err(e) => error!("Skipping strategy {}: {:#}", strategy, e),
            }
        }

        let strategies: Vec<Address> = positions.iter().map(|(strategy, _)| *strategy).collect();
        let delay = self.withdrawal_delay(&strategies).await?;
        report::withdrawal_delay(out, &delay)?;

        let details = self.operator_details(operator).await?;
        report::operator_details(out, operator, &details)?;

        info!("Finished staker {} (operator {})", staker, operator);
        Ok(RunOutcome::Completed)
    }

    /// `None` when the staker is not delegated (zero address).
    async fn delegated_operator(&self, staker: Address) -> Result<Option<Address>> {
        let value = self
            .delegation_manager
            .call_single("delegatedTo", &[DynSolValue::Address(staker)])
            .await?;
        let operator = contract::to_address(&value)?;
        Ok((!operator.is_zero()).then_some(operator))
    }

    async fn is_operator(&self, operator: Address) -> Result<bool> {
        let value = self
            .delegation_manager
            .call_single("isOperator", &[DynSolValue::Address(operator)])
            .await?;
        contract::to_bool(&value)
    }

    /// The share accessor declared by the loaded delegation-manager interface.
    pub fn share_accessor(&self) -> Result<&'static str> {
        let interface = self.delegation_manager.interface();
        SHARE_ACCESSORS
            .into_iter()
            .find(|name| interface.has_function(name))
            .ok_or_else(|| {
                anyhow!(
                    "{} declares none of {}",
                    interface.name(),
                    SHARE_ACCESSORS.join(", ")
                )
            })
    }

    async fn delegated_shares(&self, operator: Address) -> Result<(&'static str, Vec<(Address, U256)>)> {
        let accessor = self.share_accessor()?;
        debug!("Using {} for operator {}", accessor, operator);

        let values = self
            .delegation_manager
            .call(accessor, &[DynSolValue::Address(operator)])
            .await?;
        let [strategies, shares] = <[DynSolValue; 2]>::try_from(values)
            .map_err(|v| anyhow!("{} returned {} values, expected 2", accessor, v.len()))?;

        let strategies = contract::to_address_array(&strategies)?;
        let shares = contract::to_uint_array(&shares)?;
        if strategies.len() != shares.len() {
            bail!(
                "{} returned {} strategies but {} share amounts",
                accessor,
                strategies.len(),
                shares.len()
            );
        }

        Ok((accessor, strategies.into_iter().zip(shares).collect()))
    }

    async fn enrich_strategy(
        &self,
        staker: Address,
        strategy: Address,
        operator_shares: U256,
    ) -> Result<StrategyPosition> {
        let proxy = self
            .contracts
            .strategy
            .bind(strategy, Arc::clone(&self.reader));

        let token = self.token_metadata(&proxy).await?;
        let decimals = token.decimals;

        let total_shares = contract::to_uint(&proxy.call_single("totalShares", &[]).await?)?;
        let operator_underlying = shares_to_underlying(&proxy, operator_shares).await?;

        let staker_shares = contract::to_uint(
            &proxy
                .call_single("shares", &[DynSolValue::Address(staker)])
                .await?,
        )?;
        let staker_underlying = shares_to_underlying(&proxy, staker_shares).await?;

        let storage_check = match self.strategy_manager {
            Some(manager) => {
                match storage::cross_check(self.reader.as_ref(), manager, staker, strategy, staker_shares).await {
                    Ok(check) => {
                        if !check.matches() {
                            warn!(
                                "Raw slot {} holds {} but shares({}) returned {}",
                                check.slot, check.raw, staker, check.accessor
                            );
                        }
                        Some(check)
                    }
                    Err(e) => {
                        warn!("Storage cross-check for {} failed: {:#}", strategy, e);
                        None
                    }
                }
            }
            None => None,
        };

        Ok(StrategyPosition {
            strategy,
            token,
            total_shares: ShareAmount::new(total_shares, decimals),
            operator_shares: ShareAmount::new(operator_shares, decimals),
            operator_underlying: ShareAmount::new(operator_underlying, decimals),
            staker_shares: ShareAmount::new(staker_shares, decimals),
            staker_underlying: ShareAmount::new(staker_underlying, decimals),
            storage_check,
        })
    }

    async fn token_metadata(&self, strategy: &ContractProxy) -> Result<TokenMetadata> {
        let interface = strategy.interface();
        let accessor = TOKEN_ACCESSORS
            .into_iter()
            .find(|name| interface.has_function(name))
            .ok_or_else(|| anyhow!("{} declares no token accessor", interface.name()))?;

        let address = contract::to_address(&strategy.call_single(accessor, &[]).await?)?;
        let token = self.contracts.erc20.bind(address, Arc::clone(&self.reader));

        let name = contract::to_text(&token.call_single("name", &[]).await?)?;
        let symbol = contract::to_text(&token.call_single("symbol", &[]).await?)?;
        let decimals = contract::to_u8(&token.call_single("decimals", &[]).await?)?;

        Ok(TokenMetadata {
            address,
            name,
            symbol,
            decimals,
        })
    }

    async fn withdrawal_delay(&self, strategies: &[Address]) -> Result<WithdrawalDelay> {
        let strategies = DynSolValue::Array(strategies.iter().copied().map(DynSolValue::Address).collect());
        let value = self
            .delegation_manager
            .call_single("getWithdrawalDelay", &[strategies])
            .await?;
        Ok(WithdrawalDelay::from_blocks(contract::to_u64(&value)?))
    }

    async fn operator_details(&self, operator: Address) -> Result<OperatorDetails> {
        let values = self
            .delegation_manager
            .call("operatorDetails", &[DynSolValue::Address(operator)])
            .await?;
        let fields = contract::tuple_fields(values);
        let [receiver, approver, window] = <[DynSolValue; 3]>::try_from(fields)
            .map_err(|f| anyhow!("operatorDetails returned {} fields, expected 3", f.len()))?;

        Ok(OperatorDetails {
            earnings_receiver: contract::to_address(&receiver)?,
            delegation_approver: contract::to_address(&approver)?,
            staker_opt_out_window_blocks: contract::to_u64(&window)
                .context("stakerOptOutWindowBlocks")?,
        })
    }
}

/// Convert shares with the strategy's own exchange rate.
async fn shares_to_underlying(strategy: &ContractProxy, shares: U256) -> Result<U256> {
    let value = strategy
        .call_single("sharesToUnderlyingView", &[DynSolValue::Uint(shares, 256)])
        .await?;
    contract::to_uint(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethereum::mock::MockChain;
    use alloy::primitives::address;
    use std::path::{Path, PathBuf};

    const DELEGATION_MANAGER: Address = address!("A44151489861Fe9e3055d95adC98FbD462B948e7");
    const STRATEGY_MANAGER: Address = address!("dfB5f6CE42aAA7830E94ECFCcAd411beF4d4D5b6");
    const STAKER: Address = address!("6cdA20abb7A5361c7052C91b1ABa79AF1819A94A");
    const OPERATOR: Address = address!("3F1c547b21f65e10480dE3ad8E19fAAC46C95034");
    const STRATEGY_A: Address = address!("7D704507b76571a51d9caE8AdDAbBFd0ba0e63d3");
    const STRATEGY_B: Address = address!("1111111111111111111111111111111111111111");
    const TOKEN_A: Address = address!("2222222222222222222222222222222222222222");
    const TOKEN_B: Address = address!("3333333333333333333333333333333333333333");

    fn abi_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("abis")
    }

    async fn contracts() -> ContractSet {
        let contracts = ContractsConfig {
            delegation_manager: DELEGATION_MANAGER.to_string(),
            strategy_manager: None,
            abi_dir: abi_dir(),
            delegation_manager_abi: "DelegationManager.json".to_string(),
            strategy_abi: "StrategyBase.json".to_string(),
        };
        ContractSet::load(&contracts).await.unwrap()
    }

    fn uint(n: u64) -> DynSolValue {
        DynSolValue::Uint(U256::from(n), 256)
    }

    fn addresses(list: &[Address]) -> DynSolValue {
        DynSolValue::Array(list.iter().copied().map(DynSolValue::Address).collect())
    }

    fn uints(list: &[u64]) -> DynSolValue {
        DynSolValue::Array(list.iter().copied().map(uint).collect())
    }

    fn respond_token(chain: &mut MockChain, set: &ContractSet, strategy: Address, token: Address, symbol: &str) {
        chain
            .respond(strategy, &set.strategy, "underlyingToken", vec![DynSolValue::Address(token)])
            .respond(strategy, &set.strategy, "totalShares", vec![uint(5_000_000)])
            .respond(strategy, &set.strategy, "shares", vec![uint(1_000)])
            .respond(strategy, &set.strategy, "sharesToUnderlyingView", vec![uint(1_100)])
            .respond(token, &set.erc20, "name", vec![DynSolValue::String(format!("{} Token", symbol))])
            .respond(token, &set.erc20, "symbol", vec![DynSolValue::String(symbol.to_string())])
            .respond(token, &set.erc20, "decimals", vec![DynSolValue::Uint(U256::from(18u8), 8)]);
    }

    /// A chain on which every stage answers.
    fn full_chain(set: &ContractSet) -> MockChain {
        let dm = &set.delegation_manager;
        let mut chain = MockChain::default();
        chain
            .respond(DELEGATION_MANAGER, dm, "delegatedTo", vec![DynSolValue::Address(OPERATOR)])
            .respond(DELEGATION_MANAGER, dm, "isOperator", vec![DynSolValue::Bool(true)])
            .respond(
                DELEGATION_MANAGER,
                dm,
                "getDelegatableShares",
                vec![addresses(&[STRATEGY_A, STRATEGY_B]), uints(&[1_000, 2_000])],
            )
            .respond(DELEGATION_MANAGER, dm, "getWithdrawalDelay", vec![uint(50_400)])
            .respond(
                DELEGATION_MANAGER,
                dm,
                "operatorDetails",
                vec![DynSolValue::Tuple(vec![
                    DynSolValue::Address(OPERATOR),
                    DynSolValue::Address(Address::ZERO),
                    DynSolValue::Uint(U256::from(100u64), 32),
                ])],
            );
        respond_token(&mut chain, set, STRATEGY_A, TOKEN_A, "stETH");
        respond_token(&mut chain, set, STRATEGY_B, TOKEN_B, "rETH");
        chain
    }

    fn position_of(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?} in output:\n{}", needle, haystack))
    }

    #[tokio::test]
    async fn test_full_run_prints_all_blocks_in_order() {
        let set = contracts().await;
        let chain = Arc::new(full_chain(&set));
        let query = DelegationQuery::new(chain.clone(), set, DELEGATION_MANAGER, None);

        let mut out = Vec::new();
        let outcome = query.run_for_staker(STAKER, &mut out).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        let text = String::from_utf8(out).unwrap();
        let blocks = [
            "Operator Address:",
            "Is Operator: true",
            "Delegated Shares (getDelegatableShares):",
            "Withdrawal Delay:",
            "Operator Details:",
        ];
        let positions: Vec<usize> = blocks.iter().map(|b| position_of(&text, b)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);

        assert!(text.contains(&format!("Strategy {}:", STRATEGY_A)));
        assert!(text.contains(&format!("Strategy {}:", STRATEGY_B)));
        assert!(text.contains("Token: stETH Token (stETH)"));
        assert!(text.contains("- Blocks: 50400"));
        assert!(text.contains("680400.0 seconds (~11340.0 minutes"));
        assert!(text.contains("Staker Opt-Out Window: 100 blocks"));
        assert!(position_of(&text, "Strategy ") < position_of(&text, "Withdrawal Delay:"));

        // Eight calls per strategy, five on the delegation manager.
        assert_eq!(chain.calls_to(DELEGATION_MANAGER), 5);
        assert_eq!(chain.calls_to(STRATEGY_A), 5);
        assert_eq!(chain.calls_to(TOKEN_A), 3);
        assert_eq!(chain.calls().len(), 21);
        assert!(chain.storage_reads().is_empty());
    }

    #[tokio::test]
    async fn test_null_operator_stops_after_first_call() {
        let set = contracts().await;
        let mut chain = MockChain::default();
        chain.respond(
            DELEGATION_MANAGER,
            &set.delegation_manager,
            "delegatedTo",
            vec![DynSolValue::Address(Address::ZERO)],
        );
        let chain = Arc::new(chain);
        let query = DelegationQuery::new(chain.clone(), set, DELEGATION_MANAGER, Some(STRATEGY_MANAGER));

        let mut out = Vec::new();
        let outcome = query.run_for_staker(STAKER, &mut out).await.unwrap();
        assert_eq!(outcome, RunOutcome::NoOperator);
        assert!(String::from_utf8(out).unwrap().contains("No operator found"));

        let calls = chain.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function, "delegatedTo");
        assert!(chain.storage_reads().is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_operator_skips_enrichment() {
        let set = contracts().await;
        let mut chain = full_chain(&set);
        chain.respond(
            DELEGATION_MANAGER,
            &set.delegation_manager,
            "isOperator",
            vec![DynSolValue::Bool(false)],
        );
        let chain = Arc::new(chain);
        let query = DelegationQuery::new(chain.clone(), set, DELEGATION_MANAGER, Some(STRATEGY_MANAGER));

        let mut out = Vec::new();
        let outcome = query.run_for_staker(STAKER, &mut out).await.unwrap();
        assert_eq!(outcome, RunOutcome::NotRegistered);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("not registered"));
        assert!(!text.contains("Delegated Shares"));

        let functions: Vec<String> = chain.calls().into_iter().map(|c| c.function).collect();
        assert_eq!(functions, vec!["delegatedTo", "isOperator"]);
        assert_eq!(chain.calls_to(STRATEGY_A), 0);
        assert_eq!(chain.calls_to(TOKEN_A), 0);
        assert!(chain.storage_reads().is_empty());
    }

    #[tokio::test]
    async fn test_storage_cross_check_is_reported() {
        let set = contracts().await;
        let mut chain = full_chain(&set);
        let slot = storage::staker_strategy_shares_slot(STAKER, STRATEGY_A);
        chain.set_storage(STRATEGY_MANAGER, U256::from_be_bytes(slot.0), U256::from(1_000u64));
        let chain = Arc::new(chain);
        let query = DelegationQuery::new(chain.clone(), set, DELEGATION_MANAGER, Some(STRATEGY_MANAGER));

        let mut out = Vec::new();
        query.run_for_staker(STAKER, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&format!("Storage Slot {}: raw 1000 vs accessor 1000 (match)", slot)));
        // STRATEGY_B has nothing in its slot while shares() says 1000.
        assert!(text.contains("raw 0 vs accessor 1000 (MISMATCH)"));
        assert_eq!(chain.storage_reads().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_strategy_is_skipped() {
        let set = contracts().await;
        let dm = Arc::clone(&set.delegation_manager);
        let mut chain = MockChain::default();
        chain
            .respond(DELEGATION_MANAGER, &dm, "delegatedTo", vec![DynSolValue::Address(OPERATOR)])
            .respond(DELEGATION_MANAGER, &dm, "isOperator", vec![DynSolValue::Bool(true)])
            .respond(
                DELEGATION_MANAGER,
                &dm,
                "getDelegatableShares",
                vec![addresses(&[STRATEGY_B, STRATEGY_A]), uints(&[2_000, 1_000])],
            )
            .respond(DELEGATION_MANAGER, &dm, "getWithdrawalDelay", vec![uint(12)])
            .respond(
                DELEGATION_MANAGER,
                &dm,
                "operatorDetails",
                vec![DynSolValue::Tuple(vec![
                    DynSolValue::Address(OPERATOR),
                    DynSolValue::Address(OPERATOR),
                    DynSolValue::Uint(U256::ZERO, 32),
                ])],
            );
        // Only STRATEGY_A answers.
        respond_token(&mut chain, &set, STRATEGY_A, TOKEN_A, "stETH");
        let chain = Arc::new(chain);
        let query = DelegationQuery::new(chain.clone(), set, DELEGATION_MANAGER, None);

        let mut out = Vec::new();
        let outcome = query.run_for_staker(STAKER, &mut out).await.unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains(&format!("Strategy {}:", STRATEGY_B)));
        assert!(text.contains(&format!("Strategy {}:", STRATEGY_A)));
        assert!(text.contains("162.0 seconds (~2.7 minutes"));
        assert_eq!(chain.calls_to(STRATEGY_B), 1);
    }

    #[tokio::test]
    async fn test_query_error_abandons_run() {
        let set = contracts().await;
        let mut chain = MockChain::default();
        chain
            .respond(
                DELEGATION_MANAGER,
                &set.delegation_manager,
                "delegatedTo",
                vec![DynSolValue::Address(OPERATOR)],
            )
            .respond(
                DELEGATION_MANAGER,
                &set.delegation_manager,
                "isOperator",
                vec![DynSolValue::Bool(true)],
            );
        let chain = Arc::new(chain);
        let query = DelegationQuery::new(chain.clone(), set, DELEGATION_MANAGER, None);

        let mut out = Vec::new();
        let err = query.run_for_staker(STAKER, &mut out).await.unwrap_err();
        assert!(format!("{:#}", err).contains("getDelegatableShares"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Is Operator: true"));
        assert!(!text.contains("Withdrawal Delay"));
        assert_eq!(chain.calls().len(), 3);
    }

    const DEPOSITED_SHARES_ABI: &str = r#"[
      {"type":"function","name":"delegatedTo","inputs":[{"name":"staker","type":"address"}],"outputs":[{"name":"","type":"address"}],"stateMutability":"view"},
      {"type":"function","name":"isOperator","inputs":[{"name":"operator","type":"address"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"view"},
      {"type":"function","name":"getDepositedShares","inputs":[{"name":"staker","type":"address"}],"outputs":[{"name":"","type":"address[]"},{"name":"","type":"uint256[]"}],"stateMutability":"view"},
      {"type":"function","name":"getDelegatableShares","inputs":[{"name":"staker","type":"address"}],"outputs":[{"name":"","type":"address[]"},{"name":"","type":"uint256[]"}],"stateMutability":"view"}
    ]"#;

    #[tokio::test]
    async fn test_share_accessor_follows_declared_interface() {
        let mut set = contracts().await;
        let chain: Arc<dyn ChainReader> = Arc::new(MockChain::default());

        let legacy = DelegationQuery::new(Arc::clone(&chain), set.clone(), DELEGATION_MANAGER, None);
        assert_eq!(legacy.share_accessor().unwrap(), "getDelegatableShares");

        set.delegation_manager = Arc::new(
            ContractInterface::from_json_str("DelegationManager", DEPOSITED_SHARES_ABI, Path::new("inline")).unwrap(),
        );
        let current = DelegationQuery::new(Arc::clone(&chain), set.clone(), DELEGATION_MANAGER, None);
        assert_eq!(current.share_accessor().unwrap(), "getDepositedShares");

        set.delegation_manager = Arc::new(ContractInterface::erc20().unwrap());
        let neither = DelegationQuery::new(chain, set, DELEGATION_MANAGER, None);
        assert!(neither.share_accessor().is_err());
    }

    #[tokio::test]
    async fn test_deposited_shares_accessor_is_called() {
        let mut set = contracts().await;
        set.delegation_manager = Arc::new(
            ContractInterface::from_json_str("DelegationManager", DEPOSITED_SHARES_ABI, Path::new("inline")).unwrap(),
        );
        let dm = Arc::clone(&set.delegation_manager);
        let mut chain = MockChain::default();
        chain
            .respond(DELEGATION_MANAGER, &dm, "delegatedTo", vec![DynSolValue::Address(OPERATOR)])
            .respond(DELEGATION_MANAGER, &dm, "isOperator", vec![DynSolValue::Bool(true)])
            .respond(
                DELEGATION_MANAGER,
                &dm,
                "getDepositedShares",
                vec![addresses(&[STRATEGY_A]), uints(&[1, 2])],
            );
        let chain = Arc::new(chain);
        let query = DelegationQuery::new(chain.clone(), set, DELEGATION_MANAGER, None);

        let mut out = Vec::new();
        let err = query.run_for_staker(STAKER, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("1 strategies but 2 share amounts"));
        assert_eq!(chain.calls()[2].function, "getDepositedShares");
    }
}
