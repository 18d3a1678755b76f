mod config;
mod delegation;
mod ethereum;
mod format;
mod report;

use anyhow::Result;
use clap::{Arg, Command};
use config::Config;
use delegation::{ContractSet, DelegationQuery};
use ethereum::{
    provider::{ChainReader, RpcClient},
    utils,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let matches = Command::new("delegation-inspector")
        .version("0.1.0")
        .about("Read-only report of a staker's delegation, strategies and shares")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file"),
        )
        .arg(
            Arg::new("network")
                .short('n')
                .long("network")
                .value_name("NETWORK")
                .help("Network to query (holesky, mainnet)"),
        )
        .arg(
            Arg::new("rpc-url")
                .short('r')
                .long("rpc-url")
                .value_name("URL")
                .help("RPC endpoint URL"),
        )
        .arg(
            Arg::new("staker")
                .short('s')
                .long("staker")
                .value_name("ADDRESS")
                .help("Staker address to inspect (repeatable, replaces the configured list)")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("abi-dir")
                .long("abi-dir")
                .value_name("DIR")
                .help("Directory holding the contract description files"),
        )
        .arg(
            Arg::new("no-storage-check")
                .long("no-storage-check")
                .help("Skip the raw storage slot cross-check")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-functions")
                .long("list-functions")
                .help("Print the functions of the delegation manager interface and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .help("Generate a sample configuration file and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config-path")
                .long("config-path")
                .help("Print the default configuration file path and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Handle special commands first
    if matches.get_flag("generate-config") {
        println!("{}", Config::generate_sample());
        return Ok(());
    }

    if matches.get_flag("config-path") {
        match Config::default_config_path() {
            Ok(path) => {
                println!("{}", path.display());
                return Ok(());
            }
            Err(e) => {
                error!("Could not determine default config path: {}", e);
                return Err(e);
            }
        }
    }

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let mut config = Config::load_or_default(config_path).await;

    // Override with command line arguments
    if let Some(network) = matches.get_one::<String>("network") {
        config.default_network = network.clone();
    }

    let network = config.network_mut(None)?;
    if let Some(rpc_url) = matches.get_one::<String>("rpc-url") {
        network.rpc_url = rpc_url.clone();
    }
    if let Some(abi_dir) = matches.get_one::<String>("abi-dir") {
        network.contracts.abi_dir = abi_dir.into();
    }

    if let Some(stakers) = matches.get_many::<String>("staker") {
        config.query.stakers = stakers.cloned().collect();
    }
    if matches.get_flag("no-storage-check") {
        config.query.storage_check = false;
    }

    let network = config.network(None)?.clone();
    info!("Network: {} ({})", config.default_network, network.rpc_url);

    // Missing interface definitions are fatal
    let contracts = match ContractSet::load(&network.contracts).await {
        Ok(contracts) => contracts,
        Err(e) => {
            error!("Error loading contract interface: {}", e);
            return Err(e.into());
        }
    };

    if matches.get_flag("list-functions") {
        let interface = &contracts.delegation_manager;
        println!("Functions in {}:", interface.name());
        for function in interface.functions() {
            println!("    {}", function);
        }
        return Ok(());
    }

    let delegation_manager = utils::validate_address(&network.contracts.delegation_manager)?;
    let strategy_manager = match (&network.contracts.strategy_manager, config.query.storage_check) {
        (Some(address), true) => Some(utils::validate_address(address)?),
        _ => None,
    };
    let stakers = config
        .query
        .stakers
        .iter()
        .map(|s| utils::validate_address(s))
        .collect::<Result<Vec<_>>>()?;

    let client = RpcClient::new(&network)?;
    if let Err(e) = client.check_chain_id(network.chain_id).await {
        warn!("{}", e);
    }
    info!("Connected to {}", client.endpoint());
    let reader: Arc<dyn ChainReader> = Arc::new(client);

    let query = DelegationQuery::new(reader, contracts, delegation_manager, strategy_manager);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for staker in stakers {
        match query.run_for_staker(staker, &mut out).await {
            Ok(outcome) => info!("Staker {}: {:?}", staker, outcome),
            Err(e) => error!("Error querying contracts for staker {}: {:#}", staker, e),
        }
    }

    Ok(())
}
