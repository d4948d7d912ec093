//! Centralized configuration (environment variables + defaults).
//!
//! Call `dotenv::dotenv().ok()` before reading anything so a local `.env` is honored.

use anyhow::Context;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "ST3R2YBNK8EVESRVQN7KXQ8CBSBTGY3FSXAJZQAK";
pub const DEFAULT_CONTRACT_NAME: &str = "agri-supply-chain";
pub const DEFAULT_SUBMISSION_TIMEOUT_SECS: u64 = 30;

const TESTNET_API_URL: &str = "https://api.testnet.hiro.so";
const MAINNET_API_URL: &str = "https://api.hiro.so";

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StacksNetwork {
    Mainnet,
    Testnet,
}

impl StacksNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            StacksNetwork::Mainnet => "mainnet",
            StacksNetwork::Testnet => "testnet",
        }
    }
}

/// HTTP listen address.
pub fn bind_addr() -> String {
    var("AGRITRACE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

/// `mainnet` or `testnet` (default).
pub fn stacks_network() -> anyhow::Result<StacksNetwork> {
    match var("STACKS_NETWORK").as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("testnet") => Ok(StacksNetwork::Testnet),
        Some("mainnet") => Ok(StacksNetwork::Mainnet),
        Some(other) => anyhow::bail!("STACKS_NETWORK must be 'mainnet' or 'testnet', got '{}'", other),
    }
}

/// Hiro API base URL; defaults to the public endpoint for the configured network.
pub fn stacks_api_url() -> anyhow::Result<String> {
    if let Some(url) = var("STACKS_API_URL") {
        return Ok(url.trim_end_matches('/').to_string());
    }
    Ok(match stacks_network()? {
        StacksNetwork::Mainnet => MAINNET_API_URL.to_string(),
        StacksNetwork::Testnet => TESTNET_API_URL.to_string(),
    })
}

/// Principal of the deployed supply-chain contract.
pub fn contract_address() -> String {
    var("CONTRACT_ADDRESS").unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_string())
}

pub fn contract_name() -> String {
    var("CONTRACT_NAME").unwrap_or_else(|| DEFAULT_CONTRACT_NAME.to_string())
}

/// Hard limit on a single chain submission.
pub fn submission_timeout() -> anyhow::Result<Duration> {
    let secs = match var("SUBMISSION_TIMEOUT_SECS") {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("SUBMISSION_TIMEOUT_SECS must be a valid u64, got '{}'", v))?,
        None => DEFAULT_SUBMISSION_TIMEOUT_SECS,
    };
    Ok(Duration::from_secs(secs.max(1)))
}

/// Whether to insert the demo records at startup (default: true).
pub fn seed_sample_data() -> anyhow::Result<bool> {
    match var("SEED_SAMPLE_DATA").as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => anyhow::bail!("SEED_SAMPLE_DATA must be true or false, got '{}'", other),
    }
}
