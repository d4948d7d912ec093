// Read-only access to the Stacks network through the Hiro API.

use crate::infra::config;
use crate::infra::config::StacksNetwork;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

/// Where the supply-chain contract lives.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub network: String,
    pub api_url: String,
    pub contract_address: String,
    pub contract_name: String,
}

impl ChainInfo {
    /// Reads the contract location from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            network: config::stacks_network()?.as_str().to_string(),
            api_url: config::stacks_api_url()?,
            contract_address: config::contract_address(),
            contract_name: config::contract_name(),
        })
    }

    pub fn testnet_default() -> Self {
        Self {
            network: StacksNetwork::Testnet.as_str().to_string(),
            api_url: "https://api.testnet.hiro.so".to_string(),
            contract_address: config::DEFAULT_CONTRACT_ADDRESS.to_string(),
            contract_name: config::DEFAULT_CONTRACT_NAME.to_string(),
        }
    }

    /// `address.name`, the form wallets expect.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }

    pub fn explorer_url(&self, txid: &str) -> String {
        format!("https://explorer.hiro.so/txid/{}?chain={}", txid, self.network)
    }
}

/// Subset of the `/extended/v1/tx/{txid}` response we care about.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TransactionStatus {
    pub tx_id: String,
    pub tx_status: String,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub fee_rate: Option<String>,
}

pub struct StacksClient {
    http: reqwest::Client,
    info: ChainInfo,
}

impl StacksClient {
    pub fn new(info: ChainInfo) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { http, info })
    }

    pub fn info(&self) -> &ChainInfo {
        &self.info
    }

    /// Whether the configured contract is deployed (its interface can be fetched).
    pub async fn contract_exists(&self) -> anyhow::Result<bool> {
        let url = format!(
            "{}/v2/contracts/interface/{}/{}",
            self.info.api_url, self.info.contract_address, self.info.contract_name
        );
        let resp = self.http.get(&url).send().await?;
        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(anyhow::anyhow!("contract interface lookup failed: HTTP {}", s)),
        }
    }

    /// Current status of a submitted transaction, or `None` if the API does not know it.
    pub async fn transaction_status(&self, txid: &str) -> anyhow::Result<Option<TransactionStatus>> {
        let url = format!("{}/extended/v1/tx/{}", self.info.api_url, txid);
        let resp = self.http.get(&url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp.error_for_status()?;
        Ok(Some(resp.json::<TransactionStatus>().await?))
    }
}
