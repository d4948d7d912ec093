use agritrace::infra::config;
use agritrace::infra::stacks::{ChainInfo, StacksClient};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--tx <txid>]\n\
         \n\
         Reads env vars (all optional):\n\
           STACKS_NETWORK, STACKS_API_URL, CONTRACT_ADDRESS, CONTRACT_NAME,\n\
           SUBMISSION_TIMEOUT_SECS, AGRITRACE_BIND_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let txid = match args.iter().position(|a| a == "--tx") {
        Some(i) => match args.get(i + 1) {
            Some(t) => Some(t.clone()),
            None => usage_and_exit(),
        },
        None => None,
    };

    // Force-read config (nice error messages if malformed)
    let info = ChainInfo::from_env()?;
    let timeout = config::submission_timeout()?;
    let bind = config::bind_addr();

    println!("> Preflight:");
    println!("  STACKS_NETWORK={}", info.network);
    println!("  STACKS_API_URL={}", info.api_url);
    println!("  CONTRACT={}", info.contract_id());
    println!("  SUBMISSION_TIMEOUT_SECS={}", timeout.as_secs());
    println!("  AGRITRACE_BIND_ADDR={}", bind);

    let client = StacksClient::new(info)?;

    if client.contract_exists().await? {
        println!("  Contract is deployed.");
    } else {
        return Err(anyhow::anyhow!(
            "Contract {} not found on {}",
            client.info().contract_id(),
            client.info().network
        ));
    }

    if let Some(txid) = txid {
        match client.transaction_status(&txid).await? {
            Some(status) => {
                println!("  Transaction {}: {}", status.tx_id, status.tx_status);
                if let Some(height) = status.block_height {
                    println!("  Block height: {}", height);
                }
                println!("  Explorer: {}", client.info().explorer_url(&status.tx_id));
            }
            None => println!("  Transaction {} is unknown to the API.", txid),
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
