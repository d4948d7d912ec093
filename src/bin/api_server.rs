// src/bin/api_server.rs

use agritrace::infra::config;
use agritrace::infra::stacks::{ChainInfo, OfflineSubmitter};
use agritrace::transport;
use agritrace::{MemStorage, RegistrationService, Storage};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agritrace=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    // --- Store ---
    let storage: Arc<dyn Storage> = if config::seed_sample_data()? {
        info!("seeding in-memory store with sample data");
        Arc::new(MemStorage::with_sample_data())
    } else {
        info!("starting with an empty in-memory store");
        Arc::new(MemStorage::new())
    };

    // --- Chain ---
    let chain_info = ChainInfo::from_env()?;
    let timeout = config::submission_timeout()?;
    info!(
        network = %chain_info.network,
        contract = %chain_info.contract_id(),
        timeout_secs = timeout.as_secs(),
        "chain configuration loaded"
    );
    let registration = RegistrationService::new(storage.clone(), Arc::new(OfflineSubmitter), timeout);

    let app_state = transport::http::AppState {
        storage,
        registration: Arc::new(registration),
        chain_info: Arc::new(chain_info),
    };

    // --- API Server ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
