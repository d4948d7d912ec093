#![allow(dead_code)]

use agritrace::infra::stacks::{ChainInfo, ChainSubmitter, OfflineSubmitter};
use agritrace::{transport, MemStorage, RegistrationService, Storage};
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub registration: Arc<RegistrationService>,
    server: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Seeded store, offline submitter, 30s timeout.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(OfflineSubmitter), Duration::from_secs(30)).await
}

pub async fn spawn_app_with(submitter: Arc<dyn ChainSubmitter>, timeout: Duration) -> TestApp {
    let storage: Arc<dyn Storage> = Arc::new(MemStorage::with_sample_data());
    let registration = Arc::new(RegistrationService::new(storage.clone(), submitter, timeout));
    let app_state = transport::http::AppState {
        storage,
        registration: registration.clone(),
        chain_info: Arc::new(ChainInfo::testnet_default()),
    };
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        registration,
        server,
    }
}
