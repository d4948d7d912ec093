pub mod error;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod blockchain;
    pub mod common;
    pub mod health;
    pub mod products;
    pub mod search;
    pub mod stats;
    pub mod supply_chain;
    pub mod transactions;
    pub mod users;
    pub mod verifications;
}

pub use error::ApiError;
pub use router::{create_router, ApiDoc};
pub use types::AppState;
