use crate::{config::Config, errors::CustomError, services::blockchain_service::BlockchainClient};

/// Read-only state shared by every worker.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: BlockchainClient,
    pub token_name: String,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, CustomError> {
        Ok(Self {
            client: BlockchainClient::new(config)?,
            token_name: config.token_name.clone(),
        })
    }
}
