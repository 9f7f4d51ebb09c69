use crate::{config::ConfigError, models::network_config::NetworkConfig};

/// Get network configuration based on chain ID
pub fn get_network_config(chain_id: u64) -> Result<NetworkConfig, ConfigError> {
    match chain_id {
        8453 => Ok(NetworkConfig {
            chain_id: 8453,
            name: "Base".to_string(),
            rpc_url: "https://mainnet.base.org".to_string(),
            block_time_secs: 2,
        }),
        84532 => Ok(NetworkConfig {
            chain_id: 84532,
            name: "Base Sepolia".to_string(),
            rpc_url: "https://sepolia.base.org".to_string(),
            block_time_secs: 2,
        }),
        1 => Ok(NetworkConfig {
            chain_id: 1,
            name: "Ethereum Mainnet".to_string(),
            rpc_url: "https://eth.llamarpc.com".to_string(),
            block_time_secs: 12,
        }),
        _ => Err(ConfigError::UnsupportedChain(chain_id)),
    }
}
