use std::{net::IpAddr, path::PathBuf, str::FromStr};

use actix_web::http::Uri;
use ethers::types::Address;
use thiserror::Error;

use crate::{
    models::network_config::NetworkConfig, services::network_config::get_network_config,
};

pub const MOXIE_CONTRACT_ADDRESS: &str = "0x01c6A9c7C64cC9DFf94b11e54Bd8E35C055f4563";
pub const DEFAULT_CHAIN_ID: u64 = 8453;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(u64),
}

/// How "one day ago" and "one week ago" are turned into block heights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryStrategy {
    /// Derive an average block time from a sample of recent blocks.
    Estimate { sample_span: u64 },
    /// Binary search block timestamps.
    Search,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub network: NetworkConfig,
    pub rpc_url: String,
    pub token_address: Address,
    pub token_name: String,
    pub token_decimals: u8,
    pub static_dir: PathBuf,
    pub history_strategy: HistoryStrategy,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&lookup, "PORT", 3000u16)?;
        let chain_id = parse_or(&lookup, "CHAIN_ID", DEFAULT_CHAIN_ID)?;
        let network = get_network_config(chain_id)?;
        let rpc_url = lookup("RPC_URL").unwrap_or_else(|| network.rpc_url.clone());
        let token_address = parse_or(
            &lookup,
            "TOKEN_ADDRESS",
            Address::from_str(MOXIE_CONTRACT_ADDRESS).map_err(|_| ConfigError::InvalidValue {
                name: "TOKEN_ADDRESS",
                value: MOXIE_CONTRACT_ADDRESS.to_string(),
            })?,
        )?;
        let token_decimals = parse_or(&lookup, "TOKEN_DECIMALS", 18u8)?;
        if token_decimals > 77 {
            // U256 cannot hold 10^78
            return Err(ConfigError::InvalidValue {
                name: "TOKEN_DECIMALS",
                value: token_decimals.to_string(),
            });
        }

        let history_strategy = match lookup("HISTORY_STRATEGY").as_deref() {
            None | Some("estimate") => HistoryStrategy::Estimate {
                sample_span: parse_or(&lookup, "BLOCK_TIME_SAMPLE_SPAN", 10_000u64)?,
            },
            Some("search") => HistoryStrategy::Search,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "HISTORY_STRATEGY",
                    value: other.to_string(),
                })
            }
        };
        if let HistoryStrategy::Estimate { sample_span: 0 } = history_strategy {
            return Err(ConfigError::InvalidValue {
                name: "BLOCK_TIME_SAMPLE_SPAN",
                value: "0".to_string(),
            });
        }

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(origins) => parse_origins(&origins)?,
            None => Vec::new(),
        };

        Ok(Self {
            host,
            port,
            network,
            rpc_url,
            token_address,
            token_name: lookup("TOKEN_NAME").unwrap_or_else(|| "Moxie".to_string()),
            token_decimals,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            history_strategy,
            cors_allowed_origins,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

/// Comma-separated `scheme://host[:port]` origins. `*` is rejected: an empty
/// list already means permissive CORS.
fn parse_origins(origins: &str) -> Result<Vec<String>, ConfigError> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            let valid = origin
                .parse::<Uri>()
                .map(|uri| {
                    uri.scheme().is_some()
                        && uri.host().is_some()
                        && uri.path_and_query().map_or(true, |p| p.as_str() == "/")
                })
                .unwrap_or(false);
            if valid {
                Ok(origin.to_string())
            } else {
                Err(ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGINS",
                    value: origin.to_string(),
                })
            }
        })
        .collect()
}
