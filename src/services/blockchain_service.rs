use actix_web::rt::{self, task::JoinHandle};
use async_trait::async_trait;
use ethers::{
    abi::parse_abi,
    contract::Contract,
    core::types::{Address, U256},
    providers::{Http, Middleware, Provider},
    types::{BlockId, BlockNumber, U64},
};
use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    errors::CustomError,
    models::{
        block::BlockPoint,
        network_config::NetworkConfig,
        token::{HistoricalBalances, HistoricalBlocks},
    },
};

use super::block_targeting::{BlockSource, BlockTargeter, ONE_DAY_SECS, ONE_WEEK_SECS};

// Minimal ABI: only the balance lookup is ever called
const BALANCE_OF_SIGNATURE: &str = "function balanceOf(address) view returns (uint256)";

#[derive(Clone, Debug)]
pub struct BlockchainClient {
    provider: Arc<Provider<Http>>,
    contract: Contract<Provider<Http>>,
    config: NetworkConfig,
    decimals: u8,
    targeter: BlockTargeter,
}

impl BlockchainClient {
    /// Build a client for the configured endpoint and token. Does not touch the network.
    pub fn new(config: &Config) -> Result<Self, CustomError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| CustomError::NetworkError(e.to_string()))?;
        let provider = Arc::new(provider);

        let abi = parse_abi(&[BALANCE_OF_SIGNATURE])
            .map_err(|e| CustomError::ContractError(e.to_string()))?;
        let contract = Contract::new(config.token_address, abi, provider.clone());

        Ok(Self {
            provider,
            contract,
            config: config.network.clone(),
            decimals: config.token_decimals,
            targeter: BlockTargeter::new(config.history_strategy, config.network.block_time_secs),
        })
    }

    /// Check that the node serves the configured chain.
    pub async fn verify_chain_id(&self) -> Result<(), CustomError> {
        let connected_chain_id = self.provider.get_chainid().await?;

        if connected_chain_id != U256::from(self.config.chain_id) {
            return Err(CustomError::NetworkError(format!(
                "Connected chain ID {} doesn't match configured chain ID {}",
                connected_chain_id, self.config.chain_id
            )));
        }

        Ok(())
    }

    /// Run [`Self::verify_chain_id`] on the current runtime without blocking the
    /// caller. The outcome is only logged; a node that never answers is given
    /// up on after `timeout`.
    pub fn spawn_chain_check(&self, timeout: Duration) -> JoinHandle<()> {
        let client = self.clone();
        rt::spawn(async move {
            match rt::time::timeout(timeout, client.verify_chain_id()).await {
                Ok(Ok(())) => log::info!(
                    "Node serves {} (chain {})",
                    client.config.name,
                    client.config.chain_id
                ),
                Ok(Err(e)) => log::warn!("Chain check failed: {}", e),
                Err(_) => log::warn!("Chain check gave up: node did not answer within {:?}", timeout),
            }
        })
    }

    /// Raw token balance of `owner`, at the latest block or at `block` when given.
    pub async fn get_token_balance(
        &self,
        owner: Address,
        block: Option<u64>,
    ) -> Result<U256, CustomError> {
        let block_id: BlockId = match block {
            Some(number) => BlockNumber::Number(U64::from(number)).into(),
            None => BlockNumber::Latest.into(),
        };

        self.contract
            .method::<_, U256>("balanceOf", owner)
            .map_err(|e| CustomError::ContractError(e.to_string()))?
            .block(block_id)
            .call()
            .await
            .map_err(|e| CustomError::ContractError(e.to_string()))
    }

    /// `amount` rendered with the token's decimals.
    pub fn format_balance(&self, amount: U256) -> String {
        format_units(amount, self.decimals)
    }

    /// Balances at the head block and at the blocks about one day and one week older.
    /// The three reads run concurrently; the first failure fails the whole lookup.
    pub async fn get_historical_balances(
        &self,
        owner: Address,
    ) -> Result<HistoricalBalances, CustomError> {
        let head = self.latest_block().await?;

        let targets = self
            .targeter
            .resolve(self, head, &[ONE_DAY_SECS, ONE_WEEK_SECS])
            .await?;
        let &[one_day_ago, one_week_ago] = targets.as_slice() else {
            return Err(CustomError::NetworkError(format!(
                "Expected two historical block targets, got {}",
                targets.len()
            )));
        };
        let blocks = HistoricalBlocks {
            current: head.number,
            one_day_ago,
            one_week_ago,
        };

        let (current, one_day_ago, one_week_ago) = futures::try_join!(
            self.get_token_balance(owner, Some(blocks.current)),
            self.get_token_balance(owner, Some(blocks.one_day_ago)),
            self.get_token_balance(owner, Some(blocks.one_week_ago)),
        )?;

        Ok(HistoricalBalances {
            blocks,
            current,
            one_day_ago,
            one_week_ago,
        })
    }
}

#[async_trait]
impl BlockSource for BlockchainClient {
    async fn latest_block(&self) -> Result<BlockPoint, CustomError> {
        let block = self
            .provider
            .get_block(BlockNumber::Latest)
            .await?
            .ok_or_else(|| CustomError::NetworkError("Node returned no latest block".to_string()))?;
        let number = block
            .number
            .ok_or_else(|| CustomError::NetworkError("Latest block has no number".to_string()))?;

        block_point(number.as_u64(), block.timestamp)
    }

    async fn block_at(&self, number: u64) -> Result<BlockPoint, CustomError> {
        let block = self
            .provider
            .get_block(BlockNumber::Number(U64::from(number)))
            .await?
            .ok_or(CustomError::BlockNotFoundError(number))?;

        block_point(number, block.timestamp)
    }
}

fn block_point(number: u64, timestamp: U256) -> Result<BlockPoint, CustomError> {
    if timestamp.bits() > 64 {
        return Err(CustomError::NetworkError(format!(
            "Block {} has an out of range timestamp {}",
            number, timestamp
        )));
    }

    Ok(BlockPoint {
        number,
        timestamp: timestamp.low_u64(),
    })
}

/// Render a fixed-point integer as a decimal string: trailing fractional zeros
/// are dropped but at least one fractional digit is kept ("0.0", "1.5").
pub fn format_units(amount: U256, decimals: u8) -> String {
    let mut amount_str = amount.to_string();
    if decimals == 0 {
        return amount_str;
    }

    let decimals = decimals as usize;
    if amount_str.len() <= decimals {
        amount_str.insert_str(0, &"0".repeat(decimals - amount_str.len() + 1));
    }

    let (whole, fraction) = amount_str.split_at(amount_str.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, fraction)
    }
}
