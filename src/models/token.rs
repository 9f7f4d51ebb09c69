use ethers::types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    pub balance: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBalanceResponse {
    pub address: String,
    pub current_balance: String,
    pub one_day_ago_balance: String,
    pub one_week_ago_balance: String,
    pub blocks: HistoricalBlocks,
}

/// Block heights the historical balances were read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBlocks {
    pub current: u64,
    pub one_day_ago: u64,
    pub one_week_ago: u64,
}

/// Raw balances at the current head, about one day ago and about one week ago.
#[derive(Debug, Clone)]
pub struct HistoricalBalances {
    pub blocks: HistoricalBlocks,
    pub current: U256,
    pub one_day_ago: U256,
    pub one_week_ago: U256,
}
