//! Shared helpers: a fake JSON-RPC node served by wiremock and an app builder.

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use ethers::types::U256;
use moxie_balance_checker::{config::Config, AppState};
use serde_json::{json, Value};
use wiremock::{matchers::method, Mock, MockServer, Request, Respond, ResponseTemplate};

pub const HEAD: u64 = 5_000_000;
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
pub const BLOCK_TIME_SECS: u64 = 2;
pub const BASE_CHAIN_ID: u64 = 8453;

pub const BALANCE_OF_SELECTOR: &str = "0x70a08231";

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const HOLDER_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

type BalanceAt = Arc<dyn Fn(u64) -> U256 + Send + Sync>;

/// Answers the handful of JSON-RPC methods the service uses, with a chain of
/// evenly spaced blocks and a balance that depends only on the block height.
pub struct FakeNode {
    balance_at: BalanceAt,
    fail_calls_below: Option<u64>,
    block_number_lead: u64,
}

impl FakeNode {
    pub fn with_balance<F>(balance_at: F) -> Self
    where
        F: Fn(u64) -> U256 + Send + Sync + 'static,
    {
        Self {
            balance_at: Arc::new(balance_at),
            fail_calls_below: None,
            block_number_lead: 0,
        }
    }

    pub fn constant(balance: U256) -> Self {
        Self::with_balance(move |_| balance)
    }

    /// `eth_call` at any block lower than `block` returns a JSON-RPC error.
    pub fn failing_calls_below(mut self, block: u64) -> Self {
        self.fail_calls_below = Some(block);
        self
    }

    /// `eth_blockNumber` reports a head `blocks` past the last block that can
    /// actually be fetched, like a load balancer fronting nodes that lag.
    pub fn reporting_block_number_ahead(mut self, blocks: u64) -> Self {
        self.block_number_lead = blocks;
        self
    }

    pub async fn start(self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(self).mount(&server).await;
        server
    }

    fn result(&self, rpc_method: &str, params: &Value) -> Result<Value, String> {
        match rpc_method {
            "eth_chainId" => Ok(json!(hex(BASE_CHAIN_ID))),
            "eth_blockNumber" => Ok(json!(hex(HEAD + self.block_number_lead))),
            "eth_getBlockByNumber" => {
                let number = block_param(&params[0]).ok_or("bad block parameter")?;
                if number > HEAD {
                    return Ok(Value::Null);
                }
                Ok(fake_block(number))
            }
            "eth_call" => {
                let call = &params[0];
                let data = call["data"]
                    .as_str()
                    .or_else(|| call["input"].as_str())
                    .ok_or("missing call data")?;
                if !data.starts_with(BALANCE_OF_SELECTOR) {
                    return Err("execution reverted".to_string());
                }
                let number = block_param(&params[1]).ok_or("bad block parameter")?;
                if self.fail_calls_below.is_some_and(|limit| number < limit) {
                    return Err(format!("missing trie node at block {number}"));
                }
                Ok(json!(word((self.balance_at)(number))))
            }
            other => Err(format!("the method {other} does not exist/is not available")),
        }
    }
}

impl Respond for FakeNode {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let id = body["id"].clone();
        let rpc_method = body["method"].as_str().unwrap_or_default();

        let response = match self.result(rpc_method, &body["params"]) {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(message) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32000, "message": message }
            }),
        };
        ResponseTemplate::new(200).set_body_json(response)
    }
}

fn hex(n: u64) -> String {
    format!("0x{n:x}")
}

/// ABI encoding of a single uint256 return value.
fn word(value: U256) -> String {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    let digits: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("0x{digits}")
}

fn block_param(param: &Value) -> Option<u64> {
    match param.as_str()? {
        "latest" => Some(HEAD),
        tag => u64::from_str_radix(tag.strip_prefix("0x")?, 16).ok(),
    }
}

fn fake_block(number: u64) -> Value {
    let zero_hash = format!("0x{}", "0".repeat(64));
    json!({
        "number": hex(number),
        "hash": format!("0x{number:064x}"),
        "parentHash": zero_hash,
        "sha3Uncles": zero_hash,
        "miner": ZERO_ADDRESS,
        "stateRoot": zero_hash,
        "transactionsRoot": zero_hash,
        "receiptsRoot": zero_hash,
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "difficulty": "0x0",
        "totalDifficulty": "0x0",
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x0",
        "timestamp": hex(GENESIS_TIMESTAMP + number * BLOCK_TIME_SECS),
        "extraData": "0x",
        "mixHash": zero_hash,
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x1",
        "size": "0x220",
        "uncles": [],
        "transactions": []
    })
}

/// Method names of every JSON-RPC request the fake node received.
pub async fn rpc_methods(server: &MockServer) -> Vec<String> {
    rpc_requests(server)
        .await
        .iter()
        .filter_map(|body| body["method"].as_str().map(String::from))
        .collect()
}

/// Block heights of every `eth_call` the fake node received.
pub async fn eth_call_blocks(server: &MockServer) -> Vec<u64> {
    let mut blocks: Vec<u64> = rpc_requests(server)
        .await
        .iter()
        .filter(|body| body["method"] == "eth_call")
        .filter_map(|body| block_param(&body["params"][1]))
        .collect();
    blocks.sort_unstable();
    blocks
}

async fn rpc_requests(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| serde_json::from_slice(&request.body).ok())
        .collect()
}

pub fn ether(whole: u64) -> U256 {
    U256::from(whole) * U256::exp10(18)
}

pub fn app_state(rpc_url: &str, overrides: &[(&str, &str)]) -> AppState {
    let mut vars: HashMap<String, String> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert("RPC_URL".to_string(), rpc_url.to_string());

    let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();
    AppState::from_config(&config).unwrap()
}
