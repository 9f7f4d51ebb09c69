#[derive(Clone, Debug)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    /// Nominal seconds between blocks, used when observed timing is unusable.
    pub block_time_secs: u64,
}
