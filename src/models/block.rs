use serde::Serialize;

/// A block height together with its header timestamp (unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockPoint {
    pub number: u64,
    pub timestamp: u64,
}
