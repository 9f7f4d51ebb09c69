pub mod address;
pub mod block_targeting;
pub mod blockchain_service;
pub mod network_config;
