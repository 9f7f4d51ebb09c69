pub mod api_response;
pub mod block;
pub mod network_config;
pub mod token;
