pub mod client;
pub mod types;
pub mod webhooks;
