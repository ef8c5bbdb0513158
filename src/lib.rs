pub mod config;
pub mod crypto;
pub mod error;
pub mod github;
pub mod review;
pub mod server;
pub mod webhooks;

pub use error::ReviewError;
