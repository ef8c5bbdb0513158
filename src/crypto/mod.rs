pub mod webhook_signature;

pub use webhook_signature::WebhookSignatureVerifier;
