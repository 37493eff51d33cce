//! Minimal XML-RPC client with a WordPress endpoint wrapper.

pub mod client;
pub mod codec;
pub mod health;
pub mod value;
pub mod wordpress;

pub use client::{ApiError, XmlRpcClient};
pub use health::HealthCheck;
pub use value::Value;
pub use wordpress::WordPressClient;
