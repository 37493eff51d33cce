use crate::client::{ApiError, XmlRpcClient};
use crate::health::HealthCheck;
use crate::value::Value;

const XMLRPC_PATH: &str = "xmlrpc.php";
const SAY_HELLO: &str = "demo.sayHello";

/// Client for the WordPress XML-RPC API.
///
/// WordPress serves XML-RPC from `/xmlrpc.php` under the site root. The
/// `demo.sayHello` method takes no arguments and needs no credentials, which
/// makes it a connectivity probe.
#[derive(Debug, Clone)]
pub struct WordPressClient {
    rpc: XmlRpcClient,
}

impl WordPressClient {
    /// Create a new WordPress client.
    ///
    /// `base_url` should be the site root (e.g. `http://blog.example.com` or
    /// `http://example.com/blog`). `/xmlrpc.php` is appended automatically.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let endpoint = format!("{}/{XMLRPC_PATH}", base_url.trim_end_matches('/'));
        Ok(Self {
            rpc: XmlRpcClient::new(&endpoint)?,
        })
    }

    /// Call `demo.sayHello` and return the greeting.
    pub async fn say_hello(&self) -> Result<String, ApiError> {
        match self.rpc.call(SAY_HELLO, &[]).await? {
            Value::String(greeting) => Ok(greeting),
            other => Err(ApiError::UnexpectedType {
                expected: "string",
                found: other.type_name(),
            }),
        }
    }

    /// Return the underlying [`XmlRpcClient`] for calls without a
    /// dedicated wrapper.
    pub fn rpc(&self) -> &XmlRpcClient {
        &self.rpc
    }
}

impl HealthCheck for WordPressClient {
    async fn is_healthy(&self) -> Result<bool, ApiError> {
        let greeting = self.say_hello().await?;
        Ok(!greeting.is_empty())
    }
}
