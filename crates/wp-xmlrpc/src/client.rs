use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;
use url::Url;

use crate::codec;
use crate::value::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Endpoint returned {status}: {body}")]
    ApiResponse { status: u16, body: String },
    #[error("XML-RPC fault {code}: {message}")]
    Fault { code: i64, message: String },
    #[error("Invalid XML in response: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed XML-RPC response: {0}")]
    Malformed(String),
    #[error("Expected {expected} result, got {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
}

/// HTTP client for a single XML-RPC endpoint.
///
/// Wraps [`reqwest::Client`] with the endpoint URL. Every call is one
/// `POST` of a `<methodCall>` document; nothing is retried.
#[derive(Clone)]
pub struct XmlRpcClient {
    inner: reqwest::Client,
    endpoint: Url,
}

impl XmlRpcClient {
    /// Create a client for the given endpoint URL (e.g.
    /// `http://blog.example.com/xmlrpc.php`).
    pub fn new(endpoint: &str) -> Result<Self, ApiError> {
        let endpoint = Url::parse(endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("wp-xmlrpc/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { inner, endpoint })
    }

    /// Invoke `method` with positional `params` and return the single
    /// value of the response.
    pub async fn call(&self, method: &str, params: &[Value]) -> Result<Value, ApiError> {
        let body = codec::encode_call(method, params);
        debug!(endpoint = %self.endpoint, %method, params = params.len(), "sending XML-RPC call");

        let resp = self
            .inner
            .post(self.endpoint.clone())
            .body(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::ApiResponse { status, body });
        }

        let text = resp.text().await?;
        let result = codec::decode_response(&text);
        if let Err(ApiError::Fault { code, message }) = &result {
            debug!(%method, code, %message, "XML-RPC call returned a fault");
        }
        result
    }

    /// Return the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl std::fmt::Debug for XmlRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlRpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}
