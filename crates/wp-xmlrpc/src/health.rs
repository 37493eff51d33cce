use crate::client::ApiError;

/// Uniform health-check interface for remote endpoints.
///
/// Each client implements this by calling whatever cheap diagnostic its
/// service offers.
pub trait HealthCheck: Send + Sync {
    /// Returns `Ok(true)` if the endpoint is healthy, `Ok(false)` if it
    /// responded but reported an unhealthy state, or `Err` on connection
    /// failure or a remote fault.
    fn is_healthy(&self) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;
}
