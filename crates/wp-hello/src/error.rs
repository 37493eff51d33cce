use wp_xmlrpc::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("missing required arguments: {}", .0.join(", "))]
    MissingArguments(Vec<&'static str>),
    #[error(
        "Unsupported parameters for (wp_hello) module: {}. Supported parameters include: display_name, password, url, username (name).",
        .0.join(", ")
    )]
    UnsupportedParameters(Vec<String>),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("remote invocation failed: {0}")]
    RemoteInvocation(#[from] ApiError),
}
