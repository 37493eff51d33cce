use serde::Serialize;
use tracing::{info, warn};
use wp_xmlrpc::WordPressClient;

use crate::error::ModuleError;
use crate::params::{InvocationRequest, ModuleArgs};

/// Result of a successful diagnostic call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    pub changed: bool,
    #[serde(rename = "name")]
    pub returned_name: String,
}

/// The record reported back to the controller, one JSON object per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModuleOutcome {
    Changed(InvocationResult),
    Skipped {
        skipped: bool,
        changed: bool,
        msg: String,
    },
    Failed {
        failed: bool,
        msg: String,
    },
}

impl ModuleOutcome {
    pub fn failed(msg: impl Into<String>) -> Self {
        ModuleOutcome::Failed {
            failed: true,
            msg: msg.into(),
        }
    }

    fn check_mode_unsupported() -> Self {
        ModuleOutcome::Skipped {
            skipped: true,
            changed: false,
            msg: "remote module (wp_hello) does not support check mode".into(),
        }
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            ModuleOutcome::Failed { .. } => 1,
            _ => 0,
        }
    }
}

/// Call the endpoint's diagnostic method once and report its reply.
///
/// Exactly one request goes out; a transport error or fault is returned
/// as [`ModuleError::RemoteInvocation`] without retrying.
pub async fn invoke(request: &InvocationRequest) -> Result<InvocationResult, ModuleError> {
    let client = WordPressClient::new(&request.url)?;
    info!(
        endpoint = %client.rpc().endpoint(),
        username = %request.username,
        "invoking diagnostic method"
    );

    let returned_name = client.say_hello().await?;
    info!(%returned_name, "diagnostic method succeeded");

    Ok(InvocationResult {
        changed: true,
        returned_name,
    })
}

/// Run the module against a raw JSON argument object.
pub async fn run(args: serde_json::Value) -> ModuleOutcome {
    let args = match ModuleArgs::from_json(args) {
        Ok(args) => args,
        Err(e) => {
            warn!(error = %e, "invalid module arguments");
            return ModuleOutcome::failed(e.to_string());
        }
    };

    if args.check_mode {
        info!("check mode requested, skipping");
        return ModuleOutcome::check_mode_unsupported();
    }

    match invoke(&args.request).await {
        Ok(result) => ModuleOutcome::Changed(result),
        Err(e) => {
            warn!(error = %e, url = %args.request.url, "diagnostic call failed");
            ModuleOutcome::failed(e.to_string())
        }
    }
}
