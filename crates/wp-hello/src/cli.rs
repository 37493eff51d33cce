use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::{Map, Value};

use crate::params::{CHECK_MODE_KEY, WRAPPER_KEY};

#[derive(Debug, Parser)]
#[command(
    name = "wp-hello",
    version,
    about = "Check a WordPress XML-RPC endpoint with demo.sayHello"
)]
pub struct Cli {
    /// JSON file holding the module arguments, flat or wrapped in ANSIBLE_MODULE_ARGS.
    pub args_file: Option<PathBuf>,

    /// Site root URL; `/xmlrpc.php` is appended.
    #[arg(long, env = "WP_HELLO_URL")]
    pub url: Option<String>,

    #[arg(long, visible_alias = "name", env = "WP_HELLO_USERNAME")]
    pub username: Option<String>,

    /// Accepted for compatibility; not sent to the endpoint.
    #[arg(long, env = "WP_HELLO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accepted for compatibility; not sent to the endpoint.
    #[arg(long, env = "WP_HELLO_DISPLAY_NAME")]
    pub display_name: Option<String>,

    /// Dry run. The module cannot predict its result, so it reports itself skipped.
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Build the module's JSON argument object.
    ///
    /// Values from the arguments file come first; flags (or their env vars)
    /// override them key by key.
    pub fn module_args(&self) -> Result<Value> {
        let mut args = match &self.args_file {
            Some(path) => read_args_file(path)?,
            None => Map::new(),
        };
        // A non-object wrapper is left in place for ModuleArgs to reject.
        if let Some(Value::Object(inner)) = args.get_mut(WRAPPER_KEY) {
            args = std::mem::take(inner);
        }

        let flags = [
            ("url", &self.url),
            ("username", &self.username),
            ("password", &self.password),
            ("display_name", &self.display_name),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                args.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if self.check {
            args.insert(CHECK_MODE_KEY.to_string(), Value::Bool(true));
        }

        Ok(Value::Object(args))
    }
}

fn read_args_file(path: &Path) -> Result<Map<String, Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read module arguments from {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("module arguments in {} are not valid JSON", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("module arguments in {} must be a JSON object", path.display()),
    }
}
