//! Module parameter parsing.
//!
//! Parameters arrive as a JSON object, either flat or wrapped in
//! `ANSIBLE_MODULE_ARGS` the way a configuration-management controller
//! writes its argument files.

use serde_json::{Map, Value};

use crate::error::ModuleError;

pub(crate) const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";
const INTERNAL_PREFIX: &str = "_ansible_";
pub(crate) const CHECK_MODE_KEY: &str = "_ansible_check_mode";

const SUPPORTED: &[&str] = &["display_name", "name", "password", "url", "username"];

/// A validated request for the diagnostic call.
///
/// `password` and `display_name` are accepted and kept, but the diagnostic
/// method takes no arguments so neither is ever sent.
#[derive(Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub url: String,
    pub username: String,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

impl std::fmt::Debug for InvocationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationRequest")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Everything read from the module's argument object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArgs {
    pub request: InvocationRequest,
    pub check_mode: bool,
}

impl ModuleArgs {
    /// Parse and validate a JSON argument object.
    ///
    /// Fails on unknown keys, on missing or empty `url`/`username`, and on
    /// values that cannot be read as strings.
    pub fn from_json(args: Value) -> Result<Self, ModuleError> {
        let mut map = into_object(args)?;
        if let Some(inner) = map.remove(WRAPPER_KEY) {
            map = into_object(inner)?;
        }

        let mut unsupported: Vec<String> = map
            .keys()
            .filter(|k| !k.starts_with(INTERNAL_PREFIX) && !SUPPORTED.contains(&k.as_str()))
            .cloned()
            .collect();
        if !unsupported.is_empty() {
            unsupported.sort();
            return Err(ModuleError::UnsupportedParameters(unsupported));
        }

        let url = string_param(&map, "url")?.filter(|s| !s.is_empty());
        let username = match string_param(&map, "username")?.filter(|s| !s.is_empty()) {
            Some(username) => Some(username),
            None => string_param(&map, "name")?.filter(|s| !s.is_empty()),
        };
        let password = string_param(&map, "password")?;
        let display_name = string_param(&map, "display_name")?;
        let check_mode = map
            .get(CHECK_MODE_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut missing = Vec::new();
        if url.is_none() {
            missing.push("url");
        }
        if username.is_none() {
            missing.push("username");
        }
        let (Some(url), Some(username)) = (url, username) else {
            return Err(ModuleError::MissingArguments(missing));
        };

        Ok(Self {
            request: InvocationRequest {
                url,
                username,
                password,
                display_name,
            },
            check_mode,
        })
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>, ModuleError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ModuleError::InvalidArguments(format!(
            "module arguments must be a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

/// Read an optional string parameter. `null` counts as absent; any other
/// non-string value is rejected.
fn string_param(map: &Map<String, Value>, key: &str) -> Result<Option<String>, ModuleError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ModuleError::InvalidArguments(format!(
            "argument '{key}' is of type {} and we were unable to convert to str",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
