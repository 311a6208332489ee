//! Middleware options and the key/value source the revision is read from.

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde::Deserialize;

use crate::error::Error;

/// Path answered by [`RevisionMiddleware`](crate::middleware::RevisionMiddleware) unless configured otherwise.
pub const DEFAULT_PATH: &str = "/__revision__";

/// Variable holding the revision unless configured otherwise.
pub const DEFAULT_ENV_VAR: &str = "COMMIT_HASH";

/// Options for [`RevisionMiddleware`](crate::middleware::RevisionMiddleware).
///
/// Every field is optional when deserialising; omitted fields take their
/// defaults, so the struct can sit inside an application's own config file:
///
/// ```toml
/// [revision]
/// path = "/version"
/// json_format = false
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RevisionConfig {
    /// Exact request path to intercept.
    pub path: String,
    /// Name of the variable the revision is read from.
    pub env_var: String,
    /// `{"revision":"…"}` as `application/json` when true, the bare value as
    /// `text/plain` otherwise.
    pub json_format: bool,
}

impl RevisionConfig {
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    pub fn json_format(mut self, json: bool) -> Self {
        self.json_format = json;
        self
    }

    /// Rejects options that could never work: a path no request can carry,
    /// or a variable name the environment cannot hold.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !self.path.starts_with('/') {
            return Err(Error::config(format!("path `{}` must start with `/`", self.path)));
        }
        if self.env_var.is_empty() {
            return Err(Error::config("variable name must not be empty"));
        }
        if self.env_var.contains(['=', '\0']) {
            return Err(Error::config(format!(
                "variable name `{}` must not contain `=` or NUL",
                self.env_var.escape_debug()
            )));
        }
        Ok(())
    }
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_owned(),
            env_var: DEFAULT_ENV_VAR.to_owned(),
            json_format: true,
        }
    }
}

/// Read-only key/value lookup the revision is resolved from.
///
/// [`Env`] reads the process environment. A `HashMap<String, String>` serves
/// fixed values, which keeps tests away from process-global state.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct Env;

impl ConfigSource for Env {
    fn get(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(v) => Some(v),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!(var = key, "environment value is not valid unicode, ignoring");
                None
            }
        }
    }
}

impl<S: BuildHasher> ConfigSource for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = RevisionConfig::default();
        assert_eq!(cfg.path, "/__revision__");
        assert_eq!(cfg.env_var, "COMMIT_HASH");
        assert!(cfg.json_format);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let cfg: RevisionConfig = serde_json::from_str(r#"{"path":"/version"}"#).unwrap();
        assert_eq!(cfg, RevisionConfig::default().path("/version"));
    }

    #[test]
    fn rejects_relative_path() {
        let err = RevisionConfig::default().path("version").validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_empty_path() {
        assert!(RevisionConfig::default().path("").validate().is_err());
    }

    #[test]
    fn rejects_bad_variable_names() {
        assert!(RevisionConfig::default().env_var("").validate().is_err());
        assert!(RevisionConfig::default().env_var("A=B").validate().is_err());
        assert!(RevisionConfig::default().env_var("A\0B").validate().is_err());
    }

    #[test]
    fn map_source() {
        let map = HashMap::from([("COMMIT_HASH".to_owned(), "abc123".to_owned())]);
        assert_eq!(ConfigSource::get(&map, "COMMIT_HASH").as_deref(), Some("abc123"));
        assert_eq!(ConfigSource::get(&map, "OTHER"), None);
    }

    #[test]
    fn env_source_missing_variable() {
        assert_eq!(Env.get("REVISION_ENDPOINT_TEST_UNSET_VARIABLE"), None);
    }
}
