//! API-key resolution.
//!
//! The key is never cached. [`CredentialSource::resolve`] is called once when
//! the service is built and again at the start of every extraction, so editing
//! the `.env` file (or the process environment) rotates the key without a
//! restart.
//!
//! A configured `.env` file takes precedence over the process environment.
//! It is parsed with [`dotenvy::from_path_iter`] and never written into the
//! environment, so concurrent resolutions do not race on `set_var`.

use crate::error::Pdf2JsonError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default environment variable holding the Groq API key.
pub const DEFAULT_CREDENTIAL_VAR: &str = "GROQ_API_KEY";

/// A resolved, non-empty API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key; returns `None` when it is blank.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// The raw key, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Where the API key comes from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Look up `var`, first in `dotenv_path` (if set and present), then in the
    /// process environment.
    Environment {
        var: String,
        dotenv_path: Option<PathBuf>,
    },
    /// A fixed key supplied by the embedding application.
    Static(ApiKey),
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Environment {
            var: DEFAULT_CREDENTIAL_VAR.to_string(),
            dotenv_path: Some(PathBuf::from(".env")),
        }
    }
}

impl CredentialSource {
    /// Read only the process environment variable `var`.
    pub fn env(var: impl Into<String>) -> Self {
        Self::Environment {
            var: var.into(),
            dotenv_path: None,
        }
    }

    /// Read `var` from `path` first, falling back to the process environment.
    pub fn env_with_dotenv(var: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Environment {
            var: var.into(),
            dotenv_path: Some(path.into()),
        }
    }

    /// Name of the variable, for error messages.
    pub fn var_name(&self) -> &str {
        match self {
            Self::Environment { var, .. } => var,
            Self::Static(_) => "API key",
        }
    }

    /// Resolve the current key.
    ///
    /// # Errors
    /// [`Pdf2JsonError::MissingCredential`] when neither the `.env` file nor
    /// the environment holds a non-blank value.
    pub fn resolve(&self) -> Result<ApiKey, Pdf2JsonError> {
        match self {
            Self::Static(key) => Ok(key.clone()),
            Self::Environment { var, dotenv_path } => {
                let from_file = dotenv_path
                    .as_deref()
                    .and_then(|path| read_dotenv_var(path, var))
                    .and_then(ApiKey::new);
                if let Some(key) = from_file {
                    debug!("Resolved {} from .env file", var);
                    return Ok(key);
                }

                std::env::var(var)
                    .ok()
                    .and_then(ApiKey::new)
                    .ok_or_else(|| Pdf2JsonError::MissingCredential { var: var.clone() })
            }
        }
    }
}

/// Look `var` up in a dotenv file. Missing file → `None`; malformed lines are
/// logged and skipped.
fn read_dotenv_var(path: &Path, var: &str) -> Option<String> {
    if !path.exists() {
        return None;
    }

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            return None;
        }
    };

    let mut found = None;
    for item in iter {
        match item {
            // Later assignments win, as when the file is sourced.
            Ok((key, value)) if key == var => found = Some(value),
            Ok(_) => {}
            Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
        }
    }
    found
}
