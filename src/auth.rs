//! Credential resolution and OAuth2 client-credentials token exchange.
//!
//! Identity comes from the environment: `AZURE_TENANT_ID`,
//! `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`. Every variable is checked
//! before any network call so a missing value fails with the exact
//! variable named.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::config::VaultConfig;
use crate::error::{KeyVaultError, KeyVaultResult};

/// Environment variable holding the AAD tenant identifier.
pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
/// Environment variable holding the service principal client identifier.
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
/// Environment variable holding the service principal client secret.
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";

/// Service principal identity used for the client-credentials exchange.
#[derive(Clone)]
pub struct EnvironmentCredentials {
    /// AAD tenant identifier.
    pub tenant_id: String,
    /// Service principal client identifier.
    pub client_id: String,
    client_secret: SecretString,
}

impl EnvironmentCredentials {
    /// Create credentials from explicit values.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// Resolve credentials from the process environment.
    ///
    /// Fails with [`KeyVaultError::MissingCredential`] naming the first
    /// absent or blank variable, before any network I/O.
    pub fn from_env() -> KeyVaultResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> KeyVaultResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(KeyVaultError::MissingCredential { name })
        };

        let tenant_id = require(TENANT_ID_VAR)?;
        let client_id = require(CLIENT_ID_VAR)?;
        let client_secret = require(CLIENT_SECRET_VAR)?;

        Ok(Self::new(tenant_id, client_id, client_secret))
    }
}

impl std::fmt::Debug for EnvironmentCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Bearer token obtained from the authority.
pub(crate) struct AccessToken {
    pub token: SecretString,
    pub expires_in: Duration,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchange client credentials for a Key Vault data-plane bearer token.
pub(crate) async fn request_access_token(
    http: &Client,
    config: &VaultConfig,
    credentials: &EnvironmentCredentials,
) -> KeyVaultResult<AccessToken> {
    let url = format!(
        "{authority}/{tenant}/oauth2/v2.0/token",
        authority = config.authority_host.trim_end_matches('/'),
        tenant = credentials.tenant_id
    );
    let params = [
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.expose_secret()),
        ("scope", config.scope.as_str()),
        ("grant_type", "client_credentials"),
    ];

    debug!(tenant_id = %credentials.tenant_id, "requesting access token");

    let response = http.post(&url).form(&params).send().await.map_err(|e| {
        if e.is_timeout() {
            KeyVaultError::Cancelled
        } else {
            KeyVaultError::authorization(format!("token request failed: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(KeyVaultError::authorization(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let payload: TokenResponse = response.json().await.map_err(|e| {
        KeyVaultError::authorization(format!("failed to parse token response: {e}"))
    })?;

    Ok(AccessToken {
        token: SecretString::from(payload.access_token),
        expires_in: Duration::from_secs(payload.expires_in.unwrap_or(3600)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_tenant_id_named() {
        let vars = env(&[(CLIENT_ID_VAR, "client"), (CLIENT_SECRET_VAR, "secret")]);
        let err = EnvironmentCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(
            err,
            KeyVaultError::MissingCredential { name: TENANT_ID_VAR }
        ));
    }

    #[test]
    fn test_blank_client_secret_is_missing() {
        let vars = env(&[
            (TENANT_ID_VAR, "tenant"),
            (CLIENT_ID_VAR, "client"),
            (CLIENT_SECRET_VAR, "   "),
        ]);
        let err = EnvironmentCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(
            err,
            KeyVaultError::MissingCredential {
                name: CLIENT_SECRET_VAR
            }
        ));
    }

    #[test]
    fn test_resolves_trimmed_values() {
        let vars = env(&[
            (TENANT_ID_VAR, " tenant "),
            (CLIENT_ID_VAR, "client"),
            (CLIENT_SECRET_VAR, "secret"),
        ]);
        let creds = EnvironmentCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(creds.tenant_id, "tenant");
        assert_eq!(creds.client_id, "client");
    }

    #[test]
    fn test_debug_redacts_client_secret() {
        let creds = EnvironmentCredentials::new("tenant", "client", "super-secret-value");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }
}
