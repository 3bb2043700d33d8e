//! Key Vault client facade.
//!
//! A client starts unauthorized and moves forward exactly once via
//! `authorize_from_env` / `authorize_with`; the state is never reset.
//! Authorization takes `&mut self`, so the borrow checker rules out
//! concurrent mutation of the same handle. A failed or cancelled call
//! leaves the authorization state untouched.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::auth::{self, EnvironmentCredentials};
use crate::config::{API_VERSION, VaultConfig};
use crate::error::{KeyVaultError, KeyVaultResult};
use crate::keypair::TlsKeyPair;
use crate::models::{CertificateVersionPage, SecretBundle};
use crate::pfx;
use crate::version::{CertificateVersion, select_latest_enabled};

/// Client for fetching TLS certificates from a named Azure Key Vault.
pub struct KeyVaultClient {
    config: VaultConfig,
    http: Client,
    token: Option<SecretString>,
}

impl KeyVaultClient {
    /// Create an unauthorized client for a named vault.
    pub fn new(vault_name: impl Into<String>) -> KeyVaultResult<Self> {
        Self::with_config(VaultConfig::new(vault_name))
    }

    /// Create an unauthorized client from explicit configuration.
    pub fn with_config(config: VaultConfig) -> KeyVaultResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http,
            token: None,
        })
    }

    /// Whether `authorize_from_env` or `authorize_with` has succeeded.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.token.is_some()
    }

    /// Resolve identity from the environment and exchange it for a
    /// data-plane bearer token.
    ///
    /// Fails with [`KeyVaultError::MissingCredential`] before any network
    /// call when a variable is absent, or [`KeyVaultError::Authorization`]
    /// when the exchange is rejected.
    #[instrument(skip(self), fields(vault = %self.config.vault_name))]
    pub async fn authorize_from_env(&mut self) -> KeyVaultResult<()> {
        let credentials = EnvironmentCredentials::from_env()?;
        self.authorize_with(credentials).await
    }

    /// Exchange explicit credentials for a data-plane bearer token.
    #[instrument(skip(self, credentials), fields(vault = %self.config.vault_name))]
    pub async fn authorize_with(
        &mut self,
        credentials: EnvironmentCredentials,
    ) -> KeyVaultResult<()> {
        let access = auth::request_access_token(&self.http, &self.config, &credentials).await?;
        info!(
            expires_in_secs = access.expires_in.as_secs(),
            "authorized against key vault"
        );
        self.token = Some(access.token);
        Ok(())
    }

    /// Fetch the newest enabled version of a named certificate and return
    /// it as a validated TLS key pair.
    ///
    /// Requires prior authorization ([`KeyVaultError::NotAuthorized`]
    /// otherwise, without any network I/O) and a non-blank certificate
    /// name ([`KeyVaultError::InvalidArgument`]).
    #[instrument(skip(self), fields(vault = %self.config.vault_name))]
    pub async fn get_certificate(&self, cert_name: &str) -> KeyVaultResult<TlsKeyPair> {
        let Some(token) = self.token.clone() else {
            return Err(KeyVaultError::NotAuthorized);
        };

        let name = cert_name.trim();
        if name.is_empty() {
            return Err(KeyVaultError::invalid_argument(
                "certificate name not provided",
            ));
        }

        let version = self.latest_enabled_version(&token, name).await?;
        debug!(version = %version, "selected certificate version");

        let bundle = self.fetch_secret(&token, name, &version).await?;
        let blocks = pfx::decode_pfx(bundle.value.expose_secret())?;
        let material = pfx::partition_blocks(&blocks);
        TlsKeyPair::assemble(material)
    }

    async fn latest_enabled_version(
        &self,
        token: &SecretString,
        name: &str,
    ) -> KeyVaultResult<String> {
        let records = self.list_version_records(token, name).await?;
        select_latest_enabled(records).ok_or_else(|| KeyVaultError::NoEnabledVersion {
            name: name.to_string(),
        })
    }

    /// Drain the paged version listing sequentially. Pages are followed via
    /// `nextLink` one at a time so the selector's first-seen-wins tie-break
    /// stays deterministic.
    async fn list_version_records(
        &self,
        token: &SecretString,
        name: &str,
    ) -> KeyVaultResult<Vec<CertificateVersion>> {
        let mut records = Vec::new();
        let mut next = Some(format!(
            "{base}/certificates/{name}/versions?api-version={API_VERSION}&maxresults={page_size}",
            base = self.config.base_url(),
            page_size = self.config.page_size
        ));

        while let Some(url) = next.take() {
            let page: CertificateVersionPage = self.get_json(token, &url).await?;
            records.extend(page.value.into_iter().map(CertificateVersion::from));
            next = page.next_link.filter(|link| !link.is_empty());
        }

        debug!(name, count = records.len(), "drained certificate versions");
        Ok(records)
    }

    async fn fetch_secret(
        &self,
        token: &SecretString,
        name: &str,
        version: &str,
    ) -> KeyVaultResult<SecretBundle> {
        let url = format!(
            "{base}/secrets/{name}/{version}?api-version={API_VERSION}",
            base = self.config.base_url()
        );
        self.get_json(token, &url).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &SecretString,
        url: &str,
    ) -> KeyVaultResult<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KeyVaultError::transport(format!(
                "status {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for KeyVaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyVaultClient")
            .field("vault_name", &self.config.vault_name)
            .field("authorized", &self.is_authorized())
            .finish()
    }
}
