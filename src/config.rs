//! Vault client configuration.

use std::time::Duration;

/// Default DNS suffix for public-cloud Key Vault endpoints.
pub const DEFAULT_DNS_SUFFIX: &str = "vault.azure.net";
/// Default AAD authority used for the client-credentials exchange.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
/// Default OAuth2 scope for Key Vault data-plane access.
pub const DEFAULT_SCOPE: &str = "https://vault.azure.net/.default";
/// Key Vault REST API version sent with every request.
pub const API_VERSION: &str = "7.4";

/// Key Vault client configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Name of the target vault.
    pub vault_name: String,
    /// DNS suffix appended to the vault name when deriving the base URL.
    pub dns_suffix: String,
    /// Authority host for the OAuth2 token exchange.
    pub authority_host: String,
    /// OAuth2 scope requested during authorization.
    pub scope: String,
    /// Page size for the certificate version listing.
    pub page_size: u32,
    /// Request timeout applied to every network call.
    pub timeout: Duration,
    base_url_override: Option<String>,
}

impl VaultConfig {
    /// Create a configuration for a named vault with defaults.
    #[must_use]
    pub fn new(vault_name: impl Into<String>) -> Self {
        Self {
            vault_name: vault_name.into(),
            dns_suffix: DEFAULT_DNS_SUFFIX.to_string(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            page_size: 25,
            timeout: Duration::from_secs(30),
            base_url_override: None,
        }
    }

    /// Vault base URL: the override when set, otherwise
    /// `https://{vault_name}.{dns_suffix}`.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url_override.clone().unwrap_or_else(|| {
            format!(
                "https://{name}.{suffix}",
                name = self.vault_name,
                suffix = self.dns_suffix
            )
        })
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the DNS suffix (sovereign clouds use a different one).
    #[must_use]
    pub fn with_dns_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.dns_suffix = suffix.into();
        self
    }

    /// Set the authority host used for the token exchange.
    #[must_use]
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = host.into();
        self
    }

    /// Override the derived vault base URL (emulators, tests).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url_override = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Set the version listing page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
