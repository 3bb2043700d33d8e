//! Azure Key Vault certificate fetcher for rustls-based TLS servers.
//!
//! Fetches the newest enabled version of a certificate stored in Azure Key
//! Vault, decodes its PKCS#12 secret bundle, and exposes it as a validated
//! certificate-plus-key pair ready for a TLS listener. Authorization uses
//! the OAuth2 client-credentials flow with identity supplied through
//! environment variables:
//!
//! - `AZURE_TENANT_ID`: AAD tenant id
//! - `AZURE_CLIENT_ID`: service principal client id
//! - `AZURE_CLIENT_SECRET`: service principal client secret
//!
//! Each fetch is a fresh full pass (list versions, select, download,
//! decode); nothing is cached or renewed across calls.
//!
//! ```no_run
//! use keyvault_cert::KeyVaultClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let vault_name = std::env::var("KEY_VAULT_NAME")?;
//!     let cert_name = std::env::var("KEY_VAULT_CERT_NAME")?;
//!
//!     let mut vault = KeyVaultClient::new(vault_name)?;
//!     vault.authorize_from_env().await?;
//!
//!     let pair = vault.get_certificate(&cert_name).await?;
//!     let tls_config = pair.into_server_config()?;
//!
//!     // Hand tls_config to your TLS acceptor of choice.
//!     drop(tls_config);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod keypair;
pub mod models;
pub mod pfx;
pub mod version;

pub use auth::EnvironmentCredentials;
pub use client::KeyVaultClient;
pub use config::VaultConfig;
pub use error::{KeyVaultError, KeyVaultResult};
pub use keypair::TlsKeyPair;
pub use pfx::KeyPairMaterial;
pub use version::{CertificateVersion, select_latest_enabled};
