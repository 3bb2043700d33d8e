//! Validated TLS key pair assembly.

use openssl::pkey::PKey;
use openssl::x509::X509;
use rustls::ServerConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use crate::error::{KeyVaultError, KeyVaultResult};
use crate::pfx::KeyPairMaterial;

/// A certificate chain paired with its matching private key, ready for a
/// rustls server configuration. Construction validates that the key
/// corresponds to the leaf certificate; a `TlsKeyPair` is never partially
/// valid.
pub struct TlsKeyPair {
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl TlsKeyPair {
    /// Parse and validate decoded key-pair material.
    ///
    /// Fails with [`KeyVaultError::InvalidKeyPair`] when the chain is
    /// empty, the key is missing or malformed, or the key does not match
    /// the leaf certificate's public key.
    pub fn assemble(material: KeyPairMaterial) -> KeyVaultResult<Self> {
        let certs = rustls_pemfile::certs(&mut material.cert_chain.as_slice())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                KeyVaultError::invalid_key_pair(format!("failed to parse certificate chain: {e}"))
            })?;
        if certs.is_empty() {
            return Err(KeyVaultError::invalid_key_pair(
                "no certificate found in decoded container",
            ));
        }

        let key = rustls_pemfile::private_key(&mut material.key.as_slice())
            .map_err(|e| {
                KeyVaultError::invalid_key_pair(format!("failed to parse private key: {e}"))
            })?
            .ok_or_else(|| {
                KeyVaultError::invalid_key_pair("no private key found in decoded container")
            })?;

        verify_key_matches_leaf(&certs[0], &material.key)?;

        Ok(Self { certs, key })
    }

    /// Leaf certificate (first in the chain).
    #[must_use]
    pub fn leaf(&self) -> &CertificateDer<'static> {
        &self.certs[0]
    }

    /// Full certificate chain, leaf first.
    #[must_use]
    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certs
    }

    /// Decompose into the chain and key expected by
    /// `ServerConfig::builder().with_single_cert`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>) {
        (self.certs, self.key)
    }

    /// Build a rustls server configuration serving this key pair with no
    /// client authentication.
    pub fn into_server_config(self) -> KeyVaultResult<ServerConfig> {
        ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(self.certs, self.key)
            .map_err(|e| {
                KeyVaultError::invalid_key_pair(format!("failed to build server config: {e}"))
            })
    }
}

impl std::fmt::Debug for TlsKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsKeyPair")
            .field("certificates", &self.certs.len())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

fn verify_key_matches_leaf(leaf: &CertificateDer<'_>, key_pem: &[u8]) -> KeyVaultResult<()> {
    let cert = X509::from_der(leaf).map_err(|e| {
        KeyVaultError::invalid_key_pair(format!("leaf certificate is not valid DER: {e}"))
    })?;
    let key = PKey::private_key_from_pem(key_pem).map_err(|e| {
        KeyVaultError::invalid_key_pair(format!("private key is not valid PEM: {e}"))
    })?;
    let cert_key = cert.public_key().map_err(|e| {
        KeyVaultError::invalid_key_pair(format!("leaf certificate has no readable public key: {e}"))
    })?;

    if cert_key.public_eq(&key) {
        Ok(())
    } else {
        Err(KeyVaultError::invalid_key_pair(
            "private key does not match the leaf certificate",
        ))
    }
}
