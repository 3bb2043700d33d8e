//! Key Vault error types using thiserror 2.0.
//!
//! Every failure is surfaced as a recoverable return value with the
//! originating cause attached; nothing is retried or swallowed at this
//! layer. Retry policy belongs to the caller.

use thiserror::Error;

/// Errors produced while fetching a certificate from Azure Key Vault.
#[derive(Error, Debug)]
pub enum KeyVaultError {
    /// A required identity environment variable is absent or blank.
    #[error("{name} environment variable not found")]
    MissingCredential {
        /// Name of the missing environment variable.
        name: &'static str,
    },

    /// The OAuth2 credential exchange failed.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// An operation requiring authorization was invoked before `authorize`.
    #[error("not authorized: call authorize_from_env() before get_certificate()")]
    NotAuthorized,

    /// A caller-supplied argument was rejected before any network I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The version listing contained no enabled certificate version.
    #[error("no enabled version of certificate '{name}' found")]
    NoEnabledVersion {
        /// Certificate name whose listing was drained.
        name: String,
    },

    /// A vault network call failed.
    #[error("vault request failed: {0}")]
    Transport(String),

    /// The secret value was not valid base64.
    #[error("secret value is not valid base64: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// The decoded bytes were not a readable PKCS#12 container.
    #[error("failed to decode PKCS#12 container: {0}")]
    ContainerDecode(#[from] openssl::error::ErrorStack),

    /// The decoded key and certificate do not form a usable TLS pair.
    #[error("certificate and key do not form a valid pair: {0}")]
    InvalidKeyPair(String),

    /// The operation was cancelled or its deadline expired.
    #[error("operation cancelled before completion")]
    Cancelled,
}

/// Result type for Key Vault operations.
pub type KeyVaultResult<T> = Result<T, KeyVaultError>;

impl KeyVaultError {
    /// Check if error is retryable by the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an authorization error.
    #[must_use]
    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid key pair error.
    #[must_use]
    pub fn invalid_key_pair(msg: impl Into<String>) -> Self {
        Self::InvalidKeyPair(msg.into())
    }
}

impl From<reqwest::Error> for KeyVaultError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Cancelled
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyVaultError::MissingCredential {
            name: "AZURE_TENANT_ID",
        };
        assert_eq!(
            err.to_string(),
            "AZURE_TENANT_ID environment variable not found"
        );

        let err = KeyVaultError::NoEnabledVersion {
            name: "tls-cert".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no enabled version of certificate 'tls-cert' found"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(KeyVaultError::transport("connection refused").is_retryable());
        assert!(!KeyVaultError::NotAuthorized.is_retryable());
        assert!(!KeyVaultError::Cancelled.is_retryable());
        assert!(
            !KeyVaultError::NoEnabledVersion {
                name: "tls-cert".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_invalid_key_pair_wraps_cause() {
        let err = KeyVaultError::invalid_key_pair("no private key found");
        assert_eq!(
            err.to_string(),
            "certificate and key do not form a valid pair: no private key found"
        );
    }
}
