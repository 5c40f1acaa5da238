use anyhow::{Context, Result};
use keyring::Entry;

use super::TokenStore;

/// Keychain service used for the default API host
pub const SERVICE_NAME: &str = "duckgate";

/// Keychain account the token is filed under
const TOKEN_ACCOUNT: &str = "jwt";

/// Token persisted in the OS keychain.
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    /// Store the token under `service`, e.g. one service per API host
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, TOKEN_ACCOUNT).context("Failed to create keyring entry")
    }
}

impl TokenStore for KeyringTokenStore {
    /// Retrieve the token from the OS keychain
    fn get(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    /// Store the token in the OS keychain
    fn set(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    /// Delete the stored token; a missing entry is not an error
    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }

    fn backend_name(&self) -> &'static str {
        "keyring"
    }
}
