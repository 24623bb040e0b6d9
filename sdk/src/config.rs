use crate::constants::*;
use fireblocks_core::utils::Redact;
use fireblocks_core::Context;
use std::fmt::{Debug, Formatter};

/// Config for [`ApiClient`](crate::ApiClient).
///
/// Every field is optional. Credentials left unset here are resolved
/// through [`DefaultCredentialProvider`](fireblocks_token::DefaultCredentialProvider).
#[derive(Clone, Default)]
pub struct Config {
    /// `api_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`FIREBLOCKS_API_KEY`]
    pub api_key: Option<String>,
    /// `private_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`FIREBLOCKS_SECRET_KEY`]
    pub private_key: Option<String>,
    /// `private_key_path` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`FIREBLOCKS_SECRET_KEY_PATH`]
    pub private_key_path: Option<String>,
    /// `base_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`FIREBLOCKS_API_BASE_URL`]
    /// - default to `https://api.fireblocks.io`
    pub base_url: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &Redact::from(&self.api_key))
            .field("private_key", &Redact::from(&self.private_key))
            .field("private_key_path", &self.private_key_path)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from env.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            api_key: ctx.env_var(FIREBLOCKS_API_KEY),
            private_key: ctx.env_var(FIREBLOCKS_SECRET_KEY),
            private_key_path: ctx.env_var(FIREBLOCKS_SECRET_KEY_PATH),
            base_url: ctx.env_var(FIREBLOCKS_API_BASE_URL),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the PEM encoded private key.
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Set the path of the PEM encoded private key.
    pub fn with_private_key_path(mut self, path: impl Into<String>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// Set the API base url.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
