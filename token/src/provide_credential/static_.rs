use crate::Credential;
use async_trait::async_trait;
use fireblocks_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider returns the API key and private key given at
/// construction time.
#[derive(Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl std::fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialProvider")
            .field("credential", &self.credential)
            .finish()
    }
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider from an API key and a PEM
    /// encoded private key.
    pub fn new(api_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(api_key, private_key),
        }
    }
}

impl From<Credential> for StaticCredentialProvider {
    fn from(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.credential.clone()))
    }
}
