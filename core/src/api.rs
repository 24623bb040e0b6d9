use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait used by credential providers to report
/// whether what they loaded can be used for signing.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used to load a credential from the
/// environment, a file, or anything else reachable through [`Context`].
///
/// Returning `Ok(None)` means "not configured here", which lets a
/// [`ProvideCredentialChain`](crate::ProvideCredentialChain) move on to the
/// next provider.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current context.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used to authenticate an outgoing request.
///
/// Signing is pure computation over the request head, the body bytes, a
/// clock and a randomness source, so this trait is synchronous.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Authenticate `req` in place.
    ///
    /// ## Body
    ///
    /// `body` must be the exact bytes that will be transmitted. An empty slice
    /// means the request carries no body.
    fn sign_request(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()>;
}
