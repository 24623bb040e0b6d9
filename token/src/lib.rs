//! Bearer token signing for the Fireblocks API.
//!
//! Every request to the Fireblocks API carries two headers: the API key in
//! `X-API-Key`, and an `Authorization: Bearer` token. The token is a JWT
//! signed with the API user's RSA private key (`RS256`). Its claims bind it
//! to one request path (query string included), one request body, and a
//! 55 second window.
//!
//! ## Example
//!
//! ```no_run
//! use fireblocks_core::{Context, OsEnv, ProvideCredential, Result, SignRequest};
//! use fireblocks_token::{DefaultCredentialProvider, RequestSigner};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new().with_env(OsEnv);
//!
//!     let Some(cred) = DefaultCredentialProvider::new().provide_credential(&ctx).await? else {
//!         panic!("FIREBLOCKS_API_KEY and FIREBLOCKS_SECRET_KEY must be set");
//!     };
//!     let signer = RequestSigner::from_credential(&cred)?;
//!
//!     let (mut parts, _) = http::Request::get("https://api.fireblocks.io/v1/vault/accounts")
//!         .body(())?
//!         .into_parts();
//!     signer.sign_request(&mut parts, b"")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod constants;

mod credential;
pub use credential::Credential;

mod key;
pub use key::read_private_key;

mod claims;
pub use claims::{body_hash, Claims};

mod token_signer;
pub use token_signer::{encode_body, TokenSigner};

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;
