//! Client for the Fireblocks REST API.
//!
//! [`ApiClient`] signs every request with a short-lived bearer token (see
//! [`fireblocks_token`]) and returns the server's JSON responses untouched.
//!
//! ## Example
//!
//! ```no_run
//! use fireblocks_sdk::{default_context, ApiClient, TransactionRequest, TransferPeerPath};
//!
//! #[tokio::main]
//! async fn main() -> fireblocks_sdk::Result<()> {
//!     let pem = std::fs::read_to_string("fireblocks_secret.key")?;
//!     let client = ApiClient::new(default_context()?, "my-api-key", &pem)?;
//!
//!     let accounts = client.get("/v1/vault/accounts").await?;
//!     println!("{accounts}");
//!
//!     let tx = TransactionRequest::new("BTC", 0.001, TransferPeerPath::vault_account("0")?)
//!         .with_destination(TransferPeerPath::vault_account("1")?);
//!     println!("{}", client.create_transaction(&tx).await?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub use fireblocks_core::{Context, Error, ErrorKind, Result};
pub use fireblocks_token::{Credential, TokenSigner};

pub mod constants;

mod config;
pub use config::Config;

mod context;
pub use context::default_context;

mod types;
pub use types::{
    OneTimeAddress, OrderBy, PeerId, TransactionFilter, TransactionRequest, TransactionStatus,
    TransactionType, TransferPeerPath,
};

mod client;
pub use client::ApiClient;
