use crate::constants::{EMPTY_BODY, TOKEN_TTL_SECS};
use fireblocks_core::hash::hex_sha256;
use fireblocks_core::time::{unix_seconds, DateTime};
use fireblocks_core::{Error, Result};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};

/// Claims bound into a bearer token.
///
/// A claim set is built for exactly one request and signed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Request path including the query string, exactly as sent.
    pub uri: String,
    /// 128 random bits, hex encoded.
    pub nonce: String,
    /// Issued at, seconds since the Unix epoch.
    pub iat: u64,
    /// Expiry, always `iat + 55`.
    pub exp: u64,
    /// API key identifier.
    pub sub: String,
    /// Hex encoded SHA-256 of the request body.
    #[serde(rename = "bodyHash")]
    pub body_hash: String,
}

impl Claims {
    /// Build the claims for a request issued at `now`.
    ///
    /// An empty `body` hashes as `{}`.
    pub fn new(api_key: &str, path: &str, body: &[u8], now: DateTime) -> Self {
        let iat = unix_seconds(now);

        Claims {
            uri: path.to_string(),
            nonce: new_nonce(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
            sub: api_key.to_string(),
            body_hash: body_hash(body),
        }
    }

    /// Check that these claims were issued for `path` and `body`.
    pub fn is_bound_to(&self, path: &str, body: &[u8]) -> bool {
        self.uri == path && self.body_hash == body_hash(body)
    }

    /// Decode the claims of a token without checking its signature.
    pub fn decode_unverified(token: &str) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::request_invalid("malformed token").with_source(e))
    }

    /// Verify a token's signature against `public_key` and return its claims.
    ///
    /// Expiry is not checked here, the server is the one enforcing it.
    pub fn verify(token: &str, public_key: &RsaPublicKey) -> Result<Self> {
        let der = public_key
            .to_pkcs1_der()
            .map_err(|e| Error::unexpected("failed to encode RSA public key").with_source(e))?;
        let key = DecodingKey::from_rsa_der(der.as_bytes());

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;

        match jsonwebtoken::decode::<Claims>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), JwtErrorKind::InvalidSignature) => {
                Err(Error::signing_failed("token signature mismatch").with_source(e))
            }
            Err(e) => Err(Error::request_invalid("malformed token").with_source(e)),
        }
    }
}

/// Hex encoded SHA-256 of the body, hashing `{}` for an empty body.
pub fn body_hash(body: &[u8]) -> String {
    if body.is_empty() {
        hex_sha256(EMPTY_BODY)
    } else {
        hex_sha256(body)
    }
}

fn new_nonce() -> String {
    format!("{:032x}", rand::random::<u128>())
}
