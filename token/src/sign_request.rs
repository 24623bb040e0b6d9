use crate::constants::X_API_KEY;
use crate::{Credential, TokenSigner};
use fireblocks_core::{Error, Result, SignRequest};
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::HeaderValue;
use log::debug;

/// RequestSigner authenticates requests for the Fireblocks API.
///
/// It inserts two headers:
///
/// - `X-API-Key`: the API key identifier, in cleartext.
/// - `Authorization: Bearer <token>`: a token bound to the request's
///   path-and-query and body.
///
/// The path-and-query is read from the request URI as-is, so the URI must
/// not be rewritten after signing.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    signer: TokenSigner,
}

impl RequestSigner {
    /// Create a new request signer around a token signer.
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }

    /// Create a new request signer from a credential.
    pub fn from_credential(cred: &Credential) -> Result<Self> {
        Ok(Self::new(TokenSigner::from_credential(cred)?))
    }

    /// Token signer used by this request signer.
    pub fn token_signer(&self) -> &TokenSigner {
        &self.signer
    }
}

impl From<TokenSigner> for RequestSigner {
    fn from(signer: TokenSigner) -> Self {
        Self::new(signer)
    }
}

impl SignRequest for RequestSigner {
    fn sign_request(&self, req: &mut Parts, body: &[u8]) -> Result<()> {
        let path = req
            .uri
            .path_and_query()
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::request_invalid("request without path can't be signed"))?;

        debug!("signing {} {}", req.method, path);
        let token = self.signer.sign_bytes(path, body)?;

        req.headers
            .insert(X_API_KEY, HeaderValue::from_str(self.signer.api_key())?);
        req.headers.insert(AUTHORIZATION, {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            value
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Claims;
    use pretty_assertions::assert_eq;

    const PKCS8: &str = include_str!("../testdata/private_key.pem");

    fn parts(method: http::Method, uri: &str) -> Parts {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_sign_request_inserts_headers() {
        let signer = RequestSigner::new(TokenSigner::new("api-key", PKCS8).unwrap());
        let mut req = parts(
            http::Method::GET,
            "https://api.fireblocks.io/v1/transactions?status=COMPLETED&limit=5",
        );

        signer.sign_request(&mut req, b"").unwrap();

        assert_eq!(req.headers[X_API_KEY], "api-key");
        let auth = req.headers[AUTHORIZATION].to_str().unwrap();
        assert!(req.headers[AUTHORIZATION].is_sensitive());

        let token = auth.strip_prefix("Bearer ").unwrap();
        let claims = Claims::verify(token, signer.token_signer().public_key()).unwrap();
        assert_eq!(claims.uri, "/v1/transactions?status=COMPLETED&limit=5");
        assert!(claims.is_bound_to("/v1/transactions?status=COMPLETED&limit=5", b""));
    }

    #[test]
    fn test_sign_request_binds_body() {
        let signer = RequestSigner::from_credential(&Credential::new("api-key", PKCS8)).unwrap();
        let mut req = parts(http::Method::POST, "https://api.fireblocks.io/v1/vault/accounts");
        let body = br#"{"name":"Treasury","hiddenOnUI":false}"#;

        signer.sign_request(&mut req, body).unwrap();

        let auth = req.headers[AUTHORIZATION].to_str().unwrap();
        let claims = Claims::decode_unverified(auth.trim_start_matches("Bearer ")).unwrap();
        assert!(claims.is_bound_to("/v1/vault/accounts", body));
        assert!(!claims.is_bound_to("/v1/vault/accounts", b""));
    }

    #[test]
    fn test_sign_request_replaces_stale_headers() {
        let signer = RequestSigner::from(TokenSigner::new("api-key", PKCS8).unwrap());
        let mut req = parts(http::Method::GET, "https://api.fireblocks.io/v1/vault/accounts");
        req.headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));

        signer.sign_request(&mut req, b"").unwrap();

        assert_eq!(req.headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_ne!(req.headers[AUTHORIZATION], "Bearer stale");
    }
}
