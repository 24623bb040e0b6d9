use crate::constants::DEFAULT_BASE_URL;
use crate::types::{TransactionFilter, TransactionRequest};
use crate::Config;
use bytes::Bytes;
use fireblocks_core::{Context, Error, ProvideCredential, Result, SignRequest};
use fireblocks_token::{
    encode_body, read_private_key, Credential, DefaultCredentialProvider, RequestSigner,
    StaticCredentialProvider, TokenSigner,
};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, Uri};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// ApiClient talks to the Fireblocks API.
///
/// Every request is signed with a fresh bearer token bound to its
/// path-and-query and body. The client holds no mutable state and can be
/// cloned and shared across tasks.
///
/// ```no_run
/// use fireblocks_sdk::{default_context, ApiClient, TransactionFilter, TransactionStatus};
///
/// # async fn run() -> fireblocks_sdk::Result<()> {
/// let client = ApiClient::from_env(default_context()?).await?;
///
/// let completed = client
///     .get_transactions(&TransactionFilter::new().with_status(TransactionStatus::Completed))
///     .await?;
/// println!("{completed}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    ctx: Context,
    signer: RequestSigner,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `api_key`, signing with the PEM encoded
    /// `private_key`, against the production endpoint.
    pub fn new(ctx: Context, api_key: impl Into<String>, private_key: &str) -> Result<Self> {
        let signer = TokenSigner::new(api_key, private_key)?;

        Ok(Self {
            ctx,
            signer: RequestSigner::new(signer),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a client from a loaded credential.
    pub fn from_credential(ctx: Context, cred: &Credential) -> Result<Self> {
        Self::new(ctx, cred.api_key.clone(), &cred.private_key)
    }

    /// Create a client from config.
    ///
    /// Credentials are taken from `config` first, then from the default
    /// credential chain.
    pub async fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let mut provider = DefaultCredentialProvider::new();
        if let Some(cred) = load_config_credential(&ctx, config).await? {
            provider = provider.push_front(StaticCredentialProvider::from(cred));
        }

        let Some(cred) = provider.provide_credential(&ctx).await? else {
            return Err(Error::config_invalid(
                "no credential found, set FIREBLOCKS_API_KEY and FIREBLOCKS_SECRET_KEY",
            ));
        };

        let client = Self::from_credential(ctx, &cred)?;
        match &config.base_url {
            Some(base_url) => client.with_base_url(base_url),
            None => Ok(client),
        }
    }

    /// Create a client from the environment of `ctx`.
    pub async fn from_env(ctx: Context) -> Result<Self> {
        let config = Config::from_env(&ctx);
        Self::from_config(ctx, &config).await
    }

    /// Send requests to `base_url` instead of the production endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        let uri: Uri = base_url
            .parse()
            .map_err(|e| Error::config_invalid(format!("invalid base url {base_url:?}")).with_source(e))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "base url must be absolute: {base_url:?}"
            )));
        }

        self.base_url = base_url.to_string();
        Ok(self)
    }

    /// Base url requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key used by this client.
    pub fn api_key(&self) -> &str {
        self.signer.token_signer().api_key()
    }

    /// `GET` `path` and decode the JSON response.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }

    /// `DELETE` `path` and decode the JSON response.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, None).await
    }

    /// `POST` `body` to `path` and decode the JSON response.
    ///
    /// `None` sends `{}`.
    pub async fn post<T>(&self, path: &str, body: Option<&T>) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(Method::POST, path, Some(body.into())).await
    }

    /// `PUT` `body` to `path` and decode the JSON response.
    ///
    /// `None` sends `{}`.
    pub async fn put<T>(&self, path: &str, body: Option<&T>) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(Method::PUT, path, Some(body.into())).await
    }

    /// List transactions matching `filter`.
    pub async fn get_transactions(&self, filter: &TransactionFilter) -> Result<Value> {
        let path = match filter.to_query() {
            Some(query) => format!("/v1/transactions?{query}"),
            None => "/v1/transactions".to_string(),
        };
        self.get(&path).await
    }

    /// Get a transaction by id.
    pub async fn get_transaction_by_id(&self, tx_id: &str) -> Result<Value> {
        check_path_id("transaction id", tx_id)?;
        self.get(&format!("/v1/transactions/{tx_id}")).await
    }

    /// Cancel a transaction by id.
    pub async fn cancel_transaction_by_id(&self, tx_id: &str) -> Result<Value> {
        check_path_id("transaction id", tx_id)?;
        self.post(&format!("/v1/transactions/{tx_id}/cancel"), None::<&()>)
            .await
    }

    /// Create a transaction.
    pub async fn create_transaction(&self, req: &TransactionRequest) -> Result<Value> {
        let body = req.to_body()?;
        self.post("/v1/transactions", Some(&body)).await
    }

    /// Sign and send one request.
    ///
    /// The url is put in the form the transport sends before it is signed,
    /// so dot segments are resolved and reserved characters percent-encoded
    /// in the `uri` claim exactly as on the wire.
    async fn send(&self, method: Method, path: &str, body: Option<Bytes>) -> Result<Value> {
        if !path.starts_with('/') {
            return Err(Error::request_invalid(format!(
                "request path must start with '/': {path:?}"
            )));
        }

        let url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(|e| {
            Error::request_invalid(format!("invalid request path {path:?}")).with_source(e)
        })?;
        if url.fragment().is_some() {
            return Err(Error::request_invalid(format!(
                "request path must not carry a fragment: {path:?}"
            )));
        }

        let body = body.unwrap_or_default();
        let (mut parts, ()) = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .body(())?
            .into_parts();
        if !body.is_empty() {
            parts
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        self.signer.sign_request(&mut parts, &body)?;

        debug!("sending request: {} {}", parts.method, parts.uri);
        let resp = self
            .ctx
            .http_send(http::Request::from_parts(parts, body))
            .await?;

        let status = resp.status();
        let body = resp.into_body();
        if status.as_u16() >= 300 {
            let text = String::from_utf8_lossy(&body).into_owned();
            debug!("request failed with status {status}: {text}");
            return Err(Error::remote(status, text));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| {
            Error::unexpected(format!(
                "response is not valid json: {}",
                String::from_utf8_lossy(&body)
            ))
            .with_source(e)
        })
    }
}

/// Credential spelled out in config, reading the key file when only its
/// path is given.
async fn load_config_credential(ctx: &Context, config: &Config) -> Result<Option<Credential>> {
    let Some(api_key) = &config.api_key else {
        return Ok(None);
    };

    let private_key = match (&config.private_key, &config.private_key_path) {
        (Some(pem), _) => pem.clone(),
        (None, Some(path)) => read_private_key(ctx, path).await?,
        (None, None) => return Ok(None),
    };

    Ok(Some(Credential::new(api_key.clone(), private_key)))
}

/// Reject identifiers that would change the shape of the path they are
/// interpolated into.
fn check_path_id(what: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::request_invalid(format!("{what} must not be empty")));
    }
    if id == "." || id == ".." {
        return Err(Error::request_invalid(format!(
            "{what} must not be a dot segment: {id:?}"
        )));
    }
    if id
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace())
    {
        return Err(Error::request_invalid(format!(
            "{what} contains characters not allowed in a path: {id:?}"
        )));
    }
    Ok(())
}
