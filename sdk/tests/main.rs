use async_trait::async_trait;
use bytes::Bytes;
use fireblocks_core::hash::hex_sha256;
use fireblocks_core::{HttpSend, StaticEnv};
use fireblocks_sdk::{
    ApiClient, Context, ErrorKind, OrderBy, TokenSigner, TransactionFilter, TransactionRequest,
    TransactionStatus, TransactionType, TransferPeerPath,
};
use fireblocks_file_read_tokio::TokioFileRead;
use fireblocks_token::constants::{
    FIREBLOCKS_API_KEY, FIREBLOCKS_SECRET_KEY, FIREBLOCKS_SECRET_KEY_PATH,
};
use fireblocks_token::Claims;
use http::StatusCode;
use log::debug;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const API_KEY: &str = "a1b2c3d4-e5f6-7890-abcd-ef0123456789";
const PRIVATE_KEY: &str = include_str!("../testdata/private_key.pem");

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Request as seen by the transport.
#[derive(Debug, Clone)]
struct Recorded {
    method: http::Method,
    uri: http::Uri,
    headers: http::HeaderMap,
    body: Bytes,
}

/// HttpSend that records every request and answers with a canned response.
#[derive(Debug, Clone)]
struct RecordingHttpSend {
    status: StatusCode,
    body: &'static str,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingHttpSend {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            requests: Arc::default(),
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSend for RecordingHttpSend {
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
    ) -> fireblocks_core::Result<http::Response<Bytes>> {
        debug!("recording request: {} {}", req.method(), req.uri());
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });

        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from_static(self.body.as_bytes()))?)
    }
}

fn client(status: StatusCode, body: &'static str) -> (ApiClient, RecordingHttpSend) {
    init_logger();

    let send = RecordingHttpSend::new(status, body);
    let ctx = Context::new().with_http_send(send.clone());
    let client = ApiClient::new(ctx, API_KEY, PRIVATE_KEY).expect("client must build");
    (client, send)
}

fn token_of(req: &Recorded) -> Claims {
    let auth = req.headers[http::header::AUTHORIZATION]
        .to_str()
        .expect("authorization must be ascii");
    let token = auth.strip_prefix("Bearer ").expect("must be a bearer token");
    Claims::decode_unverified(token).expect("token must decode")
}

/// Path and query of the url reqwest puts on the wire for `req`.
fn wire_path(req: &Recorded) -> String {
    let rebuilt = http::Request::builder()
        .method(req.method.clone())
        .uri(req.uri.clone())
        .body(req.body.clone())
        .expect("request must rebuild");
    let sent = reqwest::Request::try_from(rebuilt).expect("reqwest must accept the request");

    match sent.url().query() {
        Some(query) => format!("{}?{query}", sent.url().path()),
        None => sent.url().path().to_string(),
    }
}

#[tokio::test]
async fn test_get_decodes_json() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, r#"{"id":"abc"}"#);

    let value = client.get("/v1/vault/accounts/0").await?;
    assert_eq!(value, json!({"id": "abc"}));

    let reqs = send.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method, http::Method::GET);
    assert_eq!(
        req.uri.to_string(),
        "https://api.fireblocks.io/v1/vault/accounts/0"
    );
    assert_eq!(req.headers["x-api-key"], API_KEY);
    assert!(req.body.is_empty());
    assert!(req.headers.get(http::header::CONTENT_TYPE).is_none());

    let claims = token_of(req);
    assert_eq!(claims.sub, API_KEY);
    assert_eq!(claims.uri, "/v1/vault/accounts/0");
    assert_eq!(claims.body_hash, hex_sha256(b"{}"));
    Ok(())
}

#[tokio::test]
async fn test_remote_error_carries_body() {
    let (client, _) = client(StatusCode::NOT_FOUND, "not found");

    let err = client.get("/v1/vault/accounts/42").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.to_string().contains("not found"));
    assert_eq!(err.message(), "not found");
}

#[tokio::test]
async fn test_redirect_status_is_remote_error() {
    let (client, _) = client(StatusCode::MULTIPLE_CHOICES, "");

    let err = client.delete("/v1/internal_wallets/w1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn test_empty_success_body_is_null() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "");

    let value = client.delete("/v1/internal_wallets/w1").await?;
    assert_eq!(value, serde_json::Value::Null);
    assert_eq!(send.requests()[0].method, http::Method::DELETE);
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_is_unexpected() {
    let (client, _) = client(StatusCode::OK, "<html>oops</html>");

    let err = client.get("/v1/supported_assets").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}

#[tokio::test]
async fn test_post_body_matches_body_hash() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, r#"{"id":"1","name":"Treasury"}"#);

    let body = json!({"name": "Treasury", "hiddenOnUI": false});
    client.post("/v1/vault/accounts", Some(&body)).await?;

    let reqs = send.requests();
    let req = &reqs[0];
    assert_eq!(req.method, http::Method::POST);
    assert_eq!(req.headers[http::header::CONTENT_TYPE], "application/json");
    assert_eq!(req.body.as_ref(), serde_json::to_vec(&body)?.as_slice());

    let claims = token_of(req);
    assert_eq!(claims.body_hash, hex_sha256(&req.body));
    assert!(claims.is_bound_to(req.uri.path(), &req.body));
    Ok(())
}

#[tokio::test]
async fn test_post_without_body_sends_empty_object() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");

    client.cancel_transaction_by_id("tx-1").await?;

    let reqs = send.requests();
    let req = &reqs[0];
    assert_eq!(req.uri.path(), "/v1/transactions/tx-1/cancel");
    assert_eq!(req.body.as_ref(), b"{}");
    assert_eq!(token_of(req).body_hash, hex_sha256(b"{}"));
    Ok(())
}

#[tokio::test]
async fn test_put_sends_body() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");

    client
        .put(
            "/v1/vault/accounts/0/BTC/addresses/bc1q",
            Some(&json!({"description": "cold"})),
        )
        .await?;

    let reqs = send.requests();
    let req = &reqs[0];
    assert_eq!(req.method, http::Method::PUT);
    assert_eq!(req.body.as_ref(), br#"{"description":"cold"}"#);
    assert_eq!(token_of(req).body_hash, hex_sha256(&req.body));
    Ok(())
}

#[tokio::test]
async fn test_get_transactions_query() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "[]");

    let filter = TransactionFilter::new()
        .with_limit(5)
        .with_order_by(OrderBy::CreatedAt)
        .with_status(TransactionStatus::Completed)
        .with_before(1700000000000);
    assert_eq!(client.get_transactions(&filter).await?, json!([]));

    let reqs = send.requests();
    let req = &reqs[0];
    let path_and_query = req.uri.path_and_query().unwrap().as_str();
    assert_eq!(
        path_and_query,
        "/v1/transactions?before=1700000000000&status=COMPLETED&orderBy=createdAt&limit=5"
    );
    assert_eq!(token_of(req).uri, path_and_query);
    Ok(())
}

#[tokio::test]
async fn test_get_transactions_without_filter() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "[]");

    client.get_transactions(&TransactionFilter::default()).await?;
    assert_eq!(token_of(&send.requests()[0]).uri, "/v1/transactions");
    Ok(())
}

async fn list_by_status(
    client: &ApiClient,
    status: &str,
) -> fireblocks_sdk::Result<serde_json::Value> {
    let status = status.parse::<TransactionStatus>()?;
    client
        .get_transactions(&TransactionFilter::new().with_status(status))
        .await
}

#[tokio::test]
async fn test_invalid_status_never_reaches_transport() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "[]");

    let err = list_by_status(&client, "DONE").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(send.requests().len(), 0);

    list_by_status(&client, "COMPLETED").await?;
    let reqs = send.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(token_of(&reqs[0]).uri, "/v1/transactions?status=COMPLETED");
    Ok(())
}

#[tokio::test]
async fn test_invalid_ids_never_reach_transport() {
    let (client, send) = client(StatusCode::OK, "{}");

    for id in ["", "a/b", "a?b", "a b", ".", "..", "%2e%2e", "a\\b"] {
        let err = client.get_transaction_by_id(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let err = client.cancel_transaction_by_id(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    assert_eq!(send.requests().len(), 0);
}

#[tokio::test]
async fn test_signed_uri_matches_wire_path() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");

    let cases = [
        ("/v1/vault/accounts/../x", "/v1/vault/x"),
        ("/v1/vault/accounts/./0", "/v1/vault/accounts/0"),
        ("/v1/transactions/a{b}", "/v1/transactions/a%7Bb%7D"),
        ("/v1/transactions/a\"b", "/v1/transactions/a%22b"),
        ("/v1/transactions/a<b>`c", "/v1/transactions/a%3Cb%3E%60c"),
        (
            "/v1/transactions?status=COMPLETED&limit=5",
            "/v1/transactions?status=COMPLETED&limit=5",
        ),
    ];
    for (path, _) in cases {
        client.get(path).await?;
    }

    let reqs = send.requests();
    assert_eq!(reqs.len(), cases.len());
    for (req, (path, expected)) in reqs.iter().zip(cases) {
        let claims = token_of(req);
        debug!("{path} signed as {} sent as {}", claims.uri, wire_path(req));
        assert_eq!(claims.uri, expected);
        assert_eq!(wire_path(req), claims.uri);
    }
    Ok(())
}

#[tokio::test]
async fn test_transaction_calls_match_wire_path() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");

    client.get_transaction_by_id("tx-1").await?;
    client.cancel_transaction_by_id("tx-1").await?;
    client
        .get_transactions(
            &TransactionFilter::new()
                .with_status(TransactionStatus::PendingSignature)
                .with_order_by(OrderBy::LastUpdated),
        )
        .await?;

    for req in send.requests() {
        assert_eq!(wire_path(&req), token_of(&req).uri);
    }
    Ok(())
}

#[tokio::test]
async fn test_fragment_never_reaches_transport() {
    let (client, send) = client(StatusCode::OK, "{}");

    let err = client.get("/v1/vault/accounts#top").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(send.requests().len(), 0);
}

#[tokio::test]
async fn test_relative_path_never_reaches_transport() {
    let (client, send) = client(StatusCode::OK, "{}");

    let err = client.get("v1/vault/accounts").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(send.requests().len(), 0);
}

#[tokio::test]
async fn test_create_transaction() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, r#"{"id":"tx-1","status":"SUBMITTED"}"#);

    let req = TransactionRequest::new("ETH", 1.5, TransferPeerPath::vault_account("0")?)
        .with_destination(TransferPeerPath::one_time_address("0xabc", None)?)
        .with_operation(TransactionType::Transfer)
        .with_fee(2.0);
    let value = client.create_transaction(&req).await?;
    assert_eq!(value["status"], "SUBMITTED");

    let reqs = send.requests();
    let sent = &reqs[0];
    let body: serde_json::Value = serde_json::from_slice(&sent.body)?;
    assert_eq!(
        body,
        json!({
            "assetId": "ETH",
            "amount": 1.5,
            "source": {"type": "VAULT_ACCOUNT", "id": "0"},
            "waitForStatus": false,
            "operation": "TRANSFER",
            "fee": 2.0,
            "destination": {"type": "ONE_TIME_ADDRESS", "oneTimeAddress": {"address": "0xabc"}},
        })
    );
    assert!(token_of(sent).is_bound_to("/v1/transactions", &sent.body));
    Ok(())
}

#[tokio::test]
async fn test_create_transaction_invalid_amount_never_reaches_transport() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");

    let req = TransactionRequest::new("ETH", -1.0, TransferPeerPath::vault_account("0")?);
    let err = client.create_transaction(&req).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(send.requests().len(), 0);
    Ok(())
}

#[tokio::test]
async fn test_client_is_reusable_after_failure() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");

    assert!(client.get_transaction_by_id("").await.is_err());
    assert_eq!(client.get_transaction_by_id("tx-1").await?, json!({}));
    assert_eq!(send.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_with_base_url_keeps_uri_claim_in_sync() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");
    let client = client.with_base_url("http://127.0.0.1:8080/")?;

    client.get("/v1/supported_assets").await?;

    let reqs = send.requests();
    let req = &reqs[0];
    assert_eq!(req.uri.to_string(), "http://127.0.0.1:8080/v1/supported_assets");
    assert_eq!(token_of(req).uri, "/v1/supported_assets");
    Ok(())
}

#[tokio::test]
async fn test_base_url_path_prefix_is_signed() -> anyhow::Result<()> {
    let (client, send) = client(StatusCode::OK, "{}");
    let client = client.with_base_url("http://127.0.0.1:8080/proxy/")?;

    client.get("/v1/supported_assets").await?;

    let reqs = send.requests();
    let req = &reqs[0];
    assert_eq!(
        req.uri.to_string(),
        "http://127.0.0.1:8080/proxy/v1/supported_assets"
    );
    assert_eq!(token_of(req).uri, "/proxy/v1/supported_assets");
    assert_eq!(wire_path(req), token_of(req).uri);
    Ok(())
}

#[tokio::test]
async fn test_from_env() -> anyhow::Result<()> {
    init_logger();

    let send = RecordingHttpSend::new(StatusCode::OK, "{}");
    let ctx = Context::new()
        .with_http_send(send.clone())
        .with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (FIREBLOCKS_API_KEY.to_string(), API_KEY.to_string()),
                (FIREBLOCKS_SECRET_KEY.to_string(), PRIVATE_KEY.to_string()),
            ]),
        });

    let client = ApiClient::from_env(ctx).await?;
    assert_eq!(client.api_key(), API_KEY);
    client.get("/v1/vault/accounts").await?;
    assert_eq!(send.requests()[0].headers["x-api-key"], API_KEY);
    Ok(())
}

#[tokio::test]
async fn test_from_env_with_escaped_key() -> anyhow::Result<()> {
    init_logger();

    let escaped = PRIVATE_KEY.replace('\n', "\\n");
    let send = RecordingHttpSend::new(StatusCode::OK, "{}");
    let ctx = Context::new()
        .with_http_send(send.clone())
        .with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (FIREBLOCKS_API_KEY.to_string(), API_KEY.to_string()),
                (FIREBLOCKS_SECRET_KEY.to_string(), escaped),
            ]),
        });

    let client = ApiClient::from_env(ctx).await?;
    client.get("/v1/vault/accounts").await?;

    let reqs = send.requests();
    let auth = reqs[0].headers[http::header::AUTHORIZATION].to_str()?;
    let signer = TokenSigner::new(API_KEY, PRIVATE_KEY)?;
    let claims = Claims::verify(auth.trim_start_matches("Bearer "), signer.public_key())?;
    assert_eq!(claims.uri, "/v1/vault/accounts");
    Ok(())
}

#[tokio::test]
async fn test_from_env_with_key_path() -> anyhow::Result<()> {
    init_logger();

    let mut file = tempfile::NamedTempFile::new()?;
    std::io::Write::write_all(&mut file, PRIVATE_KEY.as_bytes())?;
    let send = RecordingHttpSend::new(StatusCode::OK, "{}");
    let ctx = Context::new()
        .with_http_send(send.clone())
        .with_file_read(TokioFileRead)
        .with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (FIREBLOCKS_API_KEY.to_string(), API_KEY.to_string()),
                (
                    FIREBLOCKS_SECRET_KEY_PATH.to_string(),
                    file.path().to_string_lossy().to_string(),
                ),
            ]),
        });

    let client = ApiClient::from_env(ctx).await?;
    client.get("/v1/vault/accounts").await?;
    assert_eq!(send.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_from_env_without_credential() {
    init_logger();

    let err = ApiClient::from_env(Context::new().with_env(StaticEnv::default()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[tokio::test]
async fn test_live_vault_accounts() -> anyhow::Result<()> {
    init_logger();
    let _ = dotenv::dotenv();

    if std::env::var("FIREBLOCKS_TEST").unwrap_or_default() != "on" {
        debug!("FIREBLOCKS_TEST is not set, skipped");
        return Ok(());
    }

    let client = ApiClient::from_env(fireblocks_sdk::default_context()?).await?;
    let accounts = client.get("/v1/vault/accounts").await?;
    debug!("vault accounts: {accounts}");
    assert!(accounts.is_array() || accounts.is_object());
    Ok(())
}
