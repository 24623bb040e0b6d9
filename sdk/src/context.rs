use crate::constants::DEFAULT_TIMEOUT_SECS;
use fireblocks_core::{Context, OsEnv, Result};
use fireblocks_file_read_tokio::TokioFileRead;
use fireblocks_http_send_reqwest::ReqwestHttpSend;
use std::time::Duration;

/// Build the context used in production: reqwest transport with a 30 second
/// timeout, tokio file reads and the process environment.
pub fn default_context() -> Result<Context> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| {
            fireblocks_core::Error::unexpected("failed to build http client").with_source(e)
        })?;

    Ok(Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::new(client))
        .with_env(OsEnv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_reads_process_env() {
        let ctx = default_context().expect("context must build");

        assert_eq!(ctx.env_var("FIREBLOCKS_SURELY_NOT_SET"), None);
        assert!(format!("{ctx:?}").contains("ReqwestHttpSend"));
    }
}
