// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{constants::*, read_private_key, Credential};
use async_trait::async_trait;
use fireblocks_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads Fireblocks credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `FIREBLOCKS_API_KEY`: The API key identifier
/// - `FIREBLOCKS_SECRET_KEY`: The PEM encoded RSA private key
/// - `FIREBLOCKS_SECRET_KEY_PATH`: Path to a PEM file, used when
///   `FIREBLOCKS_SECRET_KEY` is not set
///
/// `FIREBLOCKS_SECRET_KEY` is taken verbatim. [`TokenSigner`](crate::TokenSigner)
/// also accepts a single line key with literal `\n` sequences.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }

    async fn load_private_key(&self, ctx: &Context) -> Result<Option<String>> {
        if let Some(pem) = ctx.env_var(FIREBLOCKS_SECRET_KEY) {
            return Ok(Some(pem));
        }

        match ctx.env_var(FIREBLOCKS_SECRET_KEY_PATH) {
            Some(path) => Ok(Some(read_private_key(ctx, &path).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(api_key) = ctx.env_var(FIREBLOCKS_API_KEY) else {
            return Ok(None);
        };

        match self.load_private_key(ctx).await? {
            Some(private_key) => Ok(Some(Credential::new(api_key, private_key))),
            None => Ok(None),
        }
    }
}
