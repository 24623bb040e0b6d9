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


use fireblocks_core::utils::Redact;
use fireblocks_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the API key and its private signing key.
#[derive(Default, Clone)]
pub struct Credential {
    /// API key identifier issued by Fireblocks.
    pub api_key: String,
    /// PEM encoded RSA private key registered for the API key.
    pub private_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(api_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            private_key: private_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &Redact::from(&self.api_key))
            .field("private_key", &Redact::from(&self.private_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.private_key.trim().is_empty()
    }
}
