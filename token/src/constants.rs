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

use http::HeaderName;

/// Header carrying the API key identifier in cleartext.
pub const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Seconds between `iat` and `exp` of every token.
pub const TOKEN_TTL_SECS: u64 = 55;

/// Body hashed when a request carries no body.
pub const EMPTY_BODY: &[u8] = b"{}";

// Env values used to load credentials.
/// Env holding the API key identifier.
pub const FIREBLOCKS_API_KEY: &str = "FIREBLOCKS_API_KEY";
/// Env holding the PEM encoded private key, real or escaped `\n` line breaks.
pub const FIREBLOCKS_SECRET_KEY: &str = "FIREBLOCKS_SECRET_KEY";
/// Env holding the path to a PEM file, read when `FIREBLOCKS_SECRET_KEY` is unset.
pub const FIREBLOCKS_SECRET_KEY_PATH: &str = "FIREBLOCKS_SECRET_KEY_PATH";
