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

//! S3 SigV4 request signer.
//!
//! Signs S3 requests either with an `Authorization` header or by building a
//! presigned url. Signing is pure computation: no network, no file access.
//!
//! ## Example
//!
//! ```
//! use http::{header, HeaderMap, HeaderValue, Method};
//! use s3sign_core::Context;
//! use s3sign_v4::{Credential, QueryParams, RequestSigner};
//!
//! # fn main() -> s3sign_core::Result<()> {
//! let signer = RequestSigner::new(
//!     Context::new(),
//!     Credential::new("access_key_id", "secret_access_key", "us-east-1"),
//! );
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(header::HOST, HeaderValue::from_static("localhost:9000"));
//! let signed = signer.sign_headers(
//!     &Method::PUT,
//!     "http://localhost:9000/bucket/key",
//!     &headers,
//!     b"Hello, World!",
//!     &QueryParams::new(),
//! )?;
//! assert!(signed.contains_key(header::AUTHORIZATION));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

/// Query parameters to sign, keys are unique.
pub type QueryParams = BTreeMap<String, String>;

pub mod canonical;

mod config;
pub use config::Config;

mod constants;

mod credential;
pub use credential::Credential;

mod key;
pub use key::derive_signing_key;

mod presign;
pub use presign::PresignOptions;
pub use presign::PresignedUrl;

pub mod probe;
pub use probe::classify_head_status;
pub use probe::Existence;

mod sign_request;
pub use sign_request::string_to_sign;
pub use sign_request::RequestSigner;
