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

use crate::canonical::canonical_query_string;
use crate::constants::{DEFAULT_PRESIGN_EXPIRES_SECS, MAX_PRESIGN_EXPIRES_SECS};
use crate::QueryParams;
use s3sign_core::time::DateTime;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// A presigned url.
///
/// It carries everything the server needs to authenticate the request, so
/// whoever holds it can use it until it expires. The signer does not keep
/// track of issued urls, the server enforces expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    url: String,
    base_url: String,
    query: QueryParams,
    expires_in: Duration,
    issued_at: DateTime,
}

impl PresignedUrl {
    pub(crate) fn new(
        base_url: String,
        query: QueryParams,
        expires_in: Duration,
        issued_at: DateTime,
    ) -> Self {
        let url = format!("{base_url}?{}", canonical_query_string(&query));

        Self {
            url,
            base_url,
            query,
            expires_in,
            issued_at,
        }
    }

    /// The full url: `scheme://host/path?query`.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The url without query: `scheme://host/path`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All query parameters carried by the url, not percent encoded.
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// How long the url stays valid after [`issued_at`](Self::issued_at).
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// The signing time stamped into the url.
    pub fn issued_at(&self) -> DateTime {
        self.issued_at
    }

    /// Parse the url into a [`http::Uri`].
    pub fn to_uri(&self) -> s3sign_core::Result<http::Uri> {
        Ok(self.url.parse()?)
    }
}

impl Display for PresignedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

impl From<PresignedUrl> for String {
    fn from(v: PresignedUrl) -> Self {
        v.url
    }
}

/// Check that `expires_in` is a whole number of seconds in `1..=604800`.
pub(crate) fn validate_expires_in(expires_in: Duration) -> s3sign_core::Result<u64> {
    if expires_in.subsec_nanos() != 0 {
        return Err(s3sign_core::Error::request_invalid(format!(
            "presign expires_in must be whole seconds, got {expires_in:?}"
        )));
    }

    let secs = expires_in.as_secs();
    if secs == 0 {
        return Err(s3sign_core::Error::request_invalid(
            "presign expires_in must be at least one second",
        ));
    }
    if secs > MAX_PRESIGN_EXPIRES_SECS {
        return Err(s3sign_core::Error::request_invalid(format!(
            "presign expires_in must be at most {MAX_PRESIGN_EXPIRES_SECS} seconds, got {secs}"
        )));
    }

    Ok(secs)
}

/// Options for [`RequestSigner::presign`](crate::RequestSigner::presign).
///
/// ```
/// use s3sign_v4::PresignOptions;
/// use std::time::Duration;
///
/// let opts = PresignOptions::new()
///     .with_expires_in(Duration::from_secs(7200))
///     .with_response_header("content-type", "application/pdf")
///     .with_version_id("v1");
/// ```
#[derive(Debug, Clone)]
pub struct PresignOptions {
    expires_in: Duration,
    response_headers: Vec<(String, String)>,
    version_id: Option<String>,
    query: Vec<(String, String)>,
    request_date: Option<DateTime>,
}

impl Default for PresignOptions {
    fn default() -> Self {
        Self {
            expires_in: Duration::from_secs(DEFAULT_PRESIGN_EXPIRES_SECS),
            response_headers: Vec::new(),
            version_id: None,
            query: Vec::new(),
            request_date: None,
        }
    }
}

impl PresignOptions {
    /// Create options that expire after one hour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long the url stays valid.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Override a response header, for example `content-type` becomes
    /// `response-content-type`.
    pub fn with_response_header(mut self, name: &str, value: &str) -> Self {
        self.response_headers
            .push((name.to_string(), value.to_string()));
        self
    }

    /// Target a specific object version.
    pub fn with_version_id(mut self, version_id: &str) -> Self {
        self.version_id = Some(version_id.to_string());
        self
    }

    /// Add an extra query parameter.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Sign as if the current time were `date`.
    ///
    /// Urls signed with the same date and inputs are byte-identical.
    pub fn with_request_date(mut self, date: DateTime) -> Self {
        self.request_date = Some(date);
        self
    }

    pub(crate) fn expires_in(&self) -> Duration {
        self.expires_in
    }

    pub(crate) fn request_date(&self) -> Option<DateTime> {
        self.request_date
    }

    /// Flatten all options into query parameters.
    ///
    /// Returns an error if two options produce the same key.
    pub(crate) fn to_query(&self) -> s3sign_core::Result<QueryParams> {
        let headers = self.response_headers.iter().map(|(name, value)| {
            (
                format!("response-{}", name.trim().to_ascii_lowercase()),
                value.clone(),
            )
        });
        let version = self
            .version_id
            .iter()
            .map(|v| ("versionId".to_string(), v.clone()));

        let mut query = QueryParams::new();
        for (k, v) in headers.chain(version).chain(self.query.iter().cloned()) {
            if query.contains_key(&k) {
                return Err(s3sign_core::Error::request_invalid(format!(
                    "query parameter {k} is given more than once"
                )));
            }
            query.insert(k, v);
        }

        Ok(query)
    }
}
