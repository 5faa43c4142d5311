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

use crate::canonical::{
    canonical_headers, canonical_query_string, canonical_request, canonical_uri, header_pairs,
    payload_hash,
};
use crate::constants::*;
use crate::key::derive_signing_key;
use crate::presign::validate_expires_in;
use crate::{Credential, PresignOptions, PresignedUrl, QueryParams};
use http::request::Parts;
use http::uri::{Authority, Scheme};
use http::{header, HeaderMap, HeaderValue, Method, Uri};
use log::debug;
use s3sign_core::hash::{hex_hmac_sha256, hex_sha256};
use s3sign_core::time::{format_date, format_iso8601, DateTime};
use s3sign_core::Context;
use std::fmt::Write;
use std::time::Duration;

/// RequestSigner that implements AWS SigV4 for S3.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-authenticating-requests.html)
///
/// The signer only reads its credential and the context clock, so one
/// instance can be shared by many threads without locking.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    ctx: Context,
    credential: Credential,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new(ctx: Context, credential: Credential) -> Self {
        Self { ctx, credential }
    }

    /// The credential used by this signer.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Sign a request with the `Authorization` header.
    ///
    /// `headers` must contain `host`. Query parameters already in `url` are
    /// signed together with `query`; a key present in both is rejected.
    ///
    /// Returns a copy of `headers` with `x-amz-date`, `x-amz-content-sha256`
    /// and `authorization` set.
    pub fn sign_headers(
        &self,
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        body: impl AsRef<[u8]>,
        query: &QueryParams,
    ) -> s3sign_core::Result<HeaderMap> {
        let now = self.ctx.now();
        let target = SigningUrl::parse(url)?;

        if !headers.contains_key(header::HOST) {
            return Err(s3sign_core::Error::request_invalid(
                "request without host header is invalid for signing",
            ));
        }

        let mut signed = headers.clone();
        // A stale signature must not be signed into the new one.
        signed.remove(header::AUTHORIZATION);

        // Both headers must be in place before canonicalization, the server
        // recomputes the signature over them.
        let payload_hash = payload_hash(body);
        signed.insert(X_AMZ_DATE, HeaderValue::from_str(&format_iso8601(now))?);
        signed.insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&payload_hash)?);

        let query = merge_query(target.query, query)?;
        let (canonical_headers, signed_headers) = canonical_headers(header_pairs(&signed)?);
        let creq = canonical_request(
            method,
            &canonical_uri(&target.path)?,
            &canonical_query_string(&query),
            &canonical_headers,
            &signed_headers,
            &payload_hash,
        )?;

        let scope = self.credential.scope(now);
        let signature = self.calculate_signature(now, &scope, &creq)?;

        let mut authorization = HeaderValue::from_str(&format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.credential.access_key_id(),
            scope,
            signed_headers,
            signature
        ))?;
        authorization.set_sensitive(true);
        signed.insert(header::AUTHORIZATION, authorization);

        Ok(signed)
    }

    /// Sign `http::request::Parts` in place.
    ///
    /// The `host` header is filled from the uri authority when missing, and
    /// the query parameters are taken from the uri.
    pub fn sign_request(
        &self,
        parts: &mut Parts,
        body: impl AsRef<[u8]>,
    ) -> s3sign_core::Result<()> {
        let mut headers = parts.headers.clone();
        if !headers.contains_key(header::HOST) {
            let authority = parts.uri.authority().ok_or_else(|| {
                s3sign_core::Error::request_invalid(
                    "request without authority is invalid for signing",
                )
            })?;
            headers.insert(header::HOST, HeaderValue::from_str(&host_of(authority))?);
        }

        parts.headers = self.sign_headers(
            &parts.method,
            &parts.uri.to_string(),
            &headers,
            body,
            &QueryParams::new(),
        )?;
        Ok(())
    }

    /// Build a presigned url.
    ///
    /// Only `host` is signed and the payload is `UNSIGNED-PAYLOAD`. When
    /// `request_date` is `None` the context clock is used.
    pub fn presign_url(
        &self,
        method: &Method,
        url: &str,
        expires_in: Duration,
        query: &QueryParams,
        request_date: Option<DateTime>,
    ) -> s3sign_core::Result<PresignedUrl> {
        let expires = validate_expires_in(expires_in)?;
        let now = request_date.unwrap_or_else(|| self.ctx.now());
        let target = SigningUrl::parse(url)?;

        let mut query = merge_query(target.query, query)?;
        if let Some(k) = query
            .keys()
            .find(|k| PRESIGN_RESERVED_KEYS.iter().any(|r| r.eq_ignore_ascii_case(k)))
        {
            return Err(s3sign_core::Error::request_invalid(format!(
                "query parameter {k} is reserved for presigning"
            )));
        }

        let scope = self.credential.scope(now);
        query.insert(X_AMZ_ALGORITHM.to_string(), ALGORITHM.to_string());
        query.insert(
            X_AMZ_CREDENTIAL.to_string(),
            format!("{}/{}", self.credential.access_key_id(), scope),
        );
        query.insert(X_AMZ_DATE_QUERY.to_string(), format_iso8601(now));
        query.insert(X_AMZ_EXPIRES.to_string(), expires.to_string());
        query.insert(X_AMZ_SIGNED_HEADERS.to_string(), "host".to_string());

        let host = host_of(&target.authority);
        let (canonical_headers, signed_headers) = canonical_headers([("host", host.as_str())]);
        let path = canonical_uri(&target.path)?;
        let creq = canonical_request(
            method,
            &path,
            &canonical_query_string(&query),
            &canonical_headers,
            &signed_headers,
            UNSIGNED_PAYLOAD,
        )?;

        let signature = self.calculate_signature(now, &scope, &creq)?;
        query.insert(X_AMZ_SIGNATURE.to_string(), signature);

        Ok(PresignedUrl::new(
            format!("{}://{host}{path}", target.scheme),
            query,
            Duration::from_secs(expires),
            now,
        ))
    }

    /// Build a presigned url from [`PresignOptions`].
    pub fn presign(
        &self,
        method: &Method,
        url: &str,
        opts: &PresignOptions,
    ) -> s3sign_core::Result<PresignedUrl> {
        self.presign_url(
            method,
            url,
            opts.expires_in(),
            &opts.to_query()?,
            opts.request_date(),
        )
    }

    fn calculate_signature(
        &self,
        now: DateTime,
        scope: &str,
        creq: &str,
    ) -> s3sign_core::Result<String> {
        debug!("calculated canonical request: {creq}");
        debug!("calculated scope: {scope}");

        let string_to_sign =
            string_to_sign(&format_iso8601(now), scope, &hex_sha256(creq.as_bytes()))?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = derive_signing_key(
            self.credential.secret_access_key(),
            &format_date(now),
            self.credential.region(),
            self.credential.service(),
        );
        Ok(hex_hmac_sha256(&signing_key, string_to_sign.as_bytes()))
    }
}

/// Build the string to sign.
///
/// ```shell
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(
    amz_date: &str,
    scope: &str,
    canonical_request_hash: &str,
) -> s3sign_core::Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{ALGORITHM}")?;
    writeln!(f, "{amz_date}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{canonical_request_hash}")?;

    Ok(f)
}

/// The parts of a target url that take part in signing.
struct SigningUrl {
    scheme: Scheme,
    authority: Authority,
    path: String,
    query: Vec<(String, String)>,
}

impl SigningUrl {
    fn parse(url: &str) -> s3sign_core::Result<Self> {
        let uri: Uri = url.parse()?;
        let parts = uri.into_parts();

        let scheme = parts.scheme.ok_or_else(|| {
            s3sign_core::Error::request_invalid(format!("url {url} has no scheme"))
        })?;
        let authority = parts.authority.ok_or_else(|| {
            s3sign_core::Error::request_invalid(format!("url {url} has no host"))
        })?;
        let (path, query) = match parts.path_and_query {
            Some(paq) => (
                paq.path().to_string(),
                paq.query()
                    .map(|v| {
                        form_urlencoded::parse(v.as_bytes())
                            .map(|(k, v)| (k.into_owned(), v.into_owned()))
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            None => ("/".to_string(), Vec::new()),
        };

        Ok(Self {
            scheme,
            authority,
            path,
            query,
        })
    }
}

/// Merge url query pairs with caller supplied parameters.
///
/// Keys must be unique across both.
fn merge_query(
    url_query: Vec<(String, String)>,
    query: &QueryParams,
) -> s3sign_core::Result<QueryParams> {
    let mut merged = query.clone();
    for (k, v) in url_query {
        if merged.contains_key(&k) {
            return Err(s3sign_core::Error::request_invalid(format!(
                "query parameter {k} is given more than once"
            )));
        }
        merged.insert(k, v);
    }

    Ok(merged)
}

/// Host header value for `authority`, without any userinfo.
fn host_of(authority: &Authority) -> String {
    match authority.port_u16() {
        Some(port) => format!("{}:{port}", authority.host()),
        None => authority.host().to_string(),
    }
}
