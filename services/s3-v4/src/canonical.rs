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

//! Canonical forms hashed by SigV4.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::AWS_URI_ENCODE_SET;
use crate::QueryParams;
use http::HeaderMap;
use http::Method;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use s3sign_core::hash::hex_sha256;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Build the canonical URI from a request path.
///
/// Every segment is decoded and then encoded on its own, so the separating
/// `/` survive untouched and an already encoded path is not encoded twice.
/// Empty segments, including a trailing one, are kept.
pub fn canonical_uri(path: &str) -> s3sign_core::Result<String> {
    if path.is_empty() {
        return Ok("/".to_string());
    }

    let mut s = String::with_capacity(path.len());
    for (idx, segment) in path.split('/').enumerate() {
        if idx != 0 {
            s.push('/');
        }

        let decoded = percent_decode_str(segment).decode_utf8()?;
        s.extend(utf8_percent_encode(&decoded, &AWS_URI_ENCODE_SET));
    }

    Ok(s)
}

/// Build the canonical query string.
///
/// Keys and values are encoded first, then sorted by encoded key. Spaces
/// always become `%20`.
///
/// ```shell
/// {"b": "2", "a": "1"} => "a=1&b=2"
/// ```
pub fn canonical_query_string(query: &QueryParams) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_URI_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_URI_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();

    let mut s = String::with_capacity(16);
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }

        s.push_str(&k);
        s.push('=');
        s.push_str(&v);
    }

    s
}

/// Normalize header value.
///
/// Leading and trailing whitespace is removed and every inner run of spaces
/// or tabs is collapsed into a single space.
pub fn header_value_normalize(v: &str) -> String {
    let mut s = String::with_capacity(v.len());
    for (idx, word) in v
        .split([' ', '\t'])
        .filter(|word| !word.is_empty())
        .enumerate()
    {
        if idx != 0 {
            s.push(' ');
        }
        s.push_str(word);
    }

    s
}

/// Build the canonical headers block and the signed headers list.
///
/// Names are lower-cased and sorted. Values of headers that appear more than
/// once are joined with `,` in the order they were given. The returned block
/// already ends with a newline:
///
/// ```shell
/// [("Host", " x "), ("X-Amz-Date", "20130524T000000Z")]
///   => ("host:x\nx-amz-date:20130524T000000Z\n", "host;x-amz-date")
/// ```
pub fn canonical_headers<'a>(
    headers: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> (String, String) {
    let mut normalized: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        normalized
            .entry(name.trim().to_ascii_lowercase())
            .or_default()
            .push(header_value_normalize(value));
    }

    let mut canonical = String::with_capacity(256);
    for (name, values) in normalized.iter() {
        canonical.push_str(name);
        canonical.push(':');
        canonical.push_str(&values.join(","));
        canonical.push('\n');
    }

    let signed = normalized.keys().map(String::as_str).collect::<Vec<_>>();

    (canonical, signed.join(";"))
}

/// Borrow all headers as `(name, value)` pairs.
///
/// Returns an error if any value is not visible ASCII.
pub fn header_pairs(headers: &HeaderMap) -> s3sign_core::Result<Vec<(&str, &str)>> {
    headers
        .iter()
        .map(|(k, v)| Ok((k.as_str(), v.to_str()?)))
        .collect()
}

/// Hex encoded SHA256 of the request body.
///
/// Bytes and text bodies hash the same: `payload_hash(b"")` and
/// `payload_hash("")` are both `e3b0c442...b855`.
pub fn payload_hash(body: impl AsRef<[u8]>) -> String {
    hex_sha256(body.as_ref())
}

/// Join the six canonical request fields.
///
/// ```shell
/// GET
/// /test.txt
///
/// host:examplebucket.s3.amazonaws.com
/// x-amz-date:20130524T000000Z
///
/// host;x-amz-date
/// UNSIGNED-PAYLOAD
/// ```
pub fn canonical_request(
    method: &Method,
    canonical_uri: &str,
    canonical_query: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> s3sign_core::Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", method.as_str().to_ascii_uppercase())?;
    writeln!(f, "{canonical_uri}")?;
    writeln!(f, "{canonical_query}")?;
    // The headers block ends with its own newline.
    writeln!(f, "{canonical_headers}")?;
    writeln!(f, "{signed_headers}")?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}
