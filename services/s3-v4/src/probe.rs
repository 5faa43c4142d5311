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

//! Classify the response of a signed `HEAD` request.

use http::StatusCode;

/// Whether the probed object exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    /// The server answered with a success status.
    Present,
    /// The server answered `404 Not Found`.
    Absent,
}

/// Map the status of a `HEAD` response to [`Existence`].
///
/// Only `404` means absent. A denied request is reported as
/// [`ErrorKind::CredentialDenied`](s3sign_core::ErrorKind::CredentialDenied)
/// so a bad signature is never mistaken for a missing object.
pub fn classify_head_status(status: StatusCode) -> s3sign_core::Result<Existence> {
    match status {
        v if v.is_success() => Ok(Existence::Present),
        StatusCode::NOT_FOUND => Ok(Existence::Absent),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
            s3sign_core::Error::credential_denied(format!("head request is denied: {status}")),
        ),
        v => Err(s3sign_core::Error::unexpected(format!(
            "head request got unexpected status: {v}"
        ))),
    }
}
