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

use crate::constants::{AWS4_REQUEST, DEFAULT_REGION, DEFAULT_SERVICE};
use crate::Config;
use s3sign_core::time::{format_date, DateTime};
use s3sign_core::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key, secret key and the scope they sign for.
///
/// Fields are private: once built a credential never changes, and the secret
/// is only ever fed into the key derivation chain.
#[derive(Clone)]
pub struct Credential {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    service: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

impl Credential {
    /// Create a credential for the `s3` service in `region`.
    pub fn new(access_key_id: &str, secret_access_key: &str, region: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            region: region.to_string(),
            service: DEFAULT_SERVICE.to_string(),
        }
    }

    /// Sign for another service than `s3`.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = service.to_string();
        self
    }

    /// Access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Region this credential signs for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Service this credential signs for.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub(crate) fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Credential scope: `20130524/us-east-1/s3/aws4_request`
    pub fn scope(&self, time: DateTime) -> String {
        format!(
            "{}/{}/{}/{AWS4_REQUEST}",
            format_date(time),
            self.region,
            self.service
        )
    }
}

impl TryFrom<Config> for Credential {
    type Error = s3sign_core::Error;

    fn try_from(cfg: Config) -> s3sign_core::Result<Self> {
        let access_key_id = cfg
            .access_key_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| s3sign_core::Error::config_invalid("access_key_id is required"))?;
        let secret_access_key = cfg
            .secret_access_key
            .filter(|v| !v.is_empty())
            .ok_or_else(|| s3sign_core::Error::config_invalid("secret_access_key is required"))?;

        let cred = Credential::new(
            &access_key_id,
            &secret_access_key,
            cfg.region.as_deref().unwrap_or(DEFAULT_REGION),
        );
        Ok(match cfg.service.as_deref() {
            Some(service) => cred.with_service(service),
            None => cred,
        })
    }
}
