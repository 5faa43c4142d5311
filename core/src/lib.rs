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

//! Core components for signing S3 requests.
//!
//! This crate provides the foundational types shared by the s3sign services.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the capabilities a signer reads from
//!   the outside world, namely the clock and the environment.
//! - **Error**: The single error type returned by every s3sign operation.
//!
//! ## Example
//!
//! ```
//! use s3sign_core::time::parse_rfc3339;
//! use s3sign_core::{Context, FixedClock, StaticEnv};
//! use std::collections::HashMap;
//!
//! # fn example() -> s3sign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_clock(FixedClock::new(parse_rfc3339("2024-06-15T12:00:00Z")?))
//!     .with_env(StaticEnv {
//!         envs: HashMap::from([("AWS_REGION".to_string(), "eu-west-1".to_string())]),
//!     });
//!
//! assert_eq!(ctx.env_var("AWS_REGION").as_deref(), Some("eu-west-1"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod clock;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
mod context;
pub use context::Context;
mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;
mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
