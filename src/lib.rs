// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Non-cryptographic UUIDv4 generation.
//!
//! ```
//! use llrt_uuid::{generate_uuidv4, seed, UuidString};
//!
//! seed();
//! let mut buf = UuidString::new();
//! generate_uuidv4(&mut buf);
//! assert_eq!(&buf.as_str()[14..15], "4");
//! ```
pub mod error;
pub mod random;
pub mod time;
pub mod uuid;

pub use crate::{
    error::Error,
    random::{next_random_byte_source, seed, PlatformSource, RandomSource, SeedableLinearSource},
    uuid::{
        generate_uuidv4, generate_uuidv4_with, try_generate_uuidv4, UuidBytes, UuidGenerator,
        UuidString, UUID_STR_RFC4122_LEN,
    },
};

#[cfg(has_arc4random)]
pub use crate::random::SelfSeedingSource;
