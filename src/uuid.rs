// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0
use std::{ffi::CStr, fmt};

use crate::{
    error::Result,
    random::{platform_source, PlatformSource, RandomSource},
};

/// Size of a UUID string representation plus the NUL byte.
pub const UUID_STR_RFC4122_LEN: usize = 37;

const UUID_STR_LEN: usize = UUID_STR_RFC4122_LEN - 1;

static HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

// Output offsets of the 32 hex digits, skipping the hyphens
static HEX_POS: [usize; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 9, 10, 11, 12, 14, 15, 16, 17, 19, 20, 21, 22, 24, 25, 26, 27, 28, 29,
    30, 31, 32, 33, 34, 35,
];

static HYPHEN_POS: [usize; 4] = [8, 13, 18, 23];

/// The 16 raw octets of a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UuidBytes([u8; 16]);

impl UuidBytes {
    /// Draw 16 bytes from `source` and apply the v4 fixups.
    pub fn from_source<S: RandomSource + ?Sized>(source: &S) -> Self {
        let mut bytes = [0u8; 16];
        source.fill_bytes(&mut bytes);
        let mut uuid = Self(bytes);
        uuid.set_version_and_variant();
        uuid
    }

    /// Wrap raw octets as they are, without fixups.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Version 4 in the high nibble of time_hi_and_version, RFC 4122 variant
    /// (`10`) in the top bits of clock_seq_hi_and_reserved.
    pub fn set_version_and_variant(&mut self) {
        self.0[6] = (self.0[6] & 0x0f) | 0x40;
        self.0[8] = (self.0[8] & 0x3f) | 0x80;
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub const fn version(&self) -> u8 {
        self.0[6] >> 4
    }

    pub const fn variant_bits(&self) -> u8 {
        self.0[8] >> 6
    }

    /// Render as the canonical 8-4-4-4-12 lowercase form into `buf`.
    pub fn format_into(&self, buf: &mut UuidString) {
        let out = &mut buf.0;

        for (i, &byte) in self.0.iter().enumerate() {
            out[HEX_POS[i * 2]] = HEX_CHARS[(byte >> 4) as usize];
            out[HEX_POS[i * 2 + 1]] = HEX_CHARS[(byte & 0x0f) as usize];
        }
        for pos in HYPHEN_POS {
            out[pos] = b'-';
        }
        out[UUID_STR_LEN] = 0;
    }
}

/// NUL terminated canonical UUID text in a fixed 37 byte buffer.
///
/// Only ever holds ASCII, and byte 36 is always NUL.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UuidString([u8; UUID_STR_RFC4122_LEN]);

impl UuidString {
    pub const fn new() -> Self {
        Self([0; UUID_STR_RFC4122_LEN])
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: the buffer only contains ASCII, either zeroes from new() or
        // hex digits and hyphens written by format_into
        unsafe { std::str::from_utf8_unchecked(&self.0[..UUID_STR_LEN]) }
    }

    pub const fn as_bytes_with_nul(&self) -> &[u8; UUID_STR_RFC4122_LEN] {
        &self.0
    }

    /// The text up to the first NUL. Empty for a buffer nothing was written to.
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(&self.0).unwrap_or_default()
    }
}

impl Default for UuidString {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for UuidString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UuidString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for UuidString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UuidString").field(&self.as_str()).finish()
    }
}

/// Generate a UUIDv4 from `source` into `buf`.
pub fn generate_uuidv4_with<S: RandomSource + ?Sized>(source: &S, buf: &mut UuidString) {
    UuidBytes::from_source(source).format_into(buf);
}

/// Generate a UUIDv4 from the process-wide source into `buf`.
///
/// # Panics
/// If [`crate::seed`] has not been called.
pub fn generate_uuidv4(buf: &mut UuidString) {
    if let Err(err) = try_generate_uuidv4(buf) {
        panic!("{err}");
    }
}

pub fn try_generate_uuidv4(buf: &mut UuidString) -> Result<()> {
    let source = platform_source()?;
    generate_uuidv4_with(source, buf);
    Ok(())
}

/// Owns a random source and generates UUIDs from it.
#[derive(Debug)]
pub struct UuidGenerator<S = PlatformSource> {
    source: S,
}

impl UuidGenerator<PlatformSource> {
    /// A generator with its own freshly seeded platform source.
    pub fn new() -> Self {
        Self::with_source(PlatformSource::seeded())
    }
}

impl Default for UuidGenerator<PlatformSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RandomSource> UuidGenerator<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    pub fn generate(&self, buf: &mut UuidString) {
        generate_uuidv4_with(&self.source, buf);
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
