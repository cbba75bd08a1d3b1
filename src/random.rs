// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Platform random source selection.
//!
//! BSD-derived systems ship `arc4random`, which seeds itself from kernel
//! entropy and is safe to call from any thread. Everywhere else a small
//! linear generator is seeded once from the clock and the process id and
//! shared behind a mutex.
//!
//! Neither source is suitable for cryptographic use.

use std::sync::{Mutex, MutexGuard};

use once_cell::sync::OnceCell;
use rand::{rngs::SmallRng, RngCore, SeedableRng};
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    time::now_nanos,
};

pub trait RandomSource: Send + Sync {
    /// Draw one value, advancing the source.
    fn next_random(&self) -> u32;

    /// Fill `dest` with random bytes.
    ///
    /// The default takes the low byte of one draw per output byte.
    fn fill_bytes(&self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.next_random() as u8;
        }
    }
}

#[cfg(has_arc4random)]
mod arc4 {
    use super::RandomSource;

    /// `arc4random` backed source. Needs no seeding.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SelfSeedingSource;

    impl SelfSeedingSource {
        pub const fn seeded() -> Self {
            Self
        }
    }

    impl RandomSource for SelfSeedingSource {
        fn next_random(&self) -> u32 {
            // SAFETY: arc4random takes no arguments and can't fail
            unsafe { libc::arc4random() }
        }

        fn fill_bytes(&self, dest: &mut [u8]) {
            // SAFETY: dest is a valid, writable region of dest.len() bytes
            unsafe { libc::arc4random_buf(dest.as_mut_ptr().cast(), dest.len()) }
        }
    }
}

#[cfg(has_arc4random)]
pub use arc4::SelfSeedingSource;

/// Seed-once linear generator shared behind a lock.
#[derive(Debug)]
pub struct SeedableLinearSource {
    rng: Mutex<SmallRng>,
}

impl SeedableLinearSource {
    /// Seed from the wall clock mixed with the process id, so two processes
    /// started in the same instant don't share a sequence.
    pub fn seeded() -> Self {
        let seed = now_nanos() ^ (u64::from(std::process::id()) << 32);
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SmallRng> {
        // SmallRng has no invariant a panicking holder could break
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RandomSource for SeedableLinearSource {
    fn next_random(&self) -> u32 {
        self.lock().next_u32()
    }

    fn fill_bytes(&self, dest: &mut [u8]) {
        self.lock().fill_bytes(dest)
    }
}

#[cfg(all(has_arc4random, not(feature = "linear-rng")))]
mod platform {
    pub type PlatformSource = super::SelfSeedingSource;
    pub const SOURCE_NAME: &str = "arc4random";
}

#[cfg(not(all(has_arc4random, not(feature = "linear-rng"))))]
mod platform {
    pub type PlatformSource = super::SeedableLinearSource;
    pub const SOURCE_NAME: &str = "linear";
}

pub use platform::{PlatformSource, SOURCE_NAME};

static PLATFORM_SOURCE: OnceCell<PlatformSource> = OnceCell::new();

/// Install the process-wide random source. Calling it again does nothing.
pub fn seed() {
    install(&PLATFORM_SOURCE);
}

pub fn is_seeded() -> bool {
    PLATFORM_SOURCE.get().is_some()
}

/// The process-wide random source, if [`seed`] has run.
pub fn platform_source() -> Result<&'static PlatformSource> {
    installed(&PLATFORM_SOURCE)
}

/// One value from the process-wide random source.
///
/// # Panics
/// If [`seed`] has not been called.
pub fn next_random_byte_source() -> u32 {
    match platform_source() {
        Ok(source) => source.next_random(),
        Err(err) => panic!("{err}"),
    }
}

fn install(cell: &OnceCell<PlatformSource>) -> &PlatformSource {
    let mut created = false;
    let source = cell.get_or_init(|| {
        created = true;
        PlatformSource::seeded()
    });
    if created {
        debug!(source = SOURCE_NAME, "random source installed");
    } else {
        trace!("random source already installed");
    }
    source
}

fn installed(cell: &OnceCell<PlatformSource>) -> Result<&PlatformSource> {
    cell.get().ok_or(Error::NotSeeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(Mutex<u32>);

    impl RandomSource for Counter {
        fn next_random(&self) -> u32 {
            let mut n = self.0.lock().unwrap();
            *n += 0x101;
            *n
        }
    }

    #[test]
    fn test_default_fill_takes_low_byte() {
        let source = Counter(Mutex::new(0));
        let mut bytes = [0u8; 4];
        source.fill_bytes(&mut bytes);
        assert_eq!(bytes, [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_linear_source_is_reproducible() {
        let a = SeedableLinearSource::from_seed(42);
        let b = SeedableLinearSource::from_seed(42);
        let c = SeedableLinearSource::from_seed(43);

        let draws_a: Vec<u32> = (0..8).map(|_| a.next_random()).collect();
        let draws_b: Vec<u32> = (0..8).map(|_| b.next_random()).collect();
        let draws_c: Vec<u32> = (0..8).map(|_| c.next_random()).collect();

        assert_eq!(draws_a, draws_b);
        assert_ne!(draws_a, draws_c);
    }

    #[test]
    fn test_linear_source_fill_advances() {
        let source = SeedableLinearSource::from_seed(7);
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        source.fill_bytes(&mut first);
        source.fill_bytes(&mut second);
        assert_ne!(first, second);
    }

    #[test]
    fn test_linear_source_survives_poisoned_lock() {
        let source = std::sync::Arc::new(SeedableLinearSource::from_seed(1));
        let cloned = source.clone();
        let _ = std::thread::spawn(move || {
            let _guard = cloned.rng.lock().unwrap();
            panic!("poison");
        })
        .join();

        assert!(source.rng.is_poisoned());
        source.next_random();
    }

    #[test]
    fn test_installed_requires_install() {
        let cell = OnceCell::new();
        assert_eq!(installed(&cell).err(), Some(Error::NotSeeded));

        install(&cell);
        assert!(installed(&cell).is_ok());
    }

    #[test]
    fn test_install_is_idempotent() {
        let cell = OnceCell::new();
        let first: *const PlatformSource = install(&cell);
        let second: *const PlatformSource = install(&cell);
        assert_eq!(first, second);
    }

    #[cfg(has_arc4random)]
    #[test]
    fn test_self_seeding_fill_advances() {
        let source = SelfSeedingSource::seeded();
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        source.fill_bytes(&mut first);
        source.fill_bytes(&mut second);
        assert_ne!(first, second);
    }

    #[cfg(has_arc4random)]
    #[test]
    fn test_self_seeding_uuid() {
        use crate::uuid::{UuidBytes, UuidString};

        let uuid = UuidBytes::from_source(&SelfSeedingSource);
        assert_eq!(uuid.version(), 4);
        assert_eq!(uuid.variant_bits(), 0b10);

        let mut buf = UuidString::new();
        uuid.format_into(&mut buf);
        let s = buf.as_str();
        assert_eq!(s.len(), 36);
        assert_eq!(&s[14..15], "4");
        assert!(matches!(&s[19..20], "8" | "9" | "a" | "b"));
        assert!(s
            .bytes()
            .enumerate()
            .all(|(i, c)| matches!(i, 8 | 13 | 18 | 23) == (c == b'-')));
    }

    #[test]
    fn test_seed_then_draw() {
        seed();
        seed();
        assert!(is_seeded());
        let draws: Vec<u32> = (0..16).map(|_| next_random_byte_source()).collect();
        assert!(draws.windows(2).any(|pair| pair[0] != pair[1]));
    }
}
