// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

// Nothing in this binary calls seed(), so the process-wide source stays empty.

use llrt_uuid::{
    generate_uuidv4, next_random_byte_source, random, try_generate_uuidv4, Error, UuidString,
};

#[test]
fn test_try_generate_without_seed() {
    let mut buf = UuidString::new();
    assert_eq!(try_generate_uuidv4(&mut buf), Err(Error::NotSeeded));
    assert_eq!(buf.as_bytes_with_nul(), &[0; 37]);
    assert!(!random::is_seeded());
    assert_eq!(random::platform_source().err(), Some(Error::NotSeeded));
}

#[test]
#[should_panic(expected = "before seed")]
fn test_generate_without_seed_panics() {
    let mut buf = UuidString::new();
    generate_uuidv4(&mut buf);
}

#[test]
#[should_panic(expected = "before seed")]
fn test_draw_without_seed_panics() {
    next_random_byte_source();
}
