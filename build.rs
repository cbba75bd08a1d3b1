// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

// Keep in sync with the libc target table in Cargo.toml
fn set_arc4random_cfg() {
    println!("cargo::rustc-check-cfg=cfg(has_arc4random)");
    let vendor = std::env::var("CARGO_CFG_TARGET_VENDOR").unwrap_or_default();
    let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if vendor == "apple" || matches!(os.as_str(), "freebsd" | "netbsd" | "openbsd" | "dragonfly") {
        println!("cargo:rustc-cfg=has_arc4random");
    }
}

fn main() {
    set_arc4random_cfg();
}
