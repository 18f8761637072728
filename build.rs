//! Build script for the receiver firmware
//!
//! Handles:
//! - Staging the SSB patch blob into `OUT_DIR`
//!
//! The patch is distributed separately. Point `SSB_PATCH` at the file to
//! embed it; without it an empty blob is staged and SSB modes stay silent.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SSB_PATCH");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let staged = out_dir.join("ssb_patch.bin");

    match std::env::var("SSB_PATCH") {
        Ok(path) => {
            println!("cargo:rerun-if-changed={path}");
            std::fs::copy(&path, &staged).unwrap();
        }
        Err(_) => {
            println!("cargo:warning=SSB_PATCH not set, building without the SSB patch");
            std::fs::write(&staged, b"").unwrap();
        }
    }
}
