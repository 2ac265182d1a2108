//! Build script for the cosbind native artifacts.
//!
//! The single translation unit `native/cos_func.c` is compiled twice: into a
//! static archive that is link-edited into the crate (the extension binding),
//! and into a shared library that the dynamic binding loads at process
//! runtime. The shared library lands in `OUT_DIR` and is mirrored at `lib/`
//! so the default relative load path works from the package root.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const NATIVE_SOURCE: &str = "native/cos_func.c";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", NATIVE_SOURCE);

    // Static archive for the extension binding.
    cc::Build::new()
        .file(NATIVE_SOURCE)
        .opt_level(2)
        .compile("cos_func");

    // The archive calls into the platform math library.
    if env::var("CARGO_CFG_UNIX").is_ok() {
        println!("cargo:rustc-link-lib=m");
    }

    // Shared library for the dynamic binding.
    let lib_path = build_shared_library();
    println!("cargo:rustc-env=COS_SHARED_LIBRARY={}", lib_path.display());

    mirror_default_layout(&lib_path);
}

/// Compile the translation unit into a shared library under `OUT_DIR`.
///
/// A failed compile or link is fatal to the build.
fn build_shared_library() -> PathBuf {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let lib_path = out_dir.join(shared_library_name());

    let cc = env::var("CC").unwrap_or_else(|_| "cc".to_string());
    let status = Command::new(&cc)
        .args(["-shared", "-fPIC", "-O2", "-o"])
        .arg(&lib_path)
        .arg(NATIVE_SOURCE)
        .arg("-lm")
        .status();

    match status {
        Ok(s) if s.success() => lib_path,
        Ok(s) => panic!(
            "{} exited with {} while building {}",
            cc,
            s,
            lib_path.display()
        ),
        Err(e) => panic!("failed to run {}: {}", cc, e),
    }
}

/// Mirror the shared library at `lib/`, the relative path the dynamic
/// binding loads by default when no explicit path is given.
fn mirror_default_layout(lib_path: &Path) {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let lib_dir = manifest_dir.join("lib");

    let mirrored = fs::create_dir_all(&lib_dir)
        .and_then(|_| fs::copy(lib_path, lib_dir.join(shared_library_name())));
    if let Err(e) = mirrored {
        println!("cargo:warning=could not mirror shared library into lib/: {}", e);
    }
}

fn shared_library_name() -> &'static str {
    match env::var("CARGO_CFG_TARGET_OS").as_deref() {
        Ok("windows") => "cos.dll",
        _ => "libcos.so",
    }
}
