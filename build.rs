//! Generates `tabular_insight.h` for the C ABI in `src/ffi.rs`.

use std::path::Path;

const HEADER: &str = "tabular_insight.h";

fn main() {
    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR must be set by Cargo");
    let config = cbindgen::Config::from_file(Path::new(&crate_dir).join("cbindgen.toml"))
        .unwrap_or_default();

    // A failed generation must not break `cargo build` for Rust-only users.
    let Ok(bindings) = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    else {
        println!("cargo:warning=cbindgen failed; {HEADER} not regenerated");
        return;
    };

    bindings.write_to_file(Path::new(&out_dir).join(HEADER));

    let include_dir = Path::new(&crate_dir).join("include");
    if std::fs::create_dir_all(&include_dir).is_ok() {
        bindings.write_to_file(include_dir.join(HEADER));
    }
}
