use std::{env, fmt::Write, fs, path::PathBuf, process::Command};

use serde::Deserialize;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");

    let package = env::var("CARGO_PKG_NAME").unwrap();
    let suites = suite_crates(&package);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("generated.rs"), link_suites(&suites)).unwrap();
}

#[derive(Deserialize)]
struct Metadata {
    packages: Vec<MetadataPackage>,
}

#[derive(Deserialize)]
struct MetadataPackage {
    name: String,
    dependencies: Vec<MetadataDependency>,
}

#[derive(Deserialize)]
struct MetadataDependency {
    name: String,
    rename: Option<String>,
    path: Option<String>,
    // `null` for normal dependencies, "dev" or "build" otherwise
    kind: Option<String>,
    target: Option<String>,
}

/// Crate names (as seen from Rust code) of the unconditional local dependencies of `package`.
///
/// Crates that only register tests are never named by the runner, so nothing
/// would pull their objects (and their test records) into the link.
fn suite_crates(package: &str) -> Vec<String> {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let manifest = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap()).join("Cargo.toml");

    let output = Command::new(cargo)
        .args(["metadata", "--offline", "--no-deps", "--format-version", "1"])
        .arg("--manifest-path")
        .arg(&manifest)
        .output()
        .expect("Failed to run cargo metadata");

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).expect("Failed to parse cargo metadata");

    metadata
        .packages
        .into_iter()
        .find(|pkg| pkg.name == package)
        .expect("Current package not found")
        .dependencies
        .into_iter()
        .filter(|dep| dep.kind.is_none() && dep.path.is_some() && dep.target.is_none())
        .map(|dep| dep.rename.unwrap_or(dep.name).replace('-', "_"))
        .collect()
}

// see https://github.com/rust-lang/rust/issues/133491#issue-2694064193
fn link_suites(crates: &[String]) -> String {
    let mut source = String::from("#[doc(hidden)]\n#[rustfmt::skip]\nmod _linked_suites {\n");

    for name in crates {
        let _ = writeln!(source, "    extern crate {};", name);
    }

    source.push_str("}\n");
    source
}
