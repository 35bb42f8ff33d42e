use std::error::Error;
use std::path::Path;
use vergen::{Emitter, RustcBuilder};

#[path = "src/lockfile.rs"]
mod lockfile;

use lockfile::Lockfile;

/// Runtime dependencies whose locked versions are reported by `--version`.
const REPORTED_CRATES: &[(&str, &str)] = &[
    ("clap", "INTEGRON_CLAP_VERSION"),
    ("flate2", "INTEGRON_FLATE2_VERSION"),
    ("which", "INTEGRON_WHICH_VERSION"),
    ("env_logger", "INTEGRON_ENV_LOGGER_VERSION"),
];

fn emit_dependency_versions() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let lock_path = Path::new(&manifest_dir).join("Cargo.lock");
    println!("cargo:rerun-if-changed={}", lock_path.display());
    let lock = std::fs::read_to_string(&lock_path)
        .ok()
        .and_then(|text| Lockfile::parse(&text).ok());
    for (name, var) in REPORTED_CRATES {
        let version = lock
            .as_ref()
            .and_then(|l| l.version_of(name))
            .unwrap_or("unknown");
        println!("cargo:rustc-env={var}={version}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // VERGEN_RUSTC_SEMVER
    Emitter::default()
        .add_instructions(&RustcBuilder::default().semver(true).build()?)?
        .emit()?;

    emit_dependency_versions();
    Ok(())
}
