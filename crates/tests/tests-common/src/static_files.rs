//! Locate the files under `/static` used by tests.

use std::path::PathBuf;

/// Find the project root via the crate root provided by `cargo test`,
/// and get a file from the static directory.
/// This depends on the convention that all our crates live in `/crates/<group>/<name>`
/// or `/crates/<name>`, so we look upwards for the workspace `static` directory.
pub fn get_static_file(path: &str) -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .map(|dir| dir.join("static"))
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| manifest_dir.join("../../../static"))
        .join(path)
}

/// The directory holding the sample configuration.
pub fn get_static_configuration_dir() -> PathBuf {
    get_static_file("")
}
