//! Shared fixtures for generator integration tests.
//!
//! The two tables model a small embedded project: a serial debug port
//! selected through VALUE aliases, a const client name, a runtime log
//! level, and a TESTING option gating the reclassification.

use std::path::{Path, PathBuf};

use togglegen::pipeline::{GenerateRequest, Selection};

/// Path to the defaults table fixture.
pub fn defaults_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/defaults.tsv")
}

/// Path to the characterization table fixture.
pub fn characterizations_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/char_ids.tsv")
}

/// A request generating into `out`, with include/ and src/ subdirectories.
pub fn request(out: &Path, selection: Selection) -> GenerateRequest {
    GenerateRequest {
        defaults: defaults_path(),
        characterizations: characterizations_path(),
        include_dir: out.join("include"),
        source_dir: out.join("src"),
        selection,
    }
}
