//! Generation pipeline: load, resolve, validate, render, write.
//!
//! The pipeline is a pure function of the two input tables plus the
//! selection. Every artifact is rendered in memory before the first byte
//! is written, so a failing run leaves the output directories untouched
//! and a repeated run with unchanged inputs produces byte-identical
//! files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use togglegen_tables::{Table, TableError};

use crate::catalog::{CatalogError, OptionCatalog};
use crate::check::{self, CheckError};
use crate::emit;
use crate::resolve::{
    resolve, Characterization, ResolveError, ResolvedCharacterization, TESTING_OPTION,
    TEST_CHAR_ID,
};

/// Which characterizations get per-characterization artifacts.
#[derive(Debug, Clone, Default)]
pub enum Selection {
    /// All characterizations, the synthesized test variant included.
    #[default]
    All,
    /// A single characterization. The master pair still spans the full
    /// list so CHAR_ID numbering stays stable across selections.
    One(String),
}

/// Inputs of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub defaults: PathBuf,
    pub characterizations: PathBuf,
    pub include_dir: PathBuf,
    pub source_dir: PathBuf,
    pub selection: Selection,
}

/// Pipeline errors. Every variant is fatal: generation either fully
/// succeeds or writes nothing.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("defaults table: {0}")]
    Defaults(#[source] TableError),

    #[error("characterization table: {0}")]
    Characterizations(#[source] TableError),

    #[error("defaults table: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl GenerateError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::Defaults(TableError::Io(_))
            | GenerateError::Characterizations(TableError::Io(_)) => 74,
            GenerateError::Defaults(_) | GenerateError::Characterizations(_) => 65,
            GenerateError::Catalog(CatalogError::Table(_)) => 65,
            GenerateError::Catalog(_) => 66,
            GenerateError::Resolve(ResolveError::Table(_)) => 65,
            GenerateError::Resolve(_) => 67,
            GenerateError::Check(_) => 68,
            GenerateError::Write { .. } => 74,
        }
    }
}

/// One rendered artifact, not yet written.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// Digest report for one generated file.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub path: String,
    pub bytes: usize,
    pub sha256: String,
}

/// Report of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub characterizations: Vec<String>,
    pub files: Vec<GeneratedFile>,
}

/// The fully resolved model: catalog plus every characterization
/// (synthesized test variant included), resolved against it.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    pub catalog: OptionCatalog,
    pub characterizations: Vec<Characterization>,
    pub resolved: Vec<ResolvedCharacterization>,
}

/// Load both table files and resolve everything.
pub fn load_project(
    defaults: &Path,
    characterizations: &Path,
) -> Result<ResolvedProject, GenerateError> {
    let defaults_table = Table::from_file(defaults).map_err(GenerateError::Defaults)?;
    let characterization_table =
        Table::from_file(characterizations).map_err(GenerateError::Characterizations)?;
    resolve_project(&defaults_table, &characterization_table)
}

/// Resolve already-parsed tables.
///
/// When the defaults table defines the TESTING option and the
/// characterization table has no explicit test variant, one is
/// synthesized so a test artifact set always exists.
pub fn resolve_project(
    defaults: &Table,
    characterization_table: &Table,
) -> Result<ResolvedProject, GenerateError> {
    let catalog = OptionCatalog::from_table(defaults)?;
    let mut characterizations = Characterization::from_table(characterization_table, &catalog)?;

    if catalog.contains(TESTING_OPTION)
        && !characterizations.iter().any(|ch| ch.char_id == TEST_CHAR_ID)
    {
        characterizations.push(Characterization::synthetic_test());
    }

    let resolved = characterizations
        .iter()
        .map(|ch| resolve(&catalog, ch))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedProject {
        catalog,
        characterizations,
        resolved,
    })
}

/// Render every artifact for the request without touching the filesystem.
pub fn render(request: &GenerateRequest) -> Result<Vec<Artifact>, GenerateError> {
    let project = load_project(&request.defaults, &request.characterizations)?;
    render_project(&project, request)
}

/// Run the full pipeline and write the artifacts.
pub fn generate(request: &GenerateRequest) -> Result<GenerationSummary, GenerateError> {
    let project = load_project(&request.defaults, &request.characterizations)?;
    let artifacts = render_project(&project, request)?;

    for artifact in &artifacts {
        write_artifact(artifact)?;
    }

    Ok(summarize(&project, &artifacts))
}

fn render_project(
    project: &ResolvedProject,
    request: &GenerateRequest,
) -> Result<Vec<Artifact>, GenerateError> {
    let selected: Vec<&ResolvedCharacterization> = match &request.selection {
        Selection::All => project.resolved.iter().collect(),
        Selection::One(char_id) => {
            check::find_characterization(&project.characterizations, char_id)?;
            project
                .resolved
                .iter()
                .filter(|rc| rc.char_id == *char_id)
                .collect()
        }
    };

    let mut artifacts = vec![
        Artifact {
            path: request.include_dir.join("toggle.h"),
            contents: emit::master_header(&project.catalog, &project.resolved),
        },
        Artifact {
            path: request.source_dir.join("toggle.c"),
            contents: emit::master_source(&project.resolved),
        },
    ];

    for rc in selected {
        let stem = emit::file_stem(&rc.char_id);
        artifacts.push(Artifact {
            path: request
                .include_dir
                .join("characterizations")
                .join(format!("{stem}.h")),
            contents: emit::characterization_header(&project.catalog, rc),
        });
        artifacts.push(Artifact {
            path: request
                .source_dir
                .join("characterizations")
                .join(format!("{stem}.c")),
            contents: emit::characterization_source(&project.catalog, rc),
        });
    }

    Ok(artifacts)
}

fn write_artifact(artifact: &Artifact) -> Result<(), GenerateError> {
    if let Some(parent) = artifact.path.parent() {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
            path: artifact.path.clone(),
            source,
        })?;
    }
    fs::write(&artifact.path, &artifact.contents).map_err(|source| GenerateError::Write {
        path: artifact.path.clone(),
        source,
    })
}

fn summarize(project: &ResolvedProject, artifacts: &[Artifact]) -> GenerationSummary {
    GenerationSummary {
        characterizations: project
            .resolved
            .iter()
            .map(|rc| rc.char_id.clone())
            .collect(),
        files: artifacts
            .iter()
            .map(|artifact| GeneratedFile {
                path: artifact.path.display().to_string(),
                bytes: artifact.contents.len(),
                sha256: sha256_hex(&artifact.contents),
            })
            .collect(),
    }
}

/// Content digest reported per file, so callers can diff two runs
/// without reading the trees back.
fn sha256_hex(contents: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &str = "NAME\tDEFAULT\tTYPE\tDECL\tBRIEF\tDESCRIPTION\tH\tC\n\
        TESTING\t0\tOPTION\tMACRO\tTest mode.\t\t\t\n\
        SERIAL_DEBUG\tNO_SER_DBG\tOPTION\tMACRO_INT8\tSerial debug port.\t\t\t\n\
        NO_SER_DBG\t0\tVALUE\tMACRO_INT8\tNo serial debug.\t\t\t\n";

    const CHARACTERIZATIONS: &str = "CHAR_ID\tBRIEF\tDESCRIPTION\tSERIAL_DEBUG\n\
        HW_V1\tBoard v1.\t\t\n";

    fn project() -> ResolvedProject {
        resolve_project(
            &Table::parse(DEFAULTS).unwrap(),
            &Table::parse(CHARACTERIZATIONS).unwrap(),
        )
        .unwrap()
    }

    fn request(selection: Selection) -> GenerateRequest {
        GenerateRequest {
            defaults: PathBuf::from("unused"),
            characterizations: PathBuf::from("unused"),
            include_dir: PathBuf::from("include"),
            source_dir: PathBuf::from("src"),
            selection,
        }
    }

    #[test]
    fn test_test_variant_synthesized() {
        let project = project();
        assert_eq!(project.resolved.len(), 2);
        assert_eq!(project.resolved[1].char_id, TEST_CHAR_ID);
        assert!(project.resolved[1].testing);
    }

    #[test]
    fn test_explicit_test_variant_suppresses_synthesis() {
        let chars = "CHAR_ID\tBRIEF\tDESCRIPTION\tTESTING\n\
            CHAR_ID_TEST\tCustom test rig.\t\t1\n";
        let project = resolve_project(
            &Table::parse(DEFAULTS).unwrap(),
            &Table::parse(chars).unwrap(),
        )
        .unwrap();
        assert_eq!(project.resolved.len(), 1);
        assert_eq!(project.resolved[0].brief, "Custom test rig.");
    }

    #[test]
    fn test_render_all_artifacts() {
        let artifacts = render_project(&project(), &request(Selection::All)).unwrap();
        let paths: Vec<String> = artifacts
            .iter()
            .map(|a| a.path.display().to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "include/toggle.h",
                "src/toggle.c",
                "include/characterizations/hw_v1.h",
                "src/characterizations/hw_v1.c",
                "include/characterizations/char_id_test.h",
                "src/characterizations/char_id_test.c",
            ]
        );
    }

    #[test]
    fn test_selection_keeps_master_span() {
        let artifacts =
            render_project(&project(), &request(Selection::One("HW_V1".to_string()))).unwrap();
        assert_eq!(artifacts.len(), 4);
        // The master header still numbers every characterization.
        assert!(artifacts[0].contents.contains("#define NUM_CHAR_IDS 2"));
    }

    #[test]
    fn test_unknown_selection_rejected() {
        let err = render_project(&project(), &request(Selection::One("NOPE".to_string())))
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Check(CheckError::UnknownCharacterization(_))
        ));
        assert_eq!(err.exit_code(), 68);
    }

    #[test]
    fn test_exit_codes() {
        let defaults = Table::parse("NAME\tDEFAULT\nFOO\t0\n").unwrap();
        let chars = Table::parse(CHARACTERIZATIONS).unwrap();
        let err = resolve_project(&defaults, &chars).unwrap_err();
        assert_eq!(err.exit_code(), 65);
    }
}
