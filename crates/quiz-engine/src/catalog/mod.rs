//! Questionnaire catalog: the built-in definitions embedded in the binary,
//! or a directory of JSON files supplied through `QUIZ_CATALOG_DIR`.

pub mod answers;
pub mod validation;

use crate::config::CatalogConfig;
use crate::engine::likert::Questionnaire;
use crate::engine::profile::ProfileQuiz;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ASSESSMENTS_FILE: &str = "assessments.json";
pub const PROFILE_QUIZZES_FILE: &str = "profile-quizzes.json";

const BUILTIN_ASSESSMENTS: &str = include_str!("../../data/assessments.json");
const BUILTIN_PROFILE_QUIZZES: &str = include_str!("../../data/profile-quizzes.json");

#[derive(Debug)]
pub enum CatalogError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        source_name: String,
        source: serde_json::Error,
    },
    DuplicateId {
        id: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io { path, source } => {
                write!(f, "failed to read catalog file {}: {}", path.display(), source)
            }
            CatalogError::Parse {
                source_name,
                source,
            } => write!(f, "invalid catalog data in {}: {}", source_name, source),
            CatalogError::DuplicateId { id } => {
                write!(f, "catalog declares '{}' more than once", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Parse { source, .. } => Some(source),
            CatalogError::DuplicateId { .. } => None,
        }
    }
}

/// Every questionnaire and profile quiz the engine can serve.
///
/// Likert slugs and profile quiz ids share one namespace so that a single
/// identifier always names one definition.
#[derive(Debug, Clone)]
pub struct Catalog {
    assessments: Vec<Questionnaire>,
    quizzes: Vec<ProfileQuiz>,
}

impl Catalog {
    pub fn from_parts(
        assessments: Vec<Questionnaire>,
        quizzes: Vec<ProfileQuiz>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let ids = assessments
            .iter()
            .map(|questionnaire| questionnaire.slug.as_str())
            .chain(quizzes.iter().map(|quiz| quiz.id.as_str()));
        for id in ids {
            if !seen.insert(id) {
                return Err(CatalogError::DuplicateId { id: id.to_string() });
            }
        }

        Ok(Self {
            assessments,
            quizzes,
        })
    }

    /// The definitions compiled into the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        let assessments = parse_json(BUILTIN_ASSESSMENTS, "built-in assessments")?;
        let quizzes = parse_json(BUILTIN_PROFILE_QUIZZES, "built-in profile quizzes")?;
        Self::from_parts(assessments, quizzes)
    }

    /// Reads `assessments.json` and `profile-quizzes.json` from `dir`. A
    /// missing file contributes an empty list.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let assessments = read_optional(&dir.join(ASSESSMENTS_FILE))?;
        let quizzes = read_optional(&dir.join(PROFILE_QUIZZES_FILE))?;
        Self::from_parts(assessments, quizzes)
    }

    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.dir {
            Some(dir) => Self::from_dir(dir)?,
            None => Self::builtin()?,
        };
        info!(
            source = %config
                .dir
                .as_deref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
            assessments = catalog.assessments.len(),
            quizzes = catalog.quizzes.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn assessments(&self) -> &[Questionnaire] {
        &self.assessments
    }

    pub fn assessment(&self, slug: &str) -> Option<&Questionnaire> {
        self.assessments
            .iter()
            .find(|questionnaire| questionnaire.slug == slug)
    }

    pub fn quizzes(&self) -> &[ProfileQuiz] {
        &self.quizzes
    }

    pub fn quiz(&self, id: &str) -> Option<&ProfileQuiz> {
        self.quizzes.iter().find(|quiz| quiz.id == id)
    }
}

fn parse_json<T: DeserializeOwned>(raw: &str, source_name: &str) -> Result<T, CatalogError> {
    serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
        source_name: source_name.to_string(),
        source,
    })
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_json(&raw, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_lists_every_definition() {
        let catalog = Catalog::builtin().expect("embedded catalog parses");
        let slugs: Vec<_> = catalog
            .assessments()
            .iter()
            .map(|questionnaire| questionnaire.slug.as_str())
            .collect();
        assert_eq!(
            slugs,
            vec![
                "stress-balance-check",
                "career-values-assessment",
                "attachment-style-check",
                "leadership-style-diagnosis",
                "learning-habits-check",
            ]
        );
        assert!(catalog.quiz("travel-train").is_some());
        assert!(catalog.assessment("travel-train").is_none());
    }

    #[test]
    fn duplicate_ids_across_kinds_are_rejected() {
        let builtin = Catalog::builtin().expect("embedded catalog parses");
        let mut quiz = builtin.quizzes()[0].clone();
        quiz.id = "stress-balance-check".to_string();

        let err = Catalog::from_parts(builtin.assessments().to_vec(), vec![quiz])
            .expect_err("duplicate id");
        assert!(matches!(err, CatalogError::DuplicateId { ref id } if id == "stress-balance-check"));
    }

    #[test]
    fn missing_directory_files_yield_empty_catalog() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = Catalog::from_dir(dir.path()).expect("empty catalog");
        assert!(catalog.assessments().is_empty());
        assert!(catalog.quizzes().is_empty());
    }

    #[test]
    fn malformed_catalog_file_names_its_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(ASSESSMENTS_FILE), "{ not json").expect("write");

        let err = Catalog::from_dir(dir.path()).expect_err("parse failure");
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains(ASSESSMENTS_FILE));
    }
}
