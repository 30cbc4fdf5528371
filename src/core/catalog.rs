//! Subject catalog
//!
//! The catalog maps a bucket key (`foundation`, `diploma`, `degree`, or a
//! branch-qualified key such as `foundation-electronic-systems`) to an ordered
//! list of subjects. Each subject carries its own parsed formula, so the
//! evaluator and predictor never need a per-subject code path.

use crate::core::formula::{parse, FormulaError};
use crate::core::models::{normalize_key, Level, Subject, SubjectField};
use crate::debug;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

/// Compiled-in subject catalog
const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.toml");

/// Field id used as the free variable when a subject does not name one
const DEFAULT_FREE_FIELD: &str = "F";

const fn default_credits() -> f64 {
    4.0
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    branch_overrides: Vec<String>,
    #[serde(default)]
    buckets: BTreeMap<String, Vec<SubjectEntry>>,
}

#[derive(Debug, Deserialize)]
struct SubjectEntry {
    key: String,
    name: String,
    #[serde(default = "default_credits")]
    credits: f64,
    formula: String,
    /// Explicit free field; an empty string disables prediction for the subject
    free_field: Option<String>,
    fields: Vec<SubjectField>,
}

/// Problems found while loading a catalog
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be read
    Io(std::io::Error),
    /// The TOML document is malformed or does not match the schema
    Parse(toml::de::Error),
    /// A bucket key does not start with a known level
    UnknownBucket(String),
    /// A subject's formula does not parse or is not a weighted combination
    Formula {
        /// Subject key
        subject: String,
        /// Parser or validation message
        message: String,
    },
    /// A formula references a field the subject does not declare
    UndeclaredField {
        /// Subject key
        subject: String,
        /// Field id
        field: String,
    },
    /// A declared field never appears in the formula
    UnusedField {
        /// Subject key
        subject: String,
        /// Field id
        field: String,
    },
    /// A field id is declared twice in one subject
    DuplicateField {
        /// Subject key
        subject: String,
        /// Field id
        field: String,
    },
    /// A field has `min > max` or non-finite bounds
    InvalidBounds {
        /// Subject key
        subject: String,
        /// Field id
        field: String,
    },
    /// Two subjects of the same level share a key
    DuplicateKey {
        /// Level of both subjects
        level: Level,
        /// Shared key
        key: String,
    },
    /// The subject names a free field it does not declare
    MissingFreeField {
        /// Subject key
        subject: String,
        /// Field id
        field: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read catalog: {err}"),
            Self::Parse(err) => write!(f, "invalid catalog: {err}"),
            Self::UnknownBucket(bucket) => write!(
                f,
                "bucket '{bucket}' does not start with foundation, diploma or degree"
            ),
            Self::Formula { subject, message } => {
                write!(f, "formula of '{subject}' is invalid: {message}")
            }
            Self::UndeclaredField { subject, field } => write!(
                f,
                "formula of '{subject}' uses field '{field}' which is not declared"
            ),
            Self::UnusedField { subject, field } => write!(
                f,
                "subject '{subject}' declares field '{field}' which its formula never uses"
            ),
            Self::DuplicateField { subject, field } => {
                write!(f, "subject '{subject}' declares field '{field}' twice")
            }
            Self::InvalidBounds { subject, field } => {
                write!(f, "field '{field}' of '{subject}' has invalid bounds")
            }
            Self::DuplicateKey { level, key } => {
                write!(f, "subject key '{key}' appears twice at {level} level")
            }
            Self::MissingFreeField { subject, field } => write!(
                f,
                "subject '{subject}' names free field '{field}' which is not declared"
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Read-only registry of subjects grouped by level and branch
#[derive(Debug, Clone)]
pub struct Catalog {
    buckets: BTreeMap<String, Vec<Subject>>,
    branch_overrides: Vec<String>,
}

impl Catalog {
    /// The compiled-in catalog
    ///
    /// # Panics
    /// Panics if the embedded catalog is invalid. The embedded document is
    /// validated by the test suite, so this does not happen in practice.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml(BUILTIN_CATALOG).expect("Failed to parse compiled-in subject catalog")
    }

    /// Load a catalog from a TOML file (e.g., a table exported from the remote store)
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml(&content)?;
        debug!(
            "Loaded catalog from {} ({} subjects)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog document
    ///
    /// # Errors
    /// Returns the first validation problem found; see [`CatalogError`].
    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        let mut buckets = BTreeMap::new();
        let mut seen: HashMap<(Level, String), ()> = HashMap::new();

        for (bucket, entries) in file.buckets {
            let bucket = normalize_key(&bucket);
            let level = bucket_level(&bucket)
                .ok_or_else(|| CatalogError::UnknownBucket(bucket.clone()))?;

            let mut subjects = Vec::with_capacity(entries.len());
            for entry in entries {
                let subject = build_subject(entry)?;
                if seen.insert((level, subject.key.clone()), ()).is_some() {
                    return Err(CatalogError::DuplicateKey {
                        level,
                        key: subject.key,
                    });
                }
                subjects.push(subject);
            }
            buckets.insert(bucket, subjects);
        }

        Ok(Self {
            buckets,
            branch_overrides: file
                .branch_overrides
                .iter()
                .map(|b| normalize_key(b))
                .collect(),
        })
    }

    /// Resolve `(level, branch)` to the bucket key holding its subjects
    ///
    /// Branches listed in `branch_overrides` use `"{level}-{branch}"`; every
    /// other branch shares the level-only bucket.
    #[must_use]
    pub fn bucket_key(&self, level: &str, branch: &str) -> String {
        let level = normalize_key(level);
        let branch = normalize_key(branch);
        if self.branch_overrides.contains(&branch) {
            format!("{level}-{branch}")
        } else {
            level
        }
    }

    /// Subjects offered at `level` for `branch`; empty when nothing matches
    #[must_use]
    pub fn subjects(&self, level: &str, branch: &str) -> &[Subject] {
        self.buckets
            .get(&self.bucket_key(level, branch))
            .map_or(&[], Vec::as_slice)
    }

    /// Find a subject by key anywhere within `level`
    #[must_use]
    pub fn find(&self, level: Level, key: &str) -> Option<&Subject> {
        self.buckets
            .iter()
            .filter(|(bucket, _)| bucket_level(bucket) == Some(level))
            .flat_map(|(_, subjects)| subjects.iter())
            .find(|s| s.key == key)
    }

    /// Bucket keys in sorted order
    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Levels that have at least one bucket
    #[must_use]
    pub fn levels(&self) -> Vec<Level> {
        Level::ALL
            .into_iter()
            .filter(|level| self.buckets.keys().any(|b| bucket_level(b) == Some(*level)))
            .collect()
    }

    /// Normalized branch names with their own buckets
    #[must_use]
    pub fn branch_overrides(&self) -> &[String] {
        &self.branch_overrides
    }

    /// Every bucket with its subjects, in key order
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[Subject])> {
        self.buckets
            .iter()
            .map(|(bucket, subjects)| (bucket.as_str(), subjects.as_slice()))
    }

    /// All subjects with the bucket they belong to
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Subject)> {
        self.buckets
            .iter()
            .flat_map(|(bucket, subjects)| subjects.iter().map(move |s| (bucket.as_str(), s)))
    }

    /// Total number of subjects
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no subjects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Level a bucket key belongs to (`diploma-electronic-systems` → diploma)
fn bucket_level(bucket: &str) -> Option<Level> {
    Level::ALL.into_iter().find(|level| {
        let name = level.as_str();
        bucket == name
            || bucket
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('-'))
    })
}

fn formula_error(subject: &str, err: &FormulaError) -> CatalogError {
    CatalogError::Formula {
        subject: subject.to_string(),
        message: err.to_string(),
    }
}

/// Validate one catalog entry and turn it into a [`Subject`]
fn build_subject(entry: SubjectEntry) -> Result<Subject, CatalogError> {
    let SubjectEntry {
        key,
        name,
        credits,
        formula,
        free_field,
        fields,
    } = entry;

    let formula = parse(&formula).map_err(|e| formula_error(&key, &e))?;
    if !formula.is_weighted_linear() {
        return Err(CatalogError::Formula {
            subject: key,
            message: "products may contain at most one scoring field".to_string(),
        });
    }

    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.id == field.id) {
            return Err(CatalogError::DuplicateField {
                subject: key,
                field: field.id.clone(),
            });
        }
        if !field.min.is_finite() || !field.max.is_finite() || field.min > field.max {
            return Err(CatalogError::InvalidBounds {
                subject: key,
                field: field.id.clone(),
            });
        }
    }

    let used = formula.fields();
    if let Some(missing) = used.iter().find(|id| !fields.iter().any(|f| &f.id == *id)) {
        return Err(CatalogError::UndeclaredField {
            subject: key,
            field: missing.clone(),
        });
    }
    if let Some(unused) = fields.iter().find(|f| !used.contains(&f.id)) {
        return Err(CatalogError::UnusedField {
            subject: key,
            field: unused.id.clone(),
        });
    }

    let free_field = match free_field {
        Some(id) if id.trim().is_empty() => None,
        Some(id) => {
            if !fields.iter().any(|f| f.id == id) {
                return Err(CatalogError::MissingFreeField {
                    subject: key,
                    field: id,
                });
            }
            Some(id)
        }
        None => fields
            .iter()
            .any(|f| f.id == DEFAULT_FREE_FIELD)
            .then(|| DEFAULT_FREE_FIELD.to_string()),
    };

    Ok(Subject {
        key,
        name,
        credits,
        fields,
        formula,
        free_field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
branch_overrides = ["Electronic Systems"]

[[buckets.foundation]]
key = "ct"
name = "Computational Thinking"
formula = "0.4*Qz1 + 0.6*F"
fields = [{ id = "Qz1", label = "Quiz 1" }, { id = "F", label = "End Term" }]

[[buckets.foundation-electronic-systems]]
key = "es-ect"
name = "Circuits"
formula = "0.5*Qz1 + 0.5*F"
fields = [{ id = "Qz1", label = "Quiz 1" }, { id = "F", label = "End Term" }]
"#;

    fn subject_toml(formula: &str, fields: &str) -> String {
        format!(
            r#"
[[buckets.degree]]
key = "x"
name = "X"
formula = "{formula}"
fields = [{fields}]
"#
        )
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_empty());
        assert_eq!(
            catalog.levels(),
            vec![Level::Foundation, Level::Diploma, Level::Degree]
        );
    }

    #[test]
    fn resolves_branch_overrides() {
        let catalog = Catalog::from_toml(SMALL).expect("valid catalog");
        assert_eq!(
            catalog.bucket_key("Foundation", "Electronic Systems"),
            "foundation-electronic-systems"
        );
        assert_eq!(catalog.bucket_key("foundation", "Data Science"), "foundation");
        assert_eq!(catalog.subjects("foundation", "data science")[0].key, "ct");
        assert_eq!(
            catalog.subjects("FOUNDATION", "electronic_systems")[0].key,
            "es-ect"
        );
    }

    #[test]
    fn missing_bucket_is_empty_not_an_error() {
        let catalog = Catalog::from_toml(SMALL).expect("valid catalog");
        assert!(catalog.subjects("degree", "data science").is_empty());
        assert!(catalog.subjects("diploma", "electronic systems").is_empty());
        assert!(catalog.subjects("phd", "anything").is_empty());
    }

    #[test]
    fn find_searches_branch_buckets_of_the_level() {
        let catalog = Catalog::from_toml(SMALL).expect("valid catalog");
        assert!(catalog.find(Level::Foundation, "es-ect").is_some());
        assert!(catalog.find(Level::Foundation, "ct").is_some());
        assert!(catalog.find(Level::Diploma, "ct").is_none());
    }

    #[test]
    fn free_field_defaults_to_end_term() {
        let catalog = Catalog::from_toml(SMALL).expect("valid catalog");
        let ct = catalog.find(Level::Foundation, "ct").expect("ct");
        assert_eq!(ct.free_field.as_deref(), Some("F"));
        assert!((ct.credits - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_free_field_disables_prediction() {
        let text = format!(
            "{}free_field = \"\"\n",
            subject_toml("0.5*Qz1 + 0.5*F", r#"{ id = "Qz1", label = "Q" }, { id = "F", label = "F" }"#)
        );
        let catalog = Catalog::from_toml(&text).expect("valid catalog");
        assert!(catalog.find(Level::Degree, "x").expect("x").free_field.is_none());
    }

    #[test]
    fn rejects_undeclared_field() {
        let text = subject_toml("0.5*Qz1 + 0.5*F", r#"{ id = "F", label = "F" }"#);
        let err = Catalog::from_toml(&text).unwrap_err();
        assert!(matches!(err, CatalogError::UndeclaredField { ref field, .. } if field == "Qz1"));
    }

    #[test]
    fn rejects_unused_field() {
        let text = subject_toml(
            "F",
            r#"{ id = "F", label = "F" }, { id = "Qz9", label = "Q" }"#,
        );
        let err = Catalog::from_toml(&text).unwrap_err();
        assert!(matches!(err, CatalogError::UnusedField { ref field, .. } if field == "Qz9"));
    }

    #[test]
    fn rejects_bad_formula() {
        let text = subject_toml("0.5*F +", r#"{ id = "F", label = "F" }"#);
        assert!(matches!(
            Catalog::from_toml(&text).unwrap_err(),
            CatalogError::Formula { .. }
        ));
        let text = subject_toml("F*F", r#"{ id = "F", label = "F" }"#);
        assert!(matches!(
            Catalog::from_toml(&text).unwrap_err(),
            CatalogError::Formula { .. }
        ));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let text = subject_toml("F", r#"{ id = "F", label = "F", min = 10, max = 5 }"#);
        assert!(matches!(
            Catalog::from_toml(&text).unwrap_err(),
            CatalogError::InvalidBounds { .. }
        ));
    }

    #[test]
    fn rejects_duplicate_keys_within_a_level() {
        let text = format!(
            "{}{}",
            subject_toml("F", r#"{ id = "F", label = "F" }"#),
            subject_toml("F", r#"{ id = "F", label = "F" }"#)
        );
        assert!(matches!(
            Catalog::from_toml(&text).unwrap_err(),
            CatalogError::DuplicateKey { level: Level::Degree, .. }
        ));
    }

    #[test]
    fn rejects_unknown_bucket_and_missing_free_field() {
        let text = SMALL.replace("buckets.foundation]]", "buckets.masters]]");
        assert!(matches!(
            Catalog::from_toml(&text).unwrap_err(),
            CatalogError::UnknownBucket(_)
        ));

        let text = format!(
            "{}free_field = \"ET\"\n",
            subject_toml("F", r#"{ id = "F", label = "F" }"#)
        );
        assert!(matches!(
            Catalog::from_toml(&text).unwrap_err(),
            CatalogError::MissingFreeField { .. }
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Catalog::from_toml("buckets = 3").unwrap_err(),
            CatalogError::Parse(_)
        ));
    }
}
