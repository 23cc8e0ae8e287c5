//! Matching constants and per-document-type model configuration.
//!
//! [`MatchConfig`] is the only part the merge engine reads. The document type
//! tables in [`AnnotatorConfig`] are for whatever issues the model calls.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{AnnotateError, AnnotateResult};
use crate::scorer::MatchScore;

/// Tunable constants of the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// A fragment is applied only when its best score is strictly above this.
    pub acceptance_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.1,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    pub fn accepts(&self, score: MatchScore) -> bool {
        score.value() > self.acceptance_threshold
    }
}

/// Document types the service knows prompts and models for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// "Cerere de chemare în judecată"
    Subpoena,
    /// "Întâmpinare"
    Counterclaim,
}

/// Parameters of the annotation model call for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub category: Category,
    pub model: String,
    /// Output cap; keeps a looping model from running away.
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_temperature() -> f64 {
    0.2
}

impl ModelParams {
    pub fn new(category: Category, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            category,
            model: model.into(),
            max_tokens,
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTypeConfig {
    /// Display name as sent in `documentTypeName`.
    pub name: String,
    pub kind: DocumentKind,
    #[serde(default)]
    pub models: Vec<ModelParams>,
}

impl DocumentTypeConfig {
    pub fn model_params(&self, category: Category) -> Option<&ModelParams> {
        self.models.iter().find(|params| params.category == category)
    }
}

/// Output cap per category used by the default tables.
pub fn default_max_tokens(category: Category) -> u32 {
    match category {
        Category::Claimant | Category::Respondent => 150,
        Category::LegalBasis => 400,
        Category::Evidence => 300,
        Category::Request => 700,
        Category::SelectedFacts => 2300,
    }
}

fn default_models(prefix: &str) -> Vec<ModelParams> {
    Category::ALL
        .iter()
        .map(|&category| {
            let suffix = match category {
                Category::SelectedFacts => "isselect".to_string(),
                other => other.wire_name().to_lowercase(),
            };
            ModelParams::new(
                category,
                format!("{}-{}", prefix, suffix),
                default_max_tokens(category),
            )
        })
        .collect()
}

fn default_document_types() -> Vec<DocumentTypeConfig> {
    vec![
        DocumentTypeConfig {
            name: "Cerere de chemare în judecată".to_string(),
            kind: DocumentKind::Subpoena,
            // Deployed model names carry this spelling.
            models: default_models("subpoema"),
        },
        DocumentTypeConfig {
            name: "Întâmpinare".to_string(),
            kind: DocumentKind::Counterclaim,
            models: default_models("counterclaim"),
        },
    ]
}

/// Full annotator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default = "default_document_types")]
    pub document_types: Vec<DocumentTypeConfig>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            document_types: default_document_types(),
        }
    }
}

impl AnnotatorConfig {
    /// Parse a TOML configuration. Missing sections fall back to defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> AnnotateResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| AnnotateError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| AnnotateError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Look up a document type by its display name.
    pub fn document_type(&self, name: &str) -> AnnotateResult<&DocumentTypeConfig> {
        self.document_types
            .iter()
            .find(|doc_type| doc_type.name == name)
            .ok_or_else(|| AnnotateError::UnknownDocumentType {
                name: name.to_string(),
            })
    }

    pub fn model_params(&self, kind: DocumentKind, category: Category) -> Option<&ModelParams> {
        self.document_types
            .iter()
            .find(|doc_type| doc_type.kind == kind)
            .and_then(|doc_type| doc_type.model_params(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_threshold_is_strict() {
        let config = MatchConfig::default();
        assert!(!config.accepts(MatchScore::new(0.1)));
        assert!(config.accepts(MatchScore::new(0.1001)));
        assert!(!config.accepts(MatchScore::ZERO));
        assert!(MatchConfig::new().with_threshold(0.0).accepts(MatchScore::new(0.01)));
    }

    #[test]
    fn test_default_tables() {
        let config = AnnotatorConfig::default();
        let subpoena = config.document_type("Cerere de chemare în judecată").unwrap();
        assert_eq!(subpoena.kind, DocumentKind::Subpoena);

        let params = config
            .model_params(DocumentKind::Counterclaim, Category::SelectedFacts)
            .unwrap();
        assert_eq!(params.model, "counterclaim-isselect");
        assert_eq!(params.max_tokens, 2300);
        assert_eq!(params.temperature, 0.2);

        let params = config
            .model_params(DocumentKind::Subpoena, Category::Claimant)
            .unwrap();
        assert_eq!(params.model, "subpoema-isreclamant");
        assert_eq!(params.max_tokens, 150);
    }

    #[test]
    fn test_unknown_document_type() {
        let config = AnnotatorConfig::default();
        assert!(matches!(
            config.document_type("Apel"),
            Err(AnnotateError::UnknownDocumentType { .. })
        ));
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = AnnotatorConfig::from_toml(
            r#"
[matching]
acceptance_threshold = 0.25

[[document_types]]
name = "Întâmpinare"
kind = "counterclaim"

[[document_types.models]]
category = "isTemei"
model = "local-temei"
max_tokens = 512
"#,
        )
        .unwrap();

        assert_eq!(config.matching.acceptance_threshold, 0.25);
        assert_eq!(config.document_types.len(), 1);
        let params = config
            .model_params(DocumentKind::Counterclaim, Category::LegalBasis)
            .unwrap();
        assert_eq!(params.model, "local-temei");
        assert_eq!(params.temperature, 0.2);
        assert!(config
            .model_params(DocumentKind::Counterclaim, Category::Evidence)
            .is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AnnotatorConfig::from_toml("").unwrap(), AnnotatorConfig::default());
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[matching]\nacceptance_threshold = \"high\"").unwrap();
        let err = AnnotatorConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, AnnotateError::ConfigParse { .. }));

        let err = AnnotatorConfig::load(Path::new("/nonexistent/annotator.toml")).unwrap_err();
        assert!(matches!(err, AnnotateError::ConfigRead { .. }));
    }
}
