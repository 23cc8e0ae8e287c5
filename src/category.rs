//! The closed set of annotation categories.
//!
//! Each category owns exactly one boolean flag on [`Word`](crate::Word). The
//! wire name (`isTemei`, `isProba`, ...) is the JSON field of that flag and the
//! identifier callers use when requesting a subset of categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnnotateError, AnnotateResult};

/// Annotation category applied to document words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Legal basis ("temei legal"): articles and normative acts invoked.
    #[serde(rename = "isTemei")]
    LegalBasis,
    /// Evidence ("probă") offered in support of the case.
    #[serde(rename = "isProba")]
    Evidence,
    /// Selected facts and circumstances.
    #[serde(rename = "isSelected")]
    SelectedFacts,
    /// The request addressed to the court ("cerere").
    #[serde(rename = "isCerere")]
    Request,
    /// Claimant ("reclamant") names.
    #[serde(rename = "isReclamant")]
    Claimant,
    /// Respondent ("pârât") names.
    #[serde(rename = "isParat")]
    Respondent,
}

impl Category {
    /// Every category, in processing order.
    pub const ALL: [Category; 6] = [
        Category::LegalBasis,
        Category::Evidence,
        Category::SelectedFacts,
        Category::Request,
        Category::Claimant,
        Category::Respondent,
    ];

    /// Identifier used on the wire and in requested category sets.
    pub fn wire_name(self) -> &'static str {
        match self {
            Category::LegalBasis => "isTemei",
            Category::Evidence => "isProba",
            Category::SelectedFacts => "isSelected",
            Category::Request => "isCerere",
            Category::Claimant => "isReclamant",
            Category::Respondent => "isParat",
        }
    }

    /// Field name of this category in a document summary.
    pub fn summary_field(self) -> &'static str {
        match self {
            Category::LegalBasis => "Temei",
            Category::Evidence => "Proba",
            Category::SelectedFacts => "Selected",
            Category::Request => "Cerere",
            Category::Claimant => "Reclamant",
            Category::Respondent => "Parat",
        }
    }

    /// Short lowercase label used by fixtures and displays.
    pub fn label(self) -> &'static str {
        match self {
            Category::LegalBasis => "legal_basis",
            Category::Evidence => "evidence",
            Category::SelectedFacts => "selected",
            Category::Request => "request",
            Category::Claimant => "claimant",
            Category::Respondent => "respondent",
        }
    }

    /// Parse either the wire name or the short label.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.wire_name() == name || c.label() == name)
    }

    pub fn wire_names() -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.wire_name()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Category {
    type Err = AnnotateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s).ok_or_else(|| AnnotateError::InvalidCategories {
            invalid: vec![s.to_string()],
            valid: Category::wire_names(),
        })
    }
}

/// Validate a requested category set.
///
/// `None` selects every category. Unknown identifiers are collected and
/// reported together; this runs before any merge starts.
pub fn parse_category_set(requested: Option<&[String]>) -> AnnotateResult<Vec<Category>> {
    let requested = match requested {
        Some(requested) => requested,
        None => return Ok(Category::ALL.to_vec()),
    };

    let mut categories = Vec::with_capacity(requested.len());
    let mut invalid = Vec::new();
    for name in requested {
        match Category::from_name(name) {
            Some(category) => categories.push(category),
            None => invalid.push(name.clone()),
        }
    }

    if !invalid.is_empty() {
        return Err(AnnotateError::InvalidCategories {
            invalid,
            valid: Category::wire_names(),
        });
    }

    Ok(categories)
}
