use std::fmt;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Identifiers and kinds
// ────────────────────────────────────────────────────────────────────────────

/// Opaque question identifier as issued by the question bank.
///
/// Numeric ids from the backend are stringified at ingestion so that equality
/// and serialization never depend on the backend's id representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The question type. Drives section grouping and which `QuestionOptions`
/// variant is meaningful.
///
/// Serialized as its short wire name (`"mcq"`, `"truefalse"`, ...). Any name
/// outside the known set becomes `Other`, which compares unequal to every
/// known kind so it always opens its own section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    Mcq,
    Short,
    Long,
    Blank,
    OneTwo,
    TrueFalse,
    Passage,
    Match,
    Other(String),
}

impl QuestionKind {
    /// Parses a wire name. Case-insensitive, surrounding whitespace ignored.
    /// Unknown names are stored lowercased so they group the same way.
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "mcq" => QuestionKind::Mcq,
            "short" => QuestionKind::Short,
            "long" => QuestionKind::Long,
            "blank" => QuestionKind::Blank,
            "onetwo" => QuestionKind::OneTwo,
            "truefalse" => QuestionKind::TrueFalse,
            "passage" => QuestionKind::Passage,
            "match" => QuestionKind::Match,
            _ => QuestionKind::Other(name),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Short => "short",
            QuestionKind::Long => "long",
            QuestionKind::Blank => "blank",
            QuestionKind::OneTwo => "onetwo",
            QuestionKind::TrueFalse => "truefalse",
            QuestionKind::Passage => "passage",
            QuestionKind::Match => "match",
            QuestionKind::Other(name) => name.as_str(),
        }
    }

    /// Human-readable section title printed after the section letter.
    pub fn section_title(&self) -> String {
        match self {
            QuestionKind::Mcq => "Multiple Choice Questions".to_string(),
            QuestionKind::Short => "Short Answer Questions".to_string(),
            QuestionKind::Long => "Long Answer Questions".to_string(),
            QuestionKind::Blank => "Fill in the Blanks".to_string(),
            QuestionKind::OneTwo => "Answer in One or Two Words".to_string(),
            QuestionKind::TrueFalse => "True or False".to_string(),
            QuestionKind::Passage => "Read the Passage and Answer".to_string(),
            QuestionKind::Match => "Match the Following".to_string(),
            QuestionKind::Other(name) if name.is_empty() => "Other Questions".to_string(),
            QuestionKind::Other(name) => format!("{name} Questions"),
        }
    }
}

impl From<String> for QuestionKind {
    fn from(value: String) -> Self {
        QuestionKind::parse(&value)
    }
}

impl From<QuestionKind> for String {
    fn from(value: QuestionKind) -> Self {
        value.as_str().to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Options payload
// ────────────────────────────────────────────────────────────────────────────

/// One sub-question of a reading passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageItem {
    pub text: String,
    #[serde(default)]
    pub marks: f64,
}

/// Kind-specific payload, parsed once at ingestion.
///
/// Only the variant matching the record's kind is ever constructed; anything
/// else (and any malformed payload) is `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum QuestionOptions {
    #[default]
    None,
    Choices { choices: Vec<String> },
    Passage { items: Vec<PassageItem> },
    Match { left: Vec<String>, right: Vec<String> },
}

impl QuestionOptions {
    /// Number of answer choices; zero for every non-choice variant.
    pub fn choice_count(&self) -> usize {
        match self {
            QuestionOptions::Choices { choices } => choices.len(),
            _ => 0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Record
// ────────────────────────────────────────────────────────────────────────────

/// A sanitized exam question ready for layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default)]
    pub options: QuestionOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub marks: f64,
    /// 1-based position in the full paper. Never renumbered by pagination.
    pub ordinal: usize,
}

impl QuestionRecord {
    pub fn has_image(&self) -> bool {
        self.image_ref.is_some()
    }
}
