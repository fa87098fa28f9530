//! String-resource providers for keyword spellings

use super::{KeywordCategory, CATEGORY_WIDTH};
use crate::logging::codes::{self, Code};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maps a numeric resource id to its display string.
///
/// An empty string means "no string for this id" and ends enumeration of
/// the id's category.
pub trait StringProvider: Send + Sync {
    fn load_string(&self, id: i64) -> String;
}

const LANGUAGE: &[&str] = &[
    "if",
    "else",
    "while",
    "do",
    "for",
    "break",
    "continue",
    "switch",
    "case",
    "default",
    "try",
    "throw",
    "catch",
    "finally",
    "and",
    "or",
    "not",
    "return",
    "class",
    "extends",
    "synchronized",
    "new",
    "public",
    "extern",
    "final",
    "static",
    "protected",
    "private",
    "repeat",
    "STARTDEBUGDD",
];

const DECLARATIONS: &[&str] = &["int", "float", "boolean", "string", "void", "bool"];

const VALUES: &[&str] = &["true", "false", "null", "nan"];

const OPERATORS: &[&str] = &[
    "(", ")", "{", "}", ";", ",", "...", ".", "[", "]", ":", "?", "+", "-", "*", "/", "=", "+=",
    "-=", "*=", "/=", "|=", "&=", "^=", "<<=", ">>>=", ">>=", "<<", ">>>", ">>", "++", "--", "<",
    ">", "<=", ">=", "==", "!=", "&", "^", "|", "&&", "||", "!", "~", "%", "**", "%=",
];

/// The standard CBOT keyword spellings
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStrings;

impl BuiltinStrings {
    fn category_strings(category: KeywordCategory) -> &'static [&'static str] {
        match category {
            KeywordCategory::Language => LANGUAGE,
            KeywordCategory::Declaration => DECLARATIONS,
            KeywordCategory::Value => VALUES,
            KeywordCategory::Operator => OPERATORS,
        }
    }
}

impl StringProvider for BuiltinStrings {
    fn load_string(&self, id: i64) -> String {
        KeywordCategory::of_id(id)
            .and_then(|category| {
                let index = usize::try_from(id - category.base()).ok()?;
                Self::category_strings(category).get(index).copied()
            })
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Error)]
pub enum KeywordFileError {
    #[error("Failed to read keyword file '{path}': {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid keyword file: {message}")]
    Parse { message: String },

    #[error("Keyword category '{category}' has {count} entries, more than its {limit} ids")]
    RangeOverflow {
        category: KeywordCategory,
        count: usize,
        limit: i64,
    },

    #[error("Keyword category '{category}' contains an empty spelling at position {index}")]
    EmptySpelling {
        category: KeywordCategory,
        index: usize,
    },
}

impl KeywordFileError {
    pub fn error_code(&self) -> Code {
        match self {
            KeywordFileError::Read { .. } => codes::source::IO_ERROR,
            KeywordFileError::Parse { .. } | KeywordFileError::EmptySpelling { .. } => {
                codes::keywords::KEYWORD_TABLE_PARSE_FAILURE
            }
            KeywordFileError::RangeOverflow { .. } => codes::keywords::KEYWORD_ID_OUT_OF_RANGE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct KeywordFile {
    keywords: KeywordSections,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeywordSections {
    language: Vec<String>,
    declarations: Vec<String>,
    values: Vec<String>,
    operators: Vec<String>,
}

/// Keyword spellings loaded from a TOML file:
///
/// ```toml
/// [keywords]
/// language = ["if", "else"]
/// declarations = ["int"]
/// values = ["true", "false"]
/// operators = ["=", "=="]
/// ```
///
/// Each list is assigned consecutive ids from its category's base.
#[derive(Debug, Clone, Default)]
pub struct TableStrings {
    categories: [Vec<String>; 4],
}

impl TableStrings {
    pub fn new(
        language: Vec<String>,
        declarations: Vec<String>,
        values: Vec<String>,
        operators: Vec<String>,
    ) -> Result<Self, KeywordFileError> {
        let categories = [language, declarations, values, operators];

        for (category, strings) in KeywordCategory::ALL.iter().zip(categories.iter()) {
            if strings.len() as i64 > CATEGORY_WIDTH {
                return Err(KeywordFileError::RangeOverflow {
                    category: *category,
                    count: strings.len(),
                    limit: CATEGORY_WIDTH,
                });
            }
            // An empty spelling would silently cut the category short
            if let Some(index) = strings.iter().position(String::is_empty) {
                return Err(KeywordFileError::EmptySpelling {
                    category: *category,
                    index,
                });
            }
        }

        Ok(Self { categories })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, KeywordFileError> {
        let file: KeywordFile = toml::from_str(content).map_err(|e| KeywordFileError::Parse {
            message: e.to_string(),
        })?;
        let sections = file.keywords;
        Self::new(
            sections.language,
            sections.declarations,
            sections.values,
            sections.operators,
        )
    }

    pub fn load(path: &Path) -> Result<Self, KeywordFileError> {
        let content = std::fs::read_to_string(path).map_err(|e| KeywordFileError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }
}

impl StringProvider for TableStrings {
    fn load_string(&self, id: i64) -> String {
        KeywordCategory::of_id(id)
            .and_then(|category| {
                let slot = KeywordCategory::ALL.iter().position(|c| *c == category)?;
                let index = usize::try_from(id - category.base()).ok()?;
                self.categories[slot].get(index).cloned()
            })
            .unwrap_or_default()
    }
}
