//! Token data produced by the scanner
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a scanned word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Head of every stream: empty text, carries leading whitespace/comments
    Leading,
    Keyword,
    NumberLiteral,
    StringLiteral,
    /// Any word that is not a keyword, literal or defined constant
    Variable,
    /// A name bound in the constant table; the token id holds its value
    DefinedConstant,
    /// Sentinel closing every stream
    Terminator,
}

impl TokenKind {
    /// Numeric type code used by parsers: 0 none, 1 keyword, 2 number,
    /// 3 string, 4 variable, 5 defined constant
    pub fn type_code(self) -> i64 {
        match self {
            TokenKind::Leading | TokenKind::Terminator => type_codes::NONE,
            TokenKind::Keyword => type_codes::KEYWORD,
            TokenKind::NumberLiteral => type_codes::NUMBER,
            TokenKind::StringLiteral => type_codes::STRING,
            TokenKind::Variable => type_codes::VARIABLE,
            TokenKind::DefinedConstant => type_codes::DEFINED_CONSTANT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Leading => "leading",
            TokenKind::Keyword => "keyword",
            TokenKind::NumberLiteral => "number",
            TokenKind::StringLiteral => "string",
            TokenKind::Variable => "variable",
            TokenKind::DefinedConstant => "defined_constant",
            TokenKind::Terminator => "terminator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod type_codes {
    pub const NONE: i64 = 0;
    pub const KEYWORD: i64 = 1;
    pub const NUMBER: i64 = 2;
    pub const STRING: i64 = 3;
    pub const VARIABLE: i64 = 4;
    pub const DEFINED_CONSTANT: i64 = 5;
}

/// A classified, positioned word and the separator text that followed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Whitespace and comments after the word, verbatim
    pub separator: String,
    pub kind: TokenKind,
    /// Keyword id, constant value, or -1
    pub id: i64,
    /// Byte range of the word in the source, separator excluded
    pub span: Span,
}

impl Token {
    pub fn new(text: String, separator: String, kind: TokenKind, id: i64, span: Span) -> Self {
        Self {
            text,
            separator,
            kind,
            id,
            span,
        }
    }

    pub(crate) fn terminator(offset: usize) -> Self {
        Self {
            text: String::new(),
            separator: String::new(),
            kind: TokenKind::Terminator,
            id: -1,
            span: Span::empty_at(offset),
        }
    }

    /// Type as seen by the parser: the keyword id for keywords, the kind's
    /// type code otherwise
    pub fn effective_type(&self) -> i64 {
        match self.kind {
            TokenKind::Keyword => self.id,
            kind => kind.type_code(),
        }
    }

    pub fn is_keyword(&self, id: i64) -> bool {
        self.kind == TokenKind::Keyword && self.id == id
    }

    pub fn is_terminator(&self) -> bool {
        self.kind == TokenKind::Terminator
    }

    /// String literal content without the surrounding quotes
    pub fn string_content(&self) -> Option<&str> {
        if self.kind != TokenKind::StringLiteral {
            return None;
        }
        let inner = self.text.strip_prefix('"')?;
        Some(inner.strip_suffix('"').unwrap_or(inner))
    }

    /// Whether a string literal is missing its closing quote
    pub fn is_unterminated_string(&self) -> bool {
        self.kind == TokenKind::StringLiteral && (self.text.len() < 2 || !self.text.ends_with('"'))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Terminator => write!(f, "<end>"),
            TokenKind::Leading => write!(f, "<start>"),
            _ => write!(f, "{}", self.text),
        }
    }
}
