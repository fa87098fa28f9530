//! Errors raised by the numeric-constant table

use crate::logging::codes::{self, Code};

pub type DefineResult<T> = Result<T, DefineError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefineError {
    #[error("Constant '{name}' is already defined")]
    Duplicate { name: String },

    #[error("Cannot define '{name}': constant table is full ({limit} entries)")]
    Overflow { name: String, limit: usize },

    #[error("Constant name must not be empty")]
    EmptyName,
}

impl DefineError {
    pub fn duplicate(name: &str) -> Self {
        Self::Duplicate {
            name: name.to_string(),
        }
    }

    pub fn overflow(name: &str, limit: usize) -> Self {
        Self::Overflow {
            name: name.to_string(),
            limit,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            DefineError::Duplicate { .. } => codes::defines::DUPLICATE_DEFINE,
            DefineError::Overflow { .. } => codes::defines::DEFINE_TABLE_FULL,
            DefineError::EmptyName => codes::defines::EMPTY_DEFINE_NAME,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}
