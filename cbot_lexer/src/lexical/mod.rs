//! Lexical analysis for CBOT scripts
//!
//! The [`Scanner`] consumes bytes and returns one classified token per
//! call; [`tokenize`] drives it across a whole source and appends the
//! Terminator. [`Lexer`] bundles the keyword and constant tables a scanner
//! consults, and adds metrics and logging around each tokenization.
//!
//! Scanning is permissive: unterminated strings and comments produce
//! tokens and a [`LexicalDiagnostic`] rather than errors.

pub mod analyzer;
pub mod scanner;

pub use analyzer::{tokenize, LexicalDiagnostic, LexicalMetrics, Lexer};
pub use scanner::Scanner;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

/// Tokenize with the built-in keywords and no constants
pub fn tokenize_source(source: &str) -> Option<TokenStream> {
    Lexer::new().tokenize(source)
}

/// Create a lexer with custom runtime preferences
pub fn create_lexer_with_preferences(preferences: LexicalPreferences) -> Lexer {
    Lexer::new().with_preferences(preferences)
}
