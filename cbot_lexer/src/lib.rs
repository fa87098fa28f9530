// Internal modules
pub mod config;
pub mod defines;
pub mod keywords;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod source;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use defines::{DefineError, DefineTable};
pub use keywords::{KeywordTable, StringProvider};
pub use lexical::{tokenize, LexicalDiagnostic, Lexer};
pub use source::{SourceError, SourceLoader, SourceText};
pub use tokens::{Token, TokenCursor, TokenKind, TokenStream};
pub use utils::Span;
