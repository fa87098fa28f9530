//! Token model for CBOT source
//!
//! Tokenizing produces a [`TokenStream`]: one owned vector of [`Token`]s that
//! always starts with a `Leading` token and ends with a `Terminator`. The
//! whitespace and comments after each word are stored on that word's token,
//! so concatenating `text + separator` over the stream reproduces the source.
//!
//! Parsers walk the stream with a [`TokenCursor`], which answers the
//! "what type is the current token" queries and advances on a match.

pub mod token;
pub mod token_stream;

pub use token::{type_codes, Token, TokenKind};
pub use token_stream::{TokenCursor, TokenStream};
