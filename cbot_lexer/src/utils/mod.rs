//! Shared source-location primitives for the CBOT tokenizer

pub mod span;

pub use span::{Position, SourceMap, Span};
