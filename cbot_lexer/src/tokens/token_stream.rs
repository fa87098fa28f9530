//! Owned token sequence and the cursor parsers walk it with

use super::token::{type_codes, Token, TokenKind};
use crate::config::compile_time::lexical::MAX_TYPE_LIST_CANDIDATES;
use crate::utils::Span;
use serde::Serialize;

/// Tokens of one source, head first, Terminator last.
///
/// Neighbor links are indices into the backing vector: the token after
/// `tokens[i]` is `tokens[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wrap scanned tokens; `tokens` must start with the head and end with
    /// the Terminator.
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        debug_assert!(
            tokens.last().map(Token::is_terminator).unwrap_or(false),
            "token stream must end in a terminator"
        );
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// The `Leading` token carrying the source's leading separator
    pub fn head(&self) -> &Token {
        &self.tokens[0]
    }

    pub fn terminator(&self) -> &Token {
        &self.tokens[self.tokens.len() - 1]
    }

    /// Number of tokens, head and Terminator included
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.tokens.len()).then_some(next)
    }

    pub fn prev_index(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }

    /// Tokens between the head and the Terminator
    pub fn words(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(|token| !matches!(token.kind, TokenKind::Leading | TokenKind::Terminator))
    }

    /// Concatenation of every token's text and separator
    pub fn reconstruct(&self) -> String {
        let capacity = self
            .tokens
            .iter()
            .map(|token| token.text.len() + token.separator.len())
            .sum();
        let mut text = String::with_capacity(capacity);
        for token in &self.tokens {
            text.push_str(&token.text);
            text.push_str(&token.separator);
        }
        text
    }

    /// Cursor on the token after the head, where parsing starts
    pub fn cursor(&self) -> TokenCursor<'_> {
        TokenCursor::at(self, self.next_index(0))
    }

    /// Cursor on the head token
    pub fn cursor_at_head(&self) -> TokenCursor<'_> {
        TokenCursor::at(self, Some(0))
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Position in a [`TokenStream`], possibly past either end.
///
/// An absent cursor answers every query with a sentinel: type code 0,
/// start and end -1, empty text.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a> {
    stream: &'a TokenStream,
    index: Option<usize>,
}

impl<'a> TokenCursor<'a> {
    pub fn at(stream: &'a TokenStream, index: Option<usize>) -> Self {
        let index = index.filter(|i| *i < stream.len());
        Self { stream, index }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn token(&self) -> Option<&'a Token> {
        self.index.and_then(|i| self.stream.get(i))
    }

    pub fn is_absent(&self) -> bool {
        self.index.is_none()
    }

    pub fn kind(&self) -> Option<TokenKind> {
        self.token().map(|token| token.kind)
    }

    pub fn text(&self) -> &'a str {
        self.token().map(|token| token.text.as_str()).unwrap_or("")
    }

    pub fn separator(&self) -> &'a str {
        self.token()
            .map(|token| token.separator.as_str())
            .unwrap_or("")
    }

    pub fn id(&self) -> i64 {
        self.token().map(|token| token.id).unwrap_or(-1)
    }

    pub fn span(&self) -> Option<Span> {
        self.token().map(|token| token.span)
    }

    pub fn start(&self) -> i64 {
        self.span().map(|span| span.start as i64).unwrap_or(-1)
    }

    pub fn end(&self) -> i64 {
        self.span().map(|span| span.end as i64).unwrap_or(-1)
    }

    /// Effective type of the current token, 0 when absent
    pub fn type_code(&self) -> i64 {
        self.token()
            .map(Token::effective_type)
            .unwrap_or(type_codes::NONE)
    }

    /// Move forward; stepping past the Terminator makes the cursor absent.
    /// An absent cursor stays absent.
    pub fn next(&mut self) -> Option<&'a Token> {
        self.index = self.index.and_then(|i| self.stream.next_index(i));
        self.token()
    }

    /// Move back; stepping before the head makes the cursor absent
    pub fn prev(&mut self) -> Option<&'a Token> {
        self.index = self.index.and_then(|i| self.stream.prev_index(i));
        self.token()
    }

    /// Advance past the current token if its effective type is `a` or `b`.
    /// An absent cursor has type 0 and stays absent when it matches.
    pub fn is_of_type(&mut self, a: i64, b: i64) -> bool {
        let current = self.type_code();
        if current == a || current == b {
            self.next();
            return true;
        }
        false
    }

    /// Advance past the current token if its effective type is among the
    /// first `MAX_TYPE_LIST_CANDIDATES` entries of `types`
    pub fn is_of_type_list(&mut self, types: &[i64]) -> bool {
        let current = self.type_code();
        let matched = types
            .iter()
            .take(MAX_TYPE_LIST_CANDIDATES)
            .any(|candidate| *candidate == current);
        if matched {
            self.next();
        }
        matched
    }
}
