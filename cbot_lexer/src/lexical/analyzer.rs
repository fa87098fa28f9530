//! Stream builder and the lexer context owning the keyword and constant tables

use super::scanner::Scanner;
use crate::config::runtime::LexicalPreferences;
use crate::defines::{DefineResult, DefineTable};
use crate::keywords::{KeywordCategory, KeywordTable};
use crate::logging::codes::{self, Code};
use crate::logging::{self, LogEvent};
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::utils::{SourceMap, Span};
use crate::{log_debug, log_success};
use std::collections::HashMap;
use std::time::Instant;

/// Drive a scanner over `source` and collect its tokens.
///
/// The stream starts with the `Leading` token and ends with a Terminator
/// spanning the empty range at the end of the source. Returns `None` for
/// empty input.
pub fn tokenize(
    source: &str,
    keywords: &KeywordTable,
    defines: &DefineTable,
) -> Option<TokenStream> {
    let mut scanner = Scanner::new(source, keywords, defines);
    build_stream(&mut scanner)
}

fn build_stream(scanner: &mut Scanner<'_>) -> Option<TokenStream> {
    let head = scanner.next_token(true)?;
    let mut tokens = vec![head];

    while let Some(token) = scanner.next_token(false) {
        tokens.push(token);
    }

    tokens.push(Token::terminator(scanner.offset()));
    Some(TokenStream::from_tokens(tokens))
}

/// Counters for one tokenization
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub source_bytes: usize,
    pub keyword_tokens: usize,
    pub operator_tokens: usize,
    pub number_literals: usize,
    pub string_literals: usize,
    pub variables: usize,
    pub defined_constants: usize,
    pub comment_count: usize,
    pub unterminated_strings: usize,
    pub unterminated_comments: usize,
    pub duration_ms: f64,

    // Only filled with collect_detailed_metrics
    pub keyword_usage: HashMap<String, usize>,
    pub max_word_length: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        if matches!(token.kind, TokenKind::Leading | TokenKind::Terminator) {
            return;
        }
        self.total_tokens += 1;

        match token.kind {
            TokenKind::Keyword => {
                self.keyword_tokens += 1;
                if KeywordCategory::of_id(token.id) == Some(KeywordCategory::Operator) {
                    self.operator_tokens += 1;
                }
            }
            TokenKind::NumberLiteral => self.number_literals += 1,
            TokenKind::StringLiteral => {
                self.string_literals += 1;
                if token.is_unterminated_string() {
                    self.unterminated_strings += 1;
                }
            }
            TokenKind::Variable => self.variables += 1,
            TokenKind::DefinedConstant => self.defined_constants += 1,
            TokenKind::Leading | TokenKind::Terminator => {}
        }

        if preferences.collect_detailed_metrics {
            self.max_word_length = self.max_word_length.max(token.text.len());
            if token.kind == TokenKind::Keyword {
                *self.keyword_usage.entry(token.text.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// Recoverable problem found while tokenizing; the stream is still produced
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalDiagnostic {
    pub code: Code,
    pub message: &'static str,
    pub span: Span,
}

impl LexicalDiagnostic {
    fn new(code: Code, message: &'static str, span: Span) -> Self {
        Self {
            code,
            message,
            span,
        }
    }

    /// Render with the offending source line underlined
    pub fn render(&self, map: &SourceMap) -> String {
        let label = format!("warning[{}]", self.code);
        map.format_diagnostic(&self.span, &label, self.message)
    }

    fn dispatch(&self) {
        logging::dispatch(
            LogEvent::warning_with_code(self.code, self.message).with_span(self.span),
        );
    }
}

/// Tokenizer context for one host: the keyword table, the constant table
/// of the current compilation unit, and runtime preferences.
///
/// Independent lexers share nothing and may run on separate threads.
#[derive(Debug)]
pub struct Lexer {
    keywords: KeywordTable,
    defines: DefineTable,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
    diagnostics: Vec<LexicalDiagnostic>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::with_keywords(KeywordTable::builtin())
    }

    pub fn with_keywords(keywords: KeywordTable) -> Self {
        Self {
            keywords,
            defines: DefineTable::new(),
            preferences: LexicalPreferences::default(),
            metrics: LexicalMetrics::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: LexicalPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Drop loaded keywords; the next tokenization repopulates the table
    pub fn reset_keywords(&mut self) {
        self.keywords.reset();
    }

    pub fn defines(&self) -> &DefineTable {
        &self.defines
    }

    /// Bind a constant name for subsequent tokenizations
    pub fn define(&mut self, name: &str, value: i64) -> DefineResult<()> {
        self.defines.define(name, value)
    }

    /// Clear constants at the end of a compilation unit
    pub fn reset_defines(&mut self) {
        self.defines.reset();
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Metrics of the most recent tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Warnings from the most recent tokenization, in source order
    pub fn diagnostics(&self) -> &[LexicalDiagnostic] {
        &self.diagnostics
    }

    /// Tokenize `source`, or `None` if it is empty
    pub fn tokenize(&mut self, source: &str) -> Option<TokenStream> {
        let started = Instant::now();
        self.metrics = LexicalMetrics {
            source_bytes: source.len(),
            ..LexicalMetrics::default()
        };
        self.diagnostics.clear();

        let mut scanner = Scanner::new(source, &self.keywords, &self.defines);
        let Some(stream) = build_stream(&mut scanner) else {
            log_debug!("Empty source, no tokens produced");
            return None;
        };

        for token in &stream {
            self.metrics.record_token(token, &self.preferences);

            if self.preferences.trace_tokens {
                log_debug!("Token",
                    "kind" => token.kind,
                    "id" => token.id,
                    "span" => token.span,
                    "text" => &token.text
                );
            }

            if token.is_unterminated_string() {
                self.diagnostics.push(LexicalDiagnostic::new(
                    codes::lexical::UNTERMINATED_STRING,
                    "String literal is not closed",
                    token.span,
                ));
            }
        }

        self.metrics.comment_count = scanner.comment_count();
        if let Some(offset) = scanner.unterminated_comment() {
            self.metrics.unterminated_comments = 1;
            self.diagnostics.push(LexicalDiagnostic::new(
                codes::lexical::UNTERMINATED_COMMENT,
                "Block comment is not closed",
                Span::new(offset, source.len()),
            ));
        }
        self.diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);
        for diagnostic in &self.diagnostics {
            diagnostic.dispatch();
        }

        self.metrics.duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        log_success!(
            codes::success::TOKENIZATION_COMPLETE,
            "Tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "keywords" => self.metrics.keyword_tokens,
            "constants" => self.metrics.defined_constants,
            "bytes" => self.metrics.source_bytes,
            "duration_ms" => format!("{:.3}", self.metrics.duration_ms)
        );

        Some(stream)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::ids;
    use crate::logging::{with_scoped_logger, LogLevel, LoggingService, MemoryLogger};
    use std::sync::Arc;

    fn capture() -> (Arc<LoggingService>, Arc<MemoryLogger>) {
        let memory = Arc::new(MemoryLogger::new());
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
        (service, memory)
    }

    #[test]
    fn test_stream_ends_with_single_terminator() {
        let stream = Lexer::new().tokenize("int x = 3;").unwrap();
        let tokens = stream.tokens();
        let terminators = tokens.iter().filter(|t| t.is_terminator()).count();

        assert_eq!(terminators, 1);
        assert!(stream.terminator().is_terminator());
        assert_eq!(stream.terminator().span, Span::new(10, 10));
        assert_eq!(stream.terminator().id, -1);
        assert_eq!(stream.next_index(tokens.len() - 1), None);
    }

    #[test]
    fn test_empty_source_is_none() {
        assert!(Lexer::new().tokenize("").is_none());
    }

    #[test]
    fn test_spans_exclude_separator() {
        let source = "if (a) /* c */ b;";
        let stream = Lexer::new().tokenize(source).unwrap();

        for token in stream.tokens() {
            let raw = &source[token.span.start..token.span.end];
            assert_eq!(raw, token.text, "span mismatch for {:?}", token);
        }
        assert_eq!(stream.tokens()[4].separator, " /* c */ ");
    }

    #[test]
    fn test_running_offsets_cover_source() {
        let source = "  x\t= \"a\\tb\";// done";
        let stream = Lexer::new().tokenize(source).unwrap();

        let mut rebuilt = String::new();
        for token in stream.tokens() {
            rebuilt.push_str(&source[token.span.start..token.span.end]);
            rebuilt.push_str(&token.separator);
        }
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_defines_scoped_to_unit() {
        let mut lexer = Lexer::new();
        lexer.define("TitaniumOre", 4).unwrap();

        let stream = lexer.tokenize("TitaniumOre").unwrap();
        assert_eq!(stream.tokens()[1].kind, TokenKind::DefinedConstant);
        assert_eq!(stream.tokens()[1].id, 4);

        lexer.reset_defines();
        let stream = lexer.tokenize("TitaniumOre").unwrap();
        assert_eq!(stream.tokens()[1].kind, TokenKind::Variable);
        assert_eq!(stream.tokens()[1].id, -1);
    }

    #[test]
    fn test_metrics_count_kinds() {
        let mut lexer = Lexer::new();
        lexer.define("Max", 9).unwrap();
        lexer.tokenize("int x = Max + 1; // tail\n\"s\"").unwrap();

        let metrics = lexer.metrics();
        assert_eq!(metrics.total_tokens, 8);
        assert_eq!(metrics.keyword_tokens, 4);
        assert_eq!(metrics.operator_tokens, 3);
        assert_eq!(metrics.variables, 1);
        assert_eq!(metrics.defined_constants, 1);
        assert_eq!(metrics.number_literals, 1);
        assert_eq!(metrics.string_literals, 1);
        assert_eq!(metrics.comment_count, 1);
    }

    #[test]
    fn test_tokenization_logs_completion() {
        let (service, memory) = capture();
        with_scoped_logger(service, || {
            Lexer::new().tokenize("x;");
        });
        assert!(memory.has_success_with_code(codes::success::TOKENIZATION_COMPLETE));
    }

    #[test]
    fn test_unterminated_input_warns_but_succeeds() {
        let (service, memory) = capture();
        let stream = with_scoped_logger(service, || Lexer::new().tokenize("s = \"open\n/* also"));

        let stream = stream.unwrap();
        assert_eq!(stream.tokens()[3].text, "\"open");
        assert!(memory.has_warning_with_code(codes::lexical::UNTERMINATED_STRING));
        assert!(memory.has_warning_with_code(codes::lexical::UNTERMINATED_COMMENT));
    }

    #[test]
    fn test_unterminated_input_renders_diagnostics() {
        let source = "s = \"open\n/* also";
        let mut lexer = Lexer::new();
        lexer.tokenize(source).unwrap();

        let diagnostics = lexer.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code, codes::lexical::UNTERMINATED_STRING);
        assert_eq!(diagnostics[0].span, Span::new(4, 9));
        assert_eq!(diagnostics[1].code, codes::lexical::UNTERMINATED_COMMENT);
        assert_eq!(diagnostics[1].span, Span::new(10, 17));

        let map = SourceMap::new(source.to_string());
        let string = diagnostics[0].render(&map);
        assert!(string.starts_with("warning[E020]: String literal is not closed"));
        assert!(string.contains("--> 1:5"));
        assert!(string.contains("^^^^^"));
        assert!(diagnostics[1].render(&map).contains("--> 2:1"));

        lexer.tokenize("x;").unwrap();
        assert!(lexer.diagnostics().is_empty());
    }

    #[test]
    fn test_keyword_reset_repopulates() {
        let mut lexer = Lexer::new();
        lexer.tokenize("while");
        assert!(lexer.keywords().is_populated());

        lexer.reset_keywords();
        assert!(!lexer.keywords().is_populated());
        let stream = lexer.tokenize("while").unwrap();
        assert!(stream.tokens()[1].is_keyword(ids::WHILE));
    }

    #[test]
    fn test_free_tokenize_matches_lexer() {
        let keywords = KeywordTable::builtin();
        let defines = DefineTable::new();
        let source = "for (i = 0; i < 10; i++) {}";

        assert_eq!(
            tokenize(source, &keywords, &defines),
            Lexer::new().tokenize(source)
        );
    }
}
