//! Byte-level scanner producing one classified token per call

use crate::defines::DefineTable;
use crate::keywords::KeywordTable;
use crate::tokens::{Token, TokenKind};
use crate::utils::Span;

/// Bytes that end a generic word
const WORD_BOUNDARY: &[u8] = b" \r\n\t,:()[]{}-+*/=;><!~^|&%.";
/// Bytes absorbed into a separator
const WHITESPACE: &[u8] = b" \r\n\t";
/// Bytes that start an operator word
const OPERATOR_START: &[u8] = b",:()[]{}-+*/=;<>!~^|&%.";
/// Bytes that end a string literal
const STRING_END: &[u8] = b"\"\r\n\t";

fn is_word_boundary(byte: u8) -> bool {
    WORD_BOUNDARY.contains(&byte)
}

fn is_whitespace(byte: u8) -> bool {
    WHITESPACE.contains(&byte)
}

fn is_operator_start(byte: u8) -> bool {
    OPERATOR_START.contains(&byte)
}

/// States of the decimal/hex number grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    /// Integer or fraction digits; tracks whether `.` and exponent were seen
    Decimal { dot: bool, exponent: bool },
    Hex,
    /// Just after `e`/`E`: one optional sign
    ExponentSign { dot: bool },
    Done,
}

/// Walks a source string and hands out tokens one at a time.
///
/// The scanner only borrows the keyword and constant tables; it never
/// fails, and malformed input just produces odd tokens.
pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    offset: usize,
    keywords: &'a KeywordTable,
    defines: &'a DefineTable,
    comments: usize,
    unterminated_comment: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, keywords: &'a KeywordTable, defines: &'a DefineTable) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            offset: 0,
            keywords,
            defines,
            comments: 0,
            unterminated_comment: None,
        }
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// Comments absorbed into separators so far
    pub fn comment_count(&self) -> usize {
        self.comments
    }

    /// Start offset of a `/*` comment that ran to the end of input
    pub fn unterminated_comment(&self) -> Option<usize> {
        self.unterminated_comment
    }

    /// Scan the next word and its separator.
    ///
    /// With `first` set, produce the `Leading` token: empty text and the
    /// source's leading whitespace and comments as separator. Returns `None`
    /// at end of input, and for the bootstrap call only when the source is
    /// empty.
    pub fn next_token(&mut self, first: bool) -> Option<Token> {
        if self.is_at_end() {
            return None;
        }

        let start = self.offset;
        let text = if first { String::new() } else { self.scan_word() };
        let separator_start = self.offset;
        self.scan_separator();
        let separator = self.source[separator_start..self.offset].to_string();

        let (kind, id) = self.classify(&text, first);
        let span = Span::new(start, separator_start);
        Some(Token::new(text, separator, kind, id, span))
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.offset + ahead).copied()
    }

    fn scan_word(&mut self) -> String {
        let start = self.offset;
        match self.bytes[start] {
            b'"' => return self.scan_string(),
            b'0'..=b'9' => self.scan_number(),
            byte if is_operator_start(byte) => self.scan_operator(),
            _ => self.scan_generic(),
        }
        self.source[start..self.offset].to_string()
    }

    /// Opening quote, body up to a quote or line break, closing quote if any.
    /// Escapes are decoded in the returned text.
    fn scan_string(&mut self) -> String {
        let mut text = vec![b'"'];
        self.offset += 1;

        while let Some(byte) = self.peek() {
            if STRING_END.contains(&byte) {
                break;
            }
            self.offset += 1;

            if byte != b'\\' {
                text.push(byte);
                continue;
            }
            match self.peek() {
                Some(escaped) => {
                    self.offset += 1;
                    text.push(match escaped {
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        other => other,
                    });
                }
                None => text.push(b'\\'),
            }
        }

        if self.peek() == Some(b'"') {
            self.offset += 1;
            text.push(b'"');
        }

        // Only ASCII bytes are rewritten, so the bytes stay valid UTF-8
        String::from_utf8_lossy(&text).into_owned()
    }

    fn scan_number(&mut self) {
        let mut state = if self.peek() == Some(b'0') && self.peek_at(1) == Some(b'x') {
            self.offset += 2;
            NumberState::Hex
        } else {
            NumberState::Decimal {
                dot: false,
                exponent: false,
            }
        };

        while let Some(byte) = self.peek() {
            state = match state {
                NumberState::Hex if byte.is_ascii_hexdigit() => NumberState::Hex,
                NumberState::Decimal { dot, exponent } => match byte {
                    b'0'..=b'9' => NumberState::Decimal { dot, exponent },
                    b'.' if !dot => NumberState::Decimal {
                        dot: true,
                        exponent,
                    },
                    b'e' | b'E' if !exponent => NumberState::ExponentSign { dot },
                    _ => NumberState::Done,
                },
                NumberState::ExponentSign { dot } => {
                    let next = NumberState::Decimal {
                        dot,
                        exponent: true,
                    };
                    if byte != b'+' && byte != b'-' {
                        // no sign: let the decimal state judge this byte
                        state = next;
                        continue;
                    }
                    next
                }
                NumberState::Hex | NumberState::Done => NumberState::Done,
            };

            if state == NumberState::Done {
                break;
            }
            self.offset += 1;
        }
    }

    /// Longest operator spelling the keyword table knows, at least one byte
    fn scan_operator(&mut self) {
        let start = self.offset;
        self.offset += 1;

        while self.offset < self.bytes.len() {
            let extended = self
                .source
                .get(start..self.offset + 1)
                .map(|candidate| self.keywords.lookup(candidate))
                .unwrap_or(-1);
            if extended <= 0 {
                break;
            }
            self.offset += 1;
        }
    }

    fn scan_generic(&mut self) {
        while let Some(byte) = self.peek() {
            if is_word_boundary(byte) {
                break;
            }
            self.offset += 1;
        }
    }

    /// Whitespace, `//` line comments and `/* */` block comments, repeated
    fn scan_separator(&mut self) {
        loop {
            while self.peek().map(is_whitespace).unwrap_or(false) {
                self.offset += 1;
            }

            match (self.peek(), self.peek_at(1)) {
                (Some(b'/'), Some(b'/')) => {
                    self.comments += 1;
                    while self.peek().map(|b| b != b'\n').unwrap_or(false) {
                        self.offset += 1;
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    self.comments += 1;
                    self.scan_block_comment();
                }
                _ => break,
            }
        }
    }

    /// The closing `*/` is searched from the opening slash, so `/*/` is a
    /// complete comment.
    fn scan_block_comment(&mut self) {
        let start = self.offset;
        while let Some(byte) = self.peek() {
            if byte == b'*' && self.peek_at(1) == Some(b'/') {
                self.offset += 2;
                return;
            }
            self.offset += 1;
        }
        self.unterminated_comment = Some(start);
    }

    fn classify(&self, text: &str, first: bool) -> (TokenKind, i64) {
        let mut kind = match text.as_bytes().first().copied() {
            Some(b'0'..=b'9') => TokenKind::NumberLiteral,
            Some(b'"') => TokenKind::StringLiteral,
            _ => TokenKind::Variable,
        };
        if first {
            kind = TokenKind::Leading;
        }

        let id = self.keywords.lookup(text);
        if id > 0 {
            return (TokenKind::Keyword, id);
        }
        match self.defines.resolve(text) {
            Some(value) => (TokenKind::DefinedConstant, value),
            None => (kind, -1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::ids;

    fn scan_all(source: &str) -> Vec<Token> {
        let keywords = KeywordTable::builtin();
        let defines = DefineTable::new();
        scan_with(source, &keywords, &defines)
    }

    fn scan_with(source: &str, keywords: &KeywordTable, defines: &DefineTable) -> Vec<Token> {
        let mut scanner = Scanner::new(source, keywords, defines);
        let mut tokens = Vec::new();
        let mut first = true;
        while let Some(token) = scanner.next_token(first) {
            tokens.push(token);
            first = false;
        }
        tokens
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().skip(1).map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_bootstrap_carries_leading_separator() {
        let tokens = scan_all("  // intro\n x");
        assert_eq!(tokens[0].kind, TokenKind::Leading);
        assert_eq!(tokens[0].text, "");
        assert_eq!(tokens[0].separator, "  // intro\n ");
        assert_eq!(tokens[0].span, Span::new(0, 0));
        assert_eq!(texts(&tokens), vec!["x"]);
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let keywords = KeywordTable::builtin();
        let defines = DefineTable::new();
        let mut scanner = Scanner::new("", &keywords, &defines);
        assert!(scanner.next_token(true).is_none());
    }

    #[test]
    fn test_whitespace_only_source_has_head_only() {
        let tokens = scan_all(" \n\t");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].separator, " \n\t");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts(&scan_all("42")), vec!["42"]);
        assert_eq!(texts(&scan_all("3.14")), vec!["3.14"]);
        assert_eq!(texts(&scan_all("1.5e-3")), vec!["1.5e-3"]);
        assert_eq!(texts(&scan_all("2E+8")), vec!["2E+8"]);
        assert_eq!(texts(&scan_all("1e5.3")), vec!["1e5.3"]);
        assert_eq!(texts(&scan_all("1.2.3")), vec!["1.2", ".", "3"]);
        assert_eq!(texts(&scan_all("1e5e6")), vec!["1e5", "e6"]);
        assert_eq!(texts(&scan_all("7abc")), vec!["7", "abc"]);
    }

    #[test]
    fn test_hex_numbers_skip_dot_and_exponent() {
        assert_eq!(texts(&scan_all("0x1A.5")), vec!["0x1A", ".", "5"]);
        assert_eq!(texts(&scan_all("0xffE")), vec!["0xffE"]);
        assert_eq!(texts(&scan_all("0X1")), vec!["0", "X1"]);
        assert_eq!(texts(&scan_all("0x")), vec!["0x"]);
    }

    #[test]
    fn test_number_kind() {
        let tokens = scan_all("9 x1");
        assert_eq!(tokens[1].kind, TokenKind::NumberLiteral);
        assert_eq!(tokens[1].id, -1);
        assert_eq!(tokens[2].kind, TokenKind::Variable);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = scan_all(r#""a\tb\n\"q\\""#);
        assert_eq!(tokens[1].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[1].text, "\"a\tb\n\"q\\\"");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_unknown_escape_is_literal() {
        let tokens = scan_all(r#""\q""#);
        assert_eq!(tokens[1].text, "\"q\"");
    }

    #[test]
    fn test_string_stops_at_line_break_and_tab() {
        let tokens = scan_all("\"abc\nx");
        assert_eq!(tokens[1].text, "\"abc");
        assert_eq!(tokens[1].separator, "\n");
        assert_eq!(tokens[2].text, "x");

        let tokens = scan_all("\"a\tb\"");
        assert_eq!(tokens[1].text, "\"a");
    }

    #[test]
    fn test_trailing_backslash_kept() {
        let tokens = scan_all("\"ab\\");
        assert_eq!(tokens[1].text, "\"ab\\");
        assert!(tokens[1].is_unterminated_string());
    }

    #[test]
    fn test_string_span_counts_raw_bytes() {
        let tokens = scan_all(r#""\n" x"#);
        assert_eq!(tokens[1].span, Span::new(0, 4));
        assert_eq!(tokens[1].text.len(), 3);
        assert_eq!(tokens[2].span, Span::new(5, 6));
    }

    #[test]
    fn test_operator_maximal_munch() {
        let tokens = scan_all("a==b");
        assert_eq!(texts(&tokens), vec!["a", "==", "b"]);
        assert_eq!(tokens[2].id, ids::EQ);

        assert_eq!(texts(&scan_all(">>>=")), vec![">>>="]);
        assert_eq!(texts(&scan_all("x>>>y")), vec!["x", ">>>", "y"]);
        assert_eq!(texts(&scan_all("!=!")), vec!["!=", "!"]);
        assert_eq!(texts(&scan_all("a+++b")), vec!["a", "++", "+", "b"]);
    }

    #[test]
    fn test_ellipsis_is_three_dots() {
        // ".." is not a keyword, so munch never reaches "..."
        assert_eq!(texts(&scan_all("...")), vec![".", ".", "."]);
    }

    #[test]
    fn test_operator_munch_needs_keyword() {
        let keywords = KeywordTable::new(
            crate::keywords::TableStrings::new(vec![], vec![], vec![], vec!["=".to_string()])
                .unwrap(),
        );
        let defines = DefineTable::new();
        let tokens = scan_with("==", &keywords, &defines);
        assert_eq!(texts(&tokens), vec!["=", "="]);
    }

    #[test]
    fn test_generic_words() {
        assert_eq!(texts(&scan_all("goto(x)")), vec!["goto", "(", "x", ")"]);
        assert_eq!(texts(&scan_all("a?b")), vec!["a?b"]);
        assert_eq!(texts(&scan_all("r\u{e9}sum\u{e9}+1")), vec!["r\u{e9}sum\u{e9}", "+", "1"]);
    }

    #[test]
    fn test_line_comment_separator() {
        let tokens = scan_all("a //comment\nb");
        assert_eq!(tokens[1].text, "a");
        assert_eq!(tokens[1].separator, " //comment\n");
        assert_eq!(tokens[2].text, "b");
    }

    #[test]
    fn test_block_comment_separator() {
        let tokens = scan_all("a /*x*/b");
        assert_eq!(tokens[1].separator, " /*x*/");
        assert_eq!(tokens[2].text, "b");
    }

    #[test]
    fn test_slash_star_slash_closes() {
        let tokens = scan_all("a /*/ b");
        assert_eq!(tokens[1].separator, " /*/ ");
        assert_eq!(tokens[2].text, "b");
    }

    #[test]
    fn test_repeated_comments_fold_into_one_separator() {
        let keywords = KeywordTable::builtin();
        let defines = DefineTable::new();
        let mut scanner = Scanner::new("a // one\n/* two */ // three\nb", &keywords, &defines);
        scanner.next_token(true);
        let a = scanner.next_token(false).unwrap();
        assert_eq!(a.separator, " // one\n/* two */ // three\n");
        assert_eq!(scanner.comment_count(), 3);
        assert!(scanner.unterminated_comment().is_none());
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let keywords = KeywordTable::builtin();
        let defines = DefineTable::new();
        let mut scanner = Scanner::new("a /* open *", &keywords, &defines);
        scanner.next_token(true);
        let a = scanner.next_token(false).unwrap();
        assert_eq!(a.separator, " /* open *");
        assert_eq!(scanner.unterminated_comment(), Some(2));
        assert!(scanner.next_token(false).is_none());
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(texts(&scan_all("a/b")), vec!["a", "/", "b"]);
        assert_eq!(texts(&scan_all("a/=b")), vec!["a", "/=", "b"]);
    }

    #[test]
    fn test_keywords_beat_defines() {
        let keywords = KeywordTable::builtin();
        let mut defines = DefineTable::new();
        defines.define("while", 9).unwrap();
        defines.define("TitaniumOre", 7).unwrap();

        let tokens = scan_with("while TitaniumOre", &keywords, &defines);
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].id, ids::WHILE);
        assert_eq!(tokens[2].kind, TokenKind::DefinedConstant);
        assert_eq!(tokens[2].id, 7);
    }
}
