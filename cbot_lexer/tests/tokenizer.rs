//! End-to-end tokenizer behavior through the public API

use cbot_lexer::keywords::{ids, KeywordTable, TableStrings};
use cbot_lexer::source::SourceLoader;
use cbot_lexer::tokens::type_codes;
use cbot_lexer::{DefineError, Lexer, TokenKind, TokenStream};
use std::io::Write;

fn lex(source: &str) -> TokenStream {
    Lexer::new().tokenize(source).expect("non-empty source")
}

fn words(stream: &TokenStream) -> Vec<(&str, TokenKind)> {
    stream
        .words()
        .map(|token| (token.text.as_str(), token.kind))
        .collect()
}

const SCRIPT: &str = "extern void object::Miner()\n\
{\n\
    // find ore\n\
    object item = radar(TitaniumOre);\n\
    /* walk there */\n\
    float d = distance(position, item.position) * 1.5e2;\n\
    if (d >= 0x10 && !busy) { message(\"go!\"); }\n\
}\n";

#[test]
fn reconstructs_source_without_escapes() {
    let stream = lex(SCRIPT);
    assert_eq!(stream.reconstruct(), SCRIPT);
}

#[test]
fn spans_plus_separators_reproduce_source_with_escapes() {
    let source = "s = \"tab\\there\\n\" + \"q\\\"\";  // end";
    let stream = lex(source);

    let mut rebuilt = String::new();
    for token in stream.tokens() {
        rebuilt.push_str(&source[token.span.start..token.span.end]);
        rebuilt.push_str(&token.separator);
    }
    assert_eq!(rebuilt, source);
}

#[test]
fn every_keyword_spelling_scans_to_itself() {
    let keywords = KeywordTable::builtin();
    let mut lexer = Lexer::new();

    for (spelling, id) in keywords.iter() {
        assert!(id > 0);
        let stream = lexer.tokenize(spelling).unwrap();
        let scanned: Vec<_> = stream.words().collect();

        // "..." has no ".." prefix keyword, so it splits into dots
        if spelling == "..." {
            assert_eq!(scanned.len(), 3);
            continue;
        }
        assert_eq!(scanned.len(), 1, "spelling {:?}", spelling);
        assert_eq!(scanned[0].kind, TokenKind::Keyword);
        assert_eq!(scanned[0].id, id);
    }
}

#[test]
fn script_classification() {
    let mut lexer = Lexer::new();
    lexer.define("TitaniumOre", 1).unwrap();
    let stream = lexer.tokenize(SCRIPT).unwrap();
    let tokens = words(&stream);

    assert_eq!(tokens[0], ("extern", TokenKind::Keyword));
    assert_eq!(tokens[2], ("object", TokenKind::Variable));
    assert_eq!(tokens[3], (":", TokenKind::Keyword));
    assert_eq!(tokens[4], (":", TokenKind::Keyword));
    assert!(tokens.contains(&("TitaniumOre", TokenKind::DefinedConstant)));
    assert!(tokens.contains(&("1.5e2", TokenKind::NumberLiteral)));
    assert!(tokens.contains(&("0x10", TokenKind::NumberLiteral)));
    assert!(tokens.contains(&(">=", TokenKind::Keyword)));
    assert!(tokens.contains(&("&&", TokenKind::Keyword)));
    assert!(tokens.contains(&("\"go!\"", TokenKind::StringLiteral)));
}

#[test]
fn digits_start_numbers() {
    for source in ["0", "12", "3.5", "4e10", "0xFF", "9abc"] {
        let stream = lex(source);
        assert_eq!(stream.tokens()[1].kind, TokenKind::NumberLiteral, "{}", source);
    }
}

#[test]
fn hex_literal_stops_at_dot() {
    let stream = lex("0x1A.5");
    assert_eq!(
        words(&stream),
        vec![
            ("0x1A", TokenKind::NumberLiteral),
            (".", TokenKind::Keyword),
            ("5", TokenKind::NumberLiteral),
        ]
    );
}

#[test]
fn define_resolve_reset_cycle() {
    let mut lexer = Lexer::new();
    lexer.define("Limit", 42).unwrap();
    assert_eq!(lexer.defines().resolve("Limit"), Some(42));

    let second = lexer.define("Limit", 43);
    assert!(matches!(second, Err(DefineError::Duplicate { .. })));

    lexer.reset_defines();
    assert_eq!(lexer.defines().resolve("Limit"), None);
}

#[test]
fn equality_scans_as_one_token() {
    let strings = TableStrings::new(
        vec![],
        vec![],
        vec![],
        vec!["=".to_string(), "==".to_string()],
    )
    .unwrap();
    let mut lexer = Lexer::with_keywords(KeywordTable::new(strings));

    let stream = lexer.tokenize("a==b").unwrap();
    let texts: Vec<&str> = stream.words().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "==", "b"]);
    assert_eq!(stream.tokens()[2].id, 2301);
}

#[test]
fn comments_fold_into_separators() {
    let stream = lex("a //comment\nb");
    assert_eq!(stream.tokens()[1].text, "a");
    assert_eq!(stream.tokens()[1].separator, " //comment\n");
    assert_eq!(stream.tokens()[2].text, "b");

    let stream = lex("a /*x*/b");
    assert_eq!(stream.tokens()[1].separator, " /*x*/");
    assert_eq!(stream.tokens()[2].text, "b");
}

#[test]
fn backslash_t_becomes_tab() {
    let stream = lex("\"a\\tb\"");
    let token = &stream.tokens()[1];
    assert_eq!(token.kind, TokenKind::StringLiteral);
    assert_eq!(token.text, "\"a\tb\"");
    assert_eq!(token.string_content(), Some("a\tb"));
}

#[test]
fn last_token_is_terminator() {
    for source in ["x", " ", "// only a comment", "a + b", "\"open"] {
        let stream = lex(source);
        let last = stream.tokens().last().unwrap();
        assert_eq!(last.kind, TokenKind::Terminator, "{:?}", source);
        assert!(last.text.is_empty());
        assert_eq!(stream.next_index(stream.len() - 1), None);
    }
}

#[test]
fn empty_source_produces_no_stream() {
    assert!(Lexer::new().tokenize("").is_none());
}

#[test]
fn cursor_drives_a_simple_parse() {
    let stream = lex("int count = 3;");
    let mut cursor = stream.cursor();

    assert!(cursor.is_of_type(ids::INT, ids::FLOAT));
    assert!(cursor.is_of_type(type_codes::VARIABLE, type_codes::VARIABLE));
    assert!(cursor.is_of_type_list(&[ids::ASSIGN, ids::ASSIGN_ADD]));
    assert!(cursor.is_of_type(type_codes::NUMBER, type_codes::NUMBER));
    assert!(cursor.is_of_type(ids::SEMICOLON, ids::SEMICOLON));

    assert_eq!(cursor.kind(), Some(TokenKind::Terminator));
    assert_eq!(cursor.type_code(), 0);
    cursor.next();
    assert!(cursor.is_absent());
    assert_eq!(cursor.start(), -1);
    assert_eq!(cursor.end(), -1);
}

#[test]
fn loads_and_tokenizes_a_script_file() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(SCRIPT.as_bytes()).unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let source = SourceLoader::new().load(&path).unwrap();
    let stream = Lexer::new().tokenize(&source.text).unwrap();
    assert_eq!(stream.reconstruct(), SCRIPT);
}

#[test]
fn loaded_script_warnings_point_at_source_lines() {
    let mut file = tempfile::Builder::new().suffix(".cbot").tempfile().unwrap();
    file.write_all(b"int a;\nmessage(\"hi);\n").unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let source = SourceLoader::new().load(&path).unwrap();
    let mut lexer = Lexer::new();
    lexer.tokenize(&source.text).unwrap();

    let diagnostics = lexer.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let rendered = diagnostics[0].render(&source.source_map());
    assert!(rendered.contains("--> 2:9"));
    assert!(rendered.contains("2 | message(\"hi);"));
}

#[test]
fn streams_serialize_to_json() {
    let stream = lex("x = 1;");
    let json = serde_json::to_value(&stream).unwrap();
    let tokens = json.as_array().unwrap();

    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[0]["kind"], "leading");
    assert_eq!(tokens[2]["kind"], "keyword");
    assert_eq!(tokens[5]["kind"], "terminator");
    assert_eq!(tokens[1]["span"]["start"], 0);
}
