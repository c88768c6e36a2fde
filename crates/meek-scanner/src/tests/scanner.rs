use super::*;

fn kinds(text: &str) -> Vec<TokenKind> {
    let mut scanner = Scanner::new(text);
    let mut out = Vec::new();
    loop {
        let token = scanner.consume_token();
        let done = token.kind == TokenKind::Eof;
        out.push(token.kind);
        if done {
            break;
        }
    }
    out
}

#[test]
fn scans_an_empty_source_to_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn scans_a_simple_function_signature() {
    let got = kinds("fn add(a: int, b: int) -> int {}");
    assert_eq!(
        got,
        vec![
            TokenKind::Fn,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Int,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Int,
            TokenKind::CloseParen,
            TokenKind::Arrow,
            TokenKind::Int,
            TokenKind::OpenBrace,
            TokenKind::CloseBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn line_comments_are_skipped() {
    assert_eq!(kinds("1 // trailing comment\n2"), vec![
        TokenKind::IntLiteral,
        TokenKind::IntLiteral,
        TokenKind::Eof,
    ]);
}

#[test]
fn unterminated_block_comment_is_an_error_token() {
    let mut scanner = Scanner::new("/* never closed");
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::Error);
    assert_eq!(
        token.payload,
        TokenPayload::ScanError(ScanErrorKind::UNTERMINATED_BLOCK_COMMENT)
    );
}

#[test]
fn int_literal_carries_its_parsed_value() {
    let mut scanner = Scanner::new("42");
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::IntLiteral);
    assert_eq!(token.payload, TokenPayload::Int(42));
}

#[test]
fn float_literal_carries_its_parsed_value() {
    let mut scanner = Scanner::new("3.5");
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::FloatLiteral);
    assert_eq!(token.payload, TokenPayload::Float(3.5));
}

#[test]
fn float_with_two_decimal_points_is_a_scan_error() {
    let mut scanner = Scanner::new("1.2.3");
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::Error);
    assert_eq!(
        token.payload,
        TokenPayload::ScanError(ScanErrorKind::FLOAT_MULTIPLE_DECIMALS)
    );
}

#[test]
fn bool_literals_are_keywords_with_a_payload() {
    let mut scanner = Scanner::new("true false");
    let a = scanner.consume_token();
    let b = scanner.consume_token();
    assert_eq!(a.payload, TokenPayload::Bool(true));
    assert_eq!(b.payload, TokenPayload::Bool(false));
}

#[test]
fn string_literal_decodes_escapes() {
    let mut scanner = Scanner::new(r#""hello\nworld""#);
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::StringLiteral);
    assert_eq!(token.payload, TokenPayload::Str("hello\nworld".to_string()));
}

#[test]
fn unterminated_string_is_a_scan_error() {
    let mut scanner = Scanner::new("\"abc");
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::Error);
    assert_eq!(
        token.payload,
        TokenPayload::ScanError(ScanErrorKind::UNTERMINATED_STRING)
    );
}

#[test]
fn string_literal_cannot_span_a_newline() {
    let mut scanner = Scanner::new("\"abc\ndef\"");
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::Error);
    assert_eq!(
        token.payload,
        TokenPayload::ScanError(ScanErrorKind::MULTILINE_STRING)
    );
}

#[test]
fn hash_prefixed_logical_operators_are_recognized() {
    assert_eq!(
        kinds("#and #or #xor"),
        vec![
            TokenKind::HashAnd,
            TokenKind::HashOr,
            TokenKind::HashXor,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lone_hash_is_an_invalid_character_error() {
    let mut scanner = Scanner::new("#!");
    let token = scanner.consume_token();
    assert_eq!(token.kind, TokenKind::Error);
    assert_eq!(
        token.payload,
        TokenPayload::ScanError(ScanErrorKind::INVALID_CHARACTER)
    );
}

#[test]
fn two_character_operators_are_preferred_over_their_prefix() {
    assert_eq!(
        kinds("a += 1 == b"),
        vec![
            TokenKind::Identifier,
            TokenKind::PlusEqual,
            TokenKind::IntLiteral,
            TokenKind::EqualEqual,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn arrow_is_distinguished_from_minus() {
    assert_eq!(
        kinds("a -> b - c"),
        vec![
            TokenKind::Identifier,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::Minus,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn peek_token_does_not_consume() {
    let mut scanner = Scanner::new("1 2");
    assert_eq!(scanner.peek_token(0), TokenKind::IntLiteral);
    assert_eq!(scanner.peek_token(1), TokenKind::IntLiteral);
    let first = scanner.consume_token();
    assert_eq!(first.payload, TokenPayload::Int(1));
    assert_eq!(scanner.peek_token(0), TokenKind::IntLiteral);
}

#[test]
fn try_consume_token_only_advances_on_match() {
    let mut scanner = Scanner::new("(1)");
    assert!(scanner.try_consume_token(TokenKind::CloseParen).is_none());
    assert!(scanner.try_consume_token(TokenKind::OpenParen).is_some());
    let int = scanner.try_consume_token(TokenKind::IntLiteral);
    assert_eq!(int.unwrap().payload, TokenPayload::Int(1));
    assert!(scanner.try_consume_token(TokenKind::CloseParen).is_some());
}

#[test]
fn prev_token_start_end_tracks_the_last_consumed_span() {
    let mut scanner = Scanner::new("12 345");
    let first = scanner.consume_token();
    assert_eq!(scanner.prev_token_start_end(), first.span);
    let second = scanner.consume_token();
    assert_eq!(scanner.prev_token_start_end(), second.span);
}

#[test]
fn is_finished_reports_end_of_input() {
    let mut scanner = Scanner::new("1");
    assert!(!scanner.is_finished());
    scanner.consume_token();
    assert!(scanner.is_finished());
}

#[test]
fn invalid_character_is_reported_and_skipped() {
    assert_eq!(
        kinds("1 @ 2"),
        vec![
            TokenKind::IntLiteral,
            TokenKind::Error,
            TokenKind::IntLiteral,
            TokenKind::Eof,
        ]
    );
}
