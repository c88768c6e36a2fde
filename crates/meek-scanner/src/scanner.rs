//! A hand-written character scanner producing the classified token stream
//! the parser consumes (`spec.md` §6). The scanning *algorithm* is not a
//! subject of this design exercise (`spec.md` §1 treats the scanner as an
//! external collaborator), but a real implementation is kept here so the
//! CLI has something to tokenize with.

use crate::token::{ScanErrorKind, Token, TokenKind, TokenPayload};
use meek_common::Span;
use std::collections::VecDeque;

/// Scans Meek source text into a token stream, buffering enough lookahead
/// for the parser's LL(2) grammar (`spec.md` §4.1).
pub struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: u32,
    lookahead: VecDeque<Token>,
    prev_span: Span,
    pending_comment_error: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Scanner {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            lookahead: VecDeque::new(),
            prev_span: Span::at(0),
            pending_comment_error: false,
        }
    }

    pub fn source_text(&self) -> &'a str {
        self.text
    }

    /// `peekToken(scanner, lookahead)` — classify the token `lookahead`
    /// positions ahead without consuming it.
    pub fn peek_token(&mut self, lookahead: usize) -> TokenKind {
        self.peek_token_full(lookahead).kind
    }

    pub fn peek_token_full(&mut self, lookahead: usize) -> &Token {
        self.fill_to(lookahead);
        &self.lookahead[lookahead]
    }

    /// `peekTokenStartEnd(scanner)` — span of the next (unconsumed) token.
    pub fn peek_token_start_end(&mut self) -> Span {
        self.peek_token_full(0).span
    }

    /// `prevTokenStartEnd(scanner)` — span of the most recently consumed
    /// token.
    pub fn prev_token_start_end(&self) -> Span {
        self.prev_span
    }

    /// `tryConsumeToken(scanner, kind)` — consume and return `Some` iff
    /// the next token matches `kind`.
    pub fn try_consume_token(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_token(0) == kind {
            Some(self.consume_token())
        } else {
            None
        }
    }

    /// Like [`Self::try_consume_token`] but matching any of several kinds.
    pub fn try_consume_token_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        let next = self.peek_token(0);
        if kinds.contains(&next) {
            Some(self.consume_token())
        } else {
            None
        }
    }

    /// `consumeToken(scanner)` — unconditionally advance and return the
    /// consumed token.
    pub fn consume_token(&mut self) -> Token {
        self.fill_to(0);
        let token = self.lookahead.pop_front().expect("filled above");
        self.prev_span = token.span;
        token
    }

    /// `isFinished(scanner)` — end-of-input.
    pub fn is_finished(&mut self) -> bool {
        self.peek_token(0) == TokenKind::Eof
    }

    fn fill_to(&mut self, lookahead: usize) {
        while self.lookahead.len() <= lookahead {
            let token = self.scan_one();
            let is_eof = token.kind == TokenKind::Eof;
            self.lookahead.push_back(token);
            if is_eof {
                break;
            }
        }
        // Once EOF has been produced, every further lookahead slot also
        // reports EOF with the same (empty) span.
        while self.lookahead.len() <= lookahead {
            let eof = self.lookahead.back().cloned().unwrap();
            self.lookahead.push_back(eof);
        }
    }

    fn peek_byte(&self, offset: u32) -> Option<u8> {
        self.bytes.get((self.pos + offset) as usize).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek_byte(0)?;
        self.pos += 1;
        Some(b)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte(0) {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.pos += 1;
                }
                Some(b'/') if self.peek_byte(1) == Some(b'/') => {
                    self.pos += 2;
                    while !matches!(self.peek_byte(0), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_byte(1) == Some(b'*') => {
                    self.pos += 2;
                    let mut terminated = false;
                    while let Some(b) = self.peek_byte(0) {
                        if b == b'*' && self.peek_byte(1) == Some(b'/') {
                            self.pos += 2;
                            terminated = true;
                            break;
                        }
                        self.pos += 1;
                    }
                    if !terminated {
                        // Unterminated block comment consumes the rest of
                        // the buffer; the caller's next `scan_one` will
                        // observe EOF. We don't synthesize an error token
                        // here because trivia is never itself a token —
                        // instead the next real scan records it.
                        self.pending_comment_error = true;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_one(&mut self) -> Token {
        self.skip_trivia();

        if self.pending_comment_error {
            self.pending_comment_error = false;
            let span = Span::at(self.pos);
            return Token {
                kind: TokenKind::Error,
                span,
                payload: TokenPayload::ScanError(ScanErrorKind::UNTERMINATED_BLOCK_COMMENT),
            };
        }

        let start = self.pos;
        let Some(first) = self.peek_byte(0) else {
            return Token::new(TokenKind::Eof, Span::at(start));
        };

        if first.is_ascii_digit() {
            return self.scan_number(start);
        }
        if first == b'"' {
            return self.scan_string(start);
        }
        if first == b'_' || first.is_ascii_alphabetic() {
            return self.scan_identifier_or_keyword(start);
        }
        if first == b'#' {
            return self.scan_hash_operator(start);
        }

        self.scan_punctuation(start)
    }

    fn scan_identifier_or_keyword(&mut self, start: u32) -> Token {
        while matches!(self.peek_byte(0), Some(b) if b == b'_' || b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        let span = Span::new(start, self.pos);
        let lexeme = span.slice(self.text);

        if lexeme == "true" || lexeme == "false" {
            return Token {
                kind: TokenKind::BoolLiteral,
                span,
                payload: TokenPayload::Bool(lexeme == "true"),
            };
        }
        for (kw, kind) in TokenKind::KEYWORDS {
            if *kw == lexeme {
                return Token::new(*kind, span);
            }
        }
        Token::new(TokenKind::Identifier, span)
    }

    fn scan_number(&mut self, start: u32) -> Token {
        while matches!(self.peek_byte(0), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }

        let mut is_float = false;
        let mut multiple_decimals = false;
        if self.peek_byte(0) == Some(b'.') && matches!(self.peek_byte(1), Some(b) if b.is_ascii_digit())
        {
            is_float = true;
            self.pos += 1; // '.'
            while matches!(self.peek_byte(0), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            // A second decimal point directly continuing the literal is a
            // malformed float (e.g. `1.2.3`); consume it too so recovery
            // resynchronizes past the whole mess.
            if self.peek_byte(0) == Some(b'.')
                && matches!(self.peek_byte(1), Some(b) if b.is_ascii_digit())
            {
                multiple_decimals = true;
                while self.peek_byte(0) == Some(b'.') {
                    self.pos += 1;
                    while matches!(self.peek_byte(0), Some(b) if b.is_ascii_digit()) {
                        self.pos += 1;
                    }
                }
            }
        }

        let span = Span::new(start, self.pos);
        let lexeme = span.slice(self.text);

        if multiple_decimals {
            return Token {
                kind: TokenKind::Error,
                span,
                payload: TokenPayload::ScanError(ScanErrorKind::FLOAT_MULTIPLE_DECIMALS),
            };
        }

        if is_float {
            match lexeme.parse::<f64>() {
                Ok(value) => Token {
                    kind: TokenKind::FloatLiteral,
                    span,
                    payload: TokenPayload::Float(value),
                },
                Err(_) => Token {
                    kind: TokenKind::Error,
                    span,
                    payload: TokenPayload::ScanError(ScanErrorKind::FLOAT_OUT_OF_RANGE),
                },
            }
        } else {
            match lexeme.parse::<i64>() {
                Ok(value) => Token {
                    kind: TokenKind::IntLiteral,
                    span,
                    payload: TokenPayload::Int(value),
                },
                Err(_) => Token {
                    kind: TokenKind::Error,
                    span,
                    payload: TokenPayload::ScanError(ScanErrorKind::INT_OUT_OF_RANGE),
                },
            }
        }
    }

    fn scan_string(&mut self, start: u32) -> Token {
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.peek_byte(0) {
                None => {
                    let span = Span::new(start, self.pos);
                    return Token {
                        kind: TokenKind::Error,
                        span,
                        payload: TokenPayload::ScanError(ScanErrorKind::UNTERMINATED_STRING),
                    };
                }
                Some(b'\n') => {
                    let span = Span::new(start, self.pos);
                    return Token {
                        kind: TokenKind::Error,
                        span,
                        payload: TokenPayload::ScanError(ScanErrorKind::MULTILINE_STRING),
                    };
                }
                Some(b'"') => {
                    self.pos += 1;
                    let span = Span::new(start, self.pos);
                    return Token {
                        kind: TokenKind::StringLiteral,
                        span,
                        payload: TokenPayload::Str(value),
                    };
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let escaped = self.advance();
                    value.push(match escaped {
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        Some(b'"') => '"',
                        Some(b'\\') => '\\',
                        Some(other) => other as char,
                        None => break,
                    });
                }
                Some(_) => {
                    let ch_start = self.pos as usize;
                    let ch = self.text[ch_start..].chars().next().unwrap();
                    self.pos += ch.len_utf8() as u32;
                    value.push(ch);
                }
            }
        }
        let span = Span::new(start, self.pos);
        Token {
            kind: TokenKind::Error,
            span,
            payload: TokenPayload::ScanError(ScanErrorKind::UNTERMINATED_STRING),
        }
    }

    fn scan_hash_operator(&mut self, start: u32) -> Token {
        self.pos += 1; // '#'
        let word_start = self.pos;
        while matches!(self.peek_byte(0), Some(b) if b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word = Span::new(word_start, self.pos).slice(self.text);
        let kind = match word {
            "and" => Some(TokenKind::HashAnd),
            "or" => Some(TokenKind::HashOr),
            "xor" => Some(TokenKind::HashXor),
            _ => None,
        };
        let span = Span::new(start, self.pos);
        match kind {
            Some(kind) => Token::new(kind, span),
            None => Token {
                kind: TokenKind::Error,
                span: Span::new(start, start + 1),
                payload: TokenPayload::ScanError(ScanErrorKind::INVALID_CHARACTER),
            },
        }
    }

    fn scan_punctuation(&mut self, start: u32) -> Token {
        macro_rules! two {
            ($second:expr, $kind2:expr, $kind1:expr) => {{
                self.pos += 1;
                if self.peek_byte(0) == Some($second) {
                    self.pos += 1;
                    Token::new($kind2, Span::new(start, self.pos))
                } else {
                    Token::new($kind1, Span::new(start, self.pos))
                }
            }};
        }

        let first = self.bytes[start as usize];
        match first {
            b'(' => {
                self.pos += 1;
                Token::new(TokenKind::OpenParen, Span::new(start, self.pos))
            }
            b')' => {
                self.pos += 1;
                Token::new(TokenKind::CloseParen, Span::new(start, self.pos))
            }
            b'{' => {
                self.pos += 1;
                Token::new(TokenKind::OpenBrace, Span::new(start, self.pos))
            }
            b'}' => {
                self.pos += 1;
                Token::new(TokenKind::CloseBrace, Span::new(start, self.pos))
            }
            b'[' => {
                self.pos += 1;
                Token::new(TokenKind::OpenBracket, Span::new(start, self.pos))
            }
            b']' => {
                self.pos += 1;
                Token::new(TokenKind::CloseBracket, Span::new(start, self.pos))
            }
            b'.' => {
                self.pos += 1;
                Token::new(TokenKind::Dot, Span::new(start, self.pos))
            }
            b',' => {
                self.pos += 1;
                Token::new(TokenKind::Comma, Span::new(start, self.pos))
            }
            b';' => {
                self.pos += 1;
                Token::new(TokenKind::Semicolon, Span::new(start, self.pos))
            }
            b':' => {
                self.pos += 1;
                Token::new(TokenKind::Colon, Span::new(start, self.pos))
            }
            b'^' => {
                self.pos += 1;
                Token::new(TokenKind::Caret, Span::new(start, self.pos))
            }
            b'+' => two!(b'=', TokenKind::PlusEqual, TokenKind::Plus),
            b'-' => {
                self.pos += 1;
                if self.peek_byte(0) == Some(b'=') {
                    self.pos += 1;
                    Token::new(TokenKind::MinusEqual, Span::new(start, self.pos))
                } else if self.peek_byte(0) == Some(b'>') {
                    self.pos += 1;
                    Token::new(TokenKind::Arrow, Span::new(start, self.pos))
                } else {
                    Token::new(TokenKind::Minus, Span::new(start, self.pos))
                }
            }
            b'*' => two!(b'=', TokenKind::StarEqual, TokenKind::Star),
            b'/' => two!(b'=', TokenKind::SlashEqual, TokenKind::Slash),
            b'%' => two!(b'=', TokenKind::PercentEqual, TokenKind::Percent),
            b'=' => two!(b'=', TokenKind::EqualEqual, TokenKind::Equal),
            b'!' => two!(b'=', TokenKind::BangEqual, TokenKind::Bang),
            b'<' => two!(b'=', TokenKind::LessEqual, TokenKind::Less),
            b'>' => two!(b'=', TokenKind::GreaterEqual, TokenKind::Greater),
            b'&' => {
                self.pos += 1;
                if self.peek_byte(0) == Some(b'&') {
                    self.pos += 1;
                    Token::new(TokenKind::AmpAmp, Span::new(start, self.pos))
                } else {
                    Token {
                        kind: TokenKind::Error,
                        span: Span::new(start, self.pos),
                        payload: TokenPayload::ScanError(ScanErrorKind::INVALID_CHARACTER),
                    }
                }
            }
            b'|' => {
                self.pos += 1;
                if self.peek_byte(0) == Some(b'|') {
                    self.pos += 1;
                    Token::new(TokenKind::PipePipe, Span::new(start, self.pos))
                } else {
                    Token {
                        kind: TokenKind::Error,
                        span: Span::new(start, self.pos),
                        payload: TokenPayload::ScanError(ScanErrorKind::INVALID_CHARACTER),
                    }
                }
            }
            _ => {
                // Consume one UTF-8 scalar so we make forward progress on
                // non-ASCII invalid input too.
                let ch = self.text[start as usize..].chars().next().unwrap();
                self.pos += ch.len_utf8() as u32;
                Token {
                    kind: TokenKind::Error,
                    span: Span::new(start, self.pos),
                    payload: TokenPayload::ScanError(ScanErrorKind::INVALID_CHARACTER),
                }
            }
        }
    }
}
