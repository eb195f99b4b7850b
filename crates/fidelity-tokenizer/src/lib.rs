//! Scanner producing tokens with their trivia already attached.
//!
//! Trailing trivia of a token runs up to and including the first line break
//! after it. Everything else between two tokens is leading trivia of the
//! second one, so each byte of the input lands in exactly one token.

mod cursor;

use cursor::Cursor;
use fidelity_errors::Diagnostic;
pub use fidelity_syntax::SyntaxKind;
use fidelity_syntax::SyntaxKind::*;
use fidelity_syntax::{TriviaKind, TriviaList, TriviaPiece};
use text_size::{TextLen, TextRange, TextSize};

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: TriviaList,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: TriviaList,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: TriviaList::empty(),
        trailing: TriviaList::empty(),
    };

    /// Range of the token including its trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(
            self.kind_range.start() - self.leading.text().text_len(),
            self.kind_range.end() + self.trailing.text().text_len(),
        )
    }
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            trivia_pieces: Vec::with_capacity(4),
            diagnostics: Vec::new(),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Diagnostics for everything scanned so far, including the peeked token.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn offset(&self) -> TextSize {
        self.text.text_len() - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    /// Returns the peeked token and scans the one after it.
    pub fn next_token(&mut self) -> Token {
        let leading_start = self.offset();
        self.trivia(false);
        let trailing_start = self.trivia_pieces.len();
        let (kind, kind_range) = self.syntax_kind();
        if kind != EOF {
            self.trivia(true);
        }
        let trailing_end = self.offset();

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = TriviaList::from_pieces(
            &self.text[TextRange::new(leading_start, kind_range.start())],
            leading,
        );
        let trailing = TriviaList::from_pieces(
            &self.text[TextRange::new(kind_range.end(), trailing_end)],
            trailing,
        );

        self.trivia_pieces.clear();
        std::mem::replace(&mut self.current, Token { leading, kind, kind_range, trailing })
    }

    fn trivia(&mut self, trailing: bool) {
        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                c if is_line_break(c) => {
                    if self.cursor.advance() == '\r' {
                        self.cursor.eat('\n');
                    }
                    TriviaKind::Newline
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| !is_line_break(c));
                    TriviaKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    if self.cursor.advance_past("*/") {
                        TriviaKind::MultiLineComment
                    } else {
                        let range = self.range();
                        self.diagnostics.push(Diagnostic::error("unterminated comment", range));
                        TriviaKind::SkippedText
                    }
                }
                c if is_whitespace(c) => {
                    self.cursor.advance_while(|c| is_whitespace(c) && !is_line_break(c));
                    TriviaKind::Whitespace
                }
                _ => break,
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
            if trailing && kind == TriviaKind::Newline {
                break;
            }
        }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        if self.cursor.is_eof() {
            return (EOF, TextRange::empty(self.offset()));
        }

        let kind = match self.cursor.advance() {
            '{' => OPEN_BRACE,
            '}' => CLOSE_BRACE,
            '(' => OPEN_PAREN,
            ')' => CLOSE_PAREN,
            '[' => OPEN_BRACKET,
            ']' => CLOSE_BRACKET,
            ';' => SEMICOLON,
            ',' => COMMA,
            ':' => COLON,
            '?' => QUESTION,
            '.' if self.cursor.peek().is_ascii_digit() => self.number('.'),
            '.' => DOT,
            '=' if self.cursor.eat('=') => {
                if self.cursor.eat('=') { EQUALS_EQUALS_EQUALS } else { EQUALS_EQUALS }
            }
            '=' => EQUALS,
            '!' if self.cursor.eat('=') => {
                if self.cursor.eat('=') { EXCLAMATION_EQUALS_EQUALS } else { EXCLAMATION_EQUALS }
            }
            '!' => EXCLAMATION,
            '<' if self.cursor.eat('=') => LESS_THAN_EQUALS,
            '<' => LESS_THAN,
            '>' if self.cursor.eat('=') => GREATER_THAN_EQUALS,
            '>' => GREATER_THAN,
            '+' => PLUS,
            '-' => MINUS,
            '*' => ASTERISK,
            '/' => SLASH,
            '%' => PERCENT,
            '&' if self.cursor.eat('&') => AMPERSAND_AMPERSAND,
            '|' if self.cursor.eat('|') => BAR_BAR,
            quote @ ('"' | '\'') => self.string(quote),
            first_char @ '0'..='9' => self.number(first_char),
            c if is_identifier_start(c) => {
                self.cursor.advance_while(is_identifier_continue);
                SyntaxKind::from_keyword(self.text()).unwrap_or(IDENTIFIER)
            }
            _ => UNKNOWN,
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range)
    }

    fn string(&mut self, quote: char) -> SyntaxKind {
        loop {
            match self.cursor.peek() {
                c if self.cursor.is_eof() || is_line_break(c) => {
                    let range = self.range();
                    self.diagnostics.push(Diagnostic::error("unterminated string literal", range));
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    if self.cursor.advance() == '\r' {
                        self.cursor.eat('\n');
                    }
                }
                c => {
                    self.cursor.advance();
                    if c == quote {
                        break;
                    }
                }
            }
        }
        STRING_LITERAL
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '0' {
            match self.cursor.peek() {
                'x' | 'X' => {
                    self.cursor.advance();
                    self.digits(true);
                    return NUMERIC_LITERAL;
                }
                'b' | 'B' | 'o' | 'O' => {
                    self.cursor.advance();
                    self.digits(false);
                    return NUMERIC_LITERAL;
                }
                _ => {}
            }
        }

        self.digits(false);
        if c != '.' && self.cursor.matches('.') && self.cursor.second() != '.' {
            self.cursor.advance();
            self.digits(false);
        }
        self.exponent();

        NUMERIC_LITERAL
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn exponent(&mut self) {
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use expect_test::{Expect, expect};

    use super::*;

    fn check(text: &str, expect: Expect) {
        let mut tokenizer = Tokenizer::new(text);
        let mut actual = String::new();
        loop {
            let token = tokenizer.next_token();
            let range = token.kind_range;
            writeln!(actual, "{:?}@{range:?} {:?}", token.kind, &text[range]).unwrap();
            for trivia in &token.leading {
                writeln!(actual, "  < {:?} {:?}", trivia.trivia_kind(), trivia.text()).unwrap();
            }
            for trivia in &token.trailing {
                writeln!(actual, "  > {:?} {:?}", trivia.trivia_kind(), trivia.text()).unwrap();
            }
            if token.kind == EOF {
                break;
            }
        }
        for diagnostic in tokenizer.take_diagnostics() {
            writeln!(actual, "error@{:?}: {}", diagnostic.range(), diagnostic.message()).unwrap();
        }
        expect.assert_eq(&actual);
    }

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let mut tokenizer = Tokenizer::new(text);
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.kind == EOF {
                return kinds;
            }
            kinds.push(token.kind);
        }
    }

    #[test]
    fn trailing_trivia_stops_after_the_line_break() {
        check(
            "let x = 1; // one\n  x\n",
            expect![[r#"
                LET_KW@0..3 "let"
                  > Whitespace " "
                IDENTIFIER@4..5 "x"
                  > Whitespace " "
                EQUALS@6..7 "="
                  > Whitespace " "
                NUMERIC_LITERAL@8..9 "1"
                SEMICOLON@9..10 ";"
                  > Whitespace " "
                  > SingleLineComment "// one"
                  > Newline "\n"
                IDENTIFIER@20..21 "x"
                  < Whitespace "  "
                  > Newline "\n"
                EOF@22..22 ""
            "#]],
        );
    }

    #[test]
    fn blank_lines_lead_the_next_token() {
        check(
            "a\r\n\r\n/* doc */\tb",
            expect![[r#"
                IDENTIFIER@0..1 "a"
                  > Newline "\r\n"
                IDENTIFIER@15..16 "b"
                  < Newline "\r\n"
                  < MultiLineComment "/* doc */"
                  < Whitespace "\t"
                EOF@16..16 ""
            "#]],
        );
    }

    #[test]
    fn unterminated_comment_is_skipped_text() {
        check(
            "x /* never closed",
            expect![[r#"
                IDENTIFIER@0..1 "x"
                  > Whitespace " "
                  > SkippedText "/* never closed"
                EOF@17..17 ""
                error@2..17: unterminated comment
            "#]],
        );
    }

    #[test]
    fn unterminated_string() {
        check(
            "'abc\n\"a\\\"b\"",
            expect![[r#"
                STRING_LITERAL@0..4 "'abc"
                  > Newline "\n"
                STRING_LITERAL@5..11 "\"a\\\"b\""
                EOF@11..11 ""
                error@0..4: unterminated string literal
            "#]],
        );
    }

    #[test]
    fn punctuation_and_operators() {
        assert_eq!(
            kinds("=== == = !== != ! <= < >= > + - * / % && || ? : . , ; ( ) [ ] { }"),
            [
                EQUALS_EQUALS_EQUALS,
                EQUALS_EQUALS,
                EQUALS,
                EXCLAMATION_EQUALS_EQUALS,
                EXCLAMATION_EQUALS,
                EXCLAMATION,
                LESS_THAN_EQUALS,
                LESS_THAN,
                GREATER_THAN_EQUALS,
                GREATER_THAN,
                PLUS,
                MINUS,
                ASTERISK,
                SLASH,
                PERCENT,
                AMPERSAND_AMPERSAND,
                BAR_BAR,
                QUESTION,
                COLON,
                DOT,
                COMMA,
                SEMICOLON,
                OPEN_PAREN,
                CLOSE_PAREN,
                OPEN_BRACKET,
                CLOSE_BRACKET,
                OPEN_BRACE,
                CLOSE_BRACE,
            ]
        );
        assert_eq!(kinds("a=b"), [IDENTIFIER, EQUALS, IDENTIFIER]);
        assert_eq!(kinds("a & b @"), [IDENTIFIER, UNKNOWN, IDENTIFIER, UNKNOWN]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("var let const function interface while $el _x letter é"),
            [VAR_KW, LET_KW, CONST_KW, FUNCTION_KW, INTERFACE_KW, WHILE_KW]
                .into_iter()
                .chain([IDENTIFIER; 4])
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn numeric_literals() {
        let inputs =
            ["123", "0", "0x1F", "0b1010", "0o755", "10_000", "1.5", ".5", "1e10", "1.0e-5"];
        for input in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let token = tokenizer.next_token();
            assert_eq!(token.kind, NUMERIC_LITERAL, "input: {input:?}");
            assert_eq!(&input[token.kind_range], input, "input: {input:?}");
            assert_eq!(tokenizer.peek().kind, EOF, "input: {input:?}");
        }
    }

    #[test]
    fn every_byte_belongs_to_one_token() {
        let inputs = [
            "",
            "   ",
            "a\u{a0}b\u{feff}c",
            "x\r\r\n// tail",
            "if (a) { b } else /* c */ d;\n\n",
            "\0 \u{2028} 'open",
        ];
        for input in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let mut rebuilt = String::new();
            let mut expected_start = TextSize::new(0);
            loop {
                let token = tokenizer.next_token();
                assert_eq!(token.full_range().start(), expected_start, "input: {input:?}");
                expected_start = token.full_range().end();
                rebuilt.push_str(token.leading.text());
                rebuilt.push_str(&input[token.kind_range]);
                rebuilt.push_str(token.trailing.text());
                if token.kind == EOF {
                    break;
                }
            }
            assert_eq!(rebuilt, input);
        }
    }
}
