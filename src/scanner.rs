use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Error, ScanError};
use crate::literal::Literal;
use crate::token::{Location, Token, Type};

pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column_offset: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner.
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: vec!(),
            start: 0,
            current: 0,
            line: 1,
            column_offset: 0,
        }
    }

    /// Scans the source code and returns a vector of tokens.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(
            Token::new(
                Type::EOF,
                String::from(""),
                None,
                Location::new(self.line, 0)
            )
        );

        self.tokens.clone()
    }

    /// Consumes and returns the next character.
    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(char) => {
                self.current += 1;
                char
            },
            None => panic!("tried to advance past end of the file."),
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.source.reset_cursor();
        self.source.peek().copied()
    }

    /// Returns the character after the next one without consuming either.
    fn peek_next(&mut self) -> Option<char> {
        self.source.reset_cursor();
        self.source.peek_nth(1).copied()
    }

    /// Returns if the character after the current one is the expected character.
    fn match_next(&mut self, expected: char) -> bool {
        self.peek_next() == Some(expected)
    }

    /// Adds a new token to the list of tokens.
    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(
            Token::new(
                r#type,
                lexeme,
                literal,
                Location::new(self.line, self.start - self.column_offset)
            )
        );
    }

    /// Adds a new single char token to the list of tokens.
    fn add_single_char_token(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    /// Adds a new double char token to the list of tokens.
    fn add_double_char_token(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();

        self.add_token(r#type, format!("{first}{second}"), None);
    }

    /// Returns if the scanner has reached the end of the file.
    fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Consumes a newline, updating the line and column bookkeeping.
    fn newline(&mut self) {
        self.advance();
        self.line += 1;
        self.column_offset = self.current;
    }

    /// Handles a string literal.
    fn string(&mut self) {
        let start = Location::new(self.line, self.start - self.column_offset);
        self.advance(); // Move past the opening double quote.

        let mut value = Vec::new();
        loop {
            match self.peek() {
                Some('"') => break,
                Some('\n') => {
                    value.push('\n');
                    self.newline();
                },
                Some(_) => value.push(self.advance()),
                // Report against the opening quote, the closing one was
                // never seen.
                None => {
                    ScanError {
                        location: start,
                        message: String::from("Unterminated string."),
                    }.throw();
                    return;
                },
            }
        }

        self.advance(); // Move past the closing double quote.

        let value: String = value.into_iter().collect();

        // The literal does not include the double quotes unlike the lexeme.
        // The token sits at the opening quote, even when the string spans
        // multiple lines.
        self.tokens.push(
            Token::new(Type::String, value.clone(), Some(Literal::String(value)), start)
        );
    }

    /// Handles a number literal.
    fn number(&mut self) {
        let mut value = Vec::new();

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            value.push(self.advance());
        }

        // A dot only belongs to the number when fractional digits follow,
        // so "123." scans as the number 123 and a dot token.
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            value.push(self.advance()); // Consume the dot.

            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                value.push(self.advance());
            }
        }

        let value: String = value.into_iter().collect();
        let value_num: f64 = value.parse().expect("scanned number to parse");

        self.add_token(Type::Number, value, Some(Literal::Number(value_num)));
    }

    /// Handles an identifier or a keyword.
    fn identifier(&mut self) {
        let mut value = Vec::new();

        // is_alphanumeric does not include underscores.
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            value.push(self.advance());
        }

        let value = String::from_iter(value);
        let token_type = match value.as_str() {
            "and"      => Type::And,
            "break"    => Type::Break,
            "class"    => Type::Class,
            "else"     => Type::Else,
            "false"    => Type::False,
            "for"      => Type::For,
            "fun"      => Type::Fun,
            "if"       => Type::If,
            "nil"      => Type::Nil,
            "or"       => Type::Or,
            "print"    => Type::Print,
            "return"   => Type::Return,
            "super"    => Type::Super,
            "this"     => Type::This,
            "true"     => Type::True,
            "var"      => Type::Var,
            "while"    => Type::While,
            _          => Type::Identifier,
        };

        self.add_token(token_type, value, None);
    }

    /// Consumes a `/* ... */` block comment. Block comments span newlines
    /// and do not nest; scanning stops at the first `*/`.
    fn block_comment(&mut self) {
        let start = Location::new(self.line, self.start - self.column_offset);
        self.advance(); // Consume the slash.
        self.advance(); // Consume the star.

        loop {
            match self.peek() {
                Some('*') if self.match_next('/') => {
                    self.advance();
                    self.advance();
                    return;
                },
                Some('\n') => self.newline(),
                Some(_) => {
                    self.advance();
                },
                None => {
                    ScanError {
                        location: start,
                        message: String::from("Unterminated block comment."),
                    }.throw();
                    return;
                },
            }
        }
    }

    /// Scans the next token.
    fn scan_token(&mut self) {
        let c = match self.peek() {
            Some(c) => c,
            None => return,
        };

        match c {
            // One character tokens
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '{' => self.add_single_char_token(Type::LeftBrace),
            '}' => self.add_single_char_token(Type::RightBrace),
            ',' => self.add_single_char_token(Type::Comma),
            '.' => self.add_single_char_token(Type::Dot),
            '-' => self.add_single_char_token(Type::Minus),
            '+' => self.add_single_char_token(Type::Plus),
            ';' => self.add_single_char_token(Type::Semicolon),
            '*' => self.add_single_char_token(Type::Star),

            // Two character tokens
            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::BangEqual);
                } else {
                    self.add_single_char_token(Type::Bang)
                };
            },
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else {
                    self.add_single_char_token(Type::Equal)
                };
            },
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less)
                };
            },
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater)
                };
            },
            '/' => {
                if self.match_next('/') {
                    while !matches!(self.peek(), Some('\n') | None) {
                        self.advance();
                    }
                } else if self.match_next('*') {
                    self.block_comment();
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            },

            // Ignore whitespace
            ' ' | '\r' | '\t' => {
                self.advance();
            },

            // Update line counter
            '\n' => self.newline(),

            // String
            '"' => self.string(),

            // Numbers
            c if c.is_ascii_digit() => self.number(),

            // Identifiers
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();

                ScanError {
                    location: Location::new(self.line, self.start - self.column_offset),
                    message: String::from("Unexpected character."),
                }.throw();
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source).scan_tokens()
    }

    fn types(source: &str) -> Vec<Type> {
        scan(source).iter().map(|token| token.r#type).collect()
    }

    #[test]
    fn scan_punctuation() {
        assert_eq!(
            types("(){},.-+;/*"),
            vec![
                Type::LeftParen, Type::RightParen, Type::LeftBrace, Type::RightBrace,
                Type::Comma, Type::Dot, Type::Minus, Type::Plus, Type::Semicolon,
                Type::Slash, Type::Star, Type::EOF,
            ],
        );
    }

    #[test]
    fn scan_operators() {
        assert_eq!(
            types("! != = == < <= > >="),
            vec![
                Type::Bang, Type::BangEqual, Type::Equal, Type::EqualEqual,
                Type::Less, Type::LessEqual, Type::Greater, Type::GreaterEqual,
                Type::EOF,
            ],
        );
    }

    #[test]
    fn scan_keywords() {
        assert_eq!(
            types("and break class else false for fun if nil or print return super this true var while"),
            vec![
                Type::And, Type::Break, Type::Class, Type::Else, Type::False,
                Type::For, Type::Fun, Type::If, Type::Nil, Type::Or, Type::Print,
                Type::Return, Type::Super, Type::This, Type::True, Type::Var,
                Type::While, Type::EOF,
            ],
        );
    }

    #[test]
    fn scan_identifier() {
        let tokens = scan("_private andx");
        assert_eq!(tokens[0].r#type, Type::Identifier);
        assert_eq!(tokens[0].lexeme, "_private");
        assert_eq!(tokens[1].r#type, Type::Identifier);
        assert_eq!(tokens[1].lexeme, "andx");
    }

    #[test]
    fn scan_number() {
        let tokens = scan("123 45.67");
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.0)));
        assert_eq!(tokens[0].lexeme, "123");
        assert_eq!(tokens[1].literal, Some(Literal::Number(45.67)));
    }

    #[test]
    fn scan_number_with_trailing_dot() {
        let tokens = scan("123.");
        assert_eq!(tokens[0].r#type, Type::Number);
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.0)));
        assert_eq!(tokens[1].r#type, Type::Dot);
    }

    #[test]
    fn scan_number_with_leading_dot() {
        let tokens = scan(".456");
        assert_eq!(tokens[0].r#type, Type::Dot);
        assert_eq!(tokens[1].r#type, Type::Number);
        assert_eq!(tokens[1].literal, Some(Literal::Number(456.0)));
    }

    #[test]
    fn scan_string() {
        let tokens = scan("\"hello\"");
        assert_eq!(tokens[0].r#type, Type::String);
        assert_eq!(tokens[0].literal, Some(Literal::String(String::from("hello"))));
    }

    #[test]
    fn scan_multiline_string_counts_lines() {
        let tokens = scan("\"one\ntwo\" x");
        assert_eq!(tokens[0].literal, Some(Literal::String(String::from("one\ntwo"))));
        assert_eq!(tokens[1].location.line, 2);
    }

    #[test]
    fn scan_line_comment() {
        assert_eq!(types("// nothing here\n1"), vec![Type::Number, Type::EOF]);
    }

    #[test]
    fn scan_block_comment() {
        assert_eq!(types("1 /* spans\nlines */ 2"), vec![Type::Number, Type::Number, Type::EOF]);
    }

    #[test]
    fn block_comment_does_not_nest() {
        // The first */ closes the comment, leaving the rest as tokens.
        assert_eq!(
            types("/* outer /* inner */ 1"),
            vec![Type::Number, Type::EOF],
        );
    }

    #[test]
    fn lexemes_reproduce_source() {
        let source = "var answer = 42; // the answer\nprint answer + 1;";
        let lexemes: Vec<String> = scan(source)
            .iter()
            .map(|token| token.lexeme.clone())
            .collect();

        // The token stream reproduces the input modulo whitespace and comments.
        assert_eq!(lexemes.join(""), "varanswer=42;printanswer+1;");
    }

    #[test]
    fn token_locations() {
        let tokens = scan("var a;\n  a = 1;");
        assert_eq!(tokens[0].location, Location::new(1, 0));
        assert_eq!(tokens[3].location, Location::new(2, 2));
    }
}
