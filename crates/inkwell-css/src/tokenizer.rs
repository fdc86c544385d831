//! CSS tokenizer
//!
//! A subset of CSS Syntax Level 3 tokenization: idents, at-keywords, hashes,
//! numbers/percentages/dimensions, strings, functions, delimiters.
//! Comments are consumed and discarded.

/// CSS token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Function(String),
    AtKeyword(String),
    Hash { value: String, is_id: bool },
    Str(String),
    Number { value: f32, is_integer: bool },
    Percentage(f32),
    Dimension { value: f32, unit: String },
    Whitespace,
    Colon,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Delim(char),
    Eof,
}

/// Tokenizer over a raw stylesheet string
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the entire input (excluding the trailing Eof)
    pub fn tokenize_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            if tok == Token::Eof {
                break;
            }
            tokens.push(tok);
        }
        tokens
    }

    /// Consume and return the next token
    pub fn next_token(&mut self) -> Token {
        self.consume_comments();

        let Some(ch) = self.peek() else {
            return Token::Eof;
        };

        if is_whitespace(ch) {
            self.consume_whitespace();
            return Token::Whitespace;
        }

        if ch == '"' || ch == '\'' {
            return self.consume_string(ch);
        }

        if ch == '#' {
            self.advance();
            if self.peek().is_some_and(is_name_char) {
                let is_id = self.peek().is_some_and(is_name_start_char);
                let value = self.consume_name();
                return Token::Hash { value, is_id };
            }
            return Token::Delim('#');
        }

        if ch == '@' {
            self.advance();
            if self.peek().is_some_and(is_name_start_char) {
                return Token::AtKeyword(self.consume_name());
            }
            return Token::Delim('@');
        }

        if ch.is_ascii_digit() || self.starts_number() {
            return self.consume_numeric();
        }

        if is_name_start_char(ch) {
            let name = self.consume_name();
            if self.peek() == Some('(') {
                self.advance();
                return Token::Function(name);
            }
            return Token::Ident(name);
        }

        self.advance();
        match ch {
            ':' => Token::Colon,
            ';' => Token::Semicolon,
            ',' => Token::Comma,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            other => Token::Delim(other),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn consume_comments(&mut self) {
        loop {
            if self.peek() == Some('/') && self.peek_at(1) == Some('*') {
                self.pos += 2;
                while self.pos < self.input.len() {
                    if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                        self.pos += 2;
                        break;
                    }
                    self.advance();
                }
            } else {
                return;
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    fn consume_string(&mut self, quote: char) -> Token {
        self.advance(); // opening quote
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            self.advance();
            match ch {
                c if c == quote => break,
                '\\' => {
                    // Simple escape: take the next char literally
                    if let Some(escaped) = self.peek() {
                        value.push(escaped);
                        self.advance();
                    }
                }
                '\n' => break, // unterminated string, bail at line end
                c => value.push(c),
            }
        }
        Token::Str(value)
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while self.peek().is_some_and(is_name_char) {
            name.push(self.peek().unwrap_or_default());
            self.advance();
        }
        name
    }

    /// True if the current position starts a signed or decimal number
    fn starts_number(&self) -> bool {
        match self.peek() {
            Some('+') | Some('-') => self
                .peek_at(1)
                .is_some_and(|c| c.is_ascii_digit() || (c == '.' && self.peek_at(2).is_some_and(|d| d.is_ascii_digit()))),
            Some('.') => self.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn consume_numeric(&mut self) -> Token {
        let mut text = String::new();
        if matches!(self.peek(), Some('+') | Some('-')) {
            text.push(self.peek().unwrap_or_default());
            self.advance();
        }
        let mut is_integer = true;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                is_integer = false;
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        let value: f32 = text.parse().unwrap_or(0.0);

        if self.peek() == Some('%') {
            self.advance();
            return Token::Percentage(value);
        }
        if self.peek().is_some_and(is_name_start_char) {
            let unit = self.consume_name();
            return Token::Dimension { value, unit };
        }
        Token::Number { value, is_integer }
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

fn is_name_start_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '-' || !ch.is_ascii()
}

fn is_name_char(ch: char) -> bool {
    is_name_start_char(ch) || ch.is_ascii_digit()
}
