use std::rc::Rc;

use crate::common::source::Source;
use crate::common::span::{Span, Spanned};
use crate::compiler::syntax::Syntax;
use crate::compiler::token::Token;

const KEYWORDS: &[(&str, Token)] = &[
    ("let", Token::Let),
    ("in", Token::In),
    ("fn", Token::Fn),
    ("where", Token::Where),
    ("aug", Token::Aug),
    ("or", Token::Or),
    ("not", Token::Not),
    ("within", Token::Within),
    ("and", Token::And),
    ("rec", Token::Rec),
    ("true", Token::True),
    ("false", Token::False),
    ("nil", Token::Nil),
    ("dummy", Token::Dummy),
    ("gr", Token::Gr),
    ("ge", Token::Ge),
    ("ls", Token::Ls),
    ("le", Token::Le),
    ("eq", Token::Eq),
    ("ne", Token::Ne),
];

/// Lexes a whole source into a flat token stream, annotated with the span
/// each token came from. The parser consumes this directly; there's no
/// separate "strip whitespace" pass, since whitespace and `//` comments
/// are skipped inline as each token is scanned.
pub fn lex(source: &Rc<Source>) -> Result<Vec<Spanned<Token>>, Syntax> {
    let mut lexer = Lexer { source: Rc::clone(source), offset: 0 };
    lexer.run()
}

struct Lexer {
    source: Rc<Source>,
    offset: usize,
}

impl Lexer {
    fn remaining(&self) -> &str {
        &self.source.contents[self.offset..]
    }

    fn run(&mut self) -> Result<Vec<Spanned<Token>>, Syntax> {
        let mut tokens = vec![];
        loop {
            self.skip_trivia();
            if self.remaining().is_empty() {
                break;
            }

            let start = self.offset;
            let token = self.next_token()?;
            let span = Span::new(&self.source, start, self.offset - start);
            tokens.push(Spanned::new(token, span));
        }

        let end = Span::point(&self.source, self.offset);
        tokens.push(Spanned::new(Token::End, end));
        Ok(tokens)
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.remaining();
            if rest.starts_with("//") {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.offset += len;
            } else if let Some(c) = rest.chars().next() {
                if c.is_whitespace() {
                    self.offset += c.len_utf8();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, Syntax> {
        let rest = self.remaining();
        let c = rest.chars().next().unwrap();

        if c == '\'' {
            return self.string();
        }
        if c.is_ascii_digit() {
            return self.integer();
        }
        if c.is_ascii_alphabetic() {
            return Ok(self.identifier_or_keyword());
        }

        for (spelling, token) in [
            ("->", Token::Arrow),
            ("**", Token::Pow),
            (">=", Token::Ge),
            ("<=", Token::Le),
        ] {
            if rest.starts_with(spelling) {
                self.offset += spelling.len();
                return Ok(token);
            }
        }

        let single = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '.' => Token::Dot,
            '|' => Token::Bar,
            '=' => Token::Assign,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '&' => Token::Amp,
            '@' => Token::At,
            '>' => Token::Gr,
            '<' => Token::Ls,
            other => {
                let span = Span::point(&self.source, self.offset);
                return Err(Syntax::error(&format!("unexpected character '{}'", other), &span));
            },
        };
        self.offset += c.len_utf8();
        Ok(single)
    }

    fn string(&mut self) -> Result<Token, Syntax> {
        let start = self.offset;
        self.offset += 1; // opening quote
        let mut value = String::new();

        loop {
            let rest = self.remaining();
            let c = match rest.chars().next() {
                Some(c) => c,
                None => {
                    let span = Span::new(&self.source, start, self.offset - start);
                    return Err(Syntax::error("unterminated string literal", &span));
                },
            };

            if c == '\'' {
                self.offset += 1;
                return Ok(Token::Str(value));
            }

            if c == '\\' {
                self.offset += 1;
                let escaped = self.remaining().chars().next().ok_or_else(|| {
                    let span = Span::new(&self.source, start, self.offset - start);
                    Syntax::error("unterminated string literal", &span)
                })?;
                value.push(match escaped {
                    't' => '\t',
                    'n' => '\n',
                    '\'' => '\'',
                    '\\' => '\\',
                    other => other,
                });
                self.offset += escaped.len_utf8();
            } else {
                value.push(c);
                self.offset += c.len_utf8();
            }
        }
    }

    fn integer(&mut self) -> Result<Token, Syntax> {
        let start = self.offset;
        let len = self.remaining().chars().take_while(|c| c.is_ascii_digit()).count();
        self.offset += len;
        let text = &self.source.contents[start..self.offset];
        text.parse::<i64>()
            .map(Token::Integer)
            .map_err(|_| Syntax::error("integer literal out of range", &Span::new(&self.source, start, len)))
    }

    fn identifier_or_keyword(&mut self) -> Token {
        let start = self.offset;
        let len = self.remaining()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .count();
        self.offset += len;
        let text = &self.source.contents[start..self.offset];

        for (spelling, token) in KEYWORDS {
            if *spelling == text {
                return token.clone();
            }
        }
        Token::Identifier(text.to_string())
    }
}
