use std::iter::Peekable;

use thiserror::Error;

use ast::*;
use lexer::*;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, but found {found:?} at token index {index}")]
    Unexpected {
        expected: String,
        found: TokenType,
        index: usize,
    },
    #[error("expected {expected}, but found end of file instead")]
    UnexpectedEof { expected: String },
    #[error("expected end of file, but found {found:?} at token index {index}")]
    TrailingInput { found: TokenType, index: usize },
}

macro_rules! match_token_types {
    ($( $token:pat ),+ ) => {
        $(
        Some(Token{ kind: $token, ..})
        )|+
    };
}

pub struct Parser {
    tokens: Peekable<std::vec::IntoIter<Token>>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            index: 0,
        }
    }

    pub fn parse(&mut self) -> Result<TranslationUnit, ParseError> {
        let func = self.parse_func()?;
        self.expect_empty()?;

        Ok(TranslationUnit { func })
    }

    fn parse_func(&mut self) -> Result<Func, ParseError> {
        self.expect(TokenType::Int)?;
        let name = self.parse_ident()?;

        self.expect(TokenType::OpenParen)?;
        self.expect(TokenType::Void)?;
        self.expect(TokenType::CloseParen)?;
        self.expect(TokenType::OpenBrace)?;

        let body = self.parse_stmt()?;

        self.expect(TokenType::CloseBrace)?;

        Ok(Func { ident: name, body })
    }

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        match self.take() {
            Some(Token {
                kind: TokenType::Identifier,
                value: TokenValue::Ident(ident),
                ..
            }) => Ok(ident),
            Some(t) => Err(self.unexpected("an identifier", &t)),
            None => Err(ParseError::UnexpectedEof {
                expected: "an identifier".to_string(),
            }),
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenType::Return)?;

        let expr = self.parse_expr(0)?;

        self.expect(TokenType::Semicolon)?;

        Ok(Stmt::Return { expr })
    }

    /// Precedence climbing: parse a factor, then keep folding in binary
    /// operators that bind at least as tightly as `min_prec`. The right-hand
    /// side is parsed at `prec + 1`, which makes every binary operator
    /// left-associative.
    fn parse_expr(&mut self, min_prec: i32) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;

        while let Some(next) = self.peek() {
            match get_precedence(next.kind) {
                Some(prec) if prec >= min_prec => {
                    let op = self.parse_binop()?;
                    let right = self.parse_expr(prec + 1)?;

                    left = Expr::Binary {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            match_token_types!(TokenType::Minus, TokenType::Tilde) => {
                let op = self.parse_unop()?;
                let expr = self.parse_factor()?;

                Ok(Expr::Unary {
                    op,
                    expr: Box::new(expr),
                })
            }
            match_token_types!(TokenType::OpenParen) => {
                self.take();
                let expr = self.parse_expr(0)?;
                self.expect(TokenType::CloseParen)?;

                Ok(expr)
            }
            match_token_types!(TokenType::Constant) => {
                let value = self.parse_constant()?;

                Ok(Expr::Constant(value))
            }
            Some(t) => {
                self.take();
                Err(self.unexpected("an expression", &t))
            }
            None => Err(ParseError::UnexpectedEof {
                expected: "an expression".to_string(),
            }),
        }
    }

    fn parse_constant(&mut self) -> Result<i32, ParseError> {
        match self.take() {
            Some(Token {
                kind: TokenType::Constant,
                value: TokenValue::Integer(value),
                ..
            }) => Ok(value),
            Some(t) => Err(self.unexpected("a constant", &t)),
            None => Err(ParseError::UnexpectedEof {
                expected: "a constant".to_string(),
            }),
        }
    }

    fn parse_unop(&mut self) -> Result<UnaryOp, ParseError> {
        match self.take() {
            match_token_types!(TokenType::Minus) => Ok(UnaryOp::Negate),
            match_token_types!(TokenType::Tilde) => Ok(UnaryOp::Complement),
            Some(t) => Err(self.unexpected("a unary operator", &t)),
            None => Err(ParseError::UnexpectedEof {
                expected: "a unary operator".to_string(),
            }),
        }
    }

    fn parse_binop(&mut self) -> Result<BinaryOp, ParseError> {
        match self.take() {
            match_token_types!(TokenType::Plus) => Ok(BinaryOp::Add),
            match_token_types!(TokenType::Minus) => Ok(BinaryOp::Subtract),
            match_token_types!(TokenType::Asterisk) => Ok(BinaryOp::Multiply),
            match_token_types!(TokenType::Slash) => Ok(BinaryOp::Divide),
            match_token_types!(TokenType::Percent) => Ok(BinaryOp::Modulo),
            Some(t) => Err(self.unexpected("a binary operator", &t)),
            None => Err(ParseError::UnexpectedEof {
                expected: "a binary operator".to_string(),
            }),
        }
    }

    /// Checks if next token is of correct expected type
    fn expect(&mut self, expected: TokenType) -> Result<Token, ParseError> {
        match self.take() {
            Some(t) if t.kind == expected => Ok(t),
            Some(t) => Err(self.unexpected(&format!("{:?}", expected), &t)),
            None => Err(ParseError::UnexpectedEof {
                expected: format!("{:?}", expected),
            }),
        }
    }

    fn expect_empty(&mut self) -> Result<(), ParseError> {
        match self.take() {
            Some(t) => Err(ParseError::TrailingInput {
                found: t.kind,
                index: self.index - 1,
            }),
            None => Ok(()),
        }
    }

    fn take(&mut self) -> Option<Token> {
        let token = self.tokens.next();

        if token.is_some() {
            self.index += 1;
        }

        token
    }

    fn peek(&mut self) -> Option<Token> {
        self.tokens.peek().cloned()
    }

    fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: found.kind,
            // index of the offending token, not of the one after it
            index: self.index - 1,
        }
    }
}

fn get_precedence(token: TokenType) -> Option<i32> {
    match token {
        TokenType::Asterisk | TokenType::Slash | TokenType::Percent => Some(50),
        TokenType::Plus | TokenType::Minus => Some(45),
        _ => None,
    }
}
