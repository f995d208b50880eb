//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas over cell references.
//!
//! Grammar (lowest to highest precedence):
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | CELL | '(' expr ')'
//! ```

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{ParseError, ParseResult};
use tabula_core::Position;

/// Parse expression text (the part of a formula after `=`) into an AST
///
/// # Example
/// ```rust
/// use tabula_formula::{parse_expression, Expr};
///
/// assert_eq!(parse_expression("42").unwrap(), Expr::Number(42.0));
/// assert_eq!(parse_expression(" (1 + 2) * A1 ").unwrap().to_string(), "(1+2)*A1");
/// assert!(parse_expression("1 +").is_err());
/// ```
pub fn parse_expression(input: &str) -> ParseResult<Expr> {
    let mut parser = FormulaParser::new(input)?;
    if matches!(parser.current_token(), Token::Eof) {
        return Err(ParseError::Empty);
    }

    let expr = parser.parse_additive()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(ParseError::UnexpectedToken {
            found: parser.current_token().describe(),
            expected: "end of formula",
        });
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(String),

    Plus,
    Minus,
    Star,
    Slash,

    LeftParen,
    RightParen,

    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::CellRef(text) => format!("reference {}", text),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Eof => "end of formula".into(),
        }
    }
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> ParseResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> ParseResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_uppercase() {
            return self.scan_cell_ref();
        }

        Err(ParseError::UnexpectedChar {
            ch: c,
            offset: self.pos,
        })
    }

    fn scan_number(&mut self) -> ParseResult<Token> {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent part
        if self.peek_char().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Token::Number)
            .ok_or_else(|| ParseError::InvalidNumber(num_str.to_string()))
    }

    fn scan_cell_ref(&mut self) -> ParseResult<Token> {
        let start = self.pos;

        while self.peek_char().is_some_and(|c| c.is_ascii_uppercase()) {
            self.advance();
        }
        let letters_end = self.pos;
        self.skip_digits();

        // Letters glued to anything but a row number (e.g. "AB", "A1x") are not references
        let glued = self.peek_char().is_some_and(|c| c.is_alphanumeric() || c == '_');
        if self.pos == letters_end || glued {
            while self.peek_char().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.advance();
            }
            return Err(ParseError::InvalidReference(
                self.input[start..self.pos].to_string(),
            ));
        }

        Ok(Token::CellRef(self.input[start..self.pos].to_string()))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> ParseResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> ParseResult<()> {
        if *self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                found: self.current_token().describe(),
                expected: what,
            })
        }
    }

    // === Expression parsing with precedence ===

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        let operand = self.parse_unary()?;
        Ok(Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.consume()? {
            Token::Number(n) => Ok(Expr::Number(n)),

            Token::CellRef(text) => Ok(match Position::parse(&text) {
                Ok(pos) => Expr::CellRef(pos),
                Err(_) => Expr::OutOfRange(text),
            }),

            Token::LeftParen => {
                let expr = self.parse_additive()?;
                self.expect(Token::RightParen, "')'")?;
                Ok(expr)
            }

            other => Err(ParseError::UnexpectedToken {
                found: other.describe(),
                expected: "number, cell reference or '('",
            }),
        }
    }
}
