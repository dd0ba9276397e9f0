use std::collections::HashMap;

use once_cell::sync::Lazy;
use thiserror::Error;

use super::{
    ast::{Assign, Binary, Expr, Grouping, Stmt, Unary, Var},
    scanner::tokens::{Token, TokenType, Value},
};
use lexer::{Lexed, Lexer, Piece};

mod lexer;

static UNARY_OPERATORS: Lazy<HashMap<&'static str, TokenType>> =
    Lazy::new(|| HashMap::from([("-", TokenType::Minus), ("!", TokenType::Bang)]));

static BINARY_OPERATORS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    HashMap::from([
        ("+", TokenType::Plus),
        ("-", TokenType::Minus),
        ("*", TokenType::Star),
        ("/", TokenType::Slash),
        ("==", TokenType::EqualEqual),
        ("!=", TokenType::BangEqual),
        ("<", TokenType::Less),
        ("<=", TokenType::LessEqual),
        (">", TokenType::Greater),
        (">=", TokenType::GreaterEqual),
    ])
});

#[derive(Error, Debug, PartialEq)]
pub enum ReadError {
    #[error("Input ended inside a form")]
    PrematureTermination,
    #[error("Unexpected ')'. Line {0}")]
    UnexpectedClose(u32),
    #[error("Expected a form, found {found}. Line {line}")]
    ExpectedForm { found: String, line: u32 },
    #[error("Form has no head. Line {0}")]
    MissingHead(u32),
    #[error("Unknown form '{head}'. Line {line}")]
    UnknownForm { head: String, line: u32 },
    #[error("'{head}' cannot take {found} operand(s). Line {line}")]
    WrongArity {
        head: String,
        found: usize,
        line: u32,
    },
    #[error("Expected an identifier, found {found}. Line {line}")]
    ExpectedIdentifier { found: String, line: u32 },
    #[error("Trailing input after expression. Line {0}")]
    TrailingInput(u32),
}

/// Read canonical printer output back into statements.
///
/// Variable references print as nothing and cannot be recovered, and string literals only
/// survive when they contain no whitespace or parentheses.
pub fn read_program(source: &str) -> Result<Vec<Stmt>, ReadError> {
    let pieces = Lexer::new(source).scan();
    Reader::new(&pieces).program()
}

/// Read a single canonical expression
pub fn read_expr(source: &str) -> Result<Expr, ReadError> {
    let pieces = Lexer::new(source).scan();
    let mut reader = Reader::new(&pieces);
    let expr = reader.expression()?;
    match reader.peek() {
        Some(extra) => Err(ReadError::TrailingInput(extra.line)),
        None => Ok(expr),
    }
}

fn is_identifier(atom: &str) -> bool {
    let mut chars = atom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Numbers are only numbers when they look like one; `inf` and friends stay text.
fn number(atom: &str) -> Option<f64> {
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    atom.parse().ok()
}

fn literal(atom: &str) -> Expr {
    let value = match atom {
        "nil" => Value::Nil,
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => match number(atom) {
            Some(num) => Value::Number(num),
            None => Value::String(atom.to_owned()),
        },
    };
    value.into()
}

struct Reader<'t> {
    current: usize,
    pieces: &'t [Lexed],
}

impl<'t> Reader<'t> {
    fn new(pieces: &'t [Lexed]) -> Self {
        Reader { current: 0, pieces }
    }

    fn program(&mut self) -> Result<Vec<Stmt>, ReadError> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    /// get the next piece without advancing
    fn peek(&self) -> Option<&'t Lexed> {
        self.pieces.get(self.current)
    }

    fn advance(&mut self) -> Result<&'t Lexed, ReadError> {
        let lexed = self.peek().ok_or(ReadError::PrematureTermination)?;
        self.current += 1;
        Ok(lexed)
    }

    fn open(&mut self) -> Result<(), ReadError> {
        let lexed = self.advance()?;
        match &lexed.piece {
            Piece::Open => Ok(()),
            Piece::Close => Err(ReadError::UnexpectedClose(lexed.line)),
            Piece::Atom(atom) => Err(ReadError::ExpectedForm {
                found: atom.clone(),
                line: lexed.line,
            }),
        }
    }

    fn close(&mut self, head: &str, found: usize, line: u32) -> Result<(), ReadError> {
        match self.advance()?.piece {
            Piece::Close => Ok(()),
            _ => Err(ReadError::WrongArity {
                head: head.to_owned(),
                found: found + 1,
                line,
            }),
        }
    }

    fn head(&mut self) -> Result<(&'t str, u32), ReadError> {
        let lexed = self.advance()?;
        match &lexed.piece {
            Piece::Atom(atom) => Ok((atom.as_str(), lexed.line)),
            _ => Err(ReadError::MissingHead(lexed.line)),
        }
    }

    fn identifier(&mut self) -> Result<Token, ReadError> {
        let lexed = self.advance()?;
        match &lexed.piece {
            Piece::Atom(atom) if is_identifier(atom) => Ok(Token::identifier(atom, lexed.line)),
            Piece::Atom(atom) => Err(ReadError::ExpectedIdentifier {
                found: atom.clone(),
                line: lexed.line,
            }),
            Piece::Open => Err(ReadError::ExpectedIdentifier {
                found: "(".to_owned(),
                line: lexed.line,
            }),
            Piece::Close => Err(ReadError::UnexpectedClose(lexed.line)),
        }
    }

    fn statement(&mut self) -> Result<Stmt, ReadError> {
        self.open()?;
        let (head, line) = self.head()?;
        let statement = match head {
            "expr" => Stmt::Expression(self.expression()?),
            "print" => Stmt::Print(self.expression()?),
            "var" => {
                let name = self.identifier()?;
                Var::new(name, self.expression()?).into()
            }
            _ => {
                return Err(ReadError::UnknownForm {
                    head: head.to_owned(),
                    line,
                })
            }
        };
        let operands = if head == "var" { 2 } else { 1 };
        self.close(head, operands, line)?;
        Ok(statement)
    }

    fn expression(&mut self) -> Result<Expr, ReadError> {
        let lexed = self.advance()?;
        match &lexed.piece {
            Piece::Atom(atom) => Ok(literal(atom)),
            Piece::Close => Err(ReadError::UnexpectedClose(lexed.line)),
            Piece::Open => self.form(),
        }
    }

    /// parse the rest of a parenthesized expression, after its '('
    fn form(&mut self) -> Result<Expr, ReadError> {
        let (head, line) = self.head()?;

        if head == "=" {
            let name = self.identifier()?;
            let value = self.expression()?;
            self.close(head, 2, line)?;
            return Ok(Assign::new(name, value).into());
        }

        let mut operands = Vec::new();
        while !matches!(self.peek().map(|l| &l.piece), Some(Piece::Close)) {
            operands.push(self.expression()?);
        }
        self.advance()?;

        let found = operands.len();
        let operator = |token_type: TokenType| Token::new(token_type, head.to_owned(), None, line);
        let mut operands = operands.into_iter();
        match (operands.next(), operands.next(), operands.next()) {
            (Some(inner), None, None) if head == "group" => Ok(Grouping::new(inner).into()),
            (Some(right), None, None) if UNARY_OPERATORS.contains_key(head) => {
                Ok(Unary::new(operator(UNARY_OPERATORS[head]), right).into())
            }
            (Some(left), Some(right), None) if BINARY_OPERATORS.contains_key(head) => {
                Ok(Binary::new(left, operator(BINARY_OPERATORS[head]), right).into())
            }
            _ => Err(self.bad_form(head, found, line)),
        }
    }

    fn bad_form(&self, head: &str, found: usize, line: u32) -> ReadError {
        let known = head == "group"
            || UNARY_OPERATORS.contains_key(head)
            || BINARY_OPERATORS.contains_key(head);
        if known {
            ReadError::WrongArity {
                head: head.to_owned(),
                found,
                line,
            }
        } else {
            ReadError::UnknownForm {
                head: head.to_owned(),
                line,
            }
        }
    }
}
