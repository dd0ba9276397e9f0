use thiserror::Error;

use super::{
    ast::{Assign, Binary, Expr, ExprVisitor, Grouping, Literal, Unary, Variable},
    scanner::tokens::{Token, TokenType, Value},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Invalid operator: {}. Line {}", .operator.lexeme, .operator.line)]
    InvalidOperator { operator: Token },
    #[error("Invalid operand for {}: {:?}. Line {}", .operator.lexeme, .value, .operator.line)]
    InvalidOperand { operator: Token, value: Value },
    #[error(
        "Invalid operands for {}: {:?} {:?}. Line {}",
        .operator.lexeme, .left, .right, .operator.line
    )]
    InvalidOperands {
        operator: Token,
        left: Value,
        right: Value,
    },
}

/// Evaluates the constant parts of an expression tree.
///
/// `Ok(None)` means the expression depends on a binding (a variable read or an assignment) and
/// cannot be folded; it is not an error.
pub struct ConstantFolder;

impl ConstantFolder {
    pub fn fold(&mut self, expr: &Expr) -> Result<Option<Value>, RuntimeError> {
        expr.accept(self)
    }
}

fn is_truthy(val: &Value) -> bool {
    match val {
        Value::Nil => false,
        Value::Boolean(val) => *val,
        _ => true,
    }
}

fn invalid_operands(operator: &Token, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands {
        operator: operator.clone(),
        left: left.clone(),
        right: right.clone(),
    }
}

impl ExprVisitor<Result<Option<Value>, RuntimeError>> for ConstantFolder {
    fn visit_assign(&mut self, _assign: &Assign) -> Result<Option<Value>, RuntimeError> {
        Ok(None)
    }

    fn visit_binary(&mut self, binary: &Binary) -> Result<Option<Value>, RuntimeError> {
        let Some(left) = self.fold(&binary.left)? else {
            return Ok(None);
        };
        let Some(right) = self.fold(&binary.right)? else {
            return Ok(None);
        };
        let operator = &binary.operator;

        let value = match (&operator.token_type, &left, &right) {
            (TokenType::EqualEqual, _, _) => Value::Boolean(left == right),
            (TokenType::BangEqual, _, _) => Value::Boolean(left != right),
            (TokenType::Greater, Value::Number(l), Value::Number(r)) => Value::Boolean(l > r),
            (TokenType::GreaterEqual, Value::Number(l), Value::Number(r)) => {
                Value::Boolean(l >= r)
            }
            (TokenType::Less, Value::Number(l), Value::Number(r)) => Value::Boolean(l < r),
            (TokenType::LessEqual, Value::Number(l), Value::Number(r)) => Value::Boolean(l <= r),
            (TokenType::Minus, Value::Number(l), Value::Number(r)) => Value::Number(l - r),
            // IEEE semantics, dividing by zero gives an infinity rather than an error
            (TokenType::Slash, Value::Number(l), Value::Number(r)) => Value::Number(l / r),
            (TokenType::Star, Value::Number(l), Value::Number(r)) => Value::Number(l * r),
            // "+" is used for both number addition and string concatenation
            (TokenType::Plus, Value::Number(l), Value::Number(r)) => Value::Number(l + r),
            (TokenType::Plus, Value::String(l), Value::String(r)) => {
                Value::String(l.to_owned() + r)
            }
            (
                TokenType::Greater
                | TokenType::GreaterEqual
                | TokenType::Less
                | TokenType::LessEqual
                | TokenType::Minus
                | TokenType::Slash
                | TokenType::Star
                | TokenType::Plus,
                _,
                _,
            ) => return Err(invalid_operands(operator, &left, &right)),
            _ => {
                return Err(RuntimeError::InvalidOperator {
                    operator: operator.clone(),
                })
            }
        };
        Ok(Some(value))
    }

    fn visit_grouping(&mut self, grouping: &Grouping) -> Result<Option<Value>, RuntimeError> {
        self.fold(&grouping.0)
    }

    fn visit_literal(&mut self, literal: &Literal) -> Result<Option<Value>, RuntimeError> {
        Ok(Some(literal.0.clone()))
    }

    fn visit_unary(&mut self, unary: &Unary) -> Result<Option<Value>, RuntimeError> {
        let Some(inner) = self.fold(&unary.right)? else {
            return Ok(None);
        };
        match (&unary.operator.token_type, inner) {
            (TokenType::Minus, Value::Number(num)) => Ok(Some(Value::Number(-num))),
            // "-" operator with non-Number value is invalid
            (TokenType::Minus, value) => Err(RuntimeError::InvalidOperand {
                operator: unary.operator.clone(),
                value,
            }),
            (TokenType::Bang, value) => Ok(Some(Value::Boolean(!is_truthy(&value)))),
            (_, _) => Err(RuntimeError::InvalidOperator {
                operator: unary.operator.clone(),
            }),
        }
    }

    fn visit_variable(&mut self, _variable: &Variable) -> Result<Option<Value>, RuntimeError> {
        Ok(None)
    }
}
