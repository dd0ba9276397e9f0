use anyhow::{Context, Result};
use std::io;

use ast::{printer::Printer, Stmt};
use fold::RuntimeError;
use reporter::StderrReporter;

pub mod ast;
pub mod fold;
pub mod reader;
pub mod reporter;
pub mod scanner;

/// Print every statement to stdout, one S-expression per line. Statements that fail are reported
/// on stderr and skipped.
pub fn print(statements: &[Stmt]) -> Result<()> {
    let stdout = io::stdout().lock();
    let mut printer = Printer::new(stdout, StderrReporter::new());
    printer
        .print(statements)
        .context("failed to write to stdout")?;
    Ok(())
}

/// Render each statement to its canonical line without writing anywhere. Stops at the first
/// statement that fails to render.
pub fn render_program(statements: &[Stmt]) -> Result<Vec<String>, RuntimeError> {
    let mut printer = Printer::new(io::sink(), StderrReporter::new());
    statements
        .iter()
        .map(|statement| printer.render_stmt(statement))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lox::{
        ast::{Assign, Var},
        scanner::tokens::{Token, Value},
    };

    #[test]
    fn test_render_program() {
        let statements: Vec<Stmt> = vec![
            Var::new(Token::identifier("x", 1), Value::Number(1.).into()).into(),
            Stmt::Expression(Assign::new(Token::identifier("x", 2), Value::Number(5.).into()).into()),
            Stmt::Print(Value::Nil.into()),
        ];
        assert_eq!(
            render_program(&statements).unwrap(),
            vec!["(var x 1)", "(expr (= x 5))", "(print nil)"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_print_to_stdout() {
        print(&[Stmt::Print(Value::from("hi").into())]).unwrap();
    }
}
