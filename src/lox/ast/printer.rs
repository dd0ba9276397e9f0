use std::io::{self, Write};

use tracing::debug;

use crate::lox::{
    fold::{ConstantFolder, RuntimeError},
    reporter::Reporter,
    scanner::tokens::Value,
};

use super::{
    Assign, Binary, Expr, ExprVisitor, Grouping, Literal, Stmt, StmtVisitor, Unary, Var, Variable,
};

type Rendered = Result<String, RuntimeError>;

/// Renders statements as fully parenthesized S-expressions, one line per statement.
///
/// Rendering itself keeps no state between statements; the printer only owns where finished
/// lines go (`out`) and where failures go (`reporter`).
pub struct Printer<W, R> {
    out: W,
    reporter: R,
    fold_constants: bool,
}

impl<W: Write, R: Reporter> Printer<W, R> {
    pub fn new(out: W, reporter: R) -> Self {
        Self {
            out,
            reporter,
            fold_constants: false,
        }
    }

    /// Render constant sub-expressions as their value instead of their structure. Folding can
    /// fail, in which case the statement is reported and skipped.
    pub fn with_constant_folding(mut self, fold_constants: bool) -> Self {
        self.fold_constants = fold_constants;
        self
    }

    /// Write one line per statement, in order. A statement that fails to render goes to the
    /// reporter and the walk carries on with the next one; only a failing sink stops it.
    pub fn print(&mut self, statements: &[Stmt]) -> io::Result<()> {
        for (idx, statement) in statements.iter().enumerate() {
            match self.render_stmt(statement) {
                Ok(line) => {
                    debug!(statement = idx, %line, "rendered statement");
                    writeln!(self.out, "{line}")?;
                }
                Err(e) => self.reporter.report(&e),
            }
        }
        self.out.flush()
    }

    pub fn render_stmt(&mut self, statement: &Stmt) -> Rendered {
        statement.accept(self)
    }

    pub fn render_expr(&mut self, expr: &Expr) -> Rendered {
        expr.accept(self)
    }

    pub fn into_inner(self) -> (W, R) {
        (self.out, self.reporter)
    }

    fn parenthesize(&mut self, name: &str, expressions: &[&Expr]) -> Rendered {
        let mut s = format!("({}", name);
        for expr in expressions {
            s.push(' ');
            s.push_str(&self.render_expr(expr)?);
        }
        Ok(s + ")")
    }

    /// The folded value of a node, if folding is on and its whole subtree is constant
    fn folded<F>(&self, fold: F) -> Result<Option<Value>, RuntimeError>
    where
        F: FnOnce(&mut ConstantFolder) -> Result<Option<Value>, RuntimeError>,
    {
        if !self.fold_constants {
            return Ok(None);
        }
        fold(&mut ConstantFolder)
    }
}

impl<W: Write, R: Reporter> StmtVisitor<Rendered> for Printer<W, R> {
    fn visit_expression_stmt(&mut self, expr: &Expr) -> Rendered {
        self.parenthesize("expr", &[expr])
    }

    fn visit_print_stmt(&mut self, expr: &Expr) -> Rendered {
        self.parenthesize("print", &[expr])
    }

    fn visit_var_stmt(&mut self, var: &Var) -> Rendered {
        let initializer = self.render_expr(&var.initializer)?;
        Ok(format!("(var {} {})", var.name.lexeme, initializer))
    }
}

impl<W: Write, R: Reporter> ExprVisitor<Rendered> for Printer<W, R> {
    fn visit_assign(&mut self, assign: &Assign) -> Rendered {
        let value = self.render_expr(&assign.value)?;
        Ok(format!("(= {} {})", assign.name.lexeme, value))
    }

    fn visit_binary(&mut self, binary: &Binary) -> Rendered {
        if let Some(value) = self.folded(|folder| folder.visit_binary(binary))? {
            return Ok(value.to_string());
        }
        self.parenthesize(&binary.operator.lexeme, &[&*binary.left, &*binary.right])
    }

    fn visit_grouping(&mut self, grouping: &Grouping) -> Rendered {
        if let Some(value) = self.folded(|folder| folder.visit_grouping(grouping))? {
            return Ok(value.to_string());
        }
        self.parenthesize("group", &[&*grouping.0])
    }

    fn visit_literal(&mut self, literal: &Literal) -> Rendered {
        Ok(literal.0.to_string())
    }

    fn visit_unary(&mut self, unary: &Unary) -> Rendered {
        if let Some(value) = self.folded(|folder| folder.visit_unary(unary))? {
            return Ok(value.to_string());
        }
        self.parenthesize(&unary.operator.lexeme, &[&*unary.right])
    }

    // NOTE: variable references are left unrendered, so `print x` comes out as `(print )`.
    // Anything that reads the output back has to live with that.
    fn visit_variable(&mut self, _variable: &Variable) -> Rendered {
        Ok(String::new())
    }
}
