use super::scanner::tokens::{Token, Value};

pub mod printer;

/// Expressions. Every node owns its children; nothing is shared between trees.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Assign(Assign),
    Binary(Binary),
    Grouping(Grouping),
    Literal(Literal),
    Unary(Unary),
    Variable(Variable),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    pub name: Token,
    pub value: Box<Expr>,
}

impl Assign {
    pub fn new(name: Token, value: Expr) -> Self {
        Self {
            name,
            value: Box::new(value),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

impl Binary {
    pub fn new(left: Expr, operator: Token, right: Expr) -> Self {
        Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grouping(pub Box<Expr>);

impl Grouping {
    pub fn new(inner: Expr) -> Self {
        Self(Box::new(inner))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal(pub Value);

#[derive(Clone, Debug, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub right: Box<Expr>,
}

impl Unary {
    pub fn new(operator: Token, right: Expr) -> Self {
        Self {
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: Token,
}

impl From<Assign> for Expr {
    fn from(assign: Assign) -> Self {
        Expr::Assign(assign)
    }
}

impl From<Binary> for Expr {
    fn from(binary: Binary) -> Self {
        Expr::Binary(binary)
    }
}

impl From<Grouping> for Expr {
    fn from(grouping: Grouping) -> Self {
        Expr::Grouping(grouping)
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}

impl From<Unary> for Expr {
    fn from(unary: Unary) -> Self {
        Expr::Unary(unary)
    }
}

impl From<Variable> for Expr {
    fn from(variable: Variable) -> Self {
        Expr::Variable(variable)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(Literal(value))
    }
}

/// Statements. A program is a `Vec<Stmt>`, which owns the whole tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Print(Expr),
    Var(Var),
}

/// A variable declaration. The initializer is always present: a declaration written without one
/// is built with [`Var::uninitialized`], which stands in an explicit `nil`.
#[derive(Clone, Debug, PartialEq)]
pub struct Var {
    pub name: Token,
    pub initializer: Expr,
}

impl Var {
    pub fn new(name: Token, initializer: Expr) -> Self {
        Self { name, initializer }
    }

    pub fn uninitialized(name: Token) -> Self {
        Self::new(name, Expr::Literal(Literal(Value::Nil)))
    }
}

impl From<Var> for Stmt {
    fn from(var: Var) -> Self {
        Stmt::Var(var)
    }
}

/// One handler per expression variant. Implementors never match on `Expr` themselves: they call
/// [`Expr::accept`] and let the node pick the handler.
pub trait ExprVisitor<T> {
    fn visit_assign(&mut self, assign: &Assign) -> T;
    fn visit_binary(&mut self, binary: &Binary) -> T;
    fn visit_grouping(&mut self, grouping: &Grouping) -> T;
    fn visit_literal(&mut self, literal: &Literal) -> T;
    fn visit_unary(&mut self, unary: &Unary) -> T;
    fn visit_variable(&mut self, variable: &Variable) -> T;
}

/// One handler per statement variant, see [`Stmt::accept`].
pub trait StmtVisitor<T> {
    fn visit_expression_stmt(&mut self, expr: &Expr) -> T;
    fn visit_print_stmt(&mut self, expr: &Expr) -> T;
    fn visit_var_stmt(&mut self, var: &Var) -> T;
}

impl Expr {
    /// Route to the single handler matching this node's variant and hand back its result as is.
    pub fn accept<T, V>(&self, visitor: &mut V) -> T
    where
        V: ExprVisitor<T> + ?Sized,
    {
        match self {
            Expr::Assign(assign) => visitor.visit_assign(assign),
            Expr::Binary(binary) => visitor.visit_binary(binary),
            Expr::Grouping(grouping) => visitor.visit_grouping(grouping),
            Expr::Literal(literal) => visitor.visit_literal(literal),
            Expr::Unary(unary) => visitor.visit_unary(unary),
            Expr::Variable(variable) => visitor.visit_variable(variable),
        }
    }
}

impl Stmt {
    pub fn accept<T, V>(&self, visitor: &mut V) -> T
    where
        V: StmtVisitor<T> + ?Sized,
    {
        match self {
            Stmt::Expression(expr) => visitor.visit_expression_stmt(expr),
            Stmt::Print(expr) => visitor.visit_print_stmt(expr),
            Stmt::Var(var) => visitor.visit_var_stmt(var),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lox::scanner::tokens::TokenType;

    /// Records which handler ran, to check dispatch independently of any real pass
    #[derive(Default)]
    struct Tracer {
        visited: Vec<&'static str>,
    }

    impl ExprVisitor<&'static str> for Tracer {
        fn visit_assign(&mut self, _assign: &Assign) -> &'static str {
            self.visited.push("assign");
            "assign"
        }
        fn visit_binary(&mut self, _binary: &Binary) -> &'static str {
            self.visited.push("binary");
            "binary"
        }
        fn visit_grouping(&mut self, _grouping: &Grouping) -> &'static str {
            self.visited.push("grouping");
            "grouping"
        }
        fn visit_literal(&mut self, _literal: &Literal) -> &'static str {
            self.visited.push("literal");
            "literal"
        }
        fn visit_unary(&mut self, _unary: &Unary) -> &'static str {
            self.visited.push("unary");
            "unary"
        }
        fn visit_variable(&mut self, _variable: &Variable) -> &'static str {
            self.visited.push("variable");
            "variable"
        }
    }

    impl StmtVisitor<&'static str> for Tracer {
        fn visit_expression_stmt(&mut self, _expr: &Expr) -> &'static str {
            self.visited.push("expression");
            "expression"
        }
        fn visit_print_stmt(&mut self, _expr: &Expr) -> &'static str {
            self.visited.push("print");
            "print"
        }
        fn visit_var_stmt(&mut self, _var: &Var) -> &'static str {
            self.visited.push("var");
            "var"
        }
    }

    fn minus() -> Token {
        Token::new(TokenType::Minus, "-".to_owned(), None, 1)
    }

    #[test]
    fn test_expr_dispatch_runs_one_handler() {
        let exprs: Vec<(Expr, &str)> = vec![
            (
                Assign::new(Token::identifier("x", 1), Value::Number(1.).into()).into(),
                "assign",
            ),
            (
                Binary::new(Value::Number(1.).into(), minus(), Value::Number(2.).into()).into(),
                "binary",
            ),
            (Grouping::new(Value::Nil.into()).into(), "grouping"),
            (Value::Boolean(true).into(), "literal"),
            (Unary::new(minus(), Value::Number(1.).into()).into(), "unary"),
            (
                Variable {
                    name: Token::identifier("x", 1),
                }
                .into(),
                "variable",
            ),
        ];

        for (expr, expected) in exprs {
            let mut tracer = Tracer::default();
            assert_eq!(expr.accept(&mut tracer), expected);
            // children are the visitor's business, not the dispatcher's
            assert_eq!(tracer.visited, vec![expected]);
        }
    }

    #[test]
    fn test_stmt_dispatch_runs_one_handler() {
        let stmts = vec![
            (Stmt::Expression(Value::Nil.into()), "expression"),
            (Stmt::Print(Value::Nil.into()), "print"),
            (Var::uninitialized(Token::identifier("y", 1)).into(), "var"),
        ];

        for (stmt, expected) in stmts {
            let mut tracer = Tracer::default();
            assert_eq!(stmt.accept(&mut tracer), expected);
            assert_eq!(tracer.visited, vec![expected]);
        }
    }

    #[test]
    fn test_uninitialized_var_gets_nil() {
        let var = Var::uninitialized(Token::identifier("y", 3));
        assert_eq!(var.initializer, Expr::Literal(Literal(Value::Nil)));
        assert_eq!(var.name.lexeme, "y");
    }
}
