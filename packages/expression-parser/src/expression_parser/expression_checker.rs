//! Restrictions on host binding expressions.

use serde::{Deserialize, Serialize};

use super::ast::*;

/// Which checker `Parser::parse_simple_binding` runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckerKind {
    /// Looks at the root, plus literal array and map entries
    #[default]
    Shallow,
    /// Walks the whole tree, so nested pipes are caught as well
    Recursive,
}

impl CheckerKind {
    /// Names of the disallowed constructs found in `ast`.
    pub fn check(self, ast: &AST) -> Vec<String> {
        match self {
            CheckerKind::Shallow => {
                let mut checker = SimpleExpressionChecker::default();
                ast.visit(&mut checker);
                checker.errors
            }
            CheckerKind::Recursive => {
                let mut checker = IvySimpleExpressionChecker::default();
                checker.visit(ast);
                checker.errors
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SimpleExpressionChecker {
    pub errors: Vec<String>,
}

impl SimpleExpressionChecker {
    fn visit_all(&mut self, asts: &[Box<AST>]) {
        for ast in asts {
            ast.visit(self);
        }
    }
}

impl AstVisitor for SimpleExpressionChecker {
    type Result = ();

    fn visit_literal_array(&mut self, ast: &LiteralArray) {
        self.visit_all(&ast.expressions);
    }

    fn visit_literal_map(&mut self, ast: &LiteralMap) {
        self.visit_all(&ast.values);
    }

    fn visit_pipe(&mut self, _ast: &BindingPipe) {
        self.errors.push("pipes".to_string());
    }
}

#[derive(Debug, Default)]
pub struct IvySimpleExpressionChecker {
    pub errors: Vec<String>,
}

impl RecursiveAstVisitor for IvySimpleExpressionChecker {
    fn visit_pipe(&mut self, _ast: &BindingPipe) {
        self.errors.push("pipes".to_string());
    }
}
