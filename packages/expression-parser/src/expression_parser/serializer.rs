/**
 * Expression Serializer
 *
 * Serializes AST back to expression source text
 */
use super::ast::*;

/// Serialize AST to string
pub fn serialize(ast: &AST) -> String {
    ast.visit(&mut SerializeExpressionVisitor)
}

struct SerializeExpressionVisitor;

/// Binding strength of a binary operator; higher binds tighter.
fn binary_precedence(operation: &str) -> u8 {
    match operation {
        "||" => 2,
        "&&" => 3,
        "==" | "===" | "!=" | "!==" => 4,
        "<" | ">" | "<=" | ">=" => 5,
        "+" | "-" => 6,
        _ => 7,
    }
}

const PIPE: u8 = 0;
const CONDITIONAL: u8 = 1;
const PREFIX: u8 = 8;
const POSTFIX: u8 = 9;
const PRIMARY: u8 = 10;

/// Grammar level a node is parsed at, matching the order of the productions.
fn precedence(ast: &AST) -> u8 {
    match ast {
        AST::BindingPipe(_) | AST::PropertyWrite(_) | AST::KeyedWrite(_) | AST::Chain(_) => PIPE,
        AST::Conditional(_) => CONDITIONAL,
        AST::Binary(b) => binary_precedence(&b.operation),
        AST::Unary(_) | AST::PrefixNot(_) => PREFIX,
        AST::PropertyRead(_)
        | AST::SafePropertyRead(_)
        | AST::KeyedRead(_)
        | AST::MethodCall(_)
        | AST::SafeMethodCall(_)
        | AST::FunctionCall(_)
        | AST::NonNullAssert(_) => POSTFIX,
        AST::EmptyExpr(_)
        | AST::ImplicitReceiver(_)
        | AST::ThisReceiver(_)
        | AST::LiteralPrimitive(_)
        | AST::LiteralArray(_)
        | AST::LiteralMap(_)
        | AST::Interpolation(_)
        | AST::Quote(_) => PRIMARY,
    }
}

/// Single-quoted literal that lexes back to `value`.
fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\x0b' => quoted.push_str("\\v"),
            '\x0c' => quoted.push_str("\\f"),
            ch if ch.is_control() => quoted.push_str(&format!("\\u{:04X}", ch as u32)),
            ch => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

impl SerializeExpressionVisitor {
    fn visit_all(&mut self, asts: &[Box<AST>], separator: &str) -> String {
        asts.iter()
            .map(|ast| ast.visit(self))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `ast` printed in a position that needs at least `min` binding strength.
    fn operand(&mut self, ast: &AST, min: u8) -> String {
        let text = ast.visit(self);
        if precedence(ast) < min {
            format!("({})", text)
        } else {
            text
        }
    }

    /// Receiver of `.`, `?.`, `[`, `(` or a postfix `!`. A bare number would
    /// swallow the following `.` as a decimal point.
    fn receiver(&mut self, ast: &AST) -> String {
        match ast {
            AST::LiteralPrimitive(LiteralPrimitive::Number { .. }) => format!("({})", ast.visit(self)),
            _ => self.operand(ast, POSTFIX),
        }
    }

    fn member(&mut self, receiver: &AST, name: &str, accessor: &str) -> String {
        let receiver = self.receiver(receiver);
        if receiver.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", receiver, accessor, name)
        }
    }

    /// Right-hand side of an assignment; the grammar reads it as a conditional.
    fn assigned_value(&mut self, ast: &AST) -> String {
        match ast {
            AST::BindingPipe(_) | AST::Chain(_) => format!("({})", ast.visit(self)),
            _ => ast.visit(self),
        }
    }
}

impl AstVisitor for SerializeExpressionVisitor {
    type Result = String;

    fn visit_this_receiver(&mut self, _ast: &ThisReceiver) -> String {
        "this".to_string()
    }

    fn visit_chain(&mut self, ast: &Chain) -> String {
        self.visit_all(&ast.expressions, "; ")
    }

    fn visit_conditional(&mut self, ast: &Conditional) -> String {
        format!(
            "{} ? {} : {}",
            self.operand(&ast.condition, CONDITIONAL + 1),
            ast.true_exp.visit(self),
            ast.false_exp.visit(self)
        )
    }

    fn visit_property_read(&mut self, ast: &PropertyRead) -> String {
        self.member(&ast.receiver, &ast.name, ".")
    }

    fn visit_property_write(&mut self, ast: &PropertyWrite) -> String {
        let target = self.member(&ast.receiver, &ast.name, ".");
        format!("{} = {}", target, self.assigned_value(&ast.value))
    }

    fn visit_safe_property_read(&mut self, ast: &SafePropertyRead) -> String {
        format!("{}?.{}", self.receiver(&ast.receiver), ast.name)
    }

    fn visit_keyed_read(&mut self, ast: &KeyedRead) -> String {
        format!("{}[{}]", self.receiver(&ast.receiver), ast.key.visit(self))
    }

    fn visit_keyed_write(&mut self, ast: &KeyedWrite) -> String {
        format!(
            "{}[{}] = {}",
            self.receiver(&ast.receiver),
            ast.key.visit(self),
            self.assigned_value(&ast.value)
        )
    }

    fn visit_pipe(&mut self, ast: &BindingPipe) -> String {
        // Pipes chain to the left, so only a write needs grouping here.
        let exp = match &*ast.exp {
            AST::BindingPipe(_) => ast.exp.visit(self),
            exp => self.operand(exp, CONDITIONAL),
        };
        let mut result = format!("{} | {}", exp, ast.name);
        for arg in &ast.args {
            result.push(':');
            result.push_str(&self.operand(arg, CONDITIONAL));
        }
        result
    }

    fn visit_literal_primitive(&mut self, ast: &LiteralPrimitive) -> String {
        match ast {
            LiteralPrimitive::String { value, .. } => quote_string(value),
            LiteralPrimitive::Number { value, .. } => value.to_string(),
            LiteralPrimitive::Boolean { value, .. } => value.to_string(),
            LiteralPrimitive::Null { .. } => "null".to_string(),
            LiteralPrimitive::Undefined { .. } => "undefined".to_string(),
        }
    }

    fn visit_literal_array(&mut self, ast: &LiteralArray) -> String {
        format!("[{}]", self.visit_all(&ast.expressions, ", "))
    }

    fn visit_literal_map(&mut self, ast: &LiteralMap) -> String {
        let pairs: Vec<String> = ast
            .keys
            .iter()
            .zip(ast.values.iter())
            .map(|(key, value)| {
                let key_str = if key.quoted {
                    quote_string(&key.key)
                } else {
                    key.key.clone()
                };
                format!("{}: {}", key_str, value.visit(self))
            })
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    fn visit_interpolation(&mut self, ast: &Interpolation) -> String {
        let mut result = String::new();
        for (idx, s) in ast.strings.iter().enumerate() {
            result.push_str(s);
            if let Some(expression) = ast.expressions.get(idx) {
                result.push_str("{{");
                result.push_str(&expression.visit(self));
                result.push_str("}}");
            }
        }
        result
    }

    fn visit_binary(&mut self, ast: &Binary) -> String {
        let own = binary_precedence(&ast.operation);
        format!(
            "{} {} {}",
            self.operand(&ast.left, own),
            ast.operation,
            self.operand(&ast.right, own + 1)
        )
    }

    fn visit_unary(&mut self, ast: &Unary) -> String {
        let operand = self.operand(&ast.expr, PREFIX);
        // `- -a` must not print as `--a`
        if operand.starts_with(ast.operator.as_str()) {
            format!("{} {}", ast.operator, operand)
        } else {
            format!("{}{}", ast.operator, operand)
        }
    }

    fn visit_prefix_not(&mut self, ast: &PrefixNot) -> String {
        format!("!{}", self.operand(&ast.expression, PREFIX))
    }

    fn visit_non_null_assert(&mut self, ast: &NonNullAssert) -> String {
        format!("{}!", self.receiver(&ast.expression))
    }

    fn visit_method_call(&mut self, ast: &MethodCall) -> String {
        let target = self.member(&ast.receiver, &ast.name, ".");
        format!("{}({})", target, self.visit_all(&ast.args, ", "))
    }

    fn visit_safe_method_call(&mut self, ast: &SafeMethodCall) -> String {
        format!(
            "{}?.{}({})",
            self.receiver(&ast.receiver),
            ast.name,
            self.visit_all(&ast.args, ", ")
        )
    }

    fn visit_function_call(&mut self, ast: &FunctionCall) -> String {
        format!("{}({})", self.receiver(&ast.target), self.visit_all(&ast.args, ", "))
    }

    fn visit_quote(&mut self, ast: &Quote) -> String {
        format!("{}:{}", ast.prefix, ast.uninterpreted_expression)
    }
}
