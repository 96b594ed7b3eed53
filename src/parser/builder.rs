//! Node and scope factories used by front ends
//!
//! A parser calls these while reducing source forms. Construction-time checks
//! (built-in arity, duplicate definitions) happen here so the evaluator can
//! rely on well-formed calls.

use crate::builtins::Operator;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{Error, Result};
use crate::parser::ast::{
    Binding, Callee, FunctionBinding, FunctionCall, Node, NodeKind, ScopeTable, VariableBinding,
};
use crate::runtime::{NumType, Value};

/// Builds AST nodes, reporting construction warnings to a sink
pub struct AstBuilder<'s> {
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> AstBuilder<'s> {
    /// Creates a builder that reports to `sink`
    pub fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        AstBuilder { sink }
    }

    /// Number literal of the given type
    pub fn number(&self, amount: f64, ty: NumType) -> Node {
        Node::number(Value::typed(ty, amount))
    }

    /// Symbol reference
    pub fn symbol(&self, name: impl Into<String>) -> Node {
        Node::symbol(name)
    }

    /// Function call
    ///
    /// `name` is resolved against the built-in table and falls back to a
    /// custom call. Built-in calls with too few arguments are rejected; extra
    /// arguments are kept and reported by the evaluator, which ignores them.
    /// Custom calls are checked when they are evaluated.
    pub fn call(&mut self, name: &str, args: Vec<Node>) -> Result<Node> {
        let callee = Callee::from_name(name);
        if let Callee::Builtin(op) = callee {
            self.check_arity(op, args.len())?;
        }
        Ok(Node::new(NodeKind::Call(FunctionCall { callee, args })))
    }

    /// Conditional
    pub fn conditional(&self, condition: Node, then: Node, otherwise: Node) -> Node {
        Node::conditional(condition, then, otherwise)
    }

    /// Variable binding
    pub fn variable(
        &self,
        name: impl Into<String>,
        value: Node,
        declared: Option<NumType>,
    ) -> Binding {
        Binding::Variable(VariableBinding {
            name: name.into(),
            declared,
            value,
        })
    }

    /// Custom function binding
    pub fn function(
        &self,
        name: impl Into<String>,
        body: Node,
        return_type: Option<NumType>,
        params: Vec<String>,
    ) -> Binding {
        Binding::Function(FunctionBinding {
            name: name.into(),
            return_type,
            params,
            body,
        })
    }

    /// Appends a binding to a table
    ///
    /// A duplicate identifier is reported as a conflicting definition; the
    /// binding is still appended.
    pub fn insert(&mut self, table: &mut ScopeTable, binding: Binding) {
        let name = binding.name().to_string();
        if !table.push(binding) {
            self.sink.report(Diagnostic::new(
                DiagnosticKind::ConflictingDefinition,
                format!("{} is already defined in this scope", name),
            ));
        }
    }

    /// Builds a table from bindings in order
    pub fn table(&mut self, bindings: Vec<Binding>) -> ScopeTable {
        let mut table = ScopeTable::new();
        for binding in bindings {
            self.insert(&mut table, binding);
        }
        table
    }

    /// Attaches a table to a node (the body of a `let`)
    pub fn with_scope(&self, node: Node, table: ScopeTable) -> Node {
        node.with_scope(table)
    }

    fn check_arity(&self, op: Operator, got: usize) -> Result<()> {
        let min = op.arity_class().min_args();
        if got < min {
            return Err(Error::arity(op.name(), min, got));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_resolves_builtin_and_custom() {
        let mut diags: Vec<Diagnostic> = Vec::new();
        let mut b = AstBuilder::new(&mut diags);

        let one = b.number(1.0, NumType::Int);
        let add = b.call("add", vec![one]).unwrap();
        assert!(matches!(
            add.kind,
            NodeKind::Call(FunctionCall { callee: Callee::Builtin(Operator::Add), .. })
        ));

        let custom = b.call("square", vec![]).unwrap();
        assert!(matches!(
            custom.kind,
            NodeKind::Call(FunctionCall { callee: Callee::Custom(ref n), .. }) if n == "square"
        ));
    }

    #[test]
    fn test_too_few_arguments_is_fatal() {
        let mut diags: Vec<Diagnostic> = Vec::new();
        let mut b = AstBuilder::new(&mut diags);

        let err = b.call("neg", vec![]).unwrap_err();
        assert_eq!(err, Error::arity("neg", 1, 0));

        let one = b.number(1.0, NumType::Int);
        assert!(b.call("pow", vec![one]).is_err());
    }

    #[test]
    fn test_too_many_arguments_are_kept_silently() {
        let mut diags: Vec<Diagnostic> = Vec::new();
        let node = {
            let mut b = AstBuilder::new(&mut diags);
            let args = vec![b.number(1.0, NumType::Int), b.number(2.0, NumType::Int)];
            b.call("abs", args).unwrap()
        };
        assert!(diags.is_empty());
        match node.kind {
            NodeKind::Call(call) => assert_eq!(call.args.len(), 2),
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_number_rounds_int_literals() {
        let mut diags: Vec<Diagnostic> = Vec::new();
        let b = AstBuilder::new(&mut diags);
        assert_eq!(b.number(2.6, NumType::Int), Node::number(Value::Int(3.0)));
    }

    #[test]
    fn test_duplicate_binding_warns_and_appends() {
        let mut diags: Vec<Diagnostic> = Vec::new();
        let table = {
            let mut b = AstBuilder::new(&mut diags);
            let first = b.number(1.0, NumType::Int);
            let second = b.number(2.0, NumType::Int);
            let bindings = vec![b.variable("x", first, None), b.variable("x", second, None)];
            b.table(bindings)
        };
        assert_eq!(table.len(), 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::ConflictingDefinition);
    }
}
