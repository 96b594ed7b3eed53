//! Shared harness for integration tests
#![allow(dead_code)]

use numlisp::{
    AstBuilder, Diagnostic, DiagnosticKind, EvalConfig, Evaluator, Node, NumType, Result,
    SharedBuffer, SharedDiagnostics, Value,
};
use std::io::Cursor;

/// Outcome of one evaluation
pub struct Run {
    pub result: Result<Value>,
    pub output: String,
    pub diagnostics: SharedDiagnostics,
}

impl Run {
    pub fn value(&self) -> Value {
        self.result.clone().expect("evaluation failed")
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.count(kind)
    }
}

/// Evaluates `node` with `input` as stdin and a fixed rand seed
pub fn run_with_input(node: &Node, input: &str) -> Run {
    let output = SharedBuffer::new();
    let diagnostics = SharedDiagnostics::new();
    let mut evaluator = Evaluator::with_io(
        Cursor::new(input.to_string()),
        output.clone(),
        diagnostics.clone(),
        EvalConfig::default().with_seed(7),
    );
    let result = evaluator.evaluate(node);
    Run {
        result,
        output: output.contents(),
        diagnostics,
    }
}

pub fn run(node: &Node) -> Run {
    run_with_input(node, "")
}

/// Builds a tree with a throwaway builder, discarding construction warnings
pub fn build<F>(f: F) -> Node
where
    F: FnOnce(&mut AstBuilder<'_>) -> Node,
{
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut builder = AstBuilder::new(&mut sink);
    f(&mut builder)
}

pub fn int(n: f64) -> Node {
    Node::number(Value::typed(NumType::Int, n))
}

pub fn double(n: f64) -> Node {
    Node::number(Value::Float(n))
}
