//! # numlisp - evaluation core for a small numeric Lisp
//!
//! Evaluates prefix-notation programs over two numeric types, `int` and
//! `double`, with a fixed library of built-in operators, lexically scoped
//! `let` bindings and user-defined functions whose arguments are bound
//! **by name**: an argument expression is re-evaluated in the caller's scope
//! every time the parameter is referenced.
//!
//! ## Quick Start
//!
//! Front ends build trees through [`AstBuilder`] (or hand over a JSON
//! document, see [`Node::from_json`]) and run them with an [`Evaluator`]:
//!
//! ```rust
//! use numlisp::{AstBuilder, Diagnostic, Evaluator, EvalConfig, NumType, SharedBuffer, Value};
//! use std::io::Cursor;
//!
//! # fn main() -> numlisp::Result<()> {
//! let mut warnings: Vec<Diagnostic> = Vec::new();
//! let mut b = AstBuilder::new(&mut warnings);
//!
//! // (add 1 (mult 2 3))
//! let product = b.call("mult", vec![b.number(2.0, NumType::Int), b.number(3.0, NumType::Int)])?;
//! let program = b.call("add", vec![b.number(1.0, NumType::Int), product])?;
//!
//! let output = SharedBuffer::new();
//! let mut evaluator = Evaluator::with_io(
//!     Cursor::new(String::new()),
//!     output.clone(),
//!     Vec::<Diagnostic>::new(),
//!     EvalConfig::default(),
//! );
//! assert_eq!(evaluator.evaluate_and_print(&program)?, Value::Int(7.0));
//! assert_eq!(output.contents(), "INT_TYPE: 7\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! front end → AstBuilder / JSON → Node → Evaluator → Value → format_value
//! ```
//!
//! - [`parser`] - AST model and construction-time checks
//! - [`builtins`] - operator table, math kernels, `read` and `rand`
//! - [`runtime`] - values, lexical environment, evaluator, settings
//! - [`diagnostics`] - non-fatal conditions routed to a [`DiagnosticSink`]
//! - [`error`] - fatal conditions
//!
//! ## Values
//!
//! A result is `Int`, `Float` or `Missing`. `Missing` is what an unresolved
//! name or an operator with a missing operand produces; it is never printed,
//! formatting it reports an `invalid-type` diagnostic instead.

/// Version of the evaluator
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builtins;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use builtins::{ArityClass, Operator};
pub use diagnostics::{
    Diagnostic, DiagnosticKind, DiagnosticSink, Severity, SharedDiagnostics, TracingSink,
};
pub use error::{Error, ErrorSeverity, Result};
pub use parser::{
    AstBuilder, Binding, Callee, Conditional, FunctionBinding, FunctionCall, Node, NodeKind,
    ScopeTable, VariableBinding,
};
pub use runtime::{format_value, EvalConfig, Evaluator, NumType, SharedBuffer, Value};
