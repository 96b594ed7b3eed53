//! AST model and the factory boundary used by front ends
//!
//! Tokenizing and parsing source text is done elsewhere; a front end builds
//! trees with [`AstBuilder`] or hands over a JSON document via
//! [`Node::from_json`].

mod ast;
mod builder;

pub use ast::{
    Binding, Callee, Conditional, FunctionBinding, FunctionCall, Node, NodeKind, ScopeTable,
    VariableBinding,
};
pub use builder::AstBuilder;
