use serde::{Deserialize, Serialize};
use std::fmt;

use crate::builtins::Operator;
use crate::error::{Error, Result};
use crate::runtime::{NumType, Value};

/// AST node: an expression plus the bindings it introduces
///
/// Ownership is strictly tree-shaped. There is no link from a node to its
/// enclosing node; the evaluator tracks lexical enclosure in its own
/// environment frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// What the node computes
    pub kind: NodeKind,
    /// Bindings introduced at this node (a `let`), visible in its subtree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeTable>,
}

/// Node variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Literal number
    Number(Value),
    /// Reference to a variable, parameter or function name
    Symbol(String),
    /// Built-in or custom function call
    Call(FunctionCall),
    /// `(cond c t f)`
    Conditional(Box<Conditional>),
}

/// Function call with ordered arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// What to call
    pub callee: Callee,
    /// Unevaluated argument expressions
    #[serde(default)]
    pub args: Vec<Node>,
}

/// Target of a function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callee {
    /// One of the fixed built-ins
    Builtin(Operator),
    /// User-defined function, resolved through the scope chain
    Custom(String),
}

impl Callee {
    /// Resolves a source name, falling back to a custom function
    pub fn from_name(name: &str) -> Callee {
        match Operator::from_name(name) {
            Some(op) => Callee::Builtin(op),
            None => Callee::Custom(name.to_string()),
        }
    }

    /// Name as written in source
    pub fn name(&self) -> &str {
        match self {
            Callee::Builtin(op) => op.name(),
            Callee::Custom(name) => name,
        }
    }
}

/// Condition with two branches; only one branch is ever evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    /// Zero selects `otherwise`, anything else selects `then`
    pub condition: Node,
    /// Branch taken on a non-zero condition
    pub then: Node,
    /// Branch taken on zero
    pub otherwise: Node,
}

/// Ordered bindings introduced at one node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeTable {
    bindings: Vec<Binding>,
}

/// A named variable or function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// `(x expr)` inside a `let`
    Variable(VariableBinding),
    /// `(f lambda (params) body)` inside a `let`
    Function(FunctionBinding),
}

/// Variable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableBinding {
    /// Identifier
    pub name: String,
    /// Declared type; `None` keeps the value's own type
    #[serde(default)]
    pub declared: Option<NumType>,
    /// Expression producing the value, evaluated on every reference
    pub value: Node,
}

/// Custom function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBinding {
    /// Identifier
    pub name: String,
    /// Declared return type; `None` keeps the body's own type
    #[serde(default)]
    pub return_type: Option<NumType>,
    /// Parameter names, bound by position at each call
    #[serde(default)]
    pub params: Vec<String>,
    /// Function body
    pub body: Node,
}

impl Binding {
    /// Identifier introduced by this binding
    pub fn name(&self) -> &str {
        match self {
            Binding::Variable(v) => &v.name,
            Binding::Function(f) => &f.name,
        }
    }
}

impl ScopeTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a binding, returning false if the name was already present
    ///
    /// The binding is appended either way; lookups keep returning the first
    /// definition.
    pub fn push(&mut self, binding: Binding) -> bool {
        let fresh = self.get(binding.name()).is_none();
        self.bindings.push(binding);
        fresh
    }

    /// First binding with the given name
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name() == name)
    }

    /// Bindings in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if the table holds no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl NodeKind {
    /// Short label for logs: the callee name for calls, the variant otherwise
    pub fn label(&self) -> &str {
        match self {
            NodeKind::Number(_) => "number",
            NodeKind::Symbol(name) => name,
            NodeKind::Call(call) => call.callee.name(),
            NodeKind::Conditional(_) => "cond",
        }
    }
}

impl Node {
    /// Wraps a node kind with no scope table
    pub fn new(kind: NodeKind) -> Self {
        Node { kind, scope: None }
    }

    /// Number literal
    pub fn number(value: Value) -> Self {
        Node::new(NodeKind::Number(value))
    }

    /// Symbol reference
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::new(NodeKind::Symbol(name.into()))
    }

    /// Conditional
    pub fn conditional(condition: Node, then: Node, otherwise: Node) -> Self {
        Node::new(NodeKind::Conditional(Box::new(Conditional {
            condition,
            then,
            otherwise,
        })))
    }

    /// Attaches a scope table, replacing any existing one
    pub fn with_scope(mut self, table: ScopeTable) -> Self {
        self.scope = Some(table);
        self
    }

    /// Loads a tree produced by an external front end
    ///
    /// The document is validated after decoding: literal integers must be
    /// whole numbers and missing values cannot appear as literals.
    pub fn from_json(json: &str) -> Result<Node> {
        let node: Node =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("AST: {}", e)))?;
        node.validate()?;
        Ok(node)
    }

    /// Serializes the tree
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Config(format!("AST: {}", e)))
    }

    /// Checks construction-time invariants over the whole subtree
    pub fn validate(&self) -> Result<()> {
        if let Some(table) = &self.scope {
            for binding in table.iter() {
                match binding {
                    Binding::Variable(v) => v.value.validate()?,
                    Binding::Function(f) => f.body.validate()?,
                }
            }
        }

        match &self.kind {
            NodeKind::Number(Value::Missing) => Err(Error::InvalidNodeKind(
                "number literal without a value".to_string(),
            )),
            NodeKind::Number(Value::Int(n)) if n.fract() != 0.0 => Err(Error::InvalidNodeKind(
                format!("integer literal {} has a fractional part", n),
            )),
            NodeKind::Number(_) => Ok(()),
            NodeKind::Symbol(name) if name.is_empty() => {
                Err(Error::InvalidNodeKind("empty symbol name".to_string()))
            }
            NodeKind::Symbol(_) => Ok(()),
            NodeKind::Call(call) => {
                if let Callee::Builtin(op) = call.callee {
                    let min = op.arity_class().min_args();
                    if call.args.len() < min {
                        return Err(Error::arity(op.name(), min, call.args.len()));
                    }
                }
                call.args.iter().try_for_each(Node::validate)
            }
            NodeKind::Conditional(cond) => {
                cond.condition.validate()?;
                cond.then.validate()?;
                cond.otherwise.validate()
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            NodeKind::Number(Value::Int(n)) => write!(f, "{}", n),
            NodeKind::Number(Value::Float(n)) => write!(f, "{:?}", n),
            NodeKind::Number(Value::Missing) => write!(f, "<missing>"),
            NodeKind::Symbol(name) => write!(f, "{}", name),
            NodeKind::Call(call) => {
                write!(f, "({}", call.callee.name())?;
                for arg in &call.args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            NodeKind::Conditional(cond) => write!(
                f,
                "(cond {} {} {})",
                cond.condition, cond.then, cond.otherwise
            ),
        }
    }
}
