//! Error types for the Numlisp evaluator
//!
//! Only conditions that abort a construction or an evaluation live here.
//! Recoverable conditions (warnings, unresolved symbols, bad `read` input) are
//! reported through [`crate::diagnostics`] and evaluation continues.

use thiserror::Error;

/// Fatal evaluator errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Too few arguments for an operator or custom function
    ///
    /// **Triggered by:** `(sqrt)`, or calling `(f 1)` when `f` declares two parameters
    /// **Effect:** the call is not constructed (built-ins) or not evaluated (custom functions)
    #[error("Too few arguments for {callee}: expected at least {expected}, got {got}")]
    ArityTooFew {
        /// Operator or function name
        callee: String,
        /// Minimum argument count
        expected: usize,
        /// Actual argument count
        got: usize,
    },

    /// Strict lookup of a name that no enclosing scope defines
    #[error("Unresolved symbol: {name}")]
    UnresolvedSymbol {
        /// Symbol name
        name: String,
    },

    /// A custom call names a variable binding
    ///
    /// **Example:** `(let ((x 1)) (x 2))`
    #[error("Value is not callable: {name}")]
    NotCallable {
        /// Name of the variable used as a function
        name: String,
    },

    /// A symbol reference names a function binding
    #[error("Function used as a variable: {name}")]
    NotAVariable {
        /// Name of the function
        name: String,
    },

    /// A value has no printable type tag
    #[error("Invalid type: cannot format {got}")]
    InvalidType {
        /// Description of the offending value
        got: String,
    },

    /// The AST violates a construction-time invariant
    #[error("Invalid node kind: {0}")]
    InvalidNodeKind(String),

    /// Evaluation nested deeper than the configured limit
    #[error("Recursion limit exceeded (max depth: {limit})")]
    RecursionLimit {
        /// Maximum allowed depth
        limit: usize,
    },

    /// `read` hit end of input
    #[error("Input closed while waiting for read")]
    InputClosed,

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration or AST document could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Caused by the program being evaluated
    User,
    /// Caused by the front end handing over an inconsistent tree
    Internal,
    /// Caused by the host environment (I/O, configuration)
    Environment,
}

impl Error {
    /// Create an arity error
    pub fn arity(callee: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ArityTooFew {
            callee: callee.into(),
            expected,
            got,
        }
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::ArityTooFew { .. }
            | Error::UnresolvedSymbol { .. }
            | Error::NotCallable { .. }
            | Error::NotAVariable { .. }
            | Error::RecursionLimit { .. } => ErrorSeverity::User,

            Error::InvalidType { .. } | Error::InvalidNodeKind(_) => ErrorSeverity::Internal,

            Error::InputClosed | Error::Io(_) | Error::Config(_) => ErrorSeverity::Environment,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type for Numlisp operations
pub type Result<T> = std::result::Result<T, Error>;
