//! Non-fatal diagnostics
//!
//! Warnings and recoverable conditions are handed to a [`DiagnosticSink`]
//! supplied by the caller, so a driver can redirect or silence them without
//! touching normal program output.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Evaluation continued with the intended result
    Warning,
    /// Evaluation continued, but the affected subtree produced no value
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// More arguments than the callee uses; extras are ignored
    ArityTooMany,
    /// A scope table already held the identifier; the new binding was still appended
    ConflictingDefinition,
    /// A float value was rounded to fit an integer declaration
    PrecisionLoss,
    /// `read` got a line that is not a decimal number
    InvalidInputFormat,
    /// No enclosing scope defines the name
    UnresolvedSymbol,
    /// A value without a printable type reached the formatter
    InvalidType,
}

impl DiagnosticKind {
    /// Default severity for this kind
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::UnresolvedSymbol | DiagnosticKind::InvalidType => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Stable slug used in log output
    pub fn slug(self) -> &'static str {
        match self {
            DiagnosticKind::ArityTooMany => "arity-too-many",
            DiagnosticKind::ConflictingDefinition => "conflicting-definition",
            DiagnosticKind::PrecisionLoss => "precision-loss",
            DiagnosticKind::InvalidInputFormat => "invalid-input-format",
            DiagnosticKind::UnresolvedSymbol => "unresolved-symbol",
            DiagnosticKind::InvalidType => "invalid-type",
        }
    }
}

/// A single reported condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What happened
    pub kind: DiagnosticKind,
    /// Warning or error
    pub severity: Severity,
    /// One-line summary, no trailing period
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with the kind's default severity
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.kind.slug(), self.message)
    }
}

/// Receiver for diagnostics
pub trait DiagnosticSink {
    /// Record one diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                kind = diagnostic.kind.slug(),
                "{}",
                diagnostic.message
            ),
            Severity::Error => tracing::error!(
                kind = diagnostic.kind.slug(),
                "{}",
                diagnostic.message
            ),
        }
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Clone-able collector; every clone appends to the same list
#[derive(Debug, Default, Clone)]
pub struct SharedDiagnostics {
    inner: Rc<RefCell<Vec<Diagnostic>>>,
}

impl SharedDiagnostics {
    /// Creates an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.inner.borrow().clone()
    }

    /// Removes and returns everything reported so far
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }

    /// Number of diagnostics of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.inner.borrow().iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticSink for SharedDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.inner.borrow_mut().push(diagnostic);
    }
}
