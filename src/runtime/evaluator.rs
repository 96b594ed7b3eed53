use std::io::{self, BufRead, BufReader, Write};

use crate::builtins::io::{read_number, RandomSource};
use crate::builtins::{ArityClass, Operator};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
use crate::error::{Error, Result};
use crate::parser::{Callee, Conditional, FunctionCall, Node, NodeKind};
use crate::runtime::environment::{Environment, FrameId, Resolved, GLOBAL};
use crate::runtime::{EvalConfig, NumType, Value};

/// Tree-walking evaluator
///
/// Walks an AST top-down, resolving symbols through the lexical environment
/// and dispatching calls to the built-in library or to custom functions:
/// - `Number` nodes return their literal
/// - `Symbol` nodes resolve to a variable, a call-by-name parameter, or fail
/// - built-in calls check arity, evaluate operands left to right and promote
/// - custom calls bind arguments unevaluated in a fresh activation record
/// - conditionals evaluate exactly one branch
///
/// Warnings go to the diagnostic sink; only fatal conditions come back as
/// `Err`.
pub struct Evaluator {
    config: EvalConfig,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    sink: Box<dyn DiagnosticSink>,
    random: RandomSource,
}

/// Where evaluation currently stands: innermost frame and nesting depth
#[derive(Debug, Clone, Copy)]
struct Site {
    frame: FrameId,
    depth: usize,
}

impl Evaluator {
    /// Creates an evaluator on stdin/stdout, reporting through `tracing`
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    /// Creates an evaluator on stdin/stdout with custom settings
    pub fn with_config(config: EvalConfig) -> Self {
        Self::with_io(
            BufReader::new(io::stdin()),
            io::stdout(),
            TracingSink,
            config,
        )
    }

    /// Creates an evaluator on caller-supplied streams and sink
    pub fn with_io(
        input: impl BufRead + 'static,
        output: impl Write + 'static,
        sink: impl DiagnosticSink + 'static,
        config: EvalConfig,
    ) -> Self {
        let random = match config.rand_seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        Evaluator {
            config,
            input: Box::new(input),
            output: Box::new(output),
            sink: Box::new(sink),
            random,
        }
    }

    /// Active settings
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates a whole tree
    pub fn evaluate(&mut self, root: &Node) -> Result<Value> {
        let mut env = Environment::new();
        let result = self.eval(
            &mut env,
            root,
            Site {
                frame: GLOBAL,
                depth: 0,
            },
        );
        self.output.flush()?;
        result
    }

    /// Evaluates a tree and writes the formatted result to the output
    pub fn evaluate_and_print(&mut self, root: &Node) -> Result<Value> {
        let value = self.evaluate(root)?;
        self.display(&value)?;
        self.output.flush()?;
        Ok(value)
    }

    /// Formats a value with the configured precision
    pub fn format_value(&self, value: &Value) -> Result<String> {
        value.format(self.config.float_precision)
    }

    fn eval<'a>(&mut self, env: &mut Environment<'a>, node: &'a Node, site: Site) -> Result<Value> {
        let depth = site.depth + 1;
        if depth > self.config.max_depth {
            return Err(Error::RecursionLimit {
                limit: self.config.max_depth,
            });
        }
        tracing::trace!(depth, kind = node.kind.label(), "eval");

        let mark = env.mark();
        let frame = match &node.scope {
            Some(table) => env.enter_table(site.frame, table),
            None => site.frame,
        };
        let site = Site { frame, depth };

        let result = match &node.kind {
            NodeKind::Number(value) => Ok(*value),
            NodeKind::Symbol(name) => self.eval_symbol(env, name, site),
            NodeKind::Call(call) => self.eval_call(env, call, site),
            NodeKind::Conditional(cond) => self.eval_conditional(env, cond, site),
        };

        env.release(mark);
        result
    }

    fn eval_symbol<'a>(
        &mut self,
        env: &mut Environment<'a>,
        name: &str,
        site: Site,
    ) -> Result<Value> {
        let resolved = match env.resolve(site.frame, name) {
            Ok(resolved) => resolved,
            Err(Error::UnresolvedSymbol { name }) => return Ok(self.unresolved(&name)),
            Err(e) => return Err(e),
        };

        match resolved {
            Resolved::Variable { binding, home } => {
                let value = self.eval(
                    env,
                    &binding.value,
                    Site {
                        frame: home,
                        depth: site.depth,
                    },
                )?;
                Ok(self.coerce_declared(value, binding.declared, &binding.name))
            }
            Resolved::Argument { expr, caller } => self.eval(
                env,
                expr,
                Site {
                    frame: caller,
                    depth: site.depth,
                },
            ),
            Resolved::Function { .. } => Err(Error::NotAVariable {
                name: name.to_string(),
            }),
        }
    }

    fn eval_call<'a>(
        &mut self,
        env: &mut Environment<'a>,
        call: &'a FunctionCall,
        site: Site,
    ) -> Result<Value> {
        match &call.callee {
            Callee::Builtin(op) => self.eval_builtin(env, *op, &call.args, site),
            Callee::Custom(name) => self.eval_custom(env, name, &call.args, site),
        }
    }

    fn eval_builtin<'a>(
        &mut self,
        env: &mut Environment<'a>,
        op: Operator,
        args: &'a [Node],
        site: Site,
    ) -> Result<Value> {
        let class = op.arity_class();
        if args.len() < class.min_args() {
            return Err(Error::arity(op.name(), class.min_args(), args.len()));
        }
        if let Some(max) = class.max_args().filter(|max| args.len() > *max) {
            self.sink.report(Diagnostic::new(
                DiagnosticKind::ArityTooMany,
                format!(
                    "{} takes {} argument(s), got {}; extras are ignored",
                    op,
                    max,
                    args.len()
                ),
            ));
        }
        tracing::debug!(operator = %op, argc = args.len(), "builtin call");

        let value = match class {
            ArityClass::Nonary if op == Operator::Read => read_number(
                &mut *self.input,
                &mut *self.output,
                &mut *self.sink,
                &self.config.read_prompt,
            )?,
            ArityClass::Nonary => self.random.next_value(),
            ArityClass::Unary => {
                let x = self.eval(env, &args[0], site)?;
                op.apply_unary(x)
            }
            ArityClass::Binary => {
                let x = self.eval(env, &args[0], site)?;
                let y = self.eval(env, &args[1], site)?;
                op.apply_binary(x, y)
            }
            ArityClass::Variadic if op == Operator::Print => self.eval_print(env, args, site)?,
            ArityClass::Variadic => {
                let operands = args
                    .iter()
                    .map(|arg| self.eval(env, arg, site))
                    .collect::<Result<Vec<_>>>()?;
                op.apply_variadic(&operands)
            }
        };
        Ok(value)
    }

    /// `(print a b ...)`: one line per argument, returns the last value
    fn eval_print<'a>(
        &mut self,
        env: &mut Environment<'a>,
        args: &'a [Node],
        site: Site,
    ) -> Result<Value> {
        let mut last = Value::Missing;
        for arg in args {
            last = self.eval(env, arg, site)?;
            self.display(&last)?;
        }
        Ok(last)
    }

    fn display(&mut self, value: &Value) -> Result<()> {
        match self.format_value(value) {
            Ok(text) => writeln!(self.output, "{}", text)?,
            Err(err) => self
                .sink
                .report(Diagnostic::new(DiagnosticKind::InvalidType, err.to_string())),
        }
        Ok(())
    }

    fn eval_custom<'a>(
        &mut self,
        env: &mut Environment<'a>,
        name: &str,
        args: &'a [Node],
        site: Site,
    ) -> Result<Value> {
        let (function, home) = match env.resolve(site.frame, name) {
            Ok(Resolved::Function { binding, home }) => (binding, home),
            Ok(_) => {
                return Err(Error::NotCallable {
                    name: name.to_string(),
                })
            }
            Err(Error::UnresolvedSymbol { name }) => return Ok(self.unresolved(&name)),
            Err(e) => return Err(e),
        };

        let expected = function.params.len();
        if args.len() < expected {
            return Err(Error::arity(name, expected, args.len()));
        }
        if args.len() > expected {
            self.sink.report(Diagnostic::new(
                DiagnosticKind::ArityTooMany,
                format!(
                    "{} takes {} argument(s), got {}; extras are ignored",
                    name,
                    expected,
                    args.len()
                ),
            ));
        }
        tracing::debug!(function = name, argc = args.len(), "custom call");

        let mark = env.mark();
        let frame = env.enter_call(home, &function.params, args, site.frame);
        let result = self.eval(
            env,
            &function.body,
            Site {
                frame,
                depth: site.depth,
            },
        );
        env.release(mark);

        Ok(self.coerce_declared(result?, function.return_type, name))
    }

    fn eval_conditional<'a>(
        &mut self,
        env: &mut Environment<'a>,
        cond: &'a Conditional,
        site: Site,
    ) -> Result<Value> {
        let condition = self.eval(env, &cond.condition, site)?;
        match condition.amount() {
            None => Ok(Value::Missing),
            Some(n) if n == 0.0 => self.eval(env, &cond.otherwise, site),
            Some(_) => self.eval(env, &cond.then, site),
        }
    }

    /// Applies a declared type to a computed value
    ///
    /// A double flowing into an int declaration is rounded and reported.
    fn coerce_declared(&mut self, value: Value, declared: Option<NumType>, name: &str) -> Value {
        match (declared, value) {
            (Some(NumType::Int), Value::Float(n)) => {
                self.sink.report(Diagnostic::new(
                    DiagnosticKind::PrecisionLoss,
                    format!("{} is declared int; rounding {}", name, n),
                ));
                Value::int(n)
            }
            (Some(ty), value) => value.coerce(ty),
            (None, value) => value,
        }
    }

    fn unresolved(&mut self, name: &str) -> Value {
        self.sink.report(Diagnostic::new(
            DiagnosticKind::UnresolvedSymbol,
            format!("{} is not defined in any enclosing scope", name),
        ));
        Value::Missing
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
