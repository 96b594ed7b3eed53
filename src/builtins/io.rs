//! Side-effecting nonary built-ins: `read` and `rand`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::io::{BufRead, Write};

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{Error, Result};
use crate::runtime::Value;

lazy_static::lazy_static! {
    static ref DECIMAL: Regex = Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").unwrap();
}

/// Parses one line of `read` input
///
/// Accepts an optional sign, digits and at most one `.`. Surrounding
/// whitespace is ignored.
pub fn parse_decimal(line: &str) -> Option<f64> {
    let trimmed = line.trim();
    if !DECIMAL.is_match(trimmed) {
        return None;
    }
    trimmed.parse().ok()
}

/// Prompts until a decimal number is entered
///
/// Malformed lines are reported as [`DiagnosticKind::InvalidInputFormat`]
/// and the prompt is repeated. End of input is fatal.
pub fn read_number(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    sink: &mut dyn DiagnosticSink,
    prompt: &str,
) -> Result<Value> {
    let mut raw = Vec::new();
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        raw.clear();
        if input.read_until(b'\n', &mut raw)? == 0 {
            return Err(Error::InputClosed);
        }

        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line,
            Err(_) => {
                sink.report(Diagnostic::new(
                    DiagnosticKind::InvalidInputFormat,
                    format!(
                        "expected a decimal number, got non-UTF-8 input {:?}",
                        String::from_utf8_lossy(&raw).trim_end()
                    ),
                ));
                continue;
            }
        };

        match parse_decimal(line) {
            Some(n) => return Ok(Value::Float(n)),
            None => sink.report(Diagnostic::new(
                DiagnosticKind::InvalidInputFormat,
                format!("expected a decimal number, got {:?}", line.trim_end()),
            )),
        }
    }
}

/// Random source for the `rand` operator
#[derive(Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seeded source, reproducible across runs
    pub fn seeded(seed: u64) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system
    pub fn from_entropy() -> Self {
        RandomSource {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform float in `[0, 1)`
    pub fn next_value(&mut self) -> Value {
        Value::Float(self.rng.gen::<f64>())
    }
}
