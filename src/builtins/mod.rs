//! Built-in operator library
//!
//! Every built-in is an [`Operator`] code. The enum is ordered so that the
//! arity class of an operator follows from its position:
//! nonary < unary < binary < variadic.

pub mod io;
pub mod math;
pub mod variadic;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::runtime::{NumType, Value};

/// Built-in operator codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Operator {
    // Nonary
    /// Prompt for and read a decimal number
    Read,
    /// Uniform float in `[0, 1)`
    Rand,

    // Unary
    /// Negation
    Neg,
    /// Absolute value
    Abs,
    /// `e^x`
    Exp,
    /// Square root
    Sqrt,
    /// Natural logarithm
    Log,
    /// `2^x`
    Exp2,
    /// Cube root
    Cbrt,

    // Binary
    /// IEEE remainder
    Remainder,
    /// `x^y`
    Pow,
    /// Larger operand
    Max,
    /// Smaller operand
    Min,
    /// `sqrt(x^2 + y^2)`
    Hypot,
    /// `1` when equal
    Equal,
    /// `1` when `x < y`
    Less,
    /// `1` when `x > y`
    Greater,

    // Variadic
    /// Sum
    Add,
    /// Left-fold subtraction
    Sub,
    /// Product
    Mult,
    /// Left-fold division
    Div,
    /// Display every argument
    Print,
}

/// Argument-count class of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityClass {
    /// No arguments
    Nonary,
    /// Exactly one argument
    Unary,
    /// Exactly two arguments
    Binary,
    /// Any number of arguments
    Variadic,
}

impl ArityClass {
    /// Fewest arguments a call must supply
    pub fn min_args(self) -> usize {
        match self {
            ArityClass::Nonary | ArityClass::Variadic => 0,
            ArityClass::Unary => 1,
            ArityClass::Binary => 2,
        }
    }

    /// Most arguments the operator uses, `None` when unbounded
    pub fn max_args(self) -> Option<usize> {
        match self {
            ArityClass::Variadic => None,
            other => Some(other.min_args()),
        }
    }
}

const FIRST_UNARY: u8 = Operator::Neg as u8;
const FIRST_BINARY: u8 = Operator::Remainder as u8;
const FIRST_VARIADIC: u8 = Operator::Add as u8;

/// Name table, in enum order
const OPERATORS: [(&str, Operator); 22] = [
    ("read", Operator::Read),
    ("rand", Operator::Rand),
    ("neg", Operator::Neg),
    ("abs", Operator::Abs),
    ("exp", Operator::Exp),
    ("sqrt", Operator::Sqrt),
    ("log", Operator::Log),
    ("exp2", Operator::Exp2),
    ("cbrt", Operator::Cbrt),
    ("remainder", Operator::Remainder),
    ("pow", Operator::Pow),
    ("max", Operator::Max),
    ("min", Operator::Min),
    ("hypot", Operator::Hypot),
    ("equal", Operator::Equal),
    ("less", Operator::Less),
    ("greater", Operator::Greater),
    ("add", Operator::Add),
    ("sub", Operator::Sub),
    ("mult", Operator::Mult),
    ("div", Operator::Div),
    ("print", Operator::Print),
];

lazy_static::lazy_static! {
    static ref BY_NAME: HashMap<&'static str, Operator> = OPERATORS.iter().copied().collect();
}

impl Operator {
    /// Looks up a built-in by its exact source name
    ///
    /// `None` means the name refers to a custom function.
    pub fn from_name(name: &str) -> Option<Operator> {
        BY_NAME.get(name).copied()
    }

    /// Source name of the operator
    pub fn name(self) -> &'static str {
        OPERATORS[self as usize].0
    }

    /// Arity class, derived from the position in the enum
    pub fn arity_class(self) -> ArityClass {
        let code = self as u8;
        if code < FIRST_UNARY {
            ArityClass::Nonary
        } else if code < FIRST_BINARY {
            ArityClass::Unary
        } else if code < FIRST_VARIADIC {
            ArityClass::Binary
        } else {
            ArityClass::Variadic
        }
    }

    /// All built-ins in enum order
    pub fn all() -> impl Iterator<Item = Operator> {
        OPERATORS.iter().map(|(_, op)| *op)
    }

    /// Applies a unary operator to an evaluated operand
    ///
    /// The result keeps the operand's type.
    pub fn apply_unary(self, operand: Value) -> Value {
        let (Some(ty), Some(x)) = (operand.num_type(), operand.amount()) else {
            return Value::Missing;
        };
        Value::typed(ty, math::unary(self, x))
    }

    /// Applies a binary operator to two evaluated operands
    ///
    /// Comparisons always produce an integer; everything else promotes.
    pub fn apply_binary(self, lhs: Value, rhs: Value) -> Value {
        let (Some(lt), Some(x)) = (lhs.num_type(), lhs.amount()) else {
            return Value::Missing;
        };
        let (Some(rt), Some(y)) = (rhs.num_type(), rhs.amount()) else {
            return Value::Missing;
        };
        match self {
            Operator::Equal => Value::truth(x == y),
            Operator::Less => Value::truth(x < y),
            Operator::Greater => Value::truth(x > y),
            _ => Value::typed(lt.promote(rt), math::binary(self, x, y)),
        }
    }

    /// Folds a variadic arithmetic operator over evaluated operands
    pub fn apply_variadic(self, operands: &[Value]) -> Value {
        variadic::fold(self, operands)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Promoted type of a set of operands, `None` if any operand is missing
pub(crate) fn promoted_type(operands: &[Value]) -> Option<NumType> {
    operands.iter().try_fold(NumType::Int, |acc, v| {
        v.num_type().map(|ty| acc.promote(ty))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_resolution() {
        assert_eq!(Operator::from_name("add"), Some(Operator::Add));
        assert_eq!(Operator::from_name("cbrt"), Some(Operator::Cbrt));
        assert_eq!(Operator::from_name("print"), Some(Operator::Print));
        assert_eq!(Operator::from_name("Add"), None);
        assert_eq!(Operator::from_name("square"), None);
    }

    #[test]
    fn test_name_table_matches_enum_order() {
        for (i, op) in Operator::all().enumerate() {
            assert_eq!(op as usize, i);
            assert_eq!(Operator::from_name(op.name()), Some(op));
        }
        assert_eq!(Operator::all().count(), 22);
    }

    #[test]
    fn test_arity_classes() {
        assert_eq!(Operator::Read.arity_class(), ArityClass::Nonary);
        assert_eq!(Operator::Rand.arity_class(), ArityClass::Nonary);
        assert_eq!(Operator::Neg.arity_class(), ArityClass::Unary);
        assert_eq!(Operator::Cbrt.arity_class(), ArityClass::Unary);
        assert_eq!(Operator::Remainder.arity_class(), ArityClass::Binary);
        assert_eq!(Operator::Greater.arity_class(), ArityClass::Binary);
        assert_eq!(Operator::Add.arity_class(), ArityClass::Variadic);
        assert_eq!(Operator::Print.arity_class(), ArityClass::Variadic);
    }

    #[test]
    fn test_arity_bounds() {
        assert_eq!(ArityClass::Unary.min_args(), 1);
        assert_eq!(ArityClass::Binary.max_args(), Some(2));
        assert_eq!(ArityClass::Variadic.min_args(), 0);
        assert_eq!(ArityClass::Variadic.max_args(), None);
    }

    #[test]
    fn test_unary_keeps_type() {
        assert_eq!(Operator::Neg.apply_unary(Value::Int(5.0)), Value::Int(-5.0));
        assert_eq!(Operator::Sqrt.apply_unary(Value::Int(2.0)), Value::Int(1.0));
        assert_eq!(Operator::Sqrt.apply_unary(Value::Float(4.0)), Value::Float(2.0));
        assert_eq!(Operator::Abs.apply_unary(Value::Missing), Value::Missing);
    }

    #[test]
    fn test_comparisons_are_int() {
        assert_eq!(
            Operator::Less.apply_binary(Value::Int(3.0), Value::Int(5.0)),
            Value::Int(1.0)
        );
        assert_eq!(
            Operator::Greater.apply_binary(Value::Float(3.0), Value::Int(5.0)),
            Value::Int(0.0)
        );
        assert_eq!(
            Operator::Equal.apply_binary(Value::Float(2.0), Value::Int(2.0)),
            Value::Int(1.0)
        );
    }

    #[test]
    fn test_binary_promotes() {
        assert_eq!(
            Operator::Pow.apply_binary(Value::Int(2.0), Value::Int(3.0)),
            Value::Int(8.0)
        );
        assert_eq!(
            Operator::Max.apply_binary(Value::Int(2.0), Value::Float(1.5)),
            Value::Float(2.0)
        );
        assert_eq!(
            Operator::Hypot.apply_binary(Value::Int(3.0), Value::Int(4.0)),
            Value::Int(5.0)
        );
    }

    #[test]
    fn test_promoted_type() {
        assert_eq!(promoted_type(&[]), Some(NumType::Int));
        assert_eq!(
            promoted_type(&[Value::Int(1.0), Value::Float(1.0)]),
            Some(NumType::Double)
        );
        assert_eq!(promoted_type(&[Value::Int(1.0), Value::Missing]), None);
    }
}
