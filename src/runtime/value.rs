use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Numeric type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumType {
    /// Whole number, stored as a rounded `f64`
    Int,
    /// Floating-point number
    Double,
}

impl NumType {
    /// Parses a source-level type annotation (`int` or `double`)
    pub fn from_name(name: &str) -> Option<NumType> {
        match name {
            "int" => Some(NumType::Int),
            "double" => Some(NumType::Double),
            _ => None,
        }
    }

    /// Tag used by the value formatter
    pub fn tag(self) -> &'static str {
        match self {
            NumType::Int => "INT_TYPE",
            NumType::Double => "DOUBLE_TYPE",
        }
    }

    /// Promotion rule: double wins
    pub fn promote(self, other: NumType) -> NumType {
        if self == NumType::Double || other == NumType::Double {
            NumType::Double
        } else {
            NumType::Int
        }
    }
}

impl fmt::Display for NumType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumType::Int => write!(f, "int"),
            NumType::Double => write!(f, "double"),
        }
    }
}

/// Result of evaluating any node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value: exhausted argument list or a subtree that failed to resolve
    Missing,
    /// Integer-typed number; never has a fractional part
    Int(f64),
    /// Float-typed number
    Float(f64),
}

impl Value {
    /// Creates an integer value, rounding half away from zero
    ///
    /// NaN and infinities have no whole-number form and stay doubles.
    pub fn int(amount: f64) -> Self {
        if amount.is_finite() {
            Value::Int(amount.round())
        } else {
            Value::Float(amount)
        }
    }

    /// Creates a float value
    pub fn float(amount: f64) -> Self {
        Value::Float(amount)
    }

    /// Creates a value of the given type, rounding integers
    pub fn typed(ty: NumType, amount: f64) -> Self {
        match ty {
            NumType::Int => Value::int(amount),
            NumType::Double => Value::Float(amount),
        }
    }

    /// Comparison result: `Int(1)` or `Int(0)`
    pub fn truth(flag: bool) -> Self {
        Value::Int(if flag { 1.0 } else { 0.0 })
    }

    /// Type tag, `None` for [`Value::Missing`]
    pub fn num_type(&self) -> Option<NumType> {
        match self {
            Value::Missing => None,
            Value::Int(_) => Some(NumType::Int),
            Value::Float(_) => Some(NumType::Double),
        }
    }

    /// Numeric payload, `None` for [`Value::Missing`]
    pub fn amount(&self) -> Option<f64> {
        match self {
            Value::Missing => None,
            Value::Int(n) | Value::Float(n) => Some(*n),
        }
    }

    /// Returns true unless this is [`Value::Missing`]
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Missing)
    }

    /// Re-tags the value, rounding when converting to an integer
    pub fn coerce(self, ty: NumType) -> Self {
        match self.amount() {
            Some(n) => Value::typed(ty, n),
            None => Value::Missing,
        }
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Int(_) => "int",
            Value::Float(_) => "double",
        }
    }

    /// Renders the value as `INT_TYPE: 7` or `DOUBLE_TYPE: 3.500000`
    ///
    /// `precision` is the number of fractional digits for doubles. A missing
    /// value has no type tag and cannot be formatted.
    pub fn format(&self, precision: usize) -> Result<String> {
        match self {
            // `+ 0.0` folds negative zero into zero
            Value::Int(n) => Ok(format!("{}: {}", NumType::Int.tag(), n.floor() + 0.0)),
            Value::Float(n) => Ok(format!(
                "{}: {:.*}",
                NumType::Double.tag(),
                precision,
                n
            )),
            Value::Missing => Err(Error::InvalidType {
                got: self.type_name().to_string(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.format(6) {
            Ok(text) => write!(f, "{}", text),
            Err(_) => write!(f, "<missing>"),
        }
    }
}

/// Formats a value with the default precision of six fractional digits
pub fn format_value(value: &Value) -> Result<String> {
    value.format(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_rounds_to_nearest() {
        assert_eq!(Value::int(2.5), Value::Int(3.0));
        assert_eq!(Value::int(2.4), Value::Int(2.0));
        assert_eq!(Value::int(-2.5), Value::Int(-3.0));
    }

    #[test]
    fn test_non_finite_int_stays_double() {
        assert!(matches!(Value::int(f64::NAN), Value::Float(n) if n.is_nan()));
        assert_eq!(Value::int(f64::INFINITY), Value::Float(f64::INFINITY));
        assert_eq!(
            Value::typed(NumType::Int, f64::NEG_INFINITY),
            Value::Float(f64::NEG_INFINITY)
        );
        assert_eq!(
            format_value(&Value::int(f64::INFINITY)).unwrap(),
            "DOUBLE_TYPE: inf"
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Missing.type_name(), "missing");
        assert_eq!(Value::Int(1.0).type_name(), "int");
        assert_eq!(Value::Float(2.71).type_name(), "double");
    }

    #[test]
    fn test_coerce() {
        assert_eq!(Value::Float(3.7).coerce(NumType::Int), Value::Int(4.0));
        assert_eq!(Value::Int(3.0).coerce(NumType::Double), Value::Float(3.0));
        assert_eq!(Value::Missing.coerce(NumType::Int), Value::Missing);
    }

    #[test]
    fn test_promote() {
        assert_eq!(NumType::Int.promote(NumType::Int), NumType::Int);
        assert_eq!(NumType::Int.promote(NumType::Double), NumType::Double);
        assert_eq!(NumType::Double.promote(NumType::Int), NumType::Double);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_value(&Value::Int(7.0)).unwrap(), "INT_TYPE: 7");
        assert_eq!(format_value(&Value::Int(-4.0)).unwrap(), "INT_TYPE: -4");
        assert_eq!(
            format_value(&Value::Float(3.5)).unwrap(),
            "DOUBLE_TYPE: 3.500000"
        );
        assert_eq!(Value::Float(0.125).format(2).unwrap(), "DOUBLE_TYPE: 0.12");
    }

    #[test]
    fn test_format_missing_is_invalid_type() {
        let err = format_value(&Value::Missing).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn test_nan_is_not_missing() {
        let v = Value::Float(f64::NAN);
        assert!(v.is_present());
        assert_eq!(v.num_type(), Some(NumType::Double));
    }

    #[test]
    fn test_type_annotation_names() {
        assert_eq!(NumType::from_name("int"), Some(NumType::Int));
        assert_eq!(NumType::from_name("double"), Some(NumType::Double));
        assert_eq!(NumType::from_name("string"), None);
    }
}
