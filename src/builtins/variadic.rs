//! Left folds for `add`, `sub`, `mult` and `div`

use super::{promoted_type, Operator};
use crate::runtime::Value;

/// Identity returned by an operator called with no arguments
pub fn identity(op: Operator) -> f64 {
    match op {
        Operator::Mult => 1.0,
        _ => 0.0,
    }
}

/// Folds `operands` left to right
///
/// `sub` and `div` use the first operand as the seed; `add` and `mult` start
/// from their identity. Any missing operand makes the whole fold missing.
pub fn fold(op: Operator, operands: &[Value]) -> Value {
    let Some(ty) = promoted_type(operands) else {
        return Value::Missing;
    };
    let amounts: Vec<f64> = operands.iter().filter_map(Value::amount).collect();

    let result = match (op, amounts.split_first()) {
        (_, None) => identity(op),
        (Operator::Add, Some(_)) => amounts.iter().sum(),
        (Operator::Mult, Some(_)) => amounts.iter().product(),
        (Operator::Sub, Some((first, rest))) => rest.iter().fold(*first, |acc, x| acc - x),
        (Operator::Div, Some((first, rest))) => rest.iter().fold(*first, |acc, x| acc / x),
        _ => f64::NAN,
    };

    Value::typed(ty, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[f64]) -> Vec<Value> {
        values.iter().map(|v| Value::Int(*v)).collect()
    }

    #[test]
    fn test_empty_identities() {
        assert_eq!(fold(Operator::Add, &[]), Value::Int(0.0));
        assert_eq!(fold(Operator::Sub, &[]), Value::Int(0.0));
        assert_eq!(fold(Operator::Mult, &[]), Value::Int(1.0));
        assert_eq!(fold(Operator::Div, &[]), Value::Int(0.0));
    }

    #[test]
    fn test_single_operand() {
        assert_eq!(fold(Operator::Sub, &ints(&[9.0])), Value::Int(9.0));
        assert_eq!(fold(Operator::Div, &ints(&[9.0])), Value::Int(9.0));
        assert_eq!(fold(Operator::Mult, &ints(&[9.0])), Value::Int(9.0));
    }

    #[test]
    fn test_folds() {
        assert_eq!(fold(Operator::Add, &ints(&[1.0, 2.0, 3.0])), Value::Int(6.0));
        assert_eq!(fold(Operator::Sub, &ints(&[10.0, 3.0, 2.0])), Value::Int(5.0));
        assert_eq!(fold(Operator::Mult, &ints(&[2.0, 3.0, 4.0])), Value::Int(24.0));
        assert_eq!(fold(Operator::Div, &ints(&[100.0, 5.0, 2.0])), Value::Int(10.0));
    }

    #[test]
    fn test_int_division_rounds() {
        assert_eq!(fold(Operator::Div, &ints(&[7.0, 2.0])), Value::Int(4.0));
        assert_eq!(
            fold(Operator::Div, &[Value::Float(7.0), Value::Int(2.0)]),
            Value::Float(3.5)
        );
    }

    #[test]
    fn test_missing_propagates() {
        assert_eq!(
            fold(Operator::Add, &[Value::Int(1.0), Value::Missing]),
            Value::Missing
        );
    }

    #[test]
    fn test_zero_over_zero_is_nan_not_missing() {
        let v = fold(Operator::Div, &[Value::Float(0.0), Value::Float(0.0)]);
        assert!(matches!(v, Value::Float(n) if n.is_nan()));
    }
}
