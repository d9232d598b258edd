//! Restricted arithmetic evaluator
//!
//! Parses expressions over a fixed grammar (numbers, `+ - * / % **`,
//! parentheses, allow-listed function calls, `pi`/`e`) and evaluates them.
//! Nothing outside the grammar can execute: unknown identifiers and
//! malformed input are errors, so there is no denylist to bypass.

mod eval;
mod lexer;
mod parser;

use std::collections::HashMap;

use thiserror::Error;

pub use eval::{FUNCTION_NAMES, CONSTANT_NAMES};

/// Errors produced while parsing or evaluating an expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Malformed expression
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Identifier that is neither a constant nor a bound variable
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Call to a function outside the allow-list
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Function called with the wrong number of arguments
    #[error("{name} expects {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    /// Division or modulo by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Evaluation produced NaN or infinity
    #[error("result is not a finite number")]
    NonFinite,
}

/// Evaluate an expression with no variables in scope.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    evaluate_with_env(expression, &HashMap::new())
}

/// Evaluate an expression against a variable environment.
///
/// Variables shadow the built-in constants. The result is checked for
/// finiteness so NaN/infinity never leaks out silently.
pub fn evaluate_with_env(
    expression: &str,
    env: &HashMap<String, f64>,
) -> Result<f64, CalcError> {
    let tokens = lexer::tokenize(expression)?;
    let ast = parser::parse(&tokens)?;
    let value = eval::eval(&ast, env)?;
    if !value.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok(value)
}

/// Format a value the way the calculator reports it: integral results
/// drop the fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Format a full `<expr> = <result>` line.
pub fn format_result(expression: &str, value: f64) -> String {
    format!("{} = {}", expression.trim(), format_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("7 % 4").unwrap(), 3.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(evaluate("2 ** 3 ** 2").unwrap(), 512.0);
        // Exponent binds tighter than unary minus
        assert_eq!(evaluate("-2 ** 2").unwrap(), -4.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(evaluate("sqrt(16)").unwrap(), 4.0);
        assert!((evaluate("sin(pi / 2)").unwrap() - 1.0).abs() < 1e-12);
        assert!((evaluate("log(e)").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(evaluate("max(1, 2, 3)").unwrap(), 3.0);
        assert_eq!(evaluate("pow(2, 10)").unwrap(), 1024.0);
        assert_eq!(evaluate("sum(1, 2, 3, 4)").unwrap(), 10.0);
    }

    #[test]
    fn test_division_by_zero_is_distinct() {
        assert_eq!(evaluate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("5 % 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("1 / (2 - 2)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_host_language_escapes_are_just_bad_input() {
        // Inputs the old denylist worried about fail structurally here.
        assert!(matches!(
            evaluate("__import__('os')"),
            Err(CalcError::Syntax(_))
        ));
        assert!(matches!(
            evaluate("exec"),
            Err(CalcError::UnknownIdentifier(_))
        ));
        assert!(matches!(
            evaluate("open('/etc/passwd')"),
            Err(CalcError::Syntax(_))
        ));
        assert!(matches!(
            evaluate("eval(1)"),
            Err(CalcError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_non_finite_results_are_reported() {
        assert_eq!(evaluate("sqrt(-1)"), Err(CalcError::NonFinite));
        assert_eq!(evaluate("log(0)"), Err(CalcError::NonFinite));
    }

    #[test]
    fn test_variable_environment() {
        let mut env = HashMap::new();
        env.insert("x".to_string(), 3.0);
        env.insert("y".to_string(), 4.0);
        assert_eq!(evaluate_with_env("sqrt(x*x + y*y)", &env).unwrap(), 5.0);
        assert!(matches!(
            evaluate_with_env("z + 1", &env),
            Err(CalcError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_result("2 + 3 * 4", 14.0), "2 + 3 * 4 = 14");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-7.0), "-7");
    }
}
