//! Expression tree evaluation with the allow-listed symbol table

use std::collections::HashMap;

use super::parser::{BinOp, Expr};
use super::CalcError;

/// Allow-listed function names, as advertised in tool descriptions.
pub const FUNCTION_NAMES: &[&str] = &[
    "sqrt", "sin", "cos", "tan", "log", "log10", "exp", "abs", "round", "min", "max", "sum",
    "pow",
];

/// Built-in constants.
pub const CONSTANT_NAMES: &[&str] = &["pi", "e"];

pub(crate) fn eval(expr: &Expr, env: &HashMap<String, f64>) -> Result<f64, CalcError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Ident(name) => lookup(name, env),
        Expr::Neg(inner) => Ok(-eval(inner, env)?),
        Expr::Binary(op, lhs, rhs) => {
            let l = eval(lhs, env)?;
            let r = eval(rhs, env)?;
            apply_binary(*op, l, r)
        }
        Expr::Call(name, args) => {
            let values = args
                .iter()
                .map(|a| eval(a, env))
                .collect::<Result<Vec<f64>, CalcError>>()?;
            apply_function(name, &values)
        }
    }
}

fn lookup(name: &str, env: &HashMap<String, f64>) -> Result<f64, CalcError> {
    if let Some(value) = env.get(name) {
        return Ok(*value);
    }
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        _ => Err(CalcError::UnknownIdentifier(name.to_string())),
    }
}

fn apply_binary(op: BinOp, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
    match op {
        BinOp::Add => Ok(lhs + rhs),
        BinOp::Sub => Ok(lhs - rhs),
        BinOp::Mul => Ok(lhs * rhs),
        BinOp::Div => {
            if rhs == 0.0 {
                Err(CalcError::DivisionByZero)
            } else {
                Ok(lhs / rhs)
            }
        }
        BinOp::Rem => {
            if rhs == 0.0 {
                Err(CalcError::DivisionByZero)
            } else {
                Ok(lhs % rhs)
            }
        }
        BinOp::Pow => Ok(lhs.powf(rhs)),
    }
}

fn apply_function(name: &str, args: &[f64]) -> Result<f64, CalcError> {
    let unary = |f: fn(f64) -> f64| -> Result<f64, CalcError> {
        match args {
            [x] => Ok(f(*x)),
            _ => Err(CalcError::WrongArity {
                name: name.to_string(),
                expected: "1",
                got: args.len(),
            }),
        }
    };

    match name {
        "sqrt" => unary(f64::sqrt),
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "log" => unary(f64::ln),
        "log10" => unary(f64::log10),
        "exp" => unary(f64::exp),
        "abs" => unary(f64::abs),
        "round" => unary(f64::round),
        "pow" => match args {
            [base, exp] => Ok(base.powf(*exp)),
            _ => Err(CalcError::WrongArity {
                name: name.to_string(),
                expected: "2",
                got: args.len(),
            }),
        },
        "min" | "max" | "sum" => {
            if args.is_empty() {
                return Err(CalcError::WrongArity {
                    name: name.to_string(),
                    expected: "at least 1",
                    got: 0,
                });
            }
            Ok(match name {
                "min" => args.iter().copied().fold(f64::INFINITY, f64::min),
                "max" => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                _ => args.iter().sum(),
            })
        }
        _ => Err(CalcError::UnknownFunction(name.to_string())),
    }
}
