// ABOUTME: Evaluates `[not] L op R {and|or ...}` token runs to a boolean

use crate::env::{get_val, Environment};
use crate::value::Value;

const ORDERING_OPS: [&str; 6] = ["<<", ">>", "<=", "=<", ">=", "=>"];

fn values_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Str(_), _) | (_, Value::Str(_)) => false,
        _ => a.as_f64() == b.as_f64(),
    }
}

fn eval_term(lhs: &str, op: &str, rhs: &str, env: &Environment) -> bool {
    let a = get_val(env, lhs);
    let b = get_val(env, rhs);
    match op {
        "==" => values_eq(&a, &b),
        "!=" => !values_eq(&a, &b),
        _ if ORDERING_OPS.contains(&op) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => match op {
                "<<" => x < y,
                ">>" => x > y,
                "<=" | "=<" => x <= y,
                "=>" | ">=" => x >= y,
                _ => unreachable!(),
            },
            // Mixed-type ordering comparison degrades to false rather than aborting.
            _ => {
                log::debug!("ordering comparison on disjoint types degraded to false");
                false
            }
        },
        _ => false,
    }
}

/// Evaluates a condition's token run with strict left-to-right associativity
/// and no precedence distinction between `and` and `or`.
pub fn eval_condition(tokens: &[String], env: &Environment) -> bool {
    let mut terms = Vec::new();
    let mut joins = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let negate = tokens[i] == "not";
        if negate {
            i += 1;
        }
        if i + 2 >= tokens.len() {
            break;
        }
        let result = eval_term(&tokens[i], &tokens[i + 1], &tokens[i + 2], env);
        terms.push(if negate { !result } else { result });
        i += 3;
        if i < tokens.len() && (tokens[i] == "and" || tokens[i] == "or") {
            joins.push(tokens[i].clone());
            i += 1;
        } else {
            break;
        }
    }
    if terms.is_empty() {
        return false;
    }
    let mut acc = terms[0];
    for (idx, join) in joins.iter().enumerate() {
        let rhs = terms[idx + 1];
        acc = match join.as_str() {
            "and" => acc && rhs,
            "or" => acc || rhs,
            _ => acc,
        };
    }
    acc
}
