// ABOUTME: Flat global variable environment and function table

use crate::value::Value;
use std::collections::HashMap;

/// A single process-wide, flat mapping from variable name to value.
///
/// There is no block or lexical scoping: a name written anywhere is visible
/// everywhere, for the lifetime of the process, until explicitly deleted.
#[derive(Debug, Default)]
pub struct Environment {
    vars: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.vars.insert(name, value);
    }

    pub fn delete(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub params: Vec<String>,
    pub body: Vec<String>,
}

/// Maps user-defined function names to their parameter lists and bodies.
///
/// Shares the global identifier namespace with variables; a verb lookup
/// resolving to a function name takes precedence over an external command.
#[derive(Debug, Default)]
pub struct FunctionTable {
    funcs: HashMap<String, FunctionDef>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: String, params: Vec<String>, body: Vec<String>) {
        self.funcs.insert(name, FunctionDef { params, body });
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.funcs.get(name)
    }
}

/// Numeric coercion per the token grammar: a leading `-` and every `.` are
/// stripped before checking for an all-digit remainder.
fn parse_numeric(token: &str) -> Option<Value> {
    let rest = token.strip_prefix('-').unwrap_or(token);
    if rest.is_empty() {
        return None;
    }
    let has_dot = rest.contains('.');
    let digits_only: String = rest.chars().filter(|&c| c != '.').collect();
    if digits_only.is_empty() || !digits_only.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let signed = if token.starts_with('-') {
        format!("-{rest}")
    } else {
        rest.to_string()
    };
    if has_dot {
        signed.parse::<f64>().ok().map(Value::Float)
    } else {
        signed.parse::<i64>().ok().map(Value::Int)
    }
}

fn strip_matching_quotes(token: &str) -> Option<String> {
    if token.len() < 2 {
        return None;
    }
    let first = token.chars().next().unwrap();
    let last = token.chars().last().unwrap();
    if (first == '"' && last == '"') || (first == '\'' && last == '\'') {
        Some(token[first.len_utf8()..token.len() - last.len_utf8()].to_string())
    } else {
        None
    }
}

/// Strips a token's surrounding quotes if it has matching ones; otherwise
/// returns the token unchanged. Used when rendering free-form token runs
/// (`print (...)`, `pause loud ...`) for display.
pub fn display_token(token: &str) -> String {
    strip_matching_quotes(token).unwrap_or_else(|| token.to_string())
}

/// Resolves a raw token to a [`Value`]: number literal, variable lookup,
/// quoted string, or literal-string fallback, in that order.
pub fn get_val(env: &Environment, token: &str) -> Value {
    if let Some(v) = parse_numeric(token) {
        return v;
    }
    if let Some(v) = env.get(token) {
        return v.clone();
    }
    if let Some(s) = strip_matching_quotes(token) {
        return Value::Str(s);
    }
    Value::Str(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trips() {
        let mut env = Environment::new();
        env.set("x".to_string(), Value::Int(5));
        assert_eq!(env.get("x"), Some(&Value::Int(5)));
    }

    #[test]
    fn delete_removes_the_name() {
        let mut env = Environment::new();
        env.set("x".to_string(), Value::Int(1));
        env.delete("x");
        assert_eq!(env.get("x"), None);
    }

    #[test]
    fn get_val_parses_integers() {
        let env = Environment::new();
        assert_eq!(get_val(&env, "42"), Value::Int(42));
        assert_eq!(get_val(&env, "-7"), Value::Int(-7));
    }

    #[test]
    fn get_val_parses_floats() {
        let env = Environment::new();
        assert_eq!(get_val(&env, "3.5"), Value::Float(3.5));
    }

    #[test]
    fn get_val_bare_dash_is_a_string() {
        let env = Environment::new();
        assert_eq!(get_val(&env, "-"), Value::Str("-".to_string()));
    }

    #[test]
    fn get_val_prefers_variable_lookup_over_literal() {
        let mut env = Environment::new();
        env.set("name".to_string(), Value::Str("Ada".to_string()));
        assert_eq!(get_val(&env, "name"), Value::Str("Ada".to_string()));
    }

    #[test]
    fn get_val_strips_matching_quotes() {
        let env = Environment::new();
        assert_eq!(get_val(&env, "\"hi\""), Value::Str("hi".to_string()));
        assert_eq!(get_val(&env, "'hi'"), Value::Str("hi".to_string()));
    }

    #[test]
    fn get_val_falls_back_to_bare_literal() {
        let env = Environment::new();
        assert_eq!(get_val(&env, "unknown"), Value::Str("unknown".to_string()));
    }

    #[test]
    fn function_table_define_and_get() {
        let mut table = FunctionTable::new();
        table.define(
            "f".to_string(),
            vec!["a".to_string(), "b".to_string()],
            vec!["let s = a + b".to_string()],
        );
        let def = table.get("f").unwrap();
        assert_eq!(def.params, vec!["a", "b"]);
    }
}
