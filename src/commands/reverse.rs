// ABOUTME: Demo command: reverses a variable's string form in place

use crate::dispatcher::CommandModule;
use crate::error::SpokeError;
use crate::host::Host;
use crate::value::Value;

fn run(host: &mut Host) -> Result<bool, SpokeError> {
    let Some(name) = host.tokens.get(1) else {
        return Ok(false);
    };
    let Some(current) = host.env.get(name).cloned() else {
        return Ok(false);
    };
    let reversed: String = current.to_string().chars().rev().collect();
    host.env.set(name.clone(), Value::Str(reversed));
    Ok(true)
}

inventory::submit! {
    CommandModule { verb: "reverse", run }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, FunctionTable};

    #[test]
    fn reverse_mutates_the_named_variable() {
        let mut env = Environment::new();
        env.set("x".to_string(), Value::Str("abc".to_string()));
        let functions = FunctionTable::new();
        let tokens = vec!["reverse".to_string(), "x".to_string()];
        let mut host = Host {
            tokens: &tokens,
            env: &mut env,
            functions: &functions,
            line_num: 1,
            line: "reverse x",
        };
        assert!(run(&mut host).unwrap());
        assert_eq!(host.env.get("x"), Some(&Value::Str("cba".to_string())));
    }

    #[test]
    fn reverse_of_undefined_variable_is_falsy() {
        let mut env = Environment::new();
        let functions = FunctionTable::new();
        let tokens = vec!["reverse".to_string(), "missing".to_string()];
        let mut host = Host {
            tokens: &tokens,
            env: &mut env,
            functions: &functions,
            line_num: 1,
            line: "reverse missing",
        };
        assert!(!run(&mut host).unwrap());
    }
}
