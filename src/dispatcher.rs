// ABOUTME: Resolves a verb to an external command handler and invokes it, with caching

use crate::env::{Environment, FunctionTable};
use crate::error::SpokeError;
use crate::host::Host;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

pub type Handler = fn(&mut Host) -> Result<bool, SpokeError>;

/// A self-registered command module. Instances are collected at compile
/// time via `inventory::submit!` — see `src/commands/`.
pub struct CommandModule {
    pub verb: &'static str,
    pub run: Handler,
}

inventory::collect!(CommandModule);

/// Resolves verbs to handlers from the static registry, memoizing each
/// resolution for the remainder of the process (spec §4.7 caching).
///
/// `commands_dir` is created on demand so operators have a conventional
/// place to look, even though resolution itself is served from the
/// compiled-in registry rather than by reading that directory.
pub struct Dispatcher {
    cache: RefCell<HashMap<String, Option<Handler>>>,
}

impl Dispatcher {
    pub fn new(commands_dir: &PathBuf) -> Self {
        if !commands_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(commands_dir) {
                log::warn!("could not create commands directory {commands_dir:?}: {e}");
            }
        }
        Dispatcher {
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn resolve(&self, verb: &str) -> Option<Handler> {
        if let Some(cached) = self.cache.borrow().get(verb) {
            log::debug!("dispatcher cache hit for verb '{verb}'");
            return *cached;
        }
        let found = inventory::iter::<CommandModule>()
            .find(|m| m.verb == verb)
            .map(|m| m.run);
        log::debug!("dispatcher resolved verb '{verb}': {}", found.is_some());
        self.cache
            .borrow_mut()
            .insert(verb.to_string(), found);
        found
    }

    pub fn dispatch(
        &self,
        tokens: &[String],
        env: &mut Environment,
        functions: &FunctionTable,
        line_num: usize,
        line: &str,
    ) -> Result<(), SpokeError> {
        let verb = tokens[0].as_str();
        match self.resolve(verb) {
            Some(handler) => {
                let mut host = Host {
                    tokens,
                    env,
                    functions,
                    line_num,
                    line,
                };
                if handler(&mut host)? {
                    Ok(())
                } else {
                    Err(SpokeError::handler_rejected(line_num, line))
                }
            }
            None => Err(SpokeError::syntax(
                line_num,
                line,
                format!("unknown verb '{verb}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FunctionTable;
    use tempfile::tempdir;

    #[test]
    fn dispatch_to_known_demo_command_succeeds() {
        let dir = tempdir().unwrap();
        let dispatcher = Dispatcher::new(&dir.path().join("commands"));
        let mut env = Environment::new();
        let functions = FunctionTable::new();
        let tokens = vec!["echo".to_string(), "hi".to_string()];
        assert!(dispatcher
            .dispatch(&tokens, &mut env, &functions, 1, "echo hi")
            .is_ok());
    }

    #[test]
    fn unknown_verb_is_a_syntax_error() {
        let dir = tempdir().unwrap();
        let dispatcher = Dispatcher::new(&dir.path().join("commands"));
        let mut env = Environment::new();
        let functions = FunctionTable::new();
        let tokens = vec!["totally_unknown_verb".to_string()];
        let err = dispatcher
            .dispatch(&tokens, &mut env, &functions, 1, "totally_unknown_verb")
            .unwrap_err();
        assert!(matches!(err, SpokeError::Syntax { .. }));
    }

    #[test]
    fn resolution_is_cached_after_first_lookup() {
        let dir = tempdir().unwrap();
        let dispatcher = Dispatcher::new(&dir.path().join("commands"));
        assert!(dispatcher.resolve("echo").is_some());
        assert!(dispatcher.cache.borrow().contains_key("echo"));
    }
}
