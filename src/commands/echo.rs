// ABOUTME: Demo command: prints its remaining tokens, quotes stripped

use crate::dispatcher::CommandModule;
use crate::env::display_token;
use crate::error::SpokeError;
use crate::host::Host;

fn run(host: &mut Host) -> Result<bool, SpokeError> {
    let rendered: Vec<String> = host.tokens[1..].iter().map(|t| display_token(t)).collect();
    println!("{}", rendered.join(" "));
    Ok(true)
}

inventory::submit! {
    CommandModule { verb: "echo", run }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, FunctionTable};

    #[test]
    fn echo_always_succeeds() {
        let mut env = Environment::new();
        let functions = FunctionTable::new();
        let tokens = vec!["echo".to_string(), "hi".to_string(), "there".to_string()];
        let mut host = Host {
            tokens: &tokens,
            env: &mut env,
            functions: &functions,
            line_num: 1,
            line: "echo hi there",
        };
        assert!(run(&mut host).unwrap());
    }
}
