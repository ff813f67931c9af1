// ABOUTME: Configuration for the interpreter, built from CLI args

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolved configuration for a single run of the interpreter.
#[derive(Debug, Clone)]
pub struct Config {
    pub script: PathBuf,
    pub commands_dir: PathBuf,
    pub verbose: u8,
}

impl Config {
    pub fn from_args(script: PathBuf, commands_dir: Option<PathBuf>, verbose: u8) -> Self {
        Config {
            script,
            commands_dir: commands_dir.unwrap_or_else(|| PathBuf::from("commands")),
            verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_dir_defaults_to_commands() {
        let cfg = Config::from_args(PathBuf::from("prog.spk"), None, 0);
        assert_eq!(cfg.commands_dir, PathBuf::from("commands"));
    }

    #[test]
    fn commands_dir_override_is_honored() {
        let cfg = Config::from_args(
            PathBuf::from("prog.spk"),
            Some(PathBuf::from("/tmp/cmds")),
            0,
        );
        assert_eq!(cfg.commands_dir, PathBuf::from("/tmp/cmds"));
    }
}
