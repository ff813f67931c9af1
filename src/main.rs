use clap::Parser;
use spoke::config::Config;
use spoke::error::SpokeError;
use std::path::PathBuf;
use std::process::ExitCode;

/// Interpreter for Spoke, a small imperative scripting language
#[derive(Parser, Debug)]
#[command(name = "spoke")]
#[command(version = spoke::config::VERSION)]
#[command(about = "Runs a Spoke (.spk) script")]
struct CliArgs {
    /// Script file to execute
    #[arg(value_name = "FILE")]
    script: PathBuf,

    /// Directory to look for external command modules in
    #[arg(long = "commands-dir", value_name = "DIR")]
    commands_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    if args.script.extension().and_then(|e| e.to_str()) != Some("spk") {
        println!(
            "Usage: spoke <script.spk>\nError: expected a '.spk' source file, got '{}'",
            args.script.display()
        );
        return ExitCode::from(2);
    }

    let config = Config::from_args(args.script, args.commands_dir, args.verbose);

    match spoke::run_script(&config.script, config.commands_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let SpokeError::Internal { ref detail, .. } = err {
                log::error!("internal interpreter error: {detail}");
            }
            println!("{err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_spk_extension_is_rejected_before_running() {
        let args = CliArgs::try_parse_from(["spoke", "script.txt"]).unwrap();
        assert_ne!(
            args.script.extension().and_then(|e| e.to_str()),
            Some("spk")
        );
    }

    #[test]
    fn commands_dir_flag_parses() {
        let args =
            CliArgs::try_parse_from(["spoke", "prog.spk", "--commands-dir", "/tmp/cmds"]).unwrap();
        assert_eq!(args.commands_dir, Some(PathBuf::from("/tmp/cmds")));
    }
}
