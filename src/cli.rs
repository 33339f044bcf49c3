//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Kata - Bootstrap a coding kata from a template repository on GitHub
#[derive(Parser, Debug)]
#[command(name = "kata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the configuration file.
    ///
    /// Defaults to `kata/config.yaml` in the platform configuration directory;
    /// a missing default file means built-in defaults.
    #[arg(long, global = true, value_name = "FILE", env = "KATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    /// Number of worker threads, overriding `worker_threads` from the
    /// configuration file.
    #[arg(long, global = true, value_name = "N")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every file of a template directory without downloading it
    Ls(commands::ls::LsArgs),

    /// Download a template directory into a local folder
    Download(commands::download::DownloadArgs),

    /// Create a new kata from a template of the configured template repository
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.global.log_level);

        match self.command {
            Commands::Ls(args) => commands::ls::execute(args, &self.global),
            Commands::Download(args) => commands::download::execute(args, &self.global),
            Commands::Init(args) => commands::init::execute(args, &self.global),
        }
    }
}

/// `RUST_LOG`, when set, takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // Fails only when a logger is already installed
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kata",
            "ls",
            "octocat",
            "katas",
            "--threads",
            "4",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.global.threads, Some(4));
        assert_eq!(cli.global.log_level, "debug");
    }

    #[test]
    fn test_log_level_is_restricted() {
        assert!(Cli::try_parse_from(["kata", "--log-level", "loud", "ls", "o", "r"]).is_err());
    }

    #[test]
    fn test_download_defaults() {
        let cli = Cli::try_parse_from(["kata", "download", "octocat", "katas"]).unwrap();
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.owner, "octocat");
                assert_eq!(args.repo, "katas");
                assert_eq!(args.path, None);
                assert_eq!(args.output, PathBuf::from("sandbox"));
            }
            other => panic!("Expected download command, got {:?}", other),
        }
    }

    #[test]
    fn test_init_arguments() {
        let cli = Cli::try_parse_from(["kata", "init", "bowling", "java"]).unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.name, "bowling");
                assert_eq!(args.language, "java");
                assert_eq!(args.template, None);
                assert_eq!(args.dir, PathBuf::from("."));
            }
            other => panic!("Expected init command, got {:?}", other),
        }

        let cli =
            Cli::try_parse_from(["kata", "init", "bowling", "java", "junit5", "-d", "katas"])
                .unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.template.as_deref(), Some("junit5"));
                assert_eq!(args.dir, PathBuf::from("katas"));
            }
            other => panic!("Expected init command, got {:?}", other),
        }
    }
}
