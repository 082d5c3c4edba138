// src/cli/commands.rs
use crate::types::ReportMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strayacoin Terminal - mining and wallet shell for the Strayacoin daemon
#[derive(Parser, Debug)]
#[command(name = "straya-terminal")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "straya.toml", global = true)]
    pub config: PathBuf,

    /// Daemon CLI binary (overrides config)
    #[arg(long, global = true)]
    pub cli_path: Option<PathBuf>,

    /// Per-block report detail (overrides config)
    #[arg(long, global = true)]
    pub report: Option<ReportMode>,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The action to perform (interactive shell if omitted)
    #[command(subcommand)]
    pub action: Option<Action>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Interactive command shell
    Shell,

    /// Run a single mining session and exit
    Mine(MineOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for a non-interactive mining session
#[derive(Parser, Debug)]
pub struct MineOptions {
    /// Keep mining passes until interrupted with Ctrl-C
    #[arg(short, long)]
    pub repeat: bool,

    /// Number of blocks per pass
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub blocks: u32,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "straya.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_shell() {
        let cli = Commands::try_parse_from(["straya-terminal"]).unwrap();
        assert!(cli.action.is_none());
        assert_eq!(cli.config, PathBuf::from("straya.toml"));
    }

    #[test]
    fn parses_mine_with_overrides() {
        let cli = Commands::try_parse_from([
            "straya-terminal",
            "mine",
            "-r",
            "3",
            "--report",
            "basic",
            "--cli-path",
            "/usr/bin/straya-cli",
        ])
        .unwrap();
        match cli.action {
            Some(Action::Mine(opts)) => {
                assert!(opts.repeat);
                assert_eq!(opts.blocks, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cli.report, Some(ReportMode::Basic));
        assert_eq!(cli.cli_path, Some(PathBuf::from("/usr/bin/straya-cli")));
    }

    #[test]
    fn rejects_zero_blocks() {
        assert!(Commands::try_parse_from(["straya-terminal", "mine", "0"]).is_err());
        assert!(Commands::try_parse_from(["straya-terminal", "mine", "many"]).is_err());
    }
}
