//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Keep `file.js, Line: N` citations in `req.err = ` lines in sync with their real location
#[derive(Parser, Debug)]
#[command(name = "lineref")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    // No command behaves like `run` with the configured roots
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite citations under the given roots (default: configured roots)
    Run {
        /// Root directories, processed in order
        #[arg(value_hint = ValueHint::DirPath)]
        roots: Vec<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_args_when_parsing_then_no_command() {
        let cli = Cli::try_parse_from(["lineref"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.debug, 0);
        assert!(cli.project_dir.is_none());
    }

    #[test]
    fn given_run_with_roots_when_parsing_then_keeps_order() {
        let cli = Cli::try_parse_from(["lineref", "run", "src", "lib"]).unwrap();
        match cli.command {
            Some(Commands::Run { roots }) => {
                assert_eq!(roots, vec![PathBuf::from("src"), PathBuf::from("lib")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counts() {
        let cli = Cli::try_parse_from(["lineref", "-ddd", "run"]).unwrap();
        assert_eq!(cli.debug, 3);
    }

    #[test]
    fn given_global_project_dir_after_subcommand_when_parsing_then_accepted() {
        let cli = Cli::try_parse_from(["lineref", "config", "show", "-C", "/tmp"]).unwrap();
        assert_eq!(cli.project_dir, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn given_unknown_flag_when_parsing_then_fails() {
        assert!(Cli::try_parse_from(["lineref", "--dry-run"]).is_err());
    }
}
