//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::services::ToggleOp;

/// Hierarchical tri-state selection: nested checkboxes with propagation
#[derive(Parser, Debug)]
#[command(name = "checktree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory searched for a local .checktree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree with tri-state markers
    Show {
        /// Tree definition file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Toggle applied before rendering, in order: ID, ID=on, ID=off
        #[arg(short, long = "set", value_name = "ID[=on|off]")]
        set: Vec<ToggleOp>,
        /// Append node ids to labels
        #[arg(long)]
        ids: bool,
        /// Append checked/total leaf counts
        #[arg(long)]
        counts: bool,
    },

    /// Print checked leaf ids in tree order
    Leaves {
        /// Tree definition file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Toggle applied before listing, in order: ID, ID=on, ID=off
        #[arg(short, long = "set", value_name = "ID[=on|off]")]
        set: Vec<ToggleOp>,
    },

    /// Print the state of one node
    State {
        /// Tree definition file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id to query
        id: String,
        /// Toggle applied before querying, in order: ID, ID=on, ID=off
        #[arg(short, long = "set", value_name = "ID[=on|off]")]
        set: Vec<ToggleOp>,
    },

    /// Check a definition file and summarize its shape
    Validate {
        /// Tree definition file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
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
    /// Show effective settings
    Show,
    /// Print a commented template
    Template,
    /// Show config file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_set_flags_when_parsing_then_keeps_order() {
        let cli = Cli::try_parse_from([
            "checktree",
            "show",
            "shop.toml",
            "-s",
            "electronics",
            "--set",
            "laptops=off",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Show { set, .. }) => assert_eq!(
                set,
                vec![
                    ToggleOp::new("electronics", true),
                    ToggleOp::new("laptops", false)
                ]
            ),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_debug_flags_when_parsing_then_counts_them() {
        let cli = Cli::try_parse_from(["checktree", "-dd", "validate", "shop.toml"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}
