//! CLI argument definitions using clap

use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::RecordId;

/// Index flat parent-referencing records into a tree and query it
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .treestore.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print all records in input order
    All {
        /// Record file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print one record by id
    Item {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Record id; integers are parsed as numbers, `str:007` forces a string
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
        /// Treat the id as a 1-based position in the file instead
        #[arg(long)]
        position: bool,
    },

    /// Print the direct children of a record
    Children {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Record id; integers are parsed as numbers, `str:007` forces a string
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },

    /// Print the ancestor chain of a record, parent first, root last
    Parents {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Record id; integers are parsed as numbers, `str:007` forces a string
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },

    /// Show the record hierarchy as a tree
    Tree {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show record count, depth, leaves and orphans
    Info {
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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}

/// Parse a command line id. A `str:` prefix keeps numeric-looking ids as strings.
pub fn parse_record_id(s: &str) -> Result<RecordId, Infallible> {
    match s.strip_prefix("str:") {
        Some(rest) => Ok(RecordId::Str(rest.to_string())),
        None => RecordId::from_str(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7", RecordId::Int(7))]
    #[case("007", RecordId::Int(7))]
    #[case("str:007", RecordId::from("007"))]
    #[case("abc", RecordId::from("abc"))]
    #[case("str:str:x", RecordId::from("str:x"))]
    fn test_parse_record_id(#[case] input: &str, #[case] expected: RecordId) {
        assert_eq!(parse_record_id(input).unwrap(), expected);
    }

    #[test]
    fn given_prefixed_id_when_parsing_cli_then_string_id() {
        let cli =
            Cli::try_parse_from(["treestore", "parents", "records.json", "str:007"]).unwrap();
        match cli.command {
            Some(Commands::Parents { id, .. }) => assert_eq!(id, RecordId::from("007")),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
