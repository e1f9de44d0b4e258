use clap::{ArgAction, Args, Parser, Subcommand};
use locality_core::Threshold;
use std::path::PathBuf;

/// CLI arguments for locality-cli
#[derive(Debug, Parser)]
#[command(
    name = "locality-cli",
    version,
    about = "Look up localities by spelling or by how their names sound"
)]
pub struct CliArgs {
    /// Snapshot file holding the localities table
    #[arg(long = "db", env = "LOCALITY_DB", default_value = "localities.bin", global = true)]
    pub db: PathBuf,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search localities by substring or by sound
    Search(SearchArgs),

    /// Compute phonetic codes for stored localities (batch indexing pass)
    Rebuild {
        /// Only code rows that have no code yet
        #[arg(long)]
        missing_only: bool,
    },

    /// Append localities from a JSON or JSON.gz source file
    Import {
        /// Path to the source dataset
        source: PathBuf,
    },

    /// Print the phonetic code of one or more names
    Encode {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show a summary of the stored table
    Stats,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Locality name to look for
    pub query: String,

    /// Match by sound instead of by substring
    #[arg(short, long)]
    pub phonetic: bool,

    /// Minimum similarity (0-1) of phonetic hits
    #[arg(short, long, default_value = "0.7", value_parser = parse_threshold)]
    pub threshold: Threshold,

    /// Ignore accents in substring matching (e.g. "zurich" finds "Zürich")
    #[arg(long)]
    pub fold_accents: bool,

    /// Print hits as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show at most this many hits
    #[arg(short, long)]
    pub limit: Option<usize>,
}

fn parse_threshold(s: &str) -> Result<Threshold, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    Threshold::new(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_defaults() {
        let args = CliArgs::try_parse_from(["locality", "search", "Smith"]).unwrap();
        let Commands::Search(search) = args.command else {
            panic!("expected search");
        };
        assert_eq!(search.query, "Smith");
        assert!(!search.phonetic);
        assert_eq!(search.threshold, Threshold::DEFAULT);
    }

    #[test]
    fn threshold_is_validated() {
        assert!(CliArgs::try_parse_from(["locality", "search", "x", "-t", "1.2"]).is_err());
        assert!(CliArgs::try_parse_from(["locality", "search", "x", "-t", "abc"]).is_err());
        let args =
            CliArgs::try_parse_from(["locality", "search", "x", "--phonetic", "-t", "0.5"]).unwrap();
        let Commands::Search(search) = args.command else {
            panic!("expected search");
        };
        assert!(search.phonetic);
        assert_eq!(search.threshold.value(), 0.5);
    }

    #[test]
    fn rebuild_mode_flag() {
        let args = CliArgs::try_parse_from(["locality", "--db", "x.bin", "rebuild", "--missing-only"])
            .unwrap();
        assert_eq!(args.db, PathBuf::from("x.bin"));
        assert!(matches!(args.command, Commands::Rebuild { missing_only: true }));
    }
}
