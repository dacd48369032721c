//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Reconcile one Route53 record set against a declaration.
#[derive(Debug, Parser)]
#[command(name = "r53-record", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// File holding the persisted record state
    #[arg(
        long,
        env = "R53_RECORD_STATE",
        default_value = "r53-record.state.json",
        global = true
    )]
    pub state: PathBuf,

    /// Route53 API endpoint (e.g. a local mock)
    #[arg(long, env = "R53_RECORD_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Signing region
    #[arg(long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,

    /// Retries for throttled or transient API failures
    #[arg(long, env = "R53_RECORD_MAX_RETRIES", global = true)]
    pub max_retries: Option<u32>,

    /// JSON file with convergence settings
    #[arg(long, env = "R53_RECORD_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update the record set declared in CONFIG
    Apply {
        /// JSON record declaration
        config: PathBuf,
    },
    /// Re-read the record set and refresh the state file
    Refresh,
    /// Delete the record set and drop the state file
    Destroy,
    /// Adopt an existing record set by ID (`ZONE_NAME_TYPE[_SETID]`)
    Import {
        id: String,
    },
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
    fn parse_apply_with_globals() {
        let cli = Cli::try_parse_from([
            "r53-record",
            "--state",
            "/tmp/www.json",
            "--endpoint",
            "http://127.0.0.1:9000",
            "apply",
            "www.json",
        ])
        .unwrap();

        assert_eq!(cli.global.state, PathBuf::from("/tmp/www.json"));
        assert_eq!(cli.global.endpoint.as_deref(), Some("http://127.0.0.1:9000"));
        assert!(matches!(cli.command, Command::Apply { config } if config == PathBuf::from("www.json")));
    }

    #[test]
    fn parse_import_id() {
        let cli = Cli::try_parse_from(["r53-record", "import", "Z1_a_b_CNAME"]).unwrap();
        assert!(matches!(cli.command, Command::Import { id } if id == "Z1_a_b_CNAME"));
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["r53-record", "-vv", "refresh"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["r53-record"]).is_err());
    }
}
