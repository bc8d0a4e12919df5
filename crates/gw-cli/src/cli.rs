use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gw_types::Perspective;

#[derive(Parser)]
#[command(
    name = "gw",
    about = "Groupwork status engine: inspect commit, push and update plans",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to groupwork.toml (defaults to ./groupwork.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PerspectiveArg {
    Local,
    Remote,
}

impl From<PerspectiveArg> for Perspective {
    fn from(arg: PerspectiveArg) -> Self {
        match arg {
            PerspectiveArg::Local => Perspective::Local,
            PerspectiveArg::Remote => Perspective::Remote,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify a status snapshot into action sets
    Classify(ClassifyArgs),
    /// Show what a commit and a push would do
    CommitStatus(SessionArgs),
    /// Show what an update would do
    UpdateStatus(SessionArgs),
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// JSON status snapshot
    pub snapshot: PathBuf,
    #[arg(long, default_value = "local")]
    pub perspective: PerspectiveArg,
}

#[derive(Args)]
pub struct SessionArgs {
    /// JSON status snapshot
    pub snapshot: PathBuf,
    /// Leave changed layout files out of the plan
    #[arg(long)]
    pub no_layout: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classify() {
        let cli = Cli::try_parse_from(["gw", "classify", "status.json"]).unwrap();
        if let Command::Classify(args) = cli.command {
            assert_eq!(args.snapshot, PathBuf::from("status.json"));
            assert!(matches!(args.perspective, PerspectiveArg::Local));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_classify_remote() {
        let cli = Cli::try_parse_from(["gw", "classify", "s.json", "--perspective", "remote"]).unwrap();
        if let Command::Classify(args) = cli.command {
            assert_eq!(Perspective::from(args.perspective), Perspective::Remote);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_commit_status_no_layout() {
        let cli = Cli::try_parse_from(["gw", "commit-status", "s.json", "--no-layout"]).unwrap();
        if let Command::CommitStatus(args) = cli.command {
            assert!(args.no_layout);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_update_status() {
        let cli = Cli::try_parse_from(["gw", "update-status", "s.json"]).unwrap();
        if let Command::UpdateStatus(args) = cli.command {
            assert!(!args.no_layout);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "gw", "update-status", "s.json", "-v", "--format", "json", "--config", "team.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("team.toml")));
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        assert!(Cli::try_parse_from(["gw", "classify"]).is_err());
    }
}
