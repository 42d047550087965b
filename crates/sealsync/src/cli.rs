//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// sealsync - GitHub Actions secrets with cloud backups
#[derive(Parser, Debug)]
#[command(name = "sealsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to sealsync.yaml config file
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Push a secret to GitHub, backing it up first
    Push(PushArgs),

    /// Restore every secret in a backup to GitHub
    Restore(RestoreArgs),

    /// List secret names stored in a backup
    List(ListArgs),
}

/// Overrides for the repository and backup settings in sealsync.yaml
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// GitHub repository owner
    #[arg(short, long)]
    pub owner: Option<String>,

    /// GitHub repository name
    #[arg(short, long)]
    pub repo: Option<String>,

    /// AWS region for Secrets Manager
    #[arg(long)]
    pub aws_region: Option<String>,

    /// AWS profile to use (from ~/.aws/config)
    #[arg(long)]
    pub aws_profile: Option<String>,

    /// GCP project ID
    #[arg(long)]
    pub gcp_project: Option<String>,

    /// Name of the backup secret holding the JSON collection
    #[arg(long)]
    pub secret_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Secret key name (prompted if omitted)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Secret value (prompted without echo if omitted)
    #[arg(long)]
    pub value: Option<String>,

    /// Backup destination: aws, gcp, or none
    #[arg(short, long, default_value = "none")]
    pub backup: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Backup source to restore from: aws or gcp
    #[arg(short, long)]
    pub backup: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Backup source to list: aws or gcp
    #[arg(short, long)]
    pub backup: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_push_parses_flags() {
        let cli = Cli::try_parse_from([
            "sealsync", "-v", "push", "-k", "API_KEY", "--value", "abc", "-b", "aws", "-o",
            "acme", "-r", "widgets",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Push(args) => {
                assert_eq!(args.key.as_deref(), Some("API_KEY"));
                assert_eq!(args.value.as_deref(), Some("abc"));
                assert_eq!(args.backup, "aws");
                assert_eq!(args.target.owner.as_deref(), Some("acme"));
                assert_eq!(args.target.repo.as_deref(), Some("widgets"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_push_backup_defaults_to_none() {
        let cli = Cli::try_parse_from(["sealsync", "push"]).unwrap();
        match cli.command {
            Commands::Push(args) => assert_eq!(args.backup, "none"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_restore_requires_backup() {
        assert!(Cli::try_parse_from(["sealsync", "restore"]).is_err());

        let cli = Cli::try_parse_from([
            "sealsync",
            "--config",
            "ci/sealsync.yaml",
            "restore",
            "-b",
            "gcp",
            "--gcp-project",
            "my-project",
            "--secret-name",
            "backup",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref().map(|p| p.as_str()), Some("ci/sealsync.yaml"));
        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.backup, "gcp");
                assert_eq!(args.target.gcp_project.as_deref(), Some("my-project"));
                assert_eq!(args.target.secret_name.as_deref(), Some("backup"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
