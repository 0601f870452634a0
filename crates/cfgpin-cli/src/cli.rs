use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cfgpin",
    about = "Publish configuration snapshots under stable mutable names",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload a snapshot and advance the environment's name
    Publish(PublishArgs),
    /// Show what a name currently points at
    Resolve(ResolveArgs),
    /// Show every configured environment and its current binding
    Status(StatusArgs),
    /// Generate a new owning credential
    Keygen,
}

/// Where the remote services live.
#[derive(Args, Clone, Debug)]
pub struct ServiceArgs {
    /// Pinning service API base URL
    #[arg(long, env = "CFGPIN_PINNING_API", default_value = "https://api.pinata.cloud")]
    pub pinning_api: String,

    /// Naming network API base URL
    #[arg(long, env = "CFGPIN_NAMING_API", default_value = "https://name.web3.storage")]
    pub naming_api: String,

    /// Gateway used for printed URLs
    #[arg(long, env = "CFGPIN_GATEWAY", default_value = "https://w3s.link")]
    pub gateway: String,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Lifetime of a published name revision, in days
    #[arg(long, default_value_t = 365)]
    pub record_validity_days: i64,

    /// Use in-memory services instead of the network
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct PublishArgs {
    /// Environment registry (.toml or .json)
    #[arg(short, long, env = "CFGPIN_CONFIG")]
    pub config: PathBuf,

    /// Environment label
    #[arg(short, long)]
    pub env: String,

    /// Snapshot as a flat JSON object
    #[arg(short, long)]
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub services: ServiceArgs,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Public name to resolve
    #[arg(long, conflicts_with = "env")]
    pub name: Option<String>,

    /// Environment label, resolved through the registry
    #[arg(short, long, requires = "config")]
    pub env: Option<String>,

    /// Environment registry (.toml or .json)
    #[arg(short, long, env = "CFGPIN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub services: ServiceArgs,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Environment registry (.toml or .json)
    #[arg(short, long, env = "CFGPIN_CONFIG")]
    pub config: PathBuf,

    /// Skip resolving current bindings
    #[arg(long)]
    pub offline: bool,

    #[command(flatten)]
    pub services: ServiceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_publish() {
        let cli = Cli::try_parse_from([
            "cfgpin", "publish", "-c", "envs.toml", "-e", "production", "-s", "snap.json",
        ])
        .unwrap();
        if let Command::Publish(args) = cli.command {
            assert_eq!(args.env, "production");
            assert_eq!(args.config, PathBuf::from("envs.toml"));
            assert!(!args.services.dry_run);
            assert_eq!(args.services.record_validity_days, 365);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_publish_dry_run() {
        let cli = Cli::try_parse_from([
            "cfgpin", "publish", "-c", "envs.toml", "-e", "dev", "-s", "snap.json", "--dry-run",
        ])
        .unwrap();
        if let Command::Publish(args) = cli.command {
            assert!(args.services.dry_run);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_resolve_by_name() {
        let cli = Cli::try_parse_from(["cfgpin", "resolve", "--name", "kabc"]).unwrap();
        if let Command::Resolve(args) = cli.command {
            assert_eq!(args.name.as_deref(), Some("kabc"));
            assert!(args.env.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn resolve_name_and_env_conflict() {
        let res = Cli::try_parse_from([
            "cfgpin", "resolve", "--name", "kabc", "--env", "dev", "--config", "e.toml",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn parse_status_offline() {
        let cli = Cli::try_parse_from(["cfgpin", "status", "-c", "e.toml", "--offline"]).unwrap();
        if let Command::Status(args) = cli.command {
            assert!(args.offline);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_keygen() {
        let cli = Cli::try_parse_from(["cfgpin", "keygen"]).unwrap();
        assert!(matches!(cli.command, Command::Keygen));
    }

    #[test]
    fn parse_verbose_json() {
        let cli = Cli::try_parse_from(["cfgpin", "--verbose", "--format", "json", "keygen"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
