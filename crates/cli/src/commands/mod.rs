//! CLI command definitions and execution
//!
//! Every command addresses objects as `profile/key`, where the profile names
//! a configured bucket.

use clap::{Parser, Subcommand};
use cos_core::{ConfigManager, CosStorage, Error, ProfileManager};
use cos_s3::CosBackend;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod cat;
mod completions;
mod ls;
mod profile;
mod put;
mod rm;
mod stat;
mod url;

/// cosctl - command-line client for Tencent COS
///
/// Manage objects in COS buckets configured as named profiles.
#[derive(Parser, Debug)]
#[command(name = "cosctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress indicators
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage bucket profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// List objects
    Ls(ls::LsArgs),

    /// Show object metadata
    Stat(stat::StatArgs),

    /// Display object contents
    Cat(cat::CatArgs),

    /// Upload a file or stdin to an object
    Put(put::PutArgs),

    /// Remove objects
    Rm(rm::RmArgs),

    /// Generate a presigned download URL
    Url(url::UrlArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json || default_output_is_json(),
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Profile(cmd) => profile::execute(cmd, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Cat(args) => cat::execute(args, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Url(args) => url::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Whether the config file selects JSON output.
///
/// An unreadable config file is reported by the command that needs it.
fn default_output_is_json() -> bool {
    ConfigManager::new()
        .and_then(|manager| manager.load())
        .map(|config| config.defaults.output == "json")
        .unwrap_or(false)
}

/// Print `context: error` and return the matching exit code
pub(crate) fn fail(formatter: &Formatter, context: &str, error: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {error}"));
    ExitCode::from_error(error)
}

/// Load a profile and connect to its bucket
pub(crate) async fn connect(
    profile_name: &str,
    formatter: &Formatter,
) -> Result<CosStorage<CosBackend>, ExitCode> {
    let profile = ProfileManager::new()
        .and_then(|manager| manager.get(profile_name))
        .map_err(|e| fail(formatter, "Failed to load profile", &e))?;

    tracing::debug!(profile = %profile.name, bucket = %profile.bucket, "connecting");

    cos_s3::connect(&profile.cos_config())
        .await
        .map_err(|e| fail(formatter, "Failed to connect", &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cosctl", "ls", "prod/logs/", "--json", "-q"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Ls(_)));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["cosctl"]).is_err());
    }

    #[test]
    fn test_fail_maps_exit_code() {
        let formatter = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        let code = fail(&formatter, "stat", &Error::ObjectNotFound("a.txt".into()));
        assert_eq!(code, ExitCode::NotFound);
    }
}
