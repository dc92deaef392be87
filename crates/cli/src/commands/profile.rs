//! Profile management commands
//!
//! Profiles are named references to a COS bucket, including its endpoint
//! or region and credentials.

use clap::Subcommand;
use cos_core::{Credentials, Endpoint, Error, Profile, ProfileManager};
use serde::Serialize;

use super::fail;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "prod", "media")
    pub name: String,

    /// Bucket name including the APPID suffix (e.g., "demo-1250000000")
    pub bucket: String,

    /// Endpoint URL or host (e.g., "cos.ap-guangzhou.myqcloud.com")
    #[arg(long)]
    pub endpoint: Option<String>,

    /// COS region, used to build the endpoint when none is given
    #[arg(long)]
    pub region: Option<String>,

    /// SecretId
    #[arg(long, env = "COS_SECRET_ID")]
    pub secret_id: String,

    /// SecretKey
    #[arg(long, env = "COS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show the resolved bucket host for each profile
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

#[derive(Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

/// Profile information for JSON output (without secrets)
#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket_host: Option<String>,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        let config = profile.cos_config();
        let bucket_host = Endpoint::resolve(&config.bucket, &config.endpoint, &config.region)
            .ok()
            .map(|endpoint| endpoint.bucket_host().to_string());
        Self {
            name: profile.name.clone(),
            bucket: profile.bucket.clone(),
            endpoint: profile.endpoint.clone(),
            region: profile.region.clone(),
            bucket_host,
        }
    }
}

#[derive(Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub async fn execute(cmd: ProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match ProfileManager::new() {
        Ok(manager) => manager,
        Err(e) => return fail(&formatter, "Failed to open configuration", &e),
    };

    match cmd {
        ProfileCommands::Set(args) => execute_set(args, &manager, &formatter),
        ProfileCommands::List(args) => execute_list(args, &manager, &formatter),
        ProfileCommands::Remove(args) => execute_remove(args, &manager, &formatter),
    }
}

/// Build a profile from `set` arguments, rejecting input no client could use
fn build_profile(args: SetArgs) -> Result<Profile, Error> {
    if args.name.is_empty() || args.name.contains('/') {
        return Err(Error::InvalidArgument(
            "Profile name must be non-empty and must not contain '/'".into(),
        ));
    }

    let endpoint = args.endpoint.unwrap_or_default();
    let region = args.region.unwrap_or_default();
    Endpoint::resolve(&args.bucket, &endpoint, &region)?;

    let mut profile = Profile::new(
        args.name,
        args.bucket,
        Credentials::new(args.secret_id, args.secret_key),
    );
    if !endpoint.is_empty() {
        profile = profile.endpoint(endpoint);
    }
    if !region.is_empty() {
        profile = profile.region(region);
    }
    Ok(profile)
}

fn execute_set(args: SetArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profile = match build_profile(args) {
        Ok(profile) => profile,
        Err(e) => return fail(formatter, "Invalid profile", &e),
    };
    let name = profile.name.clone();

    match manager.set(profile) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: name.clone(),
                    message: format!("Profile '{name}' configured successfully"),
                });
            } else {
                formatter.success(&format!("Profile '{name}' configured successfully."));
            }
            ExitCode::Success
        }
        Err(e) => fail(formatter, "Failed to save profile", &e),
    }
}

fn execute_list(args: ListArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profiles = match manager.list() {
        Ok(profiles) => profiles,
        Err(e) => return fail(formatter, "Failed to list profiles", &e),
    };

    if formatter.is_json() {
        formatter.json(&ProfileListOutput {
            profiles: profiles.iter().map(ProfileInfo::from).collect(),
        });
    } else if profiles.is_empty() {
        formatter.println("No profiles configured.");
    } else {
        for profile in &profiles {
            if args.long {
                let info = ProfileInfo::from(profile);
                formatter.println(&format!(
                    "{:<12} {} ({})",
                    info.name,
                    info.bucket,
                    info.bucket_host.as_deref().unwrap_or("unresolvable endpoint")
                ));
            } else {
                formatter.println(&format!("{:<12} {}", profile.name, profile.bucket));
            }
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name.clone(),
                    message: format!("Profile '{}' removed successfully", args.name),
                });
            } else {
                formatter.success(&format!("Profile '{}' removed successfully.", args.name));
            }
            ExitCode::Success
        }
        Err(e) => fail(formatter, "Failed to remove profile", &e),
    }
}
