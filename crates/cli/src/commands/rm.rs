//! rm command - Remove objects
//!
//! Deleting an object that does not exist succeeds.

use std::collections::BTreeMap;

use clap::Args;
use cos_core::{Error, parse_remote_path};
use serde::Serialize;

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove objects
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Objects to remove (profile/key)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Keep going after a failed delete
    #[arg(long)]
    pub continue_on_error: bool,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    deleted: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<String>,
}

/// Group object keys by profile, preserving argument order within a profile
fn group_by_profile(paths: &[String]) -> Result<BTreeMap<String, Vec<String>>, Error> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for raw in paths {
        let path = parse_remote_path(raw)?;
        let key = path.require_key()?.to_string();
        groups.entry(path.profile).or_default().push(key);
    }
    Ok(groups)
}

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let groups = match group_by_profile(&args.paths) {
        Ok(groups) => groups,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let mut output = RmOutput {
        deleted: Vec::new(),
        failed: Vec::new(),
    };
    let mut exit_code = ExitCode::Success;

    'profiles: for (profile, keys) in groups {
        let storage = match connect(&profile, &formatter).await {
            Ok(storage) => storage,
            Err(code) => {
                exit_code = code;
                if args.continue_on_error {
                    output
                        .failed
                        .extend(keys.iter().map(|key| format!("{profile}/{key}")));
                    continue;
                }
                break;
            }
        };

        for key in keys {
            let target = format!("{profile}/{key}");
            match storage.delete_object(&key).await {
                Ok(()) => {
                    if !formatter.is_json() {
                        formatter.success(&format!("Removed {target}"));
                    }
                    output.deleted.push(target);
                }
                Err(e) => {
                    exit_code = fail(&formatter, &format!("Failed to remove {target}"), &e);
                    output.failed.push(target);
                    if !args.continue_on_error {
                        break 'profiles;
                    }
                }
            }
        }
    }

    if formatter.is_json() {
        formatter.json(&output);
    }
    exit_code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_profile() {
        let paths = vec![
            "prod/a.txt".to_string(),
            "media/b.png".to_string(),
            "prod/dir/c.txt".to_string(),
        ];
        let groups = group_by_profile(&paths).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["prod"], vec!["a.txt", "dir/c.txt"]);
        assert_eq!(groups["media"], vec!["b.png"]);
    }

    #[test]
    fn test_group_rejects_prefix() {
        let paths = vec!["prod/logs/".to_string()];
        assert!(matches!(
            group_by_profile(&paths).unwrap_err(),
            Error::InvalidPath(_)
        ));
    }
}
