//! url command - Generate a presigned download URL

use clap::Args;
use cos_core::{DEFAULT_URL_EXPIRE_SECS, GetOptions, parse_remote_path};
use serde::Serialize;

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Generate a presigned download URL
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Object path (profile/key)
    pub path: String,

    /// URL lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_URL_EXPIRE_SECS)]
    pub expire: i64,
}

#[derive(Debug, Serialize)]
struct UrlOutput {
    key: String,
    url: String,
    expire_secs: i64,
}

/// Execute the url command
pub async fn execute(args: UrlArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_remote_path(&args.path) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };
    let key = match path.require_key() {
        Ok(key) => key,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let storage = match connect(&path.profile, &formatter).await {
        Ok(storage) => storage,
        Err(code) => return code,
    };

    let options = GetOptions::new().expire(args.expire);
    match storage.presign_url(key, &options).await {
        Ok(url) => {
            if formatter.is_json() {
                formatter.json(&UrlOutput {
                    key: key.to_string(),
                    url,
                    expire_secs: options.expire_secs(),
                });
            } else {
                formatter.println(&url);
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to presign URL", &e),
    }
}
