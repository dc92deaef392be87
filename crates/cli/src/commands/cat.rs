//! cat command - Display object contents
//!
//! Writes the entire content of an object to stdout.

use std::io::{self, Write};

use clap::Args;
use cos_core::parse_remote_path;

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Display object contents
#[derive(Args, Debug)]
pub struct CatArgs {
    /// Object path (profile/key)
    pub path: String,
}

/// Execute the cat command
pub async fn execute(args: CatArgs, output_config: OutputConfig) -> ExitCode {
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

    match storage.get_object(key).await {
        Ok(data) => {
            // Bypass the formatter to keep binary content intact
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(&data).and_then(|()| stdout.flush()) {
                formatter.error(&format!("Failed to write to stdout: {e}"));
                return ExitCode::GeneralError;
            }
            ExitCode::Success
        }
        Err(e) if e.is_not_found() => {
            formatter.error(&format!("Object not found: {path}"));
            ExitCode::NotFound
        }
        Err(e) => fail(&formatter, "Failed to get object", &e),
    }
}
