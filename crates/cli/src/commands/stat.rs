//! stat command - Show object metadata

use clap::Args;
use cos_core::{FileInfo, GetOptions, format_http_date, parse_remote_path};

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show object metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Object path (profile/key)
    pub path: String,

    /// Fetch the object's tag set
    #[arg(long)]
    pub tags: bool,

    /// Attach a presigned download URL
    #[arg(long)]
    pub url: bool,

    /// Presigned URL lifetime in seconds
    #[arg(long, requires = "url")]
    pub expire: Option<i64>,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
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

    let mut options = GetOptions::new();
    if args.tags {
        options = options.with_tagging();
    }
    if args.url {
        options = options.with_url();
    }
    if let Some(secs) = args.expire {
        options = options.expire(secs);
    }

    match storage.head_object(key, &options).await {
        Ok(info) => {
            if formatter.is_json() {
                formatter.json(&info);
            } else {
                for line in describe(&info) {
                    formatter.println(&line);
                }
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to get object metadata", &e),
    }
}

fn describe(info: &FileInfo) -> Vec<String> {
    let mut lines = vec![format!("Name      : {}", info.key)];
    if let Some(modified) = info.last_modified {
        lines.push(format!("Date      : {}", format_http_date(modified)));
    }
    lines.push(format!("Size      : {} ({} bytes)", info.size_human(), info.size));
    if !info.etag.is_empty() {
        lines.push(format!("ETag      : {}", info.etag));
    }
    if let Some(tags) = &info.tagging {
        let tags: Vec<String> = tags.iter().map(|(k, v)| format!("{k}={v}")).collect();
        lines.push(format!("Tags      : {}", tags.join(", ")));
    }
    if let Some(url) = &info.url {
        lines.push(format!("URL       : {url}"));
    }
    lines
}
