//! put command - Upload a file or stdin to an object

use std::path::Path;

use clap::Args;
use cos_core::{Error, PutOptions, parse_remote_path, parse_time};
use serde::Serialize;
use tokio::io::AsyncRead;

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, Spinner};

/// Upload a file or stdin to an object
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload, or `-` for stdin
    pub source: String,

    /// Destination object (profile/key)
    pub target: String,

    /// Content-Type; guessed from the file name when omitted
    #[arg(long)]
    pub content_type: Option<String>,

    /// Content-Encoding
    #[arg(long)]
    pub content_encoding: Option<String>,

    /// Content-Disposition
    #[arg(long)]
    pub content_disposition: Option<String>,

    /// Content-Language
    #[arg(long)]
    pub content_language: Option<String>,

    /// Expires header as an RFC 3339 or HTTP date
    #[arg(long)]
    pub expires: Option<String>,

    /// Object tag as key=value (repeatable)
    #[arg(long = "tag", value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    source: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_human: Option<String>,
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid tag '{raw}', expected key=value")),
    }
}

impl PutArgs {
    fn is_stdin(&self) -> bool {
        self.source == "-"
    }

    /// Translate flags into upload options; `size` is the local file size
    fn put_options(&self, size: Option<i64>) -> Result<PutOptions, Error> {
        let mut options = PutOptions::new();

        let content_type = self.content_type.clone().or_else(|| {
            (!self.is_stdin())
                .then(|| mime_guess::from_path(&self.source).first_raw())
                .flatten()
                .map(str::to_string)
        });
        if let Some(value) = content_type {
            options = options.content_type(value);
        }
        if let Some(value) = &self.content_encoding {
            options = options.content_encoding(value);
        }
        if let Some(value) = &self.content_disposition {
            options = options.content_disposition(value);
        }
        if let Some(value) = &self.content_language {
            options = options.content_language(value);
        }
        if let Some(raw) = &self.expires {
            let at = parse_time(raw).ok_or_else(|| {
                Error::InvalidArgument(format!("cannot parse --expires value '{raw}'"))
            })?;
            options = options.expires(at);
        }
        if let Some(size) = size {
            options = options.object_size(size);
        }
        for (key, value) in &self.tags {
            options = options.tag(key, value);
        }

        Ok(options)
    }
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let target = match parse_remote_path(&args.target) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, "Invalid target path", &e),
    };
    let key = match target.require_key() {
        Ok(key) => key,
        Err(e) => return fail(&formatter, "Invalid target path", &e),
    };

    let (reader, size) = match open_source(&args).await {
        Ok(opened) => opened,
        Err(e) => return fail(&formatter, "Failed to open source", &e),
    };

    let options = match args.put_options(size) {
        Ok(options) => options,
        Err(e) => return fail(&formatter, "Invalid options", &e),
    };

    let storage = match connect(&target.profile, &formatter).await {
        Ok(storage) => storage,
        Err(code) => return code,
    };

    let spinner = Spinner::start(formatter.config(), &format!("Uploading {target}"));
    let result = storage.put_object_with_reader(key, reader, options).await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        return fail(&formatter, "Failed to upload", &e);
    }

    if formatter.is_json() {
        formatter.json(&PutOutput {
            status: "success",
            source: args.source.clone(),
            target: target.to_string(),
            size_bytes: size,
            size_human: size.map(|s| humansize::format_size(s as u64, humansize::BINARY)),
        });
    } else {
        formatter.success(&format!("{} -> {target}", args.source));
    }
    ExitCode::Success
}

async fn open_source(
    args: &PutArgs,
) -> Result<(Box<dyn AsyncRead + Send + Unpin>, Option<i64>), Error> {
    if args.is_stdin() {
        return Ok((Box::new(tokio::io::stdin()), None));
    }

    let path = Path::new(&args.source);
    let file = tokio::fs::File::open(path).await?;
    let metadata = file.metadata().await?;
    if metadata.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "'{}' is a directory",
            path.display()
        )));
    }
    Ok((Box::new(file), i64::try_from(metadata.len()).ok()))
}
