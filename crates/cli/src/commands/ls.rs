//! ls command - List objects
//!
//! Lists one page of objects under a prefix, or every object (up to the
//! listing cap) with `--all`.

use clap::Args;
use cos_core::{
    DEFAULT_PAGE_SIZE, FileInfo, GetOptions, ListPaginatedInput, MAX_LIST_OBJECTS,
    parse_remote_path,
};
use serde::Serialize;

use super::{connect, fail};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List objects
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Remote path (profile[/prefix])
    pub path: String,

    /// Follow cursors and list every object under the prefix
    #[arg(short, long)]
    pub all: bool,

    /// Objects per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: i32,

    /// Resume listing after this cursor
    #[arg(long, conflicts_with = "all")]
    pub cursor: Option<String>,

    /// Fetch the tag set of each object
    #[arg(long)]
    pub tags: bool,

    /// Attach a presigned download URL to each object
    #[arg(long)]
    pub urls: bool,

    /// Presigned URL lifetime in seconds
    #[arg(long, requires = "urls")]
    pub expire: Option<i64>,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls command (JSON format)
#[derive(Debug, Serialize)]
struct LsOutput {
    items: Vec<FileInfo>,
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_objects: usize,
    total_size_bytes: i64,
    total_size_human: String,
}

impl Summary {
    fn of(items: &[FileInfo]) -> Self {
        let total_size: i64 = items.iter().map(|item| item.size).sum();
        Self {
            total_objects: items.len(),
            total_size_bytes: total_size,
            total_size_human: humansize::format_size(total_size.max(0) as u64, humansize::BINARY),
        }
    }
}

impl LsArgs {
    fn get_options(&self) -> GetOptions {
        let mut options = GetOptions::new();
        if self.tags {
            options = options.with_tagging();
        }
        if self.urls {
            options = options.with_url();
        }
        if let Some(secs) = self.expire {
            options = options.expire(secs);
        }
        options
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let path = match parse_remote_path(&args.path) {
        Ok(path) => path,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let storage = match connect(&path.profile, &formatter).await {
        Ok(storage) => storage,
        Err(code) => return code,
    };

    let options = args.get_options();

    let (items, truncated, cursor) = if args.all {
        match storage.list_all(&path.key, &options).await {
            Ok(items) => {
                let capped = items.len() >= MAX_LIST_OBJECTS;
                if capped {
                    formatter.warning(&format!(
                        "Listing stopped at {MAX_LIST_OBJECTS} objects; narrow the prefix to see the rest"
                    ));
                }
                (items, capped, None)
            }
            Err(e) => return fail(&formatter, "Failed to list objects", &e),
        }
    } else {
        let mut input = ListPaginatedInput::new(&path.key, args.page_size);
        if let Some(cursor) = &args.cursor {
            input = input.cursor(cursor);
        }
        match storage.list_page(&input, &options).await {
            Ok(page) => {
                let more = page.has_more();
                let cursor = more.then_some(page.cursor);
                (page.files, more, cursor)
            }
            Err(e) => return fail(&formatter, "Failed to list objects", &e),
        }
    };

    if formatter.is_json() {
        let summary = args.summarize.then(|| Summary::of(&items));
        formatter.json(&LsOutput {
            items,
            truncated,
            cursor,
            summary,
        });
        return ExitCode::Success;
    }

    for item in &items {
        formatter.object(item);
    }
    if let Some(cursor) = &cursor {
        formatter.cursor_hint(cursor);
    }
    if args.summarize {
        let summary = Summary::of(&items);
        formatter.totals(summary.total_objects, &summary.total_size_human);
    }

    ExitCode::Success
}
