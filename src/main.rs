pub mod task_queue;
pub mod worker;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use structopt::StructOpt;

use crate::task_queue::TaskQueue;
use crate::worker::{SearchContext, TypeFilter};

fn main() -> anyhow::Result<()> {
    let args = Opt::from_args();

    // Usage errors are fatal before any traversal begins.
    let root_metadata = fs::metadata(&args.root_dir)
        .with_context(|| format!("cannot access '{}'", args.root_dir.display()))?;
    if !root_metadata.is_dir() {
        bail!("'{}' is not a directory", args.root_dir.display());
    }

    let ctx = Arc::new(SearchContext {
        pattern: args.pattern,
        type_filter: args.type_filter.unwrap_or(TypeFilter::Any),
        queue: TaskQueue::new(),
        output: Mutex::new(io::stdout()),
    });
    worker::run(ctx, args.root_dir, args.threads);

    Ok(())
}

#[derive(StructOpt)]
#[structopt(
    name = "pfind",
    about = "Search directories in parallel for matching entries."
)]
struct Opt {
    /// Directory to start the search from
    root_dir: PathBuf,

    /// Substring to look for in entry paths (no wildcards)
    pattern: String,

    /// Number of worker threads
    #[structopt(
        short = "t",
        long = "threads",
        default_value = "2",
        parse(try_from_str = parse_thread_count)
    )]
    threads: usize,

    /// Match only files (f) or only directories (d)
    #[structopt(short = "T", long = "type")]
    type_filter: Option<TypeFilter>,
}

fn parse_thread_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err("thread count must be at least 1".to_string()),
        Err(_) => Err(format!("'{}' is not a valid thread count", s)),
    }
}
