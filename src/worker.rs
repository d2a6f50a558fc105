use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::task_queue::{Task, TaskQueue};

/// Which entry classifications qualify for output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeFilter {
    Any,
    FilesOnly,
    DirsOnly,
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f" => Ok(TypeFilter::FilesOnly),
            "d" => Ok(TypeFilter::DirsOnly),
            other => Err(format!("invalid type '{}', expected 'f' or 'd'", other)),
        }
    }
}

impl TypeFilter {
    fn accepts(self, metadata: &fs::Metadata) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::FilesOnly => metadata.is_file(),
            TypeFilter::DirsOnly => metadata.is_dir(),
        }
    }
}

/// Everything the workers share: the matching configuration, the task queue,
/// and the sink that serializes printed matches. Generic over the sink so
/// tests can capture output in a buffer while `main` hands it stdout.
///
/// The output lock is independent of the queue lock and is never taken while
/// holding it.
pub struct SearchContext<W> {
    pub pattern: String,
    pub type_filter: TypeFilter,
    pub queue: TaskQueue,
    pub output: Mutex<W>,
}

/// Seeds the queue with the root directory and drives `threads` workers
/// until the pool collectively detects there is no more work.
pub fn run<W: Write + Send + 'static>(ctx: Arc<SearchContext<W>>, root: PathBuf, threads: usize) {
    ctx.queue.push(Task { path: root });

    let mut workers = Vec::with_capacity(threads);
    for _ in 0..threads {
        let ctx = ctx.clone();
        workers.push(thread::spawn(move || search_worker(ctx)));
    }
    for worker in workers.into_iter() {
        worker.join().expect("failed to join worker");
    }
}

pub fn search_worker<W: Write>(ctx: Arc<SearchContext<W>>) {
    while let Some(task) = ctx.queue.pop() {
        expand_directory(&ctx, &task.path);
        ctx.queue.complete();
    }
}

/// Scans one directory: prints entries that match the pattern and type
/// filter, and feeds every subdirectory back into the queue. A directory
/// that cannot be opened expands to nothing; an entry that cannot be
/// stat'ed is skipped without aborting the scan.
fn expand_directory<W: Write>(ctx: &SearchContext<W>, dir: &Path) {
    let dir_entries = match fs::read_dir(dir) {
        Err(_) => return,
        Ok(x) => x,
    };
    for dir_entry in dir_entries.filter_map(|dir_entry| dir_entry.ok()) {
        let path = dir_entry.path();
        // Deliberately does not follow symlinks: a link to a directory is
        // classified as "other" and never expanded.
        let metadata = match fs::symlink_metadata(&path) {
            Err(_) => continue,
            Ok(x) => x,
        };

        if path.to_string_lossy().contains(&ctx.pattern) && ctx.type_filter.accepts(&metadata) {
            let mut output = ctx.output.lock().unwrap();
            let _ = writeln!(output, "{}", path.display());
        }

        // Expansion is independent of matching: a non-matching directory is
        // still explored.
        if metadata.is_dir() {
            ctx.queue.push(Task { path });
        }
    }
}
