//! Rebuilds a directory tree from a transcript of `cd` and `ls` commands and
//! answers questions about directory sizes.

use anyhow::Result;
use tracing::Level;

pub mod config;
pub mod query;
pub mod sizes;
pub mod transcript;
pub mod tree;

pub use config::DiskConfig;
pub use sizes::SizeOverflow;
pub use transcript::{parse_transcript, Line, Target, TranscriptError};
pub use tree::{Dir, File, FileTree, Node, NodeId};

/// Installs a compact stderr subscriber, verbose in debug builds only.
pub fn setup_tracing() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

fn sized_tree<I, S>(input: I) -> Result<FileTree>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tree = parse_transcript(input)?;
    tree.compute_sizes()?;
    Ok(tree)
}

pub fn sum_small_dirs<I, S>(input: I, threshold: u64) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tree = sized_tree(input)?;
    Ok(query::sum_below(&tree, threshold)?)
}

pub fn size_to_delete<I, S>(input: I, capacity: u64, required: u64) -> Result<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tree = sized_tree(input)?;
    let (_, size) = query::smallest_to_delete(&tree, capacity, required)?;
    Ok(size)
}
