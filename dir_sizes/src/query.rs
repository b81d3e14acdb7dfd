use thiserror::Error;
use tracing::info;

use crate::tree::{FileTree, NodeId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Directory sizes have not been computed")]
    SizesNotComputed,

    #[error("No directory is large enough to free {needed} bytes")]
    NoCandidate { needed: u64 },

    #[error("Sum of directory sizes does not fit in 64 bits")]
    SumOverflow,
}

fn listed_sizes(tree: &FileTree) -> Result<Vec<(NodeId, u64)>, QueryError> {
    tree.dirs()
        .map(|id| {
            tree.dir(id)
                .and_then(|d| d.size())
                .map(|size| (id, size))
                .ok_or(QueryError::SizesNotComputed)
        })
        .collect()
}

/// Sum of the sizes of all directories strictly smaller than `threshold`.
pub fn sum_below(tree: &FileTree, threshold: u64) -> Result<u64, QueryError> {
    listed_sizes(tree)?
        .into_iter()
        .filter(|&(_, size)| size < threshold)
        .try_fold(0u64, |acc, (_, size)| acc.checked_add(size))
        .ok_or(QueryError::SumOverflow)
}

/// Bytes that still have to be freed to have `required` bytes available.
pub fn space_needed(tree: &FileTree, capacity: u64, required: u64) -> Result<u64, QueryError> {
    let used = tree.used_space().ok_or(QueryError::SizesNotComputed)?;
    let free = capacity.saturating_sub(used);
    Ok(required.saturating_sub(free))
}

/// Smallest directory whose deletion frees enough space.
pub fn smallest_to_delete(
    tree: &FileTree,
    capacity: u64,
    required: u64,
) -> Result<(NodeId, u64), QueryError> {
    let needed = space_needed(tree, capacity, required)?;

    let (id, size) = listed_sizes(tree)?
        .into_iter()
        .filter(|&(_, size)| size >= needed)
        .min_by_key(|&(_, size)| size)
        .ok_or(QueryError::NoCandidate { needed })?;

    info!("Deleting {} frees {size} of {needed} needed bytes", tree.path(id));
    Ok((id, size))
}
