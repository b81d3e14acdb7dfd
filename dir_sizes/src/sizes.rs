use thiserror::Error;
use tracing::debug;

use crate::tree::{FileTree, Node, NodeId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Size of {path} does not fit in 64 bits")]
pub struct SizeOverflow {
    pub path: String,
}

impl FileTree {
    /// Stores the cumulative size on every directory and returns the root's.
    ///
    /// Directories that were replaced in their parent by a later entry of
    /// the same name are still listed in [`FileTree::dirs`], so they get
    /// sized as well, each as the root of its own subtree.
    pub fn compute_sizes(&mut self) -> Result<u64, SizeOverflow> {
        let total = self.size_subtree(self.root())?;

        for id in self.dirs.clone() {
            if self.dir(id).map_or(false, |d| d.size().is_none()) {
                let detached = self.size_subtree(id)?;
                debug!("Sized detached directory {} at {detached}", self.path(id));
            }
        }

        debug!("Total used space {total}");
        Ok(total)
    }

    // A child is always created after its parent, so walking the subtree's
    // directories from the highest id down sizes every child first.
    fn size_subtree(&mut self, start: NodeId) -> Result<u64, SizeOverflow> {
        let mut pending = vec![start];
        let mut subtree = vec![];
        while let Some(id) = pending.pop() {
            if let Some(dir) = self.dir(id) {
                pending.extend(dir.children().map(|(_, child)| child));
                subtree.push(id);
            }
        }
        subtree.sort_unstable_by(|l, r| r.cmp(l));

        let mut total = 0;
        for id in subtree {
            total = self
                .dir(id)
                .into_iter()
                .flat_map(|d| d.children())
                .try_fold(0u64, |acc, (_, child)| {
                    acc.checked_add(self.node(child).size().unwrap_or(0))
                })
                .ok_or_else(|| SizeOverflow {
                    path: self.path(id),
                })?;
            self.set_size(id, total);
        }

        Ok(total)
    }

    /// Sum of every file reachable below `id`, ignoring stored sizes.
    pub fn subtree_file_total(&self, id: NodeId) -> u64 {
        let mut stack = vec![id];
        let mut total: u64 = 0;
        while let Some(n) = stack.pop() {
            match self.node(n) {
                Node::File(f) => total = total.saturating_add(f.size()),
                Node::Dir(d) => stack.extend(d.children().map(|(_, child)| child)),
            }
        }
        total
    }

    pub fn used_space(&self) -> Option<u64> {
        self.dir(self.root()).and_then(|d| d.size())
    }
}

#[cfg(test)]
mod tests {
    use crate::transcript::parse_transcript;

    use super::*;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    fn example() -> FileTree {
        parse_transcript(TEST_INPUT.lines()).unwrap()
    }

    fn size_of(tree: &FileTree, path: &str) -> Option<u64> {
        tree.dirs()
            .find(|d| tree.path(*d) == path)
            .and_then(|d| tree.dir(d))
            .and_then(|d| d.size())
    }

    #[test]
    fn unset_before_aggregation() {
        let tree = example();
        assert!(tree.dirs().all(|d| tree.dir(d).unwrap().size().is_none()));
        assert_eq!(tree.used_space(), None);
    }

    #[test]
    fn example_sizes() {
        let mut tree = example();
        assert_eq!(tree.compute_sizes().unwrap(), 48381165);
        assert_eq!(size_of(&tree, "/a/e"), Some(584));
        assert_eq!(size_of(&tree, "/a"), Some(94853));
        assert_eq!(size_of(&tree, "/d"), Some(24933642));
        assert_eq!(size_of(&tree, "/"), Some(48381165));
        assert_eq!(tree.used_space(), Some(48381165));
    }

    #[test]
    fn root_holds_every_file() {
        let mut tree = example();
        let total = tree.compute_sizes().unwrap();
        let all_files: u64 = TEST_INPUT
            .lines()
            .filter_map(|l| l.split(' ').next()?.parse::<u64>().ok())
            .sum();
        assert_eq!(total, all_files);
    }

    #[test]
    fn stored_sizes_match_brute_force() {
        let mut tree = example();
        tree.compute_sizes().unwrap();
        for d in tree.dirs() {
            assert_eq!(
                tree.dir(d).unwrap().size(),
                Some(tree.subtree_file_total(d)),
                "{}",
                tree.path(d)
            );
        }
    }

    #[test]
    fn rerun_is_idempotent() {
        let mut tree = example();
        let first_total = tree.compute_sizes().unwrap();
        let first = tree
            .dirs()
            .map(|d| tree.dir(d).unwrap().size())
            .collect::<Vec<_>>();
        assert_eq!(tree.compute_sizes().unwrap(), first_total);
        let second = tree
            .dirs()
            .map(|d| tree.dir(d).unwrap().size())
            .collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_dirs_are_zero() {
        let mut tree = parse_transcript(["$ cd /", "dir a", "dir b"]).unwrap();
        assert_eq!(tree.compute_sizes().unwrap(), 0);
        assert!(tree.dirs().all(|d| tree.dir(d).unwrap().size() == Some(0)));
    }

    #[test]
    fn replaced_dir_is_still_sized() {
        let mut tree = parse_transcript([
            "$ cd /", "dir a", "$ cd a", "5 f", "$ cd /", "dir a", "$ cd a", "7 g",
        ])
        .unwrap();
        assert_eq!(tree.compute_sizes().unwrap(), 7);
        let sizes = tree
            .dirs()
            .map(|d| tree.dir(d).unwrap().size())
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![Some(7), Some(5), Some(7)]);
    }

    #[test]
    fn deep_nesting() {
        let depth = 20000;
        let mut input = vec!["$ cd /".to_string()];
        for _ in 0..depth {
            input.push("dir x".to_string());
            input.push("$ cd x".to_string());
        }
        input.push("5 f".to_string());

        let mut tree = parse_transcript(input).unwrap();
        assert_eq!(tree.compute_sizes(), Ok(5));
        assert_eq!(tree.dirs().count(), depth + 1);
        assert!(tree.dirs().all(|d| tree.dir(d).unwrap().size() == Some(5)));
    }

    #[test]
    fn overflowing_total() {
        let max = u64::MAX.to_string();
        let mut tree = parse_transcript([
            "$ cd /".to_string(),
            "dir a".to_string(),
            "$ cd a".to_string(),
            format!("{max} f"),
            format!("{max} g"),
        ])
        .unwrap();
        assert_eq!(
            tree.compute_sizes(),
            Err(SizeOverflow {
                path: "/a".to_string()
            })
        );
    }

    #[test]
    fn largest_size_fits() {
        let max = u64::MAX.to_string();
        let mut tree = parse_transcript(["$ cd /".to_string(), format!("{max} f")]).unwrap();
        assert_eq!(tree.compute_sizes(), Ok(u64::MAX));
    }
}
