use std::{collections::HashMap, fmt, iter};

use itertools::Itertools;
use tracing::debug;

/// Index of a node in the [`FileTree`] arena that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Dir {
    name: String,
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
    size: Option<u64>,
}

impl Dir {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Cumulative size, `None` until [`FileTree::compute_sizes`] has run.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

#[derive(Debug, Clone)]
pub struct File {
    name: String,
    size: u64,
    parent: NodeId,
}

impl File {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Dir(Dir),
    File(File),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Dir(d) => d.name(),
            Node::File(f) => f.name(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Dir(d) => d.parent(),
            Node::File(f) => Some(f.parent()),
        }
    }

    pub fn size(&self) -> Option<u64> {
        match self {
            Node::Dir(d) => d.size(),
            Node::File(f) => Some(f.size()),
        }
    }

    pub fn as_dir(&self) -> Option<&Dir> {
        match self {
            Node::Dir(d) => Some(d),
            Node::File(_) => None,
        }
    }
}

/// Directory tree rebuilt from a transcript.
///
/// Nodes live in a single arena and refer to each other by [`NodeId`], so the
/// parent links never own anything. Besides the tree itself, every directory
/// ever created is remembered in creation order, root first, even when a
/// later entry of the same name replaced it in its parent.
#[derive(Debug, Clone)]
pub struct FileTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) dirs: Vec<NodeId>,
}

impl FileTree {
    pub fn new() -> Self {
        let root = Node::Dir(Dir {
            name: "/".to_string(),
            parent: None,
            children: HashMap::new(),
            size: None,
        });

        Self {
            nodes: vec![root],
            dirs: vec![NodeId(0)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn dir(&self, id: NodeId) -> Option<&Dir> {
        self.node(id).as_dir()
    }

    /// All directories in creation order, root first.
    pub fn dirs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dirs.iter().copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    pub fn child_dir(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.dir(id)?
            .child(name)
            .filter(|child| self.dir(*child).is_some())
    }

    pub fn add_dir(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.insert(
            parent,
            Node::Dir(Dir {
                name: name.to_string(),
                parent: Some(parent),
                children: HashMap::new(),
                size: None,
            }),
        );
        self.dirs.push(id);
        debug!("Created directory {}", self.path(id));
        id
    }

    pub fn add_file(&mut self, parent: NodeId, name: &str, size: u64) -> NodeId {
        let id = self.insert(
            parent,
            Node::File(File {
                name: name.to_string(),
                size,
                parent,
            }),
        );
        debug!("Created file {} ({size} bytes)", self.path(id));
        id
    }

    fn insert(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        let name = node.name().to_string();
        self.nodes.push(node);
        if let Node::Dir(dir) = &mut self.nodes[parent.0] {
            if let Some(replaced) = dir.children.insert(name, id) {
                debug!("Entry {replaced:?} replaced by {id:?}");
            }
        }
        id
    }

    /// Absolute path of a node, following parent links up to the root.
    pub fn path(&self, id: NodeId) -> String {
        let names = iter::successors(Some(id), |n| self.parent(*n))
            .filter(|n| self.parent(*n).is_some())
            .map(|n| self.node(n).name())
            .collect::<Vec<_>>();

        format!("/{}", names.iter().rev().join("/"))
    }

    pub(crate) fn set_size(&mut self, id: NodeId, size: u64) {
        if let Node::Dir(dir) = &mut self.nodes[id.0] {
            dir.size = Some(size);
        }
    }
}

impl fmt::Display for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.root(), 0)];
        while let Some((id, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.node(id) {
                Node::File(file) => writeln!(
                    f,
                    "{indent}- {} (file, size={})",
                    file.name(),
                    file.size()
                )?,
                Node::Dir(dir) => {
                    writeln!(f, "{indent}- {} (dir)", dir.name())?;
                    stack.extend(
                        dir.children()
                            .sorted_by(|l, r| r.0.cmp(l.0))
                            .map(|(_, child)| (child, depth + 1)),
                    );
                }
            }
        }
        Ok(())
    }
}
