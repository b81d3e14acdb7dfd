use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    combinator::{map, value},
    sequence::{preceded, separated_pair},
    IResult,
};
use nom_supreme::error::ErrorTree;
use thiserror::Error;
use tracing::debug;
use util::{parse_nice, parse_unsigned, BadInput, Span};

use crate::tree::{FileTree, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Root,
    Parent,
    Child(String),
}

/// One line of a shell transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Cd(Target),
    Ls,
    Dir(String),
    File { name: String, size: u64 },
}

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Unrecognized transcript line {line}:\n{}", .source.render())]
    Parse {
        line: usize,
        #[source]
        source: BadInput,
    },

    #[error("Line {line}: unable to cd into {target:?}, no such directory in {cwd}")]
    UnknownDirectory {
        line: usize,
        target: String,
        cwd: String,
    },
}

type ParseResult<'a, T> = IResult<Span<'a>, T, ErrorTree<Span<'a>>>;

fn parse_name(i: Span) -> ParseResult<String> {
    map(take_till1(|c: char| c.is_whitespace()), |s: Span| {
        s.fragment().to_string()
    })(i)
}

fn parse_target(i: Span) -> ParseResult<Target> {
    map(parse_name, |name| match name.as_str() {
        ".." => Target::Parent,
        "/" => Target::Root,
        _ => Target::Child(name),
    })(i)
}

fn parse_cd(i: Span) -> ParseResult<Line> {
    map(preceded(tag("$ cd "), parse_target), Line::Cd)(i)
}

fn parse_ls(i: Span) -> ParseResult<Line> {
    value(Line::Ls, tag("$ ls"))(i)
}

fn parse_dir(i: Span) -> ParseResult<Line> {
    map(preceded(tag("dir "), parse_name), Line::Dir)(i)
}

fn parse_file(i: Span) -> ParseResult<Line> {
    map(
        separated_pair(parse_unsigned, tag(" "), parse_name),
        |(size, name)| Line::File { name, size },
    )(i)
}

fn parse_line(i: Span) -> ParseResult<Line> {
    alt((parse_cd, parse_ls, parse_dir, parse_file))(i)
}

impl Line {
    pub fn parse(l: &str) -> Result<Self, BadInput> {
        parse_nice(l, parse_line)
    }
}

fn apply(
    tree: &mut FileTree,
    cwd: NodeId,
    line: Line,
    line_no: usize,
) -> Result<NodeId, TranscriptError> {
    let next = match line {
        Line::Ls => cwd,
        Line::Cd(Target::Root) => tree.root(),
        Line::Cd(Target::Parent) => tree.parent(cwd).unwrap_or(cwd),
        Line::Cd(Target::Child(name)) => match tree.child_dir(cwd, &name) {
            Some(child) => child,
            None => {
                return Err(TranscriptError::UnknownDirectory {
                    line: line_no,
                    target: name,
                    cwd: tree.path(cwd),
                })
            }
        },
        Line::Dir(name) => {
            tree.add_dir(cwd, &name);
            cwd
        }
        Line::File { name, size } => {
            tree.add_file(cwd, &name, size);
            cwd
        }
    };

    if next != cwd {
        debug!("cd {}", tree.path(next));
    }

    Ok(next)
}

/// Rebuilds the directory tree described by a transcript.
///
/// Blank lines are skipped. The first malformed line, or the first `cd` into
/// a directory that was never listed in the current directory, aborts the
/// whole build.
pub fn parse_transcript<I, S>(input: I) -> Result<FileTree, TranscriptError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tree = FileTree::new();
    let mut cwd = tree.root();

    for (i, l) in input.into_iter().enumerate() {
        let l = l.as_ref().trim_end();
        if l.is_empty() {
            continue;
        }

        let line = Line::parse(l).map_err(|source| TranscriptError::Parse {
            line: i + 1,
            source: source.at_line(i + 1),
        })?;
        cwd = apply(&mut tree, cwd, line, i + 1)?;
    }

    Ok(tree)
}
