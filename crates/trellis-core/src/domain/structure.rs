//! In-memory project tree.
//!
//! A [`Structure`] is an ordered mapping from path segment to [`Node`]; a node
//! is either a file leaf (possibly without content yet) or a nested
//! structure. The tree has no knowledge of the filesystem: it is materialized
//! on disk by the `create_structure` action once the whole pipeline ran.
//!
//! All editing operations consume the tree and hand back the edited value, so
//! an action can never observe a half-applied edit made by someone else.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::domain::error::DomainError;

// ── TreePath ────────────────────────────────────────────────────────────────

/// A `/`-separated, case-sensitive path inside a [`Structure`].
///
/// Invariant: at least one segment, no empty, `.` or `..` segments, never
/// absolute. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreePath(Vec<String>);

impl TreePath {
    /// Validate and split `path`. Paths assembled at runtime (from options,
    /// user input) must come through here or `parse`.
    pub fn try_new(path: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.starts_with('/') || path.starts_with('\\') {
            return Err(invalid("absolute paths are not allowed"));
        }

        let segments: Vec<String> = path.split('/').map(str::to_string).collect();
        for segment in &segments {
            match segment.as_str() {
                "" => return Err(invalid("empty path segment")),
                "." | ".." => return Err(invalid("relative segments are not allowed")),
                _ => {}
            }
        }

        Ok(Self(segments))
    }

    /// Append one or more segments (`"a/b"` is accepted).
    pub fn join(&self, tail: &str) -> Result<Self, DomainError> {
        let tail = Self::try_new(tail)?;
        let mut segments = self.0.clone();
        segments.extend(tail.0);
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment (the file or directory name).
    pub fn file_name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Convert into a platform path relative to the project root.
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.iter().collect()
    }

    fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

/// Path literals written in source.
///
/// # Panics
/// Panics if the literal is not a valid tree path. Only `'static` strings
/// convert this way, so a path built from runtime data cannot reach the
/// panic; use [`TreePath::try_new`] or `str::parse` for those.
impl From<&'static str> for TreePath {
    fn from(s: &'static str) -> Self {
        match Self::try_new(s) {
            Ok(p) => p,
            Err(e) => panic!("invalid tree path literal: {e}"),
        }
    }
}

impl FromStr for TreePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl TryFrom<String> for TreePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(&s)
    }
}

impl From<&TreePath> for TreePath {
    fn from(p: &TreePath) -> Self {
        p.clone()
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

// ── File leaves ─────────────────────────────────────────────────────────────

/// How a file leaf is materialized on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileOp {
    /// Always write the file.
    #[default]
    Create,
    /// Write only if the file does not exist yet.
    NoOverwrite,
    /// Write on project creation, leave untouched when updating.
    SkipOnUpdate,
    /// Delete the file if it exists, never write it.
    Remove,
}

impl FileOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::NoOverwrite => "no_overwrite",
            Self::SkipOnUpdate => "skip_on_update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a file leaf together with its materialization modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    text: String,
    op: FileOp,
}

impl FileContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            op: FileOp::Create,
        }
    }

    pub fn with_op(mut self, op: FileOp) -> Self {
        self.op = op;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn op(&self) -> FileOp {
        self.op
    }
}

// ── Nodes ───────────────────────────────────────────────────────────────────

/// A node of the project tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A file. `None` marks a file whose content is not known yet.
    File(Option<FileContent>),
    /// A directory.
    Dir(Structure),
}

impl Node {
    pub fn file(text: impl Into<String>) -> Self {
        Self::File(Some(FileContent::new(text)))
    }

    pub fn file_with(text: impl Into<String>, op: FileOp) -> Self {
        Self::File(Some(FileContent::new(text).with_op(op)))
    }

    pub fn empty_file() -> Self {
        Self::File(None)
    }

    pub fn dir(structure: Structure) -> Self {
        Self::Dir(structure)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    pub fn as_file(&self) -> Option<&FileContent> {
        match self {
            Self::File(content) => content.as_ref(),
            Self::Dir(_) => None,
        }
    }
}

// ── Structure ───────────────────────────────────────────────────────────────

/// Ordered project tree.
///
/// Equality is by value: two trees holding the same entries compare equal
/// regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    entries: IndexMap<String, Node>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `node` at `path`, creating intermediate directories.
    ///
    /// Whatever existed at that exact path (file or subtree) is replaced. A
    /// file standing where an intermediate directory is needed is replaced by
    /// a directory.
    pub fn merge(mut self, path: impl Into<TreePath>, node: Node) -> Self {
        let path = path.into();
        merge_into(&mut self.entries, path.segments(), node);
        self
    }

    /// Remove the node at `path`. Absent paths leave the tree untouched.
    pub fn reject(mut self, path: impl Into<TreePath>) -> Self {
        let path = path.into();
        reject_from(&mut self.entries, path.segments());
        self
    }

    /// Merge only when nothing exists at `path` yet.
    pub fn ensure(self, path: impl Into<TreePath>, node: Node) -> Self {
        let path = path.into();
        if self.contains(&path) {
            self
        } else {
            self.merge(path, node)
        }
    }

    /// Apply `f` to the file leaf at `path`, if there is one.
    pub fn modify<F>(mut self, path: impl Into<TreePath>, f: F) -> Self
    where
        F: FnOnce(Option<FileContent>) -> Option<FileContent>,
    {
        let path = path.into();
        if let Some(Node::File(content)) = get_mut(&mut self.entries, path.segments()) {
            *content = f(content.take());
        }
        self
    }

    /// Merge every entry of `other` into this tree, descending into
    /// directories present on both sides. `other` wins on conflicts.
    pub fn merge_tree(mut self, other: Structure) -> Self {
        merge_entries(&mut self.entries, other.entries);
        self
    }

    /// Convenience wrapper around [`Structure::merge`] for text files.
    pub fn with_file(self, path: impl Into<TreePath>, text: impl Into<String>) -> Self {
        self.merge(path, Node::file(text))
    }

    pub fn get(&self, path: impl Into<TreePath>) -> Option<&Node> {
        let path = path.into();
        let (last, parents) = path.segments().split_last()?;
        let mut entries = &self.entries;
        for segment in parents {
            match entries.get(segment) {
                Some(Node::Dir(sub)) => entries = &sub.entries,
                _ => return None,
            }
        }
        entries.get(last)
    }

    pub fn contains(&self, path: impl Into<TreePath>) -> bool {
        self.get(path).is_some()
    }

    /// All file leaves, depth first, in insertion order.
    pub fn files(&self) -> Vec<(TreePath, Option<&FileContent>)> {
        let mut out = Vec::new();
        collect_files(&self.entries, &mut Vec::new(), &mut out);
        out
    }

    /// Top-level entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn merge_into(entries: &mut IndexMap<String, Node>, segments: &[String], node: Node) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        entries.insert(first.clone(), node);
        return;
    }

    let child = entries
        .entry(first.clone())
        .or_insert_with(|| Node::Dir(Structure::new()));
    if !child.is_dir() {
        *child = Node::Dir(Structure::new());
    }
    if let Node::Dir(sub) = child {
        merge_into(&mut sub.entries, rest, node);
    }
}

fn merge_entries(into: &mut IndexMap<String, Node>, from: IndexMap<String, Node>) {
    for (key, node) in from {
        match node {
            Node::Dir(sub) => match into.get_mut(&key) {
                Some(Node::Dir(existing)) => merge_entries(&mut existing.entries, sub.entries),
                _ => {
                    into.insert(key, Node::Dir(sub));
                }
            },
            leaf => {
                into.insert(key, leaf);
            }
        }
    }
}

fn reject_from(entries: &mut IndexMap<String, Node>, segments: &[String]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        entries.shift_remove(first);
    } else if let Some(Node::Dir(sub)) = entries.get_mut(first) {
        reject_from(&mut sub.entries, rest);
    }
}

fn get_mut<'a>(entries: &'a mut IndexMap<String, Node>, segments: &[String]) -> Option<&'a mut Node> {
    let (first, rest) = segments.split_first()?;
    let node = entries.get_mut(first)?;
    if rest.is_empty() {
        return Some(node);
    }
    match node {
        Node::Dir(sub) => get_mut(&mut sub.entries, rest),
        Node::File(_) => None,
    }
}

fn collect_files<'a>(
    entries: &'a IndexMap<String, Node>,
    prefix: &mut Vec<String>,
    out: &mut Vec<(TreePath, Option<&'a FileContent>)>,
) {
    for (name, node) in entries {
        prefix.push(name.clone());
        match node {
            Node::File(content) => {
                out.push((TreePath::from_segments(prefix.clone()), content.as_ref()))
            }
            Node::Dir(sub) => collect_files(&sub.entries, prefix, out),
        }
        prefix.pop();
    }
}
