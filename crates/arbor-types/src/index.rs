use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Delimiter used by the canonical string form of a [`HierarchicalIndex`].
pub const DEFAULT_DELIMITER: char = '_';

/// Position of a node in a tree, as a path of child offsets from the root.
///
/// The first segment is the offset within the root sequence; every following
/// segment is the offset within the children of the folder addressed by the
/// preceding segments. An index always has at least one segment.
///
/// The canonical string form joins the segments with [`DEFAULT_DELIMITER`],
/// so `[1, 0, 2]` is written `"1_0_2"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HierarchicalIndex(Vec<usize>);

/// One step of a navigation plan over a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Select the element at this offset of the current sequence.
    Offset(usize),
    /// Descend into the children of the currently selected folder.
    Children,
}

impl HierarchicalIndex {
    /// Build an index from raw segments. Returns `None` for an empty slice.
    pub fn new(segments: impl Into<Vec<usize>>) -> Option<Self> {
        let segments = segments.into();
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments))
        }
    }

    /// Index of the `offset`-th node of the root sequence.
    pub fn root(offset: usize) -> Self {
        Self(vec![offset])
    }

    /// Parse the canonical `_`-delimited form.
    pub fn parse(path: &str) -> Result<Self, TypeError> {
        Self::parse_with(path, DEFAULT_DELIMITER)
    }

    /// Parse a path joined with an arbitrary delimiter.
    ///
    /// Every segment must be a non-empty run of ASCII digits; signs,
    /// whitespace and structural markers such as `items` are rejected.
    pub fn parse_with(path: &str, delimiter: char) -> Result<Self, TypeError> {
        if path.is_empty() {
            return Err(TypeError::invalid_index(path, "empty path"));
        }
        if delimiter.is_ascii_digit() {
            return Err(TypeError::invalid_index(
                path,
                format!("delimiter {delimiter:?} is a digit"),
            ));
        }
        let segments = path
            .split(delimiter)
            .enumerate()
            .map(|(position, segment)| {
                if segment.is_empty() {
                    return Err(TypeError::invalid_index(
                        path,
                        format!("empty segment at position {position}"),
                    ));
                }
                if !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(TypeError::invalid_index(
                        path,
                        format!("non-numeric segment {segment:?} at position {position}"),
                    ));
                }
                segment.parse::<usize>().map_err(|e| {
                    TypeError::invalid_index(path, format!("segment {segment:?}: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(segments))
    }

    /// Join the segments with `delimiter`.
    pub fn format_with(&self, delimiter: char) -> String {
        let mut out = String::new();
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(delimiter);
            }
            out.push_str(&segment.to_string());
        }
        out
    }

    /// The raw offsets, outermost first.
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Number of segments (1 for a root node).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Offset of the node within its immediate container.
    pub fn last(&self) -> usize {
        // Non-empty by construction.
        self.0[self.0.len() - 1]
    }

    /// Offsets leading to the container: every segment except the last.
    pub fn container_path(&self) -> &[usize] {
        &self.0[..self.0.len() - 1]
    }

    /// Index of the enclosing folder, or `None` for a root node.
    pub fn parent(&self) -> Option<Self> {
        Self::new(self.container_path().to_vec())
    }

    /// Index of the `offset`-th child of the node at this index.
    pub fn child(&self, offset: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(offset);
        Self(segments)
    }

    /// The same container with a different final offset.
    pub fn with_last(&self, offset: usize) -> Self {
        let mut segments = self.0.clone();
        let last = segments.len() - 1;
        segments[last] = offset;
        Self(segments)
    }

    /// Returns `true` if both indices address the same container.
    pub fn is_sibling_of(&self, other: &Self) -> bool {
        self.container_path() == other.container_path()
    }

    /// Segment-wise prefix test: `true` if `prefix` addresses this node or
    /// one of its ancestors.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns `true` if this index lies inside the subtree rooted at
    /// `ancestor`, including `ancestor` itself.
    pub fn is_within(&self, ancestor: &Self) -> bool {
        self.starts_with(ancestor)
    }

    /// Navigation plan addressing the children container of the node:
    /// every offset is followed by [`PathStep::Children`].
    pub fn items_path(&self) -> Vec<PathStep> {
        self.0
            .iter()
            .flat_map(|&offset| [PathStep::Offset(offset), PathStep::Children])
            .collect()
    }

    /// Navigation plan addressing the node itself (for folder properties such
    /// as `expanded`): like [`items_path`](Self::items_path) without the
    /// trailing [`PathStep::Children`].
    pub fn folder_path(&self) -> Vec<PathStep> {
        let mut plan = self.items_path();
        plan.pop();
        plan
    }
}

impl fmt::Debug for HierarchicalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HierarchicalIndex({})", self)
    }
}

impl fmt::Display for HierarchicalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(DEFAULT_DELIMITER))
    }
}

impl FromStr for HierarchicalIndex {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HierarchicalIndex {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HierarchicalIndex> for String {
    fn from(index: HierarchicalIndex) -> Self {
        index.to_string()
    }
}
