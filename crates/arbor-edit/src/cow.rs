//! Copy-on-write container replacement.
//!
//! An edit replaces exactly one container. Every folder on the path from the
//! root to that container is copied with its children vector rebuilt; all
//! other `Arc`s are reused as-is.

use std::sync::Arc;

use arbor_types::{HierarchicalIndex, Node, Tree};

use crate::error::{EditError, EditResult};
use crate::resolve::Container;

/// Replace the container reached by `path` (offsets of the owning folders;
/// empty for the root sequence) with the sequence returned by `edit`.
///
/// `index` is only used for error reporting.
pub(crate) fn rebuild<T, F>(
    tree: &Tree,
    path: &[usize],
    index: &HierarchicalIndex,
    edit: F,
) -> EditResult<(Tree, T)>
where
    F: FnOnce(Container<'_>) -> EditResult<(Vec<Arc<Node>>, T)>,
{
    let (roots, out) = rebuild_sequence(tree.roots(), None, path, 0, index, edit)?;
    Ok((Tree::from_shared(roots), out))
}

fn rebuild_sequence<T, F>(
    items: &[Arc<Node>],
    owner: Option<&Arc<Node>>,
    path: &[usize],
    depth: usize,
    index: &HierarchicalIndex,
    edit: F,
) -> EditResult<(Vec<Arc<Node>>, T)>
where
    F: FnOnce(Container<'_>) -> EditResult<(Vec<Arc<Node>>, T)>,
{
    let Some((&offset, rest)) = path.split_first() else {
        return edit(Container { owner, items });
    };

    let not_found = || EditError::PathNotFound {
        index: index.clone(),
        depth,
    };
    let node = items.get(offset).ok_or_else(not_found)?;
    let children = node.children().ok_or_else(not_found)?;

    let (children, out) = rebuild_sequence(children, Some(node), rest, depth + 1, index, edit)?;
    let folder = node.with_children(children).ok_or_else(not_found)?;

    let mut rebuilt = items.to_vec();
    rebuilt[offset] = Arc::new(folder);
    Ok((rebuilt, out))
}
