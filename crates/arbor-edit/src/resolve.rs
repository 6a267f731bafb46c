//! Path resolution: hierarchical index → node, container, or siblings.
//!
//! Resolution executes the navigation plans produced by
//! [`HierarchicalIndex::items_path`] and [`HierarchicalIndex::folder_path`]
//! against a tree. Nothing here allocates beyond the plan itself.

use std::sync::Arc;

use arbor_types::{HierarchicalIndex, Node, NodeId, PathStep, Tree};

use crate::error::{EditError, EditResult};

/// An ordered sequence of siblings together with the folder that owns it.
#[derive(Clone, Copy, Debug)]
pub struct Container<'a> {
    /// Owning folder, or `None` for the root sequence.
    pub owner: Option<&'a Arc<Node>>,
    pub items: &'a [Arc<Node>],
}

impl<'a> Container<'a> {
    pub fn owner_id(&self) -> Option<NodeId> {
        self.owner.map(|node| node.id())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Cursor<'a> {
    Sequence(Container<'a>),
    Node(&'a Arc<Node>),
}

/// Run a navigation plan from the root sequence.
///
/// A missing offset on the final step is reported as `IndexOutOfRange`;
/// anywhere else, or when descending into a file, as `PathNotFound`.
fn follow<'a>(
    tree: &'a Tree,
    index: &HierarchicalIndex,
    plan: &[PathStep],
) -> EditResult<Cursor<'a>> {
    let mut cursor = Cursor::Sequence(Container {
        owner: None,
        items: tree.roots(),
    });
    let mut depth = 0;

    for (position, step) in plan.iter().enumerate() {
        cursor = match (*step, cursor) {
            (PathStep::Offset(offset), Cursor::Sequence(container)) => {
                match container.items.get(offset) {
                    Some(node) => {
                        depth += 1;
                        Cursor::Node(node)
                    }
                    None if position + 1 == plan.len() => {
                        return Err(EditError::IndexOutOfRange {
                            index: index.clone(),
                            len: container.len(),
                        })
                    }
                    None => {
                        return Err(EditError::PathNotFound {
                            index: index.clone(),
                            depth,
                        })
                    }
                }
            }
            (PathStep::Children, Cursor::Node(node)) => match node.children() {
                Some(children) => Cursor::Sequence(Container {
                    owner: Some(node),
                    items: children,
                }),
                None => {
                    return Err(EditError::PathNotFound {
                        index: index.clone(),
                        depth: depth.saturating_sub(1),
                    })
                }
            },
            // Plans strictly alternate Offset / Children.
            _ => {
                return Err(EditError::PathNotFound {
                    index: index.clone(),
                    depth,
                })
            }
        };
    }

    Ok(cursor)
}

fn container_plan(index: &HierarchicalIndex) -> Vec<PathStep> {
    index.parent().map(|p| p.items_path()).unwrap_or_default()
}

/// The container holding the node at `index`: the root sequence at depth 1,
/// otherwise the children of the folder addressed by every offset but the
/// last. The final offset is not checked.
pub fn resolve_parent_container<'a>(
    index: &HierarchicalIndex,
    tree: &'a Tree,
) -> EditResult<Container<'a>> {
    match follow(tree, index, &container_plan(index))? {
        Cursor::Sequence(container) => Ok(container),
        Cursor::Node(_) => Err(EditError::PathNotFound {
            index: index.clone(),
            depth: index.depth() - 1,
        }),
    }
}

/// The node at `index`.
pub fn resolve_node<'a>(index: &HierarchicalIndex, tree: &'a Tree) -> EditResult<&'a Arc<Node>> {
    match follow(tree, index, &index.folder_path())? {
        Cursor::Node(node) => Ok(node),
        Cursor::Sequence(_) => Err(EditError::PathNotFound {
            index: index.clone(),
            depth: index.depth() - 1,
        }),
    }
}

/// The siblings of the node at `index`, including the node itself.
pub fn resolve_siblings<'a>(
    index: &HierarchicalIndex,
    tree: &'a Tree,
) -> EditResult<&'a [Arc<Node>]> {
    Ok(resolve_parent_container(index, tree)?.items)
}

/// The children container of the folder at `index`.
pub fn resolve_children<'a>(
    index: &HierarchicalIndex,
    tree: &'a Tree,
) -> EditResult<Container<'a>> {
    let node = resolve_node(index, tree)?;
    match node.children() {
        Some(items) => Ok(Container {
            owner: Some(node),
            items,
        }),
        None => Err(EditError::NotAFolder(index.clone())),
    }
}

/// Stable id of the folder owning the container of `index`, or `None` for
/// the root sequence.
pub fn resolve_parent_id(index: &HierarchicalIndex, tree: &Tree) -> EditResult<Option<NodeId>> {
    Ok(resolve_parent_container(index, tree)?.owner_id())
}

/// Current position of the node with stable id `id`, searching depth-first.
pub fn locate(tree: &Tree, id: NodeId) -> Option<HierarchicalIndex> {
    fn search(items: &[Arc<Node>], id: NodeId, path: &mut Vec<usize>) -> bool {
        for (offset, node) in items.iter().enumerate() {
            path.push(offset);
            if node.id() == id {
                return true;
            }
            if let Some(children) = node.children() {
                if search(children, id, path) {
                    return true;
                }
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    if search(tree.roots(), id, &mut path) {
        HierarchicalIndex::new(path)
    } else {
        None
    }
}
