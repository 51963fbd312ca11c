//! Phantom pruning.
//!
//! Compact threading removes phantom containers that add no structure:
//! childless phantoms disappear, and a phantom's children are promoted
//! into its place unless that would spill several subtrees into the root
//! set. The walk keeps its own frame stack and re-examines a position
//! after every mutation, so deep trees cannot exhaust the call stack and
//! nothing is skipped while the tree shifts underneath.

use crate::container::{NodeId, ThreadTree};

pub(super) fn prune_phantoms<T>(tree: &mut ThreadTree<T>) {
    let root = tree.root();
    // each frame: (node, index of the next child to examine)
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

    while let Some(frame) = stack.last_mut() {
        let (node, index) = *frame;
        let Some(child) = tree.children(node).get(index).copied() else {
            stack.pop();
            continue;
        };

        if tree.message(child).is_none() {
            let grandchildren = tree.children(child).len();
            if grandchildren == 0 {
                // childless phantom: drop it and re-examine this position
                tree.remove_child(child);
                continue;
            }
            if node != root || grandchildren == 1 {
                // promote the phantom's children into its place; multiple
                // children never get promoted into the root set
                let promoted = tree.take_children(child);
                tree.splice_child(child, promoted);
                continue;
            }
        }

        frame.1 = index + 1;
        stack.push((child, 0));
    }
}
