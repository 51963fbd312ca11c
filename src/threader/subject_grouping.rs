//! Subject grouping of the root set.
//!
//! Messages that lost (or never had) their References headers still
//! belong to a conversation; after reference threading, root subtrees
//! whose normalized subjects coincide are merged. Phase one picks one
//! representative container per subject, preferring phantoms and plain
//! subjects over reply-marked ones; phase two folds every other root
//! with the same subject into that representative. Running the grouping
//! again over its own output changes nothing.

use std::collections::HashMap;

use super::SubjectNormalizer;
use crate::container::{NodeId, ThreadTree};

pub(super) fn group_roots_by_subject<T>(tree: &mut ThreadTree<T>, normalizer: SubjectNormalizer) {
    let root = tree.root();
    let roots: Vec<NodeId> = tree.children(root).to_vec();

    // phase one: one representative per normalized subject
    let mut subject_table: HashMap<String, NodeId> = HashMap::new();
    for &candidate in &roots {
        let subject = normalized_subject(tree, candidate, normalizer);
        if subject.is_empty() {
            continue;
        }
        let Some(current) = subject_table.get(&subject).copied() else {
            subject_table.insert(subject, candidate);
            continue;
        };
        let candidate_is_phantom = tree.message(candidate).is_none();
        let current_is_phantom = tree.message(current).is_none();
        let prefer_candidate = if candidate_is_phantom && !current_is_phantom {
            // a phantom gathers others without asserting an order
            true
        } else {
            // prefer the plain subject over its reply-marked variant
            extract_subject(tree, current).len() > subject.len()
                && extract_subject(tree, candidate) == subject
        };
        if prefer_candidate {
            subject_table.insert(subject, candidate);
        }
    }

    // phase two: fold matching roots into their representative
    for current in roots {
        if tree.parent(current) != Some(root) {
            // already folded under a representative
            continue;
        }
        let subject = normalized_subject(tree, current, normalizer);
        if subject.is_empty() {
            continue;
        }
        let Some(other) = subject_table.get(&subject).copied() else {
            continue;
        };
        if other == current {
            continue;
        }

        let current_is_phantom = tree.message(current).is_none();
        let other_is_phantom = tree.message(other).is_none();

        if current_is_phantom && other_is_phantom {
            // two phantom groups: fold one into the other
            for child in tree.take_children(other) {
                tree.add_child(current, child);
            }
            tree.remove_child(other);
            subject_table.insert(subject, current);
        } else if current_is_phantom || other_is_phantom {
            // the real subtree slides under the phantom group
            if current_is_phantom {
                tree.add_child(current, other);
                subject_table.insert(subject, current);
            } else {
                tree.add_child(other, current);
            }
        } else {
            let current_is_reply = is_reply_subject(tree, current, normalizer);
            let other_is_reply = is_reply_subject(tree, other, normalizer);
            if !other_is_reply && current_is_reply {
                // the reply joins the original
                tree.add_child(other, current);
            } else if other_is_reply && !current_is_reply {
                // misordered: the original arrived second
                tree.add_child(current, other);
                subject_table.insert(subject, current);
            } else {
                // same standing: sibling them under a fresh phantom rather
                // than asserting an order that may not exist
                let group = tree.new_phantom();
                tree.splice_child(other, vec![group]);
                tree.add_child(group, other);
                tree.add_child(group, current);
                subject_table.insert(subject, group);
            }
        }
    }
}

/// Subject of a root subtree: the container's own message subject, or
/// the first subject found among its descendants.
fn extract_subject<T>(tree: &ThreadTree<T>, node: NodeId) -> String {
    match tree.message(node) {
        Some(message) => message.subject().to_string(),
        None => find_descendant_subject(tree, node),
    }
}

fn normalized_subject<T>(
    tree: &ThreadTree<T>,
    node: NodeId,
    normalizer: SubjectNormalizer,
) -> String {
    normalizer(&extract_subject(tree, node))
}

fn is_reply_subject<T>(tree: &ThreadTree<T>, node: NodeId, normalizer: SubjectNormalizer) -> bool {
    let subject = tree.message(node).map(|m| m.subject()).unwrap_or_default();
    normalizer(subject).len() < subject.trim().len()
}

/// Siblings-before-depth subject search: scan a node's children for a
/// message first, then descend child by child. Keeps an explicit work
/// stack; grouped trees can be arbitrarily deep.
fn find_descendant_subject<T>(tree: &ThreadTree<T>, node: NodeId) -> String {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        for &child in tree.children(current) {
            if let Some(message) = tree.message(child) {
                if !message.subject().is_empty() {
                    return message.subject().to_string();
                }
            }
        }
        for &child in tree.children(current).iter().rev() {
            stack.push(child);
        }
    }
    String::new()
}
