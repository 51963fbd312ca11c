//! Message indexing: containers and reference links.
//!
//! Builds one container per observed Message-ID — the messages themselves
//! plus every id seen inside a References header — and links containers
//! along each reference chain. A message's last reference always wins as
//! its definitive parent; links that would close a cycle are dropped and
//! reported.

use std::collections::HashMap;

use crate::container::{NodeId, ThreadTree};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::message::Message;

/// Index `messages` into `tree`, returning the id table.
///
/// The table maps every observed Message-ID to its container. Container
/// creation order (the arena order) follows first observation, which is
/// what later fixes the order of the root set; callers only need the
/// returned table for its size and may discard it.
pub(super) fn index_messages<T>(
    tree: &mut ThreadTree<T>,
    messages: Vec<Message<T>>,
    diagnostics: &mut impl DiagnosticSink,
) -> HashMap<String, NodeId> {
    let mut table: HashMap<String, NodeId> = HashMap::new();
    let mut clash_seq = 0usize;

    for mut message in messages {
        log::trace!(
            "indexing {} / references {:?}",
            message.id(),
            message.references()
        );

        let id = message.id().to_string();

        // slot the message, creating or filling its container
        let node = match table.get(&id).copied() {
            Some(existing) if tree.message(existing).is_none() => {
                tree.set_message(existing, message);
                existing
            }
            Some(_) => {
                // Message-ID clash: the earlier message keeps the id; this
                // one becomes a reply to it, keyed under a synthetic id.
                let mut references = message.references().to_vec();
                references.push(id.clone());
                message.set_references(references);

                let synthetic_id = loop {
                    clash_seq += 1;
                    let candidate = format!("{id}#dup{clash_seq}");
                    if !table.contains_key(&candidate) {
                        break candidate;
                    }
                };
                diagnostics.report(Diagnostic::IdClash {
                    id,
                    synthetic_id: synthetic_id.clone(),
                });

                let node = tree.new_message_node(message);
                table.insert(synthetic_id, node);
                node
            }
            None => {
                let node = tree.new_message_node(message);
                table.insert(id.clone(), node);
                node
            }
        };

        let references: Vec<String> = tree
            .message(node)
            .map(|m| m.references().to_vec())
            .unwrap_or_default();

        // link the reference chain in order, oldest first
        let mut previous: Option<(NodeId, &String)> = None;
        for reference in &references {
            let ref_node = match table.get(reference).copied() {
                Some(existing) => existing,
                None => {
                    let phantom = tree.new_phantom();
                    table.insert(reference.clone(), phantom);
                    phantom
                }
            };

            if let Some((prev, prev_id)) = previous {
                if prev == ref_node {
                    // adjacent duplicate reference, nothing to link
                } else if tree.reachable(prev, ref_node) {
                    diagnostics.report(Diagnostic::CircularReference {
                        parent: prev_id.clone(),
                        child: reference.clone(),
                    });
                } else if !tree.reachable(ref_node, prev) {
                    tree.add_child(prev, ref_node);
                }
                // a node already under `prev` keeps its existing link
            }
            previous = Some((ref_node, reference));
        }

        // the last reference is the definitive parent, overriding anything
        // inferred from other messages' chains
        if let Some((prev, prev_id)) = previous {
            if tree.reachable(prev, node) {
                let child = tree
                    .message(node)
                    .map(|m| m.id().to_string())
                    .unwrap_or_default();
                diagnostics.report(Diagnostic::CircularReference {
                    parent: prev_id.clone(),
                    child,
                });
            } else {
                tree.add_child(prev, node);
            }
        }
    }

    table
}
