//! Threading pipeline.
//!
//! [`thread`] runs the four stages in order: index the messages into a
//! container arena, gather parentless containers into the root set,
//! optionally prune phantom containers, and merge root subtrees whose
//! normalized subjects coincide. [`Threader`] exposes the same pipeline
//! with a configurable diagnostic sink and subject normalizer.

mod indexer;
mod pruner;
mod subject_grouping;

use crate::container::{NodeId, ThreadTree};
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::message::Message;
use crate::subject::strip_reply_markers;

/// Subject normalizer: removes reply markers, returning the bare subject.
pub type SubjectNormalizer = fn(&str) -> String;

/// Configurable threading engine.
///
/// The plain [`thread`] function covers the common case; a `Threader` is
/// only needed to swap the diagnostic sink or the subject normalizer.
pub struct Threader<D: DiagnosticSink = LogSink> {
    diagnostics: D,
    normalizer: SubjectNormalizer,
}

impl Threader<LogSink> {
    /// Engine with log-backed diagnostics and the default reply-marker
    /// stripper.
    pub fn new() -> Self {
        Threader {
            diagnostics: LogSink,
            normalizer: strip_reply_markers,
        }
    }
}

impl Default for Threader<LogSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DiagnosticSink> Threader<D> {
    /// Engine reporting through the given sink.
    pub fn with_diagnostics(diagnostics: D) -> Self {
        Threader {
            diagnostics,
            normalizer: strip_reply_markers,
        }
    }

    /// Replace the subject normalizer used for root grouping.
    pub fn subject_normalizer(mut self, normalizer: SubjectNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Borrow the diagnostic sink, e.g. to read back collected reports.
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Thread a batch of messages into a conversation forest.
    ///
    /// Always returns a tree; anomalous inputs are absorbed and reported
    /// through the diagnostic sink. With `compact` set, phantom
    /// containers that add no structure are pruned away.
    pub fn thread<T>(&mut self, messages: Vec<Message<T>>, compact: bool) -> ThreadTree<T> {
        let mut tree = ThreadTree::new();
        if messages.is_empty() {
            return tree;
        }

        let initial = messages.len();
        let table = indexer::index_messages(&mut tree, messages, &mut self.diagnostics);
        let indexed = table.len();
        drop(table);

        collect_roots(&mut tree);
        log::debug!(
            "threading {} messages: {} containers, {} roots",
            initial,
            indexed,
            tree.children(tree.root()).len()
        );

        if compact {
            pruner::prune_phantoms(&mut tree);
            log::debug!(
                "after prune: {} containers, {} with a message",
                tree.count(true),
                tree.count(false)
            );
        }

        subject_grouping::group_roots_by_subject(&mut tree, self.normalizer);
        log::debug!(
            "after subject grouping: {} roots, {} messages",
            tree.children(tree.root()).len(),
            tree.count(false)
        );

        tree
    }
}

/// Thread a batch of messages with the default engine configuration.
///
/// An empty input yields a tree holding nothing but the virtual root.
pub fn thread<T>(messages: Vec<Message<T>>, compact: bool) -> ThreadTree<T> {
    Threader::new().thread(messages, compact)
}

/// Attach every parentless container to the virtual root, in first-seen
/// order.
fn collect_roots<T>(tree: &mut ThreadTree<T>) {
    let root = tree.root();
    let candidates: Vec<NodeId> = (0..tree.node_count())
        .map(NodeId)
        .filter(|&id| id != root && tree.parent(id).is_none())
        .collect();
    for candidate in candidates {
        tree.add_child(root, candidate);
    }
}
