//! End-to-end threading scenarios over the public API.

use jwz_threading::{thread, Diagnostic, Message, NodeId, ThreadTree, Threader};
use pretty_assertions::assert_eq;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn m(id: &str, refs: &[&str], subject: &str) -> Message<String> {
    Message::new(id, refs.iter().copied(), subject, id.to_string())
}

/// Locate the container holding the message with the given id.
fn find(tree: &ThreadTree<String>, id: &str) -> NodeId {
    tree.iter()
        .find(|&node| tree.message(node).is_some_and(|msg| msg.id() == id))
        .expect("message should be present in the tree")
}

fn child_ids(tree: &ThreadTree<String>, node: NodeId) -> Vec<String> {
    tree.children(node)
        .iter()
        .map(|&child| {
            tree.message(child)
                .map(|msg| msg.id().to_string())
                .unwrap_or_else(|| "*".to_string())
        })
        .collect()
}

#[test]
fn empty_input_yields_bare_virtual_root() {
    let tree = thread(Vec::<Message<()>>::new(), true);
    assert!(tree.children(tree.root()).is_empty());
    assert!(tree.message(tree.root()).is_none());
}

#[test]
fn simple_chain_threads_in_reference_order() {
    init_logs();
    let tree = thread(
        vec![
            m("a", &[], "Hi"),
            m("b", &["a"], "Re: Hi"),
            m("c", &["a", "b"], "Re: Hi"),
        ],
        true,
    );

    assert_eq!(child_ids(&tree, tree.root()), ["a"]);
    assert_eq!(child_ids(&tree, find(&tree, "a")), ["b"]);
    assert_eq!(child_ids(&tree, find(&tree, "b")), ["c"]);
}

#[test]
fn missing_middle_keeps_phantom_without_compaction() {
    let tree = thread(vec![m("a", &[], "X"), m("c", &["a", "b"], "Re: X")], false);

    let a = find(&tree, "a");
    assert_eq!(child_ids(&tree, tree.root()), ["a"]);
    assert_eq!(child_ids(&tree, a), ["*"]);
    let phantom = tree.children(a)[0];
    assert!(tree.message(phantom).is_none());
    assert_eq!(child_ids(&tree, phantom), ["c"]);
}

#[test]
fn missing_middle_collapses_with_compaction() {
    let tree = thread(vec![m("a", &[], "X"), m("c", &["a", "b"], "Re: X")], true);

    assert_eq!(child_ids(&tree, tree.root()), ["a"]);
    assert_eq!(child_ids(&tree, find(&tree, "a")), ["c"]);
}

#[test]
fn subject_merge_nests_reply_under_original() {
    let tree = thread(vec![m("a", &[], "Hello"), m("b", &[], "Re: Hello")], true);

    assert_eq!(child_ids(&tree, tree.root()), ["a"]);
    assert_eq!(child_ids(&tree, find(&tree, "a")), ["b"]);
}

#[test]
fn two_replies_merge_under_synthetic_parent() {
    let tree = thread(
        vec![m("a", &[], "Re: Hello"), m("b", &[], "Re: Hello")],
        true,
    );

    let roots = tree.children(tree.root());
    assert_eq!(roots.len(), 1);
    let group = roots[0];
    assert!(tree.message(group).is_none());
    assert_eq!(child_ids(&tree, group), ["a", "b"]);
}

#[test]
fn id_clash_rethreads_second_message_under_first() {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut threader = Threader::with_diagnostics(&mut diagnostics);
    let tree = threader.thread(
        vec![
            Message::new("x", Vec::<String>::new(), "First", "First"),
            Message::new("x", Vec::<String>::new(), "Second", "Second"),
        ],
        true,
    );

    let roots = tree.children(tree.root());
    assert_eq!(roots.len(), 1);
    let first = roots[0];
    assert_eq!(tree.message(first).unwrap().payload(), &"First".to_string());

    let children = tree.children(first);
    assert_eq!(children.len(), 1);
    let second = children[0];
    let second_msg = tree.message(second).unwrap();
    assert_eq!(second_msg.payload(), &"Second".to_string());
    assert_eq!(second_msg.references(), ["x"]);

    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::IdClash { .. })));
}

#[test]
fn mutual_references_cannot_cycle() {
    init_logs();
    let tree = thread(vec![m("a", &["b"], "A"), m("b", &["a"], "B")], true);

    // first-seen arrangement wins; the reverse link is suppressed
    assert_eq!(tree.count(false), 2);
    assert_eq!(child_ids(&tree, tree.root()), ["b"]);
    assert_eq!(child_ids(&tree, find(&tree, "b")), ["a"]);
    assert!(tree.children(find(&tree, "a")).is_empty());
}

#[test]
fn every_payload_survives_threading() {
    let tree = thread(
        vec![
            m("a", &[], "Hello"),
            m("b", &["a"], "Re: Hello"),
            m("c", &["missing"], "Other"),
            m("d", &[], "Re: Other"),
        ],
        true,
    );

    let mut payloads: Vec<String> = tree
        .iter()
        .filter_map(|node| tree.message(node).map(|msg| msg.payload().clone()))
        .collect();
    payloads.sort();
    assert_eq!(payloads, ["a", "b", "c", "d"]);
}
