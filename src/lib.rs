//! JWZ message threading
//!
//! This crate implements the message threading algorithm described by
//! Jamie Zawinski at <https://www.jwz.org/doc/threading.html>: given a flat
//! batch of messages carrying a Message-ID, a References chain and a
//! subject line, it reconstructs the conversation forest under a synthetic
//! virtual root.
//!
//! ## Algorithm Overview
//!
//! 1. **Index**: create a container per observed Message-ID (including ids
//!    that only ever appear inside a References header) and link containers
//!    along each reference chain, dropping links that would close a cycle
//! 2. **Collect roots**: containers without a parent become the root set,
//!    attached under a fresh virtual root
//! 3. **Prune** (optional): remove phantom containers that add no
//!    structure, promoting their children
//! 4. **Group by subject**: merge root subtrees whose normalized subjects
//!    coincide, so conversations that lost their References headers still
//!    thread
//!
//! Threading is a pure batch transformation: no I/O, no global state, no
//! failure path. Malformed inputs are absorbed and reported through an
//! injectable [`DiagnosticSink`].
//!
//! ## Example
//!
//! ```rust
//! use jwz_threading::{thread, Message};
//!
//! let messages = vec![
//!     Message::new("<a@example.org>", Vec::<String>::new(), "Query", 1),
//!     Message::new("<b@example.org>", ["<a@example.org>"], "Re: Query", 2),
//! ];
//!
//! let tree = thread(messages, true);
//! let roots = tree.children(tree.root());
//! assert_eq!(roots.len(), 1);
//! assert_eq!(tree.message(roots[0]).unwrap().payload(), &1);
//! ```

pub mod container;
pub mod diagnostics;
pub mod message;
pub mod subject;
pub mod threader;

pub use container::{Container, NodeId, ThreadTree};
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, NullSink};
pub use message::Message;
pub use subject::{is_reply, strip_reply_markers};
pub use threader::{thread, SubjectNormalizer, Threader};
