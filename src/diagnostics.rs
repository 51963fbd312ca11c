//! Diagnostic channel for input anomalies.
//!
//! The engine never fails: malformed inputs are absorbed and the tree is
//! repaired in place. Anything worth telling the caller about goes
//! through an injected [`DiagnosticSink`], so embedders decide where the
//! reports end up. [`LogSink`] forwards them to the `log` facade and is
//! the default; diagnostics never change the produced tree.

use thiserror::Error;

/// A report about an anomaly the engine absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Two messages claimed the same Message-ID. The later one was
    /// rethreaded as a reply to the earlier under a synthetic id.
    #[error("message-id clash on {id}: duplicate rethreaded as {synthetic_id}")]
    IdClash { id: String, synthetic_id: String },

    /// A References chain implied a parent link that would have closed a
    /// cycle; the link was dropped.
    #[error("circular reference suppressed: {child} cannot hang under {parent}")]
    CircularReference { parent: String, child: String },
}

/// Receiver for engine diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Default sink: forwards diagnostics to the `log` facade.
///
/// Id clashes are a routine property of real mail corpora and log at
/// debug level; suppressed circular references indicate genuinely
/// malformed headers and log as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::IdClash { .. } => log::debug!("{}", diagnostic),
            Diagnostic::CircularReference { .. } => log::warn!("{}", diagnostic),
        }
    }
}

/// Sink that discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Collects diagnostics in order; convenient for tests and callers that
/// want to surface the reports themselves.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
