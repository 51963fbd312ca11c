//! Reply-marker handling for subject grouping.
//!
//! Subjects only participate in threading after their reply markers are
//! removed: `Re: building woes` and `building woes` belong to the same
//! conversation. The default normalizer strips the `Re:` family at the
//! head of a subject, including counted variants (`Re[4]:`) and stacked
//! chains (`Re: Re[4]: Re:`); everything else is left untouched.

use regex::Regex;
use std::sync::OnceLock;

/// Lazy-initialized regex matching the longest run of leading reply markers.
static REPLY_MARKERS: OnceLock<Regex> = OnceLock::new();

fn reply_markers() -> &'static Regex {
    REPLY_MARKERS.get_or_init(|| {
        Regex::new(r"(?i)^(?:re(?:\[\d+\])?\s*:\s*)+").expect("invalid reply marker regex")
    })
}

/// Remove every leading reply marker from a subject.
///
/// The input is trimmed first, so the returned subject never carries
/// surrounding whitespace.
///
/// ## Examples
///
/// ```rust
/// use jwz_threading::strip_reply_markers;
///
/// assert_eq!(strip_reply_markers("Re: lunch"), "lunch");
/// assert_eq!(strip_reply_markers("Re: RE[4]: Re: lunch"), "lunch");
/// assert_eq!(strip_reply_markers("lunch"), "lunch");
/// ```
pub fn strip_reply_markers(subject: &str) -> String {
    let trimmed = subject.trim();
    match reply_markers().find(trimmed) {
        Some(markers) => trimmed[markers.end()..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Whether a subject carries at least one reply marker.
///
/// Holds exactly when stripping markers strictly shortens the trimmed
/// subject.
pub fn is_reply(subject: &str) -> bool {
    strip_reply_markers(subject).len() < subject.trim().len()
}
