//! Identifier allow-list. Table and column names cannot be bound as
//! statement parameters, so anything headed for identifier position must
//! pass this check first.

use regex::Regex;
use std::sync::OnceLock;

/// Accepted identifier shape: ASCII alphanumerics and underscore, nothing
/// else. Rejecting everything outside the allow-list covers quotes,
/// backslashes, semicolons, whitespace, and any other escape vector without
/// enumerating them.
const IDENT_PATTERN: &str = "^[A-Za-z0-9_]+$";

fn ident_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENT_PATTERN).ok()).as_ref()
}

/// Whether `identifier` may be interpolated into identifier position.
/// Empty strings fail; if the pattern were ever unavailable this fails
/// closed.
pub fn is_safe_identifier(identifier: &str) -> bool {
    ident_regex()
        .map(|re| re.is_match(identifier))
        .unwrap_or(false)
}

/// Backtick-quote an identifier that already passed the allow-list, so
/// reserved words still work as table or column names.
pub fn quoted(identifier: &str) -> String {
    format!("`{}`", identifier)
}
