//! Error chain formatting.

use std::error::Error;
use std::fmt::Write;

/// Separator for multi-line reports (error page, server log).
pub const CAUSED_BY: &str = "\n  caused by: ";

/// `err` followed by each of its sources, joined by `separator`.
pub fn error_chain(err: &dyn Error, separator: &str) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(message, "{separator}{cause}");
        source = cause.source();
    }
    message
}
