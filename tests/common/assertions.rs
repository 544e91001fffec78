//! Domain-specific assertion helpers for logtide harnesses.
//!
//! These wrap `pretty_assertions` and include the rendered texts in failure
//! messages, so a mismatch shows which line went wrong.

use logtide_core::{RenderedRecord, Severity};

/// Assert the severities of a record sequence, blank rows as `None`.
///
/// ```rust
/// assert_severities!(records, [Some(Severity::Error), None]);
/// ```
#[macro_export]
macro_rules! assert_severities {
    ($records:expr, [$($sev:expr),* $(,)?]) => {{
        let records: &[logtide_core::RenderedRecord] = &$records;
        let actual: Vec<Option<logtide_core::Severity>> =
            records.iter().map(|r| r.severity()).collect();
        let expected: Vec<Option<logtide_core::Severity>> = vec![$($sev),*];
        let texts: Vec<&str> = records.iter().map(|r| r.text()).collect();
        pretty_assertions::assert_eq!(actual, expected, "records: {:#?}", texts);
    }};
}

/// Assert the plain texts of a record sequence.
#[macro_export]
macro_rules! assert_texts {
    ($records:expr, [$($text:expr),* $(,)?]) => {{
        let records: &[logtide_core::RenderedRecord] = &$records;
        let actual: Vec<&str> = records.iter().map(|r| r.text()).collect();
        let expected: Vec<&str> = vec![$($text),*];
        pretty_assertions::assert_eq!(actual, expected);
    }};
}

/// Assert that `later` begins with every record of `earlier`, unchanged.
pub fn assert_prefix_preserved(earlier: &[RenderedRecord], later: &[RenderedRecord]) {
    assert!(
        later.len() >= earlier.len(),
        "output shrank from {} to {} records",
        earlier.len(),
        later.len()
    );
    pretty_assertions::assert_eq!(&later[..earlier.len()], earlier, "existing records changed");
}

/// Severities of every non-blank record.
pub fn severities(records: &[RenderedRecord]) -> Vec<Severity> {
    records.iter().filter_map(RenderedRecord::severity).collect()
}
