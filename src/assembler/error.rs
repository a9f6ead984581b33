//! Every way the front end can fail. All of these are fatal: the driver
//! logs the diagnostic and stops at the first one, so there is no
//! warning/error distinction and no multi-error aggregation.

use std::fmt;
use thiserror::Error;

/// A `(line:start-end)` column range pointing at the offending text.
///
/// Lines are 1-based, columns are 0-based byte offsets from the start of
/// the line.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SourceRange {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}:{}-{})", self.line, self.start, self.end)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum AsmError {
    /// The arena's backing buffer could not be reserved at all.
    #[error("unable to reserve {capacity} bytes for the arena")]
    AllocationFailure { capacity: usize },

    /// The arena has no room left for a requested allocation. There is no
    /// growth policy; the run stops here.
    #[error("arena out of memory: requested {requested} bytes with {remaining} remaining")]
    OutOfMemory { requested: usize, remaining: usize },

    /// A numeric literal contained a second decimal point. `text` holds
    /// what had been scanned before the offending point.
    #[error("too many decimal points in numeric literal '{text}' at {at}")]
    MalformedNumericLiteral { text: String, at: SourceRange },

    /// A `section` keyword was followed by something other than `data` or
    /// `code`.
    #[error("expected section identifier to be either 'data' or 'code', instead got '{text}' at {at}")]
    UnexpectedSectionIdentifier { text: String, at: SourceRange },

    /// A second `section data` or `section code` for a section that was
    /// already declared at `first`.
    #[error("a {section} section was already declared at {first}, remove the duplicate at {at}")]
    DuplicateSectionDeclaration {
        section: &'static str,
        first: SourceRange,
        at: SourceRange,
    },

    /// A memory constant declaration (`@name value`) had the wrong token
    /// kind in the name or value position. `constant` is the constant's
    /// name when the name had already been read, empty otherwise.
    #[error("expected {expected} after '@{constant}' but got {actual} '{text}' at {at}")]
    UnexpectedTokenAfterMemoryConstant {
        constant: String,
        expected: &'static str,
        actual: &'static str,
        text: String,
        at: SourceRange,
    },

    /// A rule needed a following token but the stream ended. `at` is the
    /// last token that was seen.
    #[error("unexpected end of token stream: expected {expected} after {at}")]
    UnexpectedEndOfStream {
        expected: &'static str,
        at: SourceRange,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_range_display() {
        let range = SourceRange { line: 3, start: 4, end: 9 };
        assert_eq!(format!("{}", range), "(3:4-9)");
    }

    #[test]
    fn test_error_display_carries_positions() {
        let err = AsmError::DuplicateSectionDeclaration {
            section: "data",
            first: SourceRange { line: 1, start: 9, end: 13 },
            at: SourceRange { line: 4, start: 9, end: 13 },
        };
        assert_eq!(
            format!("{}", err),
            "a data section was already declared at (1:9-13), remove the duplicate at (4:9-13)"
        );
    }
}
