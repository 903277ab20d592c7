//! Shared error types for block parsing.

/// Fatal parsing and configuration errors.
///
/// These abort the whole parse of a block; a [`RowBlock`](crate::RowBlock)
/// handed back alongside an error must be discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported format '{0}': only \"csv\" is supported")]
    UnsupportedFormat(String),

    #[error("delimiter must contain at least one character")]
    EmptyDelimiter,

    #[error("column {0} is declared as both a label column and the weight column")]
    WeightColumnIsLabel(usize),

    #[error(
        "delimiter '{delimiter}' not found in the line starting at byte {line_start}; \
         expected '{delimiter}' to separate fields"
    )]
    MissingDelimiter { delimiter: char, line_start: usize },

    #[error("row block consistency check failed: {0}")]
    Inconsistent(&'static str),
}
