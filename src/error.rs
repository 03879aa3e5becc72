//! Error types for the payroll layout codec.

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur while encoding, decoding or moving layout files.
///
/// Decode errors carry the 1-based line number and, where useful, the raw
/// text that failed so the caller can report it verbatim.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Encoder received data that cannot be represented in the layout
    #[error("Invalid input for {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    /// Input contained no lines at all
    #[error("Missing header: input is empty")]
    MissingHeader,

    /// First line does not have the header shape
    #[error("Malformed header at line {line}: {raw:?}")]
    MalformedHeader { line: usize, raw: String },

    /// Line matches neither the body nor the footer shape
    #[error("Malformed line {line}: {raw:?}")]
    MalformedLine { line: usize, raw: String },

    /// Header date is eight digits but not a calendar date
    #[error("Invalid date at line {line}: {raw:?}")]
    InvalidDate { line: usize, raw: String },

    /// Payment amount field is not a valid non-negative decimal
    #[error("Invalid amount at line {line}: {raw:?}")]
    InvalidAmount { line: usize, raw: String },

    /// Footer declares a different number of body lines than were read
    #[error("Footer at line {line} declares {declared} payments but {actual} were read")]
    FooterCountMismatch {
        line: usize,
        declared: u64,
        actual: usize,
    },

    /// Input ended before a footer line was seen
    #[error("Missing footer: input ended after line {line}")]
    MissingFooter { line: usize },

    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid record in a CSV record source
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Record source supplied no active employees
    #[error("No employees to pay")]
    NoEntries,

    /// Missing command line argument
    #[error("Missing argument. Usage: payroll-layout export <institution.csv> <employees.csv> | import <layout.txt>")]
    MissingArgument,

    /// Unrecognised subcommand
    #[error("Unknown command {0:?}. Expected `export` or `import`")]
    UnknownCommand(String),
}
