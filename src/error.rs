use std::io;

/// Conditions that end a scan early.
///
/// Failing to read a single region is not one of them; that is reported and skipped by the
/// scanner.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    /// Holds the pid as given, which may not fit the platform's pid type.
    #[error("The PID value of {0} is incorrect, exiting.")]
    ProcessNotFound(i64),

    #[error("malformed memory map line {line_no}: {line:?}")]
    MalformedLine { line_no: usize, line: String },

    #[error("failed to read memory map: {0}")]
    Descriptor(#[source] io::Error),

    #[error("failed to write scan report: {0}")]
    Output(#[source] io::Error),
}
