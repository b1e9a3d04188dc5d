/// Shared utility functions for the PSI compiler
use crate::utils::errors::{CodeGenError, CodeGenResult};

/// Helper function for writing formatted strings to a buffer
/// Used across IL emission
pub fn write_line(buf: &mut String, args: std::fmt::Arguments) -> CodeGenResult<()> {
    use std::fmt::Write;
    buf.write_fmt(args)
        .and_then(|_| buf.write_char('\n'))
        .map_err(|_| CodeGenError::Format)
}

/// Join items with ", " the way IL signatures list their parameters.
pub fn to_csv<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
