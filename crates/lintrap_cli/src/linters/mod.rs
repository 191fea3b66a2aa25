//! Linters bundled with the `lintrap` executable.

mod line_length;
mod no_todo;
mod trailing_whitespace;

use lintrap_core::{LinterDescriptor, LintrapError};

use line_length::LineLength;
use no_todo::NoTodo;
use trailing_whitespace::TrailingWhitespace;

/// Descriptors of every bundled linter.
pub fn descriptors() -> Result<Vec<LinterDescriptor>, LintrapError> {
    Ok(vec![
        LineLength::descriptor()?,
        NoTodo::descriptor()?,
        TrailingWhitespace::descriptor()?,
    ])
}

/// 1-based column of the character starting at byte `offset` of `line`.
fn column_at(line: &str, offset: usize) -> u32 {
    line[..offset].chars().count() as u32 + 1
}
