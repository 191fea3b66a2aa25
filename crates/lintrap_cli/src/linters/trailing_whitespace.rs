use lintrap_core::{BoxError, Linter, LinterDescriptor, LintrapError, ScanContext};

/// Reports lines ending in whitespace.
pub struct TrailingWhitespace;

impl TrailingWhitespace {
    pub fn descriptor() -> Result<LinterDescriptor, LintrapError> {
        LinterDescriptor::builder_for::<Self>()
            .description("Checks for whitespace at the end of lines.")
            .build(|_| Ok(Box::new(TrailingWhitespace) as Box<dyn Linter>))
    }
}

impl Linter for TrailingWhitespace {
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        let document = ctx.document();
        for (index, line) in document.source_lines().iter().enumerate() {
            let trimmed = line.trim_end();
            if trimmed.len() != line.len() {
                ctx.report_at(
                    index as u32 + 1,
                    super::column_at(line, trimmed.len()),
                    "Line contains trailing whitespace",
                );
            }
        }
        Ok(())
    }
}
