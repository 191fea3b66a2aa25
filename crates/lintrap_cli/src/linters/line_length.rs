use lintrap_core::{
    BoxError, Linter, LinterDescriptor, LintrapError, OptionSpec, OptionType, ScanContext,
};

/// Reports lines longer than `max` characters.
pub struct LineLength {
    max: u64,
}

impl LineLength {
    pub fn descriptor() -> Result<LinterDescriptor, LintrapError> {
        LinterDescriptor::builder_for::<Self>()
            .description("Checks that lines do not exceed a maximum length.")
            .option(
                "max",
                OptionSpec::new(OptionType::Integer)
                    .default_value(80)
                    .description("Maximum number of characters per line"),
            )
            .build(|config| {
                Ok(Box::new(LineLength {
                    max: config.get_u64("max")?,
                }) as Box<dyn Linter>)
            })
    }
}

impl Linter for LineLength {
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        let document = ctx.document();
        for (index, line) in document.source_lines().iter().enumerate() {
            let length = line.chars().count() as u64;
            if length > self.max {
                ctx.report_at(
                    index as u32 + 1,
                    self.max as u32 + 1,
                    format!("Line is too long. [{}/{}]", length, self.max),
                );
            }
        }
        Ok(())
    }
}
