use lintrap_core::{
    BoxError, Linter, LinterDescriptor, LintrapError, OptionSpec, OptionType, ScanContext,
};

/// Reports leftover markers such as `TODO` and `FIXME`.
pub struct NoTodo {
    keywords: Vec<String>,
}

impl NoTodo {
    pub fn descriptor() -> Result<LinterDescriptor, LintrapError> {
        LinterDescriptor::builder_for::<Self>()
            .description("Checks for TODO-style markers left in the text.")
            .option(
                "keywords",
                OptionSpec::new(OptionType::Array)
                    .default_value(vec!["TODO", "FIXME"])
                    .description("Markers to report"),
            )
            .build(|config| {
                Ok(Box::new(NoTodo {
                    keywords: config.get_string_list("keywords")?,
                }) as Box<dyn Linter>)
            })
    }
}

impl Linter for NoTodo {
    fn scan(&mut self, ctx: &mut ScanContext<'_>) -> Result<(), BoxError> {
        let document = ctx.document();
        for (index, line) in document.source_lines().iter().enumerate() {
            let mut found: Vec<(usize, &str)> = self
                .keywords
                .iter()
                .filter(|keyword| !keyword.is_empty())
                .flat_map(|keyword| {
                    line.match_indices(keyword.as_str())
                        .map(|(offset, _)| (offset, keyword.as_str()))
                })
                .collect();
            found.sort_unstable();

            for (offset, keyword) in found {
                ctx.report_at(
                    index as u32 + 1,
                    super::column_at(line, offset),
                    format!("Found `{}` marker", keyword),
                );
            }
        }
        Ok(())
    }
}
