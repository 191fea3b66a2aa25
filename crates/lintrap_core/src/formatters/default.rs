//! Human readable output.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Formatter, FormatterContext, OutputStream, pluralize};
use crate::lint::Lint;
use crate::report::Report;
use crate::runner::Job;

/// Prints a progress character per job and one line per lint.
pub struct DefaultFormatter {
    context: FormatterContext,
    output: OutputStream,
    any_job_finished: AtomicBool,
}

impl DefaultFormatter {
    pub fn new(context: FormatterContext, output: OutputStream) -> Self {
        Self {
            context,
            output,
            any_job_finished: AtomicBool::new(false),
        }
    }

    fn lint_line(&self, lint: &Lint) -> String {
        let mut line = format!(
            "{}:{}:{} ",
            lint.path.display(),
            lint.source_range.begin.line,
            lint.source_range.begin.column
        );

        let severities = &self.context.severities;
        if severities.is_failure(&lint.severity) || severities.is_warning(&lint.severity) {
            line.push_str(&severity_character(lint.severity.as_str()));
            line.push(' ');
        }
        if let Some(linter) = &lint.linter {
            let _ = write!(line, "[{}] ", linter);
        }
        line.push_str(&lint.message);

        if let Some(exception) = &lint.exception {
            if self.context.debug {
                let _ = write!(line, "\n{:?}", exception);
            } else {
                line.push_str(" (specify --debug flag to see details)");
            }
        }

        line.push('\n');
        line
    }
}

impl Formatter for DefaultFormatter {
    fn started(&self, files: &[PathBuf]) {
        self.output
            .write(&format!("Scanning {}...\n", pluralize("file", files.len())));
    }

    fn job_finished(&self, _job: &Job, lints: &[Lint]) {
        self.any_job_finished.store(true, Ordering::Relaxed);

        let severities = &self.context.severities;
        let progress = if lints.iter().any(|l| severities.is_failure(&l.severity)) {
            "F"
        } else if lints.iter().any(|l| severities.is_warning(&l.severity)) {
            "W"
        } else {
            "."
        };
        self.output.write(progress);
    }

    fn finished(&self, report: &Report) {
        let mut text = String::new();
        if self.any_job_finished.load(Ordering::Relaxed) {
            text.push('\n');
        }

        for lint in report.lints() {
            text.push_str(&self.lint_line(lint));
        }

        text.push('\n');
        text.push_str(&format!(
            "{} inspected",
            pluralize("file", report.documents_inspected().len())
        ));
        if report.has_failures() {
            let _ = write!(
                text,
                ", {} reported",
                pluralize("failure", report.failures().count())
            );
        }
        if report.has_warnings() {
            let _ = write!(
                text,
                ", {} reported",
                pluralize("warning", report.warnings().count())
            );
        }
        if report.is_success() {
            text.push_str(", no issues reported");
        }
        text.push('\n');

        self.output.write(&text);
    }
}

fn severity_character(severity: &str) -> String {
    severity
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
