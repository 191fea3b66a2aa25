//! Checkstyle XML output, understood by most CI servers.

use std::path::{self, Path};

use super::{Formatter, OutputStream};
use crate::report::Report;

pub struct CheckstyleFormatter {
    output: OutputStream,
}

impl CheckstyleFormatter {
    pub fn new(output: OutputStream) -> Self {
        Self { output }
    }
}

impl Formatter for CheckstyleFormatter {
    fn finished(&self, report: &Report) {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str("<checkstyle version=\"1.5.6\">\n");

        for (file, lints) in report.lints_by_path() {
            xml.push_str(&format!(
                "  <file name=\"{}\">\n",
                escape_attr(&absolute(file))
            ));
            for lint in lints {
                xml.push_str(&format!(
                    "    <error source=\"{}\" line=\"{}\" column=\"{}\" severity=\"{}\" message=\"{}\" />\n",
                    escape_attr(lint.linter.as_deref().unwrap_or_default()),
                    lint.source_range.begin.line,
                    lint.source_range.begin.column,
                    escape_attr(lint.severity.as_str()),
                    escape_attr(&lint.message)
                ));
            }
            xml.push_str("  </file>\n");
        }

        xml.push_str("</checkstyle>\n");
        self.output.write(&xml);
    }
}

fn absolute(file: &Path) -> String {
    path::absolute(file)
        .unwrap_or_else(|_| file.to_path_buf())
        .display()
        .to_string()
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::Lint;
    use crate::location::SourceRange;
    use crate::report::SeverityTable;
    use crate::severity::Severity;
    use crate::test_utils::SharedBuffer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_attr() {
        assert_eq!(
            escape_attr(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_report_document() {
        let buffer = SharedBuffer::default();
        let formatter = CheckstyleFormatter::new(OutputStream::new(buffer.clone()));
        let report = Report::new(
            vec![
                Lint::new("/src/a.txt", SourceRange::at(3, 2), "Use \"quotes\"", Severity::Warning)
                    .with_linter("Alpha"),
            ],
            vec![],
            SeverityTable::default(),
        );

        formatter.finished(&report);

        assert_eq!(
            buffer.contents(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <checkstyle version=\"1.5.6\">\n  \
             <file name=\"/src/a.txt\">\n    \
             <error source=\"Alpha\" line=\"3\" column=\"2\" severity=\"warning\" message=\"Use &quot;quotes&quot;\" />\n  \
             </file>\n\
             </checkstyle>\n"
        );
    }

    #[test]
    fn test_relative_paths_are_made_absolute() {
        let name = absolute(Path::new("a.txt"));
        assert!(Path::new(&name).is_absolute());
        assert!(name.ends_with("a.txt"));
    }
}
