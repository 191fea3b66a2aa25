//! Informational commands

use lintrap_core::{Application, LinterDescriptor, LinterSelector, LintrapError, OptionSpec};
use serde_json::Value;

use crate::cli::Cli;

/// Prints every linter and whether the configuration enables it.
pub fn show_linters(app: &mut Application, cli: &Cli) -> Result<(), LintrapError> {
    let options = super::run_options(cli)?;
    let config = app.load_configuration(&options)?;

    let enabled: Vec<String> = match LinterSelector::new(app.linters(), &config, &options) {
        Ok(selector) => selector
            .enabled_linters()
            .into_iter()
            .map(str::to_string)
            .collect(),
        Err(LintrapError::NoLinters(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let mut names = app.linters().names();
    names.sort_unstable();
    for name in names {
        let state = if enabled.iter().any(|e| e == name) {
            "enabled"
        } else {
            "disabled"
        };
        println!(" - {} {}", name, state);
    }
    Ok(())
}

/// Prints the names of the available formatters.
pub fn show_formatters(app: &Application) {
    for name in app.formatters().names() {
        println!(" - {}", name);
    }
}

/// Prints the documentation of one linter, or of all linters.
pub fn show_docs(
    app: &mut Application,
    cli: &Cli,
    linter: Option<&str>,
) -> Result<(), LintrapError> {
    let options = super::run_options(cli)?;
    app.load_configuration(&options)?;

    let mut descriptors: Vec<&LinterDescriptor> = match linter {
        Some(name) => match app.linters().get(name) {
            Some(descriptor) => vec![&**descriptor],
            None => return Err(LintrapError::NoSuchLinter(name.to_string())),
        },
        None => app.linters().iter().map(|descriptor| &**descriptor).collect(),
    };
    descriptors.sort_by(|a, b| a.name().cmp(b.name()));

    println!("Linter Documentation");
    println!("--------------------");
    for descriptor in descriptors {
        print!("{}", render_docs(descriptor));
    }
    Ok(())
}

fn render_docs(descriptor: &LinterDescriptor) -> String {
    let mut out = format!("\n{}\n{}\n", descriptor.name(), descriptor.description());
    if descriptor.schema().is_empty() {
        return out;
    }

    let rows: Vec<[String; 4]> = descriptor
        .schema()
        .iter()
        .map(|(name, spec)| option_row(name, spec))
        .collect();
    let header = [
        "Option".to_string(),
        "Description".to_string(),
        "Type".to_string(),
        "Default".to_string(),
    ];
    let widths: Vec<usize> = (0..4)
        .map(|column| {
            rows.iter()
                .chain(std::iter::once(&header))
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    out.push('\n');
    for (index, row) in std::iter::once(&header).chain(rows.iter()).enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
        if index == 0 {
            let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }
    out
}

fn option_row(name: &str, spec: &OptionSpec) -> [String; 4] {
    let default = match &spec.default {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    };
    [
        name.to_string(),
        spec.description.clone(),
        spec.kind.name().to_string(),
        default,
    ]
}
