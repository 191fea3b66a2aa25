//! CLI argument definitions

use std::path::PathBuf;

use clap::{ArgMatches, Parser};
use lintrap_core::{Concurrency, DEFAULT_FORMATTER, Destination};

/// Lintrap - configurable linter for plain text files
#[derive(Parser, Debug)]
#[command(name = "lintrap")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "lintrap [OPTIONS] [PATHS]...")]
pub struct Cli {
    /// Files and directories to lint
    pub paths: Vec<PathBuf>,

    /// Linters to run, overriding the configuration (comma separated)
    #[arg(short = 'i', long = "include-linter", value_name = "LINTER", value_delimiter = ',')]
    pub include_linters: Vec<String>,

    /// Linters to skip in addition to disabled ones (comma separated)
    #[arg(short = 'x', long = "exclude-linter", value_name = "LINTER", value_delimiter = ',')]
    pub exclude_linters: Vec<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Paths to exclude from linting
    #[arg(short = 'e', long = "exclude-path", value_name = "PATH")]
    pub exclude_paths: Vec<String>,

    /// Output format (Default, Json, Checkstyle); may be repeated
    #[arg(short, long = "format", value_name = "FORMATTER")]
    pub formats: Vec<String>,

    /// Write the preceding format (or the default one) to a file
    #[arg(short, long = "out", value_name = "FILE")]
    pub outs: Vec<PathBuf>,

    /// Lint standard input, reporting lints under this path
    #[arg(long, value_name = "PATH")]
    pub stdin_file_path: Option<PathBuf>,

    /// Activate a linter plugin by name
    #[arg(short, long = "plugin", value_name = "PLUGIN")]
    pub plugins: Vec<String>,

    /// Number of parallel workers, or `auto`
    #[arg(short = 'C', long, value_name = "N|auto")]
    pub concurrency: Option<Concurrency>,

    /// Display available linters and whether they are enabled
    #[arg(long)]
    pub show_linters: bool,

    /// Display available formatters
    #[arg(long)]
    pub show_formatters: bool,

    /// Display documentation for one linter, or all of them
    #[arg(long, visible_alias = "show-documentation", value_name = "LINTER")]
    pub show_docs: Option<Option<String>>,

    /// Show details of errors raised by linters
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Pairs each requested formatter with its destination.
///
/// `--out` redirects the closest preceding `--format` that still writes to
/// standard output. When that one already writes to a file, the same format
/// is written a second time to the new file. Without any `--format`, `--out`
/// redirects the default formatter.
pub fn formatter_requests(matches: &ArgMatches) -> Vec<(String, Destination)> {
    enum Flag {
        Format(String),
        Out(PathBuf),
    }

    let mut flags: Vec<(usize, Flag)> = Vec::new();
    if let (Some(indices), Some(values)) = (
        matches.indices_of("formats"),
        matches.get_many::<String>("formats"),
    ) {
        flags.extend(indices.zip(values.cloned().map(Flag::Format)));
    }
    if let (Some(indices), Some(values)) = (
        matches.indices_of("outs"),
        matches.get_many::<PathBuf>("outs"),
    ) {
        flags.extend(indices.zip(values.cloned().map(Flag::Out)));
    }
    flags.sort_by_key(|(index, _)| *index);

    let mut requests: Vec<(String, Destination)> = Vec::new();
    for (_, flag) in flags {
        match flag {
            Flag::Format(name) => requests.push((name, Destination::Stdout)),
            Flag::Out(path) => match requests.last_mut() {
                None => requests.push((DEFAULT_FORMATTER.to_string(), Destination::File(path))),
                Some((_, destination @ Destination::Stdout)) => {
                    *destination = Destination::File(path);
                }
                Some((name, Destination::File(_))) => {
                    let name = name.clone();
                    requests.push((name, Destination::File(path)));
                }
            },
        }
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::num::NonZeroUsize;

    fn parse(args: &[&str]) -> (Cli, ArgMatches) {
        let matches = Cli::command()
            .try_get_matches_from(std::iter::once("lintrap").chain(args.iter().copied()))
            .unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        (cli, matches)
    }

    fn file(path: &str) -> Destination {
        Destination::File(PathBuf::from(path))
    }

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_linter_lists_are_comma_separated_and_repeatable() {
        let (cli, _) = parse(&["-i", "A,B", "--include-linter", "C", "-x", "D"]);
        assert_eq!(cli.include_linters, vec!["A", "B", "C"]);
        assert_eq!(cli.exclude_linters, vec!["D"]);
    }

    #[test]
    fn test_positional_paths() {
        let (cli, _) = parse(&["a.txt", "docs"]);
        assert_eq!(cli.paths, vec![PathBuf::from("a.txt"), PathBuf::from("docs")]);
    }

    #[rstest]
    #[case::none(&[], vec![])]
    #[case::format_only(&["-f", "Json"], vec![("Json", Destination::Stdout)])]
    #[case::out_only(&["-o", "report.txt"], vec![("Default", file("report.txt"))])]
    #[case::redirect_last(
        &["-f", "Default", "-f", "Json", "-o", "out.json"],
        vec![("Default", Destination::Stdout), ("Json", file("out.json"))]
    )]
    #[case::same_format_twice(
        &["-f", "Json", "-o", "a.json", "-o", "b.json"],
        vec![("Json", file("a.json")), ("Json", file("b.json"))]
    )]
    #[case::interleaved(
        &["-f", "Json", "-o", "a.json", "-f", "Checkstyle"],
        vec![("Json", file("a.json")), ("Checkstyle", Destination::Stdout)]
    )]
    fn test_formatter_requests(
        #[case] args: &[&str],
        #[case] expected: Vec<(&str, Destination)>,
    ) {
        let (_, matches) = parse(args);
        let expected: Vec<(String, Destination)> = expected
            .into_iter()
            .map(|(name, destination)| (name.to_string(), destination))
            .collect();
        assert_eq!(formatter_requests(&matches), expected);
    }

    #[rstest]
    #[case("4", Concurrency::Workers(NonZeroUsize::new(4).unwrap()))]
    #[case("auto", Concurrency::Auto)]
    fn test_concurrency(#[case] value: &str, #[case] expected: Concurrency) {
        let (cli, _) = parse(&["-C", value]);
        assert_eq!(cli.concurrency, Some(expected));
    }

    #[rstest]
    #[case("0")]
    #[case("-2")]
    #[case("many")]
    fn test_invalid_concurrency_is_rejected(#[case] value: &str) {
        let result = Cli::command().try_get_matches_from(["lintrap", "-C", value]);
        assert!(result.is_err());
    }

    #[test]
    fn test_show_docs_with_and_without_linter() {
        let (cli, _) = parse(&["--show-docs"]);
        assert_eq!(cli.show_docs, Some(None));

        let (cli, _) = parse(&["--show-docs", "LineLength"]);
        assert_eq!(cli.show_docs, Some(Some("LineLength".to_string())));
    }
}
