//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Generate an Arbeitszeitdokumentation PDF from time sheet data.
///
/// Posts the data to an Arbeitszeitdokumentationsgenerator server and saves
/// the returned document as Arbeitszeitdokumentation.pdf.
#[derive(Parser, Debug)]
#[command(name = "abzdok")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Base URL of the generator server
    #[arg(short, long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Directory the PDF is saved into
    #[arg(short, long, global = true, value_name = "DIR", conflicts_with = "stdout")]
    pub output_dir: Option<PathBuf>,

    /// Write the PDF to stdout instead of a file
    #[arg(long, global = true)]
    pub stdout: bool,

    /// Replace an existing PDF instead of saving under a numbered name
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// HTTP read timeout in seconds (1-3600)
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a TimeSheetGenerator-compatible Global.json/Month.json pair
    Tsg(TsgArgs),
    /// Submit raw form fields (key=value) to the form endpoint
    Form(FormArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
pub struct TsgArgs {
    /// Path to Global.json ("-" reads stdin)
    #[arg(short, long, value_name = "FILE")]
    pub global: PathBuf,

    /// Path to Month.json ("-" reads stdin)
    #[arg(short, long, value_name = "FILE")]
    pub month: PathBuf,

    /// Keep the entry order instead of sorting chronologically
    #[arg(long)]
    pub no_sort: bool,

    /// Skip consistency checks before the document is rendered
    #[arg(long)]
    pub no_validate: bool,
}

#[derive(Args, Debug)]
pub struct FormArgs {
    /// Form field as key=value (repeatable, order is kept)
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE", value_parser = parse_field_assignment)]
    pub fields: Vec<(String, String)>,

    /// File with one key=value per line, sent before any --field
    #[arg(long, value_name = "FILE")]
    pub fields_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration and where each value came from
    Show,
}

/// Parses `key=value`; the value may be empty and may contain `=`.
pub fn parse_field_assignment(raw: &str) -> Result<(String, String), String> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got '{raw}'"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tsg_args(cli: Cli) -> TsgArgs {
        match cli.command {
            Command::Tsg(args) => args,
            other => panic!("expected tsg command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_tsg_parses_paths_and_defaults() {
        let cli = Cli::try_parse_from(["abzdok", "tsg", "-g", "Global.json", "-m", "Month.json"])
            .unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.server.is_none());
        let args = tsg_args(cli);
        assert_eq!(args.global, PathBuf::from("Global.json"));
        assert_eq!(args.month, PathBuf::from("Month.json"));
        assert!(!args.no_sort);
        assert!(!args.no_validate);
    }

    #[test]
    fn test_cli_tsg_requires_both_files() {
        let result = Cli::try_parse_from(["abzdok", "tsg", "--global", "Global.json"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "abzdok",
            "tsg",
            "-g",
            "g.json",
            "-m",
            "m.json",
            "--no-sort",
            "-vv",
            "--server",
            "http://abz.example/",
            "-o",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.server.as_deref(), Some("http://abz.example/"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert!(tsg_args(cli).no_sort);
    }

    #[test]
    fn test_cli_stdout_conflicts_with_output_dir() {
        let result = Cli::try_parse_from([
            "abzdok", "--stdout", "-o", "out", "tsg", "-g", "g", "-m", "m",
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_timeout_range_enforced() {
        let result = Cli::try_parse_from(["abzdok", "--read-timeout", "0", "config", "show"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_form_fields_keep_order() {
        let cli = Cli::try_parse_from([
            "abzdok", "form", "-f", "name=Doe, Jane", "-f", "task=", "--field", "note=a=b",
        ])
        .unwrap();
        let Command::Form(args) = cli.command else {
            panic!("expected form command");
        };
        assert_eq!(
            args.fields,
            vec![
                ("name".to_string(), "Doe, Jane".to_string()),
                ("task".to_string(), String::new()),
                ("note".to_string(), "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn test_cli_form_rejects_field_without_equals() {
        let result = Cli::try_parse_from(["abzdok", "form", "-f", "name"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["abzdok", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_missing_subcommand_is_error() {
        let err = Cli::try_parse_from(["abzdok"]).unwrap_err();
        assert!(
            matches!(
                err.kind(),
                clap::error::ErrorKind::MissingSubcommand
                    | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ),
            "unexpected error kind: {:?}",
            err.kind()
        );
    }

    #[test]
    fn test_parse_field_assignment_rejects_empty_key() {
        assert!(parse_field_assignment("=value").is_err());
        assert_eq!(
            parse_field_assignment(" day =3"),
            Ok(("day".to_string(), "3".to_string()))
        );
    }
}
