mod cmd;
mod exit;
mod logging;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "pagewire",
    version,
    about = "Send pager messages through a paging terminal"
)]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "pagewire",
            "send",
            "--server",
            "terminal.example.com:444",
            "1234",
            "meet at the loading dock",
        ])
        .expect("send args should parse");

        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn parses_verify_subcommand() {
        let cli = Cli::try_parse_from([
            "pagewire",
            "verify",
            "--server",
            "terminal.example.com:444",
            "1234",
        ])
        .expect("verify args should parse");

        assert!(matches!(cli.command, Command::Verify(_)));
    }

    #[test]
    fn rejects_non_numeric_pager() {
        let err = Cli::try_parse_from([
            "pagewire",
            "send",
            "--server",
            "terminal.example.com:444",
            "not-a-number",
            "hello",
        ])
        .expect_err("non-numeric pager should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn send_requires_message() {
        let err = Cli::try_parse_from([
            "pagewire",
            "send",
            "--server",
            "terminal.example.com:444",
            "1234",
        ])
        .expect_err("missing message should fail");

        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }
}
