use std::sync::Arc;
use std::thread;

use clap::{Args, Subcommand};
use pagewire_client::Client;
use pagewire_frame::PAGER_FIELD_WIDTH;

use crate::exit::{client_error, CliError, CliResult, INTERNAL, USAGE};

pub mod send;
pub mod verify;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Queue a message for delivery to a pager.
    Send(SendArgs),
    /// Check whether a pager is in service.
    Verify(VerifyArgs),
}

pub fn run(command: Command) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args),
        Command::Verify(args) => verify::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Server address of the paging terminal (host:port).
    #[arg(long, env = "PAGEWIRE_SERVER", value_name = "ADDR")]
    pub server: String,
    /// Pager number to send the message to.
    pub number: u64,
    /// Message content.
    pub message: String,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Server address of the paging terminal (host:port).
    #[arg(long, env = "PAGEWIRE_SERVER", value_name = "ADDR")]
    pub server: String,
    /// Pager number to check.
    pub number: u64,
}

/// Largest pager number the fixed-width wire field can carry.
const MAX_PAGER_NUMBER: u64 = 9_999_999_999;

/// Zero-pad a numeric pager id to the wire field width.
pub(crate) fn pager_field(number: u64) -> CliResult<String> {
    if number > MAX_PAGER_NUMBER {
        return Err(CliError::new(
            USAGE,
            format!("pager number {number} exceeds the {PAGER_FIELD_WIDTH}-digit field"),
        ));
    }
    Ok(format!("{number:0width$}", width = PAGER_FIELD_WIDTH))
}

/// Connect, run the dispatch loop on its own thread, apply `op`, and shut
/// everything down again.
pub(crate) fn with_client<T>(
    server: &str,
    op: impl FnOnce(&Client) -> pagewire_client::Result<T>,
) -> CliResult<T> {
    let client = Arc::new(
        Client::connect(server).map_err(|err| client_error("connect failed", err))?,
    );
    let dispatch = {
        let client = Arc::clone(&client);
        thread::spawn(move || client.run())
    };

    let outcome = op(&client);
    let _ = client.close();
    let loop_result = dispatch
        .join()
        .map_err(|_| CliError::new(INTERNAL, "dispatch loop panicked"))?;

    if let Err(err) = loop_result {
        // The loop's failure is the root cause of any request failure.
        return Err(client_error("connection failed", err));
    }
    outcome.map_err(|err| client_error("request failed", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_field_zero_pads() {
        assert_eq!(pager_field(1).unwrap(), "0000000001");
        assert_eq!(pager_field(9_999_999_999).unwrap(), "9999999999");
    }

    #[test]
    fn pager_field_rejects_overflow() {
        let err = pager_field(10_000_000_000).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
