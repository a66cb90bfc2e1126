//! # Meridian Teller
//!
//! An interactive session against a single in-memory [`Bank`]. Each input
//! line names the caller first, then the operation — the ledger itself
//! decides whether that caller is allowed to do it:
//!
//! ```text
//! manager create alice
//! alice deposit 500
//! alice beneficiary bob
//! alice transfer bob 50
//! manager bank-balance
//! ```

mod cli;
mod logging;

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::debug;

use meridian_ledger::{AccountStatus, Bank};

use crate::cli::TellerCli;
use crate::logging::LogFormat;

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// `<caller> create <addr>`
    Create { caller: String, address: String },
    /// `<caller> status <addr>` — query; `<caller> status <addr> <code>` — update.
    Status {
        caller: String,
        address: String,
        new_status: Option<AccountStatus>,
    },
    /// `<caller> balance`
    Balance { caller: String },
    /// `<caller> deposit <amount>`
    Deposit { caller: String, amount: u64 },
    /// `<caller> withdraw <amount>`
    Withdraw { caller: String, amount: u64 },
    /// `<caller> beneficiary <addr>`
    Beneficiary { caller: String, target: String },
    /// `<caller> transfer <addr> <amount>`
    Transfer {
        caller: String,
        to: String,
        amount: u64,
    },
    /// `<caller> bank-balance`
    BankBalance { caller: String },
    /// `manager` — print the manager identity.
    Manager,
    /// `events` — dump the audit log as JSON lines.
    Events,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

/// Parses one input line. Empty lines and `#` comments yield `None`.
fn parse_command(line: &str) -> Result<Option<Command>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Ok(None);
    };
    if first.starts_with('#') {
        return Ok(None);
    }

    match (first, tokens.len()) {
        ("manager", 1) => return Ok(Some(Command::Manager)),
        ("events", 1) => return Ok(Some(Command::Events)),
        ("help", 1) => return Ok(Some(Command::Help)),
        ("quit", 1) | ("exit", 1) => return Ok(Some(Command::Quit)),
        _ => {}
    }

    let caller = first.to_string();
    let op = tokens
        .get(1)
        .copied()
        .ok_or_else(|| anyhow!("missing operation after caller '{caller}' (try: help)"))?;
    let args = &tokens[2..];

    let amount_arg = |value: &str| -> Result<u64> {
        value
            .parse::<u64>()
            .with_context(|| format!("'{value}' is not a valid amount"))
    };

    let command = match (op, args) {
        ("create", [address]) => Command::Create {
            caller,
            address: address.to_string(),
        },
        ("status", [address]) => Command::Status {
            caller,
            address: address.to_string(),
            new_status: None,
        },
        ("status", [address, code]) => {
            let code: u8 = code
                .parse()
                .with_context(|| format!("'{code}' is not a status code"))?;
            let status = AccountStatus::from_code(code)
                .ok_or_else(|| anyhow!("unknown status code {code} (0/1/2)"))?;
            Command::Status {
                caller,
                address: address.to_string(),
                new_status: Some(status),
            }
        }
        ("balance", []) => Command::Balance { caller },
        ("deposit", [amount]) => Command::Deposit {
            caller,
            amount: amount_arg(amount)?,
        },
        ("withdraw", [amount]) => Command::Withdraw {
            caller,
            amount: amount_arg(amount)?,
        },
        ("beneficiary", [target]) => Command::Beneficiary {
            caller,
            target: target.to_string(),
        },
        ("transfer", [to, amount]) => Command::Transfer {
            caller,
            to: to.to_string(),
            amount: amount_arg(amount)?,
        },
        ("bank-balance", []) => Command::BankBalance { caller },
        _ => bail!("unrecognized command '{line}' (try: help)"),
    };
    Ok(Some(command))
}

const HELP: &str = "\
commands (caller first, the ledger enforces who may do what):
  <caller> create <addr>            provision an account (manager only)
  <caller> status <addr>            query an account's status code
  <caller> status <addr> <0|1|2>    set status: 0=Inactive 1=Active 2=Suspended (manager only)
  <caller> balance                  own balance
  <caller> deposit <amount>         deposit into own account
  <caller> withdraw <amount>        withdraw from own account
  <caller> beneficiary <addr>       whitelist a transfer counterparty
  <caller> transfer <addr> <amount> transfer to a whitelisted counterparty
  <caller> bank-balance             total custodied value (manager only)
  manager                           print the manager identity
  events                            dump the audit log as JSON lines
  help | quit";

/// Applies a command to the bank. Returns the line to print, or `None` to
/// end the session.
fn apply(bank: &Bank, command: Command) -> Option<String> {
    let outcome = match command {
        Command::Create { caller, address } => bank
            .create_account(&caller, &address)
            .map(|()| format!("account {address} created")),
        Command::Status {
            caller,
            address,
            new_status: Some(status),
        } => bank
            .update_account_status(&caller, &address, status)
            .map(|()| format!("{address} status set to {status} ({})", status.as_code())),
        Command::Status { address, .. } => bank
            .account_status(&address)
            .map(|status| format!("{address} status: {status} ({})", status.as_code())),
        Command::Balance { caller } => bank
            .get_balance(&caller)
            .map(|balance| format!("{caller} balance: {balance}")),
        Command::Deposit { caller, amount } => bank
            .deposit(&caller, amount)
            .map(|balance| format!("deposited {amount}, {caller} balance: {balance}")),
        Command::Withdraw { caller, amount } => bank
            .withdraw(&caller, amount)
            .map(|balance| format!("withdrew {amount}, {caller} balance: {balance}")),
        Command::Beneficiary { caller, target } => bank
            .add_beneficiary(&caller, &target)
            .map(|()| format!("{target} added as beneficiary of {caller}")),
        Command::Transfer { caller, to, amount } => bank
            .transfer(&caller, &to, amount)
            .map(|()| format!("transferred {amount} from {caller} to {to}")),
        Command::BankBalance { caller } => bank
            .bank_balance(&caller)
            .map(|total| format!("bank balance: {total}")),
        Command::Manager => Ok(format!("manager: {}", bank.manager())),
        Command::Events => {
            let lines: Vec<String> = bank
                .events()
                .iter()
                .map(|record| serde_json::to_string(record).unwrap_or_default())
                .collect();
            Ok(if lines.is_empty() {
                "no events recorded".to_string()
            } else {
                lines.join("\n")
            })
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => return None,
    };

    Some(match outcome {
        Ok(line) => line,
        Err(err) => format!("error: {err}"),
    })
}

fn main() -> Result<()> {
    let args = TellerCli::parse();
    logging::init_logging(&args.log_level, LogFormat::from_str_lossy(&args.log_format));

    let bank = Bank::new(args.manager.clone());
    println!("meridian teller session (manager: {})", args.manager);
    println!("type 'help' for commands, 'quit' to leave");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        debug!(input = %line.trim_end(), "session input");

        match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => match apply(&bank, command) {
                Some(output) => println!("{output}"),
                None => break,
            },
            Err(err) => println!("error: {err:#}"),
        }
    }

    println!("session closed after {} events", bank.event_count());
    Ok(())
}
