//! # CLI Interface
//!
//! Command-line arguments for `meridian-teller` using `clap` derive. The
//! binary runs a single interactive session against one in-memory ledger;
//! every flag has an environment-variable fallback.

use clap::Parser;

/// Meridian interactive teller session.
///
/// Starts an in-memory ledger with the given manager identity and reads
/// commands from stdin, one per line. Type `help` inside the session for
/// the command reference. State lives only for the duration of the session.
#[derive(Parser, Debug)]
#[command(
    name = "meridian-teller",
    about = "Interactive teller session for the Meridian ledger",
    version
)]
pub struct TellerCli {
    /// Address bound as the bank manager for this session.
    #[arg(long, short = 'm', env = "MERIDIAN_MANAGER", default_value = "manager")]
    pub manager: String,

    /// Default log level when RUST_LOG is not set.
    #[arg(long, env = "MERIDIAN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "MERIDIAN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}
