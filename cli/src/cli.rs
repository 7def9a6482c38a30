//! # CLI Interface
//!
//! Defines the command-line argument structure for `ledger-cli` using
//! `clap` derive. Supports four subcommands: `keygen`, `tx`, `query`,
//! and `decode`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Ledger transaction and query builder.
///
/// Builds, signs, and wire-encodes transactions and queries described in
/// JSON request files, and decodes wire blobs back into readable JSON.
#[derive(Parser, Debug)]
#[command(
    name = "ledger-cli",
    about = "Build, sign, and decode ledger transactions and queries",
    version,
    propagate_version = true
)]
pub struct LedgerCli {
    /// Validation limits as JSON. Omitted fields keep their defaults.
    #[arg(long, short = 'c', global = true, env = "LEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format. Logs always go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh Ed25519 keypair.
    Keygen(KeygenArgs),
    /// Build and sign a transaction, print its wire encoding as hex.
    Tx(TxArgs),
    /// Build and sign a query, print its wire encoding as hex.
    Query(QueryArgs),
    /// Decode and verify a wire blob, print it as JSON.
    Decode(DecodeArgs),
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Write the hex private key here instead of printing it.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `tx` subcommand.
#[derive(Parser, Debug)]
pub struct TxArgs {
    /// JSON transaction request.
    #[arg(long, short = 'r')]
    pub request: PathBuf,

    /// Hex-encoded 64-byte Ed25519 private key of the signer.
    #[arg(long, short = 'k', env = "LEDGER_KEY", hide_env_values = true)]
    pub key: String,

    /// Write the hex wire encoding here instead of stdout.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `query` subcommand.
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// JSON query request.
    #[arg(long, short = 'r')]
    pub request: PathBuf,

    /// Hex-encoded 64-byte Ed25519 private key of the signer.
    #[arg(long, short = 'k', env = "LEDGER_KEY", hide_env_values = true)]
    pub key: String,
}

/// Which payload a wire blob holds.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Tx,
    Query,
}

/// Arguments for the `decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    #[arg(long, value_enum)]
    pub kind: PayloadKind,

    /// Hex-encoded wire blob, as printed by `tx` or `query`.
    #[arg(long = "hex")]
    pub blob: String,
}
