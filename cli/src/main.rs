// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger CLI
//!
//! Entry point for the `ledger-cli` binary. Parses CLI arguments, initializes
//! logging, loads validation limits, and runs one subcommand:
//!
//! - `keygen` - generate an Ed25519 keypair
//! - `tx`     - build, sign, and wire-encode a transaction request
//! - `query`  - build, sign, and wire-encode a query request
//! - `decode` - decode and verify a wire blob, print it as JSON
//!
//! Command output goes to stdout, logs to stderr.

mod cli;
mod logging;
mod request;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use serde::Serialize;

use ledger_protocol::config::ValidationConfig;
use ledger_protocol::crypto::Keypair;
use ledger_protocol::query::{sign_query, verify_query, SignedQuery};
use ledger_protocol::transaction::{sign_transaction, verify_transaction, SignedTransaction};
use ledger_protocol::validation::ValidationReport;
use ledger_protocol::wire;

use cli::{Commands, LedgerCli, PayloadKind};
use request::{QueryRequest, TransactionRequest};

fn main() -> Result<()> {
    let cli = LedgerCli::parse();
    logging::init_logging("ledger_cli=info,ledger_protocol=info", cli.log_format);

    let config = request::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Keygen(args) => keygen(args),
        Commands::Tx(args) => build_transaction(args, config),
        Commands::Query(args) => build_query(args, config),
        Commands::Decode(args) => decode(args, &config),
    }
}

/// Generates a keypair. With `--out`, the private key goes to the file and
/// only the public key is printed.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    let keypair = Keypair::generate();
    let public_key = keypair.public_key().to_hex();

    match args.out {
        Some(path) => {
            std::fs::write(&path, keypair.private_key_hex())
                .with_context(|| format!("failed to write private key to {}", path.display()))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
            }

            tracing::info!(public_key = %public_key, key_path = %path.display(), "keypair generated");
            println!("{}", public_key);
        }
        None => {
            let keys = serde_json::json!({
                "public_key": public_key,
                "private_key": keypair.private_key_hex(),
            });
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
    }
    Ok(())
}

fn build_transaction(args: cli::TxArgs, config: ValidationConfig) -> Result<()> {
    let keypair = Keypair::from_hex(&args.key).context("invalid signing key")?;
    let request: TransactionRequest = request::load_json(&args.request)?;
    let builder = request.into_builder(config)?;

    let tx = builder.build().map_err(|first| {
        log_violations(&builder.report());
        anyhow!("transaction rejected: {}", first)
    })?;

    let signed = sign_transaction(tx, &keypair)?;
    let hash = signed.hash()?;
    tracing::info!(
        hash = %hash,
        commands = signed.payload.commands.len(),
        quorum = signed.payload.quorum.get(),
        batched = signed.payload.batch_meta.is_some(),
        "transaction signed"
    );

    write_output(args.out.as_deref(), &hex::encode(wire::encode(&signed)?))
}

fn build_query(args: cli::QueryArgs, config: ValidationConfig) -> Result<()> {
    let keypair = Keypair::from_hex(&args.key).context("invalid signing key")?;
    let request: QueryRequest = request::load_json(&args.request)?;
    let builder = request.into_builder(config)?;

    let query = builder.build().map_err(|first| {
        log_violations(&builder.report());
        anyhow!("query rejected: {}", first)
    })?;

    let signed = sign_query(query, &keypair)?;
    let hash = signed.hash()?;
    tracing::info!(
        hash = %hash,
        query = signed.payload.query.name(),
        counter = signed.payload.query_counter,
        "query signed"
    );

    write_output(None, &hex::encode(wire::encode(&signed)?))
}

/// Decodes a wire blob, verifies it against the current time, and prints it.
fn decode(args: cli::DecodeArgs, config: &ValidationConfig) -> Result<()> {
    let bytes = hex::decode(args.blob.trim()).context("blob is not valid hex")?;
    let now = ledger_protocol::now_ms();

    match args.kind {
        PayloadKind::Tx => {
            let signed: SignedTransaction = wire::decode(&bytes)?;
            verify_transaction(&signed, now, config)?;
            let hash = signed.hash()?;
            tracing::info!(
                hash = %hash,
                created = %display_time(signed.payload.created_time),
                signatures = signed.signatures.len(),
                has_quorum = signed.has_quorum(),
                "transaction verified"
            );
            print_json(&signed)
        }
        PayloadKind::Query => {
            let signed: SignedQuery = wire::decode(&bytes)?;
            verify_query(&signed, now, config)?;
            let hash = signed.hash()?;
            tracing::info!(
                hash = %hash,
                created = %display_time(signed.payload.created_time),
                "query verified"
            );
            print_json(&signed)
        }
    }
}

fn log_violations(report: &ValidationReport) {
    for violation in report.violations() {
        tracing::error!(context = %violation.context, "{}", violation.error);
    }
}

fn display_time(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
