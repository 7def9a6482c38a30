//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] accumulates a creator, a timestamp, a quorum,
//! and an ordered list of commands. Setters take raw values (strings, byte
//! slices, plain integers) and never fail; each command is parsed as it is
//! added and any problems are parked until [`TransactionBuilder::build`],
//! which either hands back a fully valid [`UnsignedTransaction`] or the
//! first violation it found.
//!
//! The builder does not sign. That happens in [`super::signing`], so
//! construction stays testable without key material.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::batch::{BatchKind, BatchMeta};
use super::commands::Command;
use super::types::{AccountId, Amount, AssetId, DetailKey, DomainId, Name, PeerAddress, Quorum};
use crate::config::{ValidationConfig, DEFAULT_TX_QUORUM};
use crate::crypto::{sha256, Hash};
use crate::permissions::{GrantablePermission, RolePermissionSet};
use crate::validation::staged::{Staged, StagedFields};
use crate::validation::{fields, ValidationError, ValidationReport};
use crate::wire::{self, EncodeError};

const CONTEXT: &str = "Transaction";
const BATCH_CONTEXT: &str = "BatchMeta";

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A validated, not-yet-signed transaction.
///
/// # Canonical Byte Format
///
/// [`UnsignedTransaction::canonical_bytes`] is the bincode encoding of this
/// struct: fields in declaration order, fixed-width little-endian integers,
/// length-prefixed strings and sequences. Independent signers therefore
/// agree on exactly which bytes were signed.
///
/// The *reduced* payload is the same minus `batch_meta`; see
/// [`UnsignedTransaction::reduced_hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub creator_account_id: AccountId,

    /// Unix milliseconds.
    pub created_time: u64,

    /// Signatures the ledger must collect before executing.
    pub quorum: Quorum,

    /// Never empty once built.
    pub commands: Vec<Command>,

    /// Set on members of a multi-transaction batch.
    pub batch_meta: Option<BatchMeta>,
}

/// Borrowed view of the fields covered by the reduced hash.
#[derive(Serialize)]
struct ReducedPayload<'a> {
    creator_account_id: &'a AccountId,
    created_time: u64,
    quorum: Quorum,
    commands: &'a [Command],
}

impl UnsignedTransaction {
    /// The bytes that get hashed and signed.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        wire::canonical_bytes(self)
    }

    /// SHA-256 of [`Self::canonical_bytes`].
    pub fn hash(&self) -> Result<Hash, EncodeError> {
        Ok(sha256(&self.canonical_bytes()?))
    }

    /// Canonical bytes of everything except `batch_meta`.
    pub fn reduced_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        wire::canonical_bytes(&ReducedPayload {
            creator_account_id: &self.creator_account_id,
            created_time: self.created_time,
            quorum: self.quorum,
            commands: &self.commands,
        })
    }

    /// SHA-256 of [`Self::reduced_bytes`]. Batch metas list their members
    /// by this hash, which is why it leaves the meta out.
    pub fn reduced_hash(&self) -> Result<Hash, EncodeError> {
        Ok(sha256(&self.reduced_bytes()?))
    }

    /// Re-run every rule the field types cannot guarantee on their own:
    /// the freshness window, a non-empty command list, and each command's
    /// size and positivity limits.
    ///
    /// Used on payloads that did not come from our builder.
    pub fn validate(&self, now_ms: u64, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.check(
            CONTEXT,
            fields::created_time("created_time", Some(self.created_time), now_ms, config),
        );
        if self.commands.is_empty() {
            report.push(CONTEXT, ValidationError::EmptyRequiredField { field: "commands" });
        }
        for (index, command) in self.commands.iter().enumerate() {
            let context = command_context(index, command.name());
            for error in command.violations(config) {
                report.push(context.as_str(), error);
            }
        }
        if let Some(meta) = &self.batch_meta {
            report.check(BATCH_CONTEXT, meta.check());
        }
        report
    }
}

fn command_context(index: usize, name: &str) -> String {
    format!("Command #{} {}", index + 1, name)
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Accumulator for [`UnsignedTransaction`].
///
/// # Usage
///
/// ```
/// use ledger_protocol::transaction::TransactionBuilder;
///
/// let tx = TransactionBuilder::new()
///     .creator_account_id("admin@test")
///     .created_time(ledger_protocol::now_ms())
///     .add_peer("123.123.123.123:123", &[7u8; 32])
///     .build()
///     .unwrap();
///
/// assert_eq!(tx.commands.len(), 1);
/// ```
///
/// Setters consume and return the builder. Cloning a half-built builder and
/// extending both copies is fine; they share nothing. `build` takes `&self`
/// and is pure: calling it twice at the same instant yields equal payloads.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    config: ValidationConfig,
    creator: Option<String>,
    created_time: Option<u64>,
    quorum: i64,
    commands: Vec<Staged<Command>>,
    batch_meta: Option<Staged<BatchMeta>>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// Empty builder with default limits and quorum 1.
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
            creator: None,
            created_time: None,
            quorum: i64::from(DEFAULT_TX_QUORUM),
            commands: Vec::new(),
            batch_meta: None,
        }
    }

    /// Replace the validation limits used by `build`.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn creator_account_id(mut self, account_id: &str) -> Self {
        self.creator = Some(account_id.to_string());
        self
    }

    /// Unix milliseconds.
    pub fn created_time(mut self, created_time: u64) -> Self {
        self.created_time = Some(created_time);
        self
    }

    /// Transaction quorum. Defaults to 1.
    pub fn quorum(mut self, quorum: i64) -> Self {
        self.quorum = quorum;
        self
    }

    /// Mark the transaction as a batch member. `reduced_hashes` holds the
    /// reduced hash of every member, this one included, in batch order.
    /// A later call replaces an earlier one.
    pub fn batch_meta<H: AsRef<[u8]>>(mut self, kind: BatchKind, reduced_hashes: &[H]) -> Self {
        let mut f = StagedFields::new();
        let hashes: Vec<Option<Hash>> = reduced_hashes
            .iter()
            .map(|hash| f.take(fields::hash("reduced_hashes", hash.as_ref())))
            .collect();
        if hashes.is_empty() {
            f.take::<()>(Err(ValidationError::EmptyRequiredField {
                field: "reduced_hashes",
            }));
        }
        self.batch_meta = Some(f.finish(BATCH_CONTEXT, || {
            Some(BatchMeta {
                kind,
                reduced_hashes: hashes.into_iter().collect::<Option<Vec<_>>>()?,
            })
        }));
        self
    }

    // -- Commands -----------------------------------------------------------

    pub fn add_peer(self, address: &str, peer_key: &[u8]) -> Self {
        let mut f = StagedFields::new();
        let address = f.take(PeerAddress::parse("address", address));
        let peer_key = f.take(fields::public_key("peer_key", peer_key));
        self.push(f.finish("AddPeer", || {
            Some(Command::AddPeer {
                address: address?,
                peer_key: peer_key?,
            })
        }))
    }

    pub fn add_signatory(self, account_id: &str, public_key: &[u8]) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let public_key = f.take(fields::public_key("public_key", public_key));
        self.push(f.finish("AddSignatory", || {
            Some(Command::AddSignatory {
                account_id: account_id?,
                public_key: public_key?,
            })
        }))
    }

    pub fn remove_signatory(self, account_id: &str, public_key: &[u8]) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let public_key = f.take(fields::public_key("public_key", public_key));
        self.push(f.finish("RemoveSignatory", || {
            Some(Command::RemoveSignatory {
                account_id: account_id?,
                public_key: public_key?,
            })
        }))
    }

    pub fn create_account(self, account_name: &str, domain_id: &str, main_pubkey: &[u8]) -> Self {
        let mut f = StagedFields::new();
        let account_name = f.take(Name::parse("account_name", account_name));
        let domain_id = f.take(DomainId::parse("domain_id", domain_id));
        let main_pubkey = f.take(fields::public_key("main_pubkey", main_pubkey));
        self.push(f.finish("CreateAccount", || {
            Some(Command::CreateAccount {
                account_name: account_name?,
                domain_id: domain_id?,
                main_pubkey: main_pubkey?,
            })
        }))
    }

    pub fn create_domain(self, domain_id: &str, default_role: &str) -> Self {
        let mut f = StagedFields::new();
        let domain_id = f.take(DomainId::parse("domain_id", domain_id));
        let default_role = f.take(Name::parse("default_role", default_role));
        self.push(f.finish("CreateDomain", || {
            Some(Command::CreateDomain {
                domain_id: domain_id?,
                default_role: default_role?,
            })
        }))
    }

    pub fn set_account_quorum(self, account_id: &str, quorum: i64) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let quorum = f.take(Quorum::new("quorum", quorum));
        self.push(f.finish("SetAccountQuorum", || {
            Some(Command::SetAccountQuorum {
                account_id: account_id?,
                quorum: quorum?,
            })
        }))
    }

    /// Move `amount` of `asset_id` between accounts. The description is a
    /// free-form memo, bounded in bytes at build time.
    pub fn transfer_asset(
        self,
        src_account_id: &str,
        dest_account_id: &str,
        asset_id: &str,
        description: &str,
        amount: &str,
    ) -> Self {
        let mut f = StagedFields::new();
        let src_account_id = f.take(AccountId::parse("src_account_id", src_account_id));
        let dest_account_id = f.take(AccountId::parse("dest_account_id", dest_account_id));
        let asset_id = f.take(AssetId::parse("asset_id", asset_id));
        let amount = f.take(Amount::parse("amount", amount));
        self.push(f.finish("TransferAsset", || {
            Some(Command::TransferAsset {
                src_account_id: src_account_id?,
                dest_account_id: dest_account_id?,
                asset_id: asset_id?,
                description: description.to_string(),
                amount: amount?,
            })
        }))
    }

    /// `value` is arbitrary bytes, bounded in size at build time.
    pub fn set_account_detail(self, account_id: &str, key: &str, value: &[u8]) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let key = f.take(DetailKey::parse("key", key));
        self.push(f.finish("SetAccountDetail", || {
            Some(Command::SetAccountDetail {
                account_id: account_id?,
                key: key?,
                value: value.to_vec(),
            })
        }))
    }

    pub fn append_role(self, account_id: &str, role_name: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let role_name = f.take(Name::parse("role_name", role_name));
        self.push(f.finish("AppendRole", || {
            Some(Command::AppendRole {
                account_id: account_id?,
                role_name: role_name?,
            })
        }))
    }

    pub fn detach_role(self, account_id: &str, role_name: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let role_name = f.take(Name::parse("role_name", role_name));
        self.push(f.finish("DetachRole", || {
            Some(Command::DetachRole {
                account_id: account_id?,
                role_name: role_name?,
            })
        }))
    }

    pub fn create_asset(self, asset_name: &str, domain_id: &str, precision: u8) -> Self {
        let mut f = StagedFields::new();
        let asset_name = f.take(Name::parse("asset_name", asset_name));
        let domain_id = f.take(DomainId::parse("domain_id", domain_id));
        self.push(f.finish("CreateAsset", || {
            Some(Command::CreateAsset {
                asset_name: asset_name?,
                domain_id: domain_id?,
                precision,
            })
        }))
    }

    /// Permission order is irrelevant; duplicates collapse.
    pub fn create_role<S: AsRef<str>>(self, role_name: &str, permissions: &[S]) -> Self {
        let mut f = StagedFields::new();
        let role_name = f.take(Name::parse("role_name", role_name));
        let permissions = f.take(RolePermissionSet::parse("permissions", permissions));
        self.push(f.finish("CreateRole", || {
            Some(Command::CreateRole {
                role_name: role_name?,
                permissions: permissions?,
            })
        }))
    }

    pub fn grant_permission(self, account_id: &str, permission: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let permission = f.take(GrantablePermission::parse("permission", permission));
        self.push(f.finish("GrantPermission", || {
            Some(Command::GrantPermission {
                account_id: account_id?,
                permission: permission?,
            })
        }))
    }

    pub fn revoke_permission(self, account_id: &str, permission: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let permission = f.take(GrantablePermission::parse("permission", permission));
        self.push(f.finish("RevokePermission", || {
            Some(Command::RevokePermission {
                account_id: account_id?,
                permission: permission?,
            })
        }))
    }

    pub fn add_asset_quantity(self, asset_id: &str, amount: &str) -> Self {
        let mut f = StagedFields::new();
        let asset_id = f.take(AssetId::parse("asset_id", asset_id));
        let amount = f.take(Amount::parse("amount", amount));
        self.push(f.finish("AddAssetQuantity", || {
            Some(Command::AddAssetQuantity {
                asset_id: asset_id?,
                amount: amount?,
            })
        }))
    }

    pub fn subtract_asset_quantity(self, asset_id: &str, amount: &str) -> Self {
        let mut f = StagedFields::new();
        let asset_id = f.take(AssetId::parse("asset_id", asset_id));
        let amount = f.take(Amount::parse("amount", amount));
        self.push(f.finish("SubtractAssetQuantity", || {
            Some(Command::SubtractAssetQuantity {
                asset_id: asset_id?,
                amount: amount?,
            })
        }))
    }

    /// Append an already-typed command, e.g. one decoded from a request file.
    pub fn command(self, command: Command) -> Self {
        let name = command.name();
        self.push(Staged {
            name,
            result: Ok(command),
        })
    }

    fn push(mut self, staged: Staged<Command>) -> Self {
        self.commands.push(staged);
        self
    }

    // -- Finalization -------------------------------------------------------

    /// Validate against the current wall clock.
    pub fn build(&self) -> Result<UnsignedTransaction, ValidationError> {
        self.build_at(crate::now_ms())
    }

    /// Validate with `now_ms` as the reference time for the freshness window.
    ///
    /// # Errors
    ///
    /// The first violation found. Use [`Self::report_at`] for all of them.
    pub fn build_at(&self, now_ms: u64) -> Result<UnsignedTransaction, ValidationError> {
        match self.finalize(now_ms) {
            Ok(tx) => {
                debug!(
                    creator = %tx.creator_account_id,
                    commands = tx.commands.len(),
                    batched = tx.batch_meta.is_some(),
                    "transaction built"
                );
                Ok(tx)
            }
            Err(report) => {
                debug!(violations = report.len(), first = ?report.first(), "transaction rejected");
                Err(report
                    .into_first()
                    .unwrap_or(ValidationError::EmptyRequiredField { field: "commands" }))
            }
        }
    }

    /// Every violation the builder currently holds, against the wall clock.
    pub fn report(&self) -> ValidationReport {
        self.report_at(crate::now_ms())
    }

    pub fn report_at(&self, now_ms: u64) -> ValidationReport {
        self.finalize(now_ms).err().unwrap_or_default()
    }

    fn finalize(&self, now_ms: u64) -> Result<UnsignedTransaction, ValidationReport> {
        let mut report = ValidationReport::new();

        let creator = match &self.creator {
            Some(raw) => report.check(CONTEXT, AccountId::parse("creator_account_id", raw)),
            None => {
                report.push(
                    CONTEXT,
                    ValidationError::EmptyRequiredField {
                        field: "creator_account_id",
                    },
                );
                None
            }
        };
        let created_time = report.check(
            CONTEXT,
            fields::created_time("created_time", self.created_time, now_ms, &self.config),
        );
        let quorum = report.check(CONTEXT, Quorum::new("quorum", self.quorum));

        if self.commands.is_empty() {
            report.push(CONTEXT, ValidationError::EmptyRequiredField { field: "commands" });
        }

        let mut commands = Vec::with_capacity(self.commands.len());
        for (index, staged) in self.commands.iter().enumerate() {
            let context = command_context(index, staged.name);
            match &staged.result {
                Ok(command) => {
                    for error in command.violations(&self.config) {
                        report.push(context.as_str(), error);
                    }
                    commands.push(command.clone());
                }
                Err(errors) => {
                    for error in errors {
                        report.push(context.as_str(), error.clone());
                    }
                }
            }
        }

        let batch_meta = self.batch_meta.as_ref().and_then(|staged| match &staged.result {
            Ok(meta) => Some(meta.clone()),
            Err(errors) => {
                for error in errors {
                    report.push(staged.name, error.clone());
                }
                None
            }
        });

        match (creator, created_time, quorum) {
            (Some(creator_account_id), Some(created_time), Some(quorum)) if report.is_empty() => {
                Ok(UnsignedTransaction {
                    creator_account_id,
                    created_time,
                    quorum,
                    commands,
                    batch_meta,
                })
            }
            _ => Err(report),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    const NOW: u64 = 1_700_000_000_000;

    fn base() -> TransactionBuilder {
        TransactionBuilder::new()
            .creator_account_id("admin@test")
            .created_time(NOW)
    }

    #[test]
    fn builds_minimal_transaction() {
        let tx = base().create_domain("test", "user").build_at(NOW).unwrap();
        assert_eq!(tx.creator_account_id.as_str(), "admin@test");
        assert_eq!(tx.created_time, NOW);
        assert_eq!(tx.quorum.get(), 1);
        assert_eq!(tx.commands.len(), 1);
    }

    #[test]
    fn build_is_idempotent() {
        let builder = base()
            .add_asset_quantity("coin#test", "10.5")
            .transfer_asset("admin@test", "bob@test", "coin#test", "memo", "1");
        let first = builder.build_at(NOW).unwrap();
        let second = builder.build_at(NOW).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.hash().unwrap(), second.hash().unwrap());
    }

    #[test]
    fn commands_keep_insertion_order() {
        let tx = base()
            .create_domain("test", "user")
            .create_asset("coin", "test", 2)
            .add_asset_quantity("coin#test", "1.00")
            .build_at(NOW)
            .unwrap();
        let names: Vec<_> = tx.commands.iter().map(Command::name).collect();
        assert_eq!(names, ["CreateDomain", "CreateAsset", "AddAssetQuantity"]);
    }

    #[test]
    fn empty_builder_reports_missing_fields() {
        let builder = TransactionBuilder::new();
        let err = builder.build_at(NOW).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::EmptyRequiredField);

        let report = builder.report_at(NOW);
        let fields: Vec<_> = report.violations().iter().map(|v| v.error.field()).collect();
        assert_eq!(fields, ["creator_account_id", "created_time", "commands"]);
    }

    #[test]
    fn report_collects_errors_across_commands() {
        let builder = base()
            .add_signatory("nobody", &[0u8; 31])
            .create_domain("test", "user")
            .set_account_quorum("admin@test", 0);
        let report = builder.report_at(NOW);
        assert_eq!(report.len(), 3);
        assert_eq!(report.violations()[0].context, "Command #1 AddSignatory");
        assert_eq!(report.violations()[2].context, "Command #3 SetAccountQuorum");
        assert_eq!(
            report.kinds(),
            vec![
                ValidationErrorKind::MalformedIdentifier,
                ValidationErrorKind::InvalidKeyLength,
                ValidationErrorKind::QuorumOutOfRange,
            ]
        );
    }

    #[test]
    fn valid_builder_has_empty_report() {
        assert!(base().create_domain("test", "user").report_at(NOW).is_empty());
    }

    #[test]
    fn transaction_quorum_is_validated() {
        let ok = base().quorum(128).create_domain("test", "user").build_at(NOW).unwrap();
        assert_eq!(ok.quorum.get(), 128);

        for bad in [0, 129, -100] {
            let err = base()
                .quorum(bad)
                .create_domain("test", "user")
                .build_at(NOW)
                .unwrap_err();
            assert_eq!(err.kind(), ValidationErrorKind::QuorumOutOfRange);
        }
    }

    #[test]
    fn config_applies_at_build_time() {
        let builder = base().transfer_asset("a@test", "b@test", "coin#test", "0123456789", "1");
        assert!(builder.build_at(NOW).is_ok());

        let tight = ValidationConfig {
            max_description_bytes: 5,
            ..ValidationConfig::default()
        };
        let err = builder.with_config(tight).build_at(NOW).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::ValueTooLarge);
    }

    #[test]
    fn clones_are_independent() {
        let half = base().create_domain("test", "user");
        let a = half.clone().create_asset("coin", "test", 0).build_at(NOW).unwrap();
        let b = half.build_at(NOW).unwrap();
        assert_eq!(a.commands.len(), 2);
        assert_eq!(b.commands.len(), 1);
    }

    #[test]
    fn typed_command_passes_through() {
        let command = Command::CreateDomain {
            domain_id: "test".parse().unwrap(),
            default_role: "user".parse().unwrap(),
        };
        let tx = base().command(command.clone()).build_at(NOW).unwrap();
        assert_eq!(tx.commands, vec![command]);
    }

    #[test]
    fn validate_catches_hand_built_payloads() {
        let mut tx = base().create_domain("test", "user").build_at(NOW).unwrap();
        assert!(tx.validate(NOW, &ValidationConfig::default()).is_empty());

        tx.commands.clear();
        tx.created_time = 0;
        let report = tx.validate(NOW, &ValidationConfig::default());
        assert_eq!(
            report.kinds(),
            vec![
                ValidationErrorKind::StaleOrFutureTimestamp,
                ValidationErrorKind::EmptyRequiredField
            ]
        );
    }

    #[test]
    fn canonical_bytes_differ_with_content() {
        let a = base().create_domain("test", "user").build_at(NOW).unwrap();
        let b = base().create_domain("test", "admin").build_at(NOW).unwrap();
        assert_ne!(a.canonical_bytes().unwrap(), b.canonical_bytes().unwrap());
        assert_ne!(a.hash().unwrap(), b.hash().unwrap());
    }

    #[test]
    fn reduced_hash_ignores_batch_meta() {
        let plain = base().create_domain("test", "user").build_at(NOW).unwrap();
        let reduced = plain.reduced_hash().unwrap();
        let batched = base()
            .create_domain("test", "user")
            .batch_meta(BatchKind::Atomic, &[reduced.as_bytes()])
            .build_at(NOW)
            .unwrap();

        assert_eq!(batched.reduced_hash().unwrap(), reduced);
        assert_ne!(batched.hash().unwrap(), plain.hash().unwrap());
        assert_ne!(plain.reduced_hash().unwrap(), plain.hash().unwrap());
    }

    #[test]
    fn batch_meta_hashes_are_validated() {
        let tx = base()
            .create_domain("test", "user")
            .batch_meta(BatchKind::Ordered, &[[1u8; 32], [2u8; 32]])
            .build_at(NOW)
            .unwrap();
        let meta = tx.batch_meta.unwrap();
        assert_eq!(meta.kind, BatchKind::Ordered);
        assert_eq!(meta.reduced_hashes.len(), 2);

        let report = base()
            .create_domain("test", "user")
            .batch_meta(BatchKind::Atomic, &[&[1u8; 32][..], &[2u8; 31][..], &[][..]])
            .report_at(NOW);
        assert_eq!(
            report.kinds(),
            vec![ValidationErrorKind::InvalidHashLength, ValidationErrorKind::InvalidHashLength]
        );
        assert!(report.violations().iter().all(|v| v.context == "BatchMeta"));

        let empty: [[u8; 32]; 0] = [];
        let err = base()
            .create_domain("test", "user")
            .batch_meta(BatchKind::Atomic, &empty)
            .build_at(NOW)
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::EmptyRequiredField);
    }

    #[test]
    fn validate_rejects_empty_batch_meta() {
        let mut tx = base().create_domain("test", "user").build_at(NOW).unwrap();
        tx.batch_meta = Some(BatchMeta {
            kind: BatchKind::Atomic,
            reduced_hashes: Vec::new(),
        });
        let report = tx.validate(NOW, &ValidationConfig::default());
        assert_eq!(report.kinds(), vec![ValidationErrorKind::EmptyRequiredField]);
    }
}
