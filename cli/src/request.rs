//! # Request Files
//!
//! JSON descriptions of a transaction or query, as accepted by the `tx` and
//! `query` subcommands. Values stay raw here: identifiers, amounts, and
//! permission names are strings; keys, hashes, and account detail values
//! are hex. The builders do
//! all the validating. The only thing checked at this layer is that hex
//! decodes.
//!
//! ```json
//! {
//!   "creator_account_id": "admin@test",
//!   "quorum": 1,
//!   "commands": [
//!     { "type": "create_domain", "domain_id": "test", "default_role": "user" },
//!     { "type": "add_asset_quantity", "asset_id": "coin#test", "amount": "10.00" }
//!   ]
//! }
//! ```
//!
//! `created_time` may be omitted, in which case the current time is used.
//! A batch member adds `"batch": { "type": "atomic", "reduced_hashes": [...] }`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use ledger_protocol::config::ValidationConfig;
use ledger_protocol::query::QueryBuilder;
use ledger_protocol::transaction::{BatchKind, TransactionBuilder};

/// Read and parse a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load validation limits, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ValidationConfig> {
    match path {
        Some(path) => load_json(path),
        None => Ok(ValidationConfig::default()),
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim()).with_context(|| format!("{} is not valid hex", field))
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionRequest {
    pub creator_account_id: String,
    #[serde(default)]
    pub created_time: Option<u64>,
    #[serde(default)]
    pub quorum: Option<i64>,
    pub commands: Vec<CommandRequest>,
    #[serde(default)]
    pub batch: Option<BatchRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchRequest {
    #[serde(rename = "type")]
    pub kind: BatchKindRequest,
    pub reduced_hashes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKindRequest {
    Atomic,
    Ordered,
}

impl From<BatchKindRequest> for BatchKind {
    fn from(kind: BatchKindRequest) -> Self {
        match kind {
            BatchKindRequest::Atomic => BatchKind::Atomic,
            BatchKindRequest::Ordered => BatchKind::Ordered,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandRequest {
    AddPeer {
        address: String,
        peer_key: String,
    },
    AddSignatory {
        account_id: String,
        public_key: String,
    },
    RemoveSignatory {
        account_id: String,
        public_key: String,
    },
    CreateAccount {
        account_name: String,
        domain_id: String,
        main_pubkey: String,
    },
    CreateDomain {
        domain_id: String,
        default_role: String,
    },
    SetAccountQuorum {
        account_id: String,
        quorum: i64,
    },
    TransferAsset {
        src_account_id: String,
        dest_account_id: String,
        asset_id: String,
        #[serde(default)]
        description: String,
        amount: String,
    },
    SetAccountDetail {
        account_id: String,
        key: String,
        value: String,
    },
    AppendRole {
        account_id: String,
        role_name: String,
    },
    DetachRole {
        account_id: String,
        role_name: String,
    },
    CreateAsset {
        asset_name: String,
        domain_id: String,
        precision: u8,
    },
    CreateRole {
        role_name: String,
        permissions: Vec<String>,
    },
    GrantPermission {
        account_id: String,
        permission: String,
    },
    RevokePermission {
        account_id: String,
        permission: String,
    },
    AddAssetQuantity {
        asset_id: String,
        amount: String,
    },
    SubtractAssetQuantity {
        asset_id: String,
        amount: String,
    },
}

impl CommandRequest {
    fn apply(self, builder: TransactionBuilder) -> Result<TransactionBuilder> {
        Ok(match self {
            Self::AddPeer { address, peer_key } => {
                builder.add_peer(&address, &decode_hex("peer_key", &peer_key)?)
            }
            Self::AddSignatory {
                account_id,
                public_key,
            } => builder.add_signatory(&account_id, &decode_hex("public_key", &public_key)?),
            Self::RemoveSignatory {
                account_id,
                public_key,
            } => builder.remove_signatory(&account_id, &decode_hex("public_key", &public_key)?),
            Self::CreateAccount {
                account_name,
                domain_id,
                main_pubkey,
            } => builder.create_account(
                &account_name,
                &domain_id,
                &decode_hex("main_pubkey", &main_pubkey)?,
            ),
            Self::CreateDomain {
                domain_id,
                default_role,
            } => builder.create_domain(&domain_id, &default_role),
            Self::SetAccountQuorum { account_id, quorum } => {
                builder.set_account_quorum(&account_id, quorum)
            }
            Self::TransferAsset {
                src_account_id,
                dest_account_id,
                asset_id,
                description,
                amount,
            } => builder.transfer_asset(
                &src_account_id,
                &dest_account_id,
                &asset_id,
                &description,
                &amount,
            ),
            Self::SetAccountDetail {
                account_id,
                key,
                value,
            } => builder.set_account_detail(&account_id, &key, &decode_hex("value", &value)?),
            Self::AppendRole {
                account_id,
                role_name,
            } => builder.append_role(&account_id, &role_name),
            Self::DetachRole {
                account_id,
                role_name,
            } => builder.detach_role(&account_id, &role_name),
            Self::CreateAsset {
                asset_name,
                domain_id,
                precision,
            } => builder.create_asset(&asset_name, &domain_id, precision),
            Self::CreateRole {
                role_name,
                permissions,
            } => builder.create_role(&role_name, permissions.as_slice()),
            Self::GrantPermission {
                account_id,
                permission,
            } => builder.grant_permission(&account_id, &permission),
            Self::RevokePermission {
                account_id,
                permission,
            } => builder.revoke_permission(&account_id, &permission),
            Self::AddAssetQuantity { asset_id, amount } => {
                builder.add_asset_quantity(&asset_id, &amount)
            }
            Self::SubtractAssetQuantity { asset_id, amount } => {
                builder.subtract_asset_quantity(&asset_id, &amount)
            }
        })
    }
}

impl TransactionRequest {
    /// Feed the request into a builder. Fails only on undecodable hex;
    /// validation happens when the builder is built.
    pub fn into_builder(self, config: ValidationConfig) -> Result<TransactionBuilder> {
        let mut builder = TransactionBuilder::new()
            .with_config(config)
            .creator_account_id(&self.creator_account_id)
            .created_time(self.created_time.unwrap_or_else(ledger_protocol::now_ms));
        if let Some(quorum) = self.quorum {
            builder = builder.quorum(quorum);
        }
        for command in self.commands {
            builder = command.apply(builder)?;
        }
        if let Some(batch) = self.batch {
            let hashes = batch
                .reduced_hashes
                .iter()
                .map(|h| decode_hex("reduced_hashes", h))
                .collect::<Result<Vec<_>>>()?;
            builder = builder.batch_meta(batch.kind.into(), hashes.as_slice());
        }
        Ok(builder)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRequest {
    pub creator_account_id: String,
    #[serde(default)]
    pub created_time: Option<u64>,
    pub query_counter: u64,
    pub query: QueryVariant,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRequest {
    pub page_size: u32,
    #[serde(default)]
    pub first_tx_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryVariant {
    GetAccount {
        account_id: String,
    },
    GetSignatories {
        account_id: String,
    },
    GetAccountTransactions {
        account_id: String,
        #[serde(default)]
        pagination: Option<PageRequest>,
    },
    GetAccountAssetTransactions {
        account_id: String,
        asset_id: String,
        #[serde(default)]
        pagination: Option<PageRequest>,
    },
    GetAccountAssets {
        account_id: String,
    },
    GetRoles,
    GetAssetInfo {
        asset_id: String,
    },
    GetRolePermissions {
        role_id: String,
    },
    GetTransactions {
        tx_hashes: Vec<String>,
    },
    GetAccountDetail {
        account_id: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        writer: Option<String>,
    },
}

fn first_hash(page: &PageRequest) -> Result<Option<Vec<u8>>> {
    page.first_tx_hash
        .as_deref()
        .map(|h| decode_hex("first_tx_hash", h))
        .transpose()
}

impl QueryVariant {
    fn apply(self, builder: QueryBuilder) -> Result<QueryBuilder> {
        Ok(match self {
            Self::GetAccount { account_id } => builder.get_account(&account_id),
            Self::GetSignatories { account_id } => builder.get_signatories(&account_id),
            Self::GetAccountTransactions {
                account_id,
                pagination: None,
            } => builder.get_account_transactions(&account_id),
            Self::GetAccountTransactions {
                account_id,
                pagination: Some(page),
            } => {
                let first = first_hash(&page)?;
                builder.get_account_transactions_paged(&account_id, page.page_size, first.as_deref())
            }
            Self::GetAccountAssetTransactions {
                account_id,
                asset_id,
                pagination: None,
            } => builder.get_account_asset_transactions(&account_id, &asset_id),
            Self::GetAccountAssetTransactions {
                account_id,
                asset_id,
                pagination: Some(page),
            } => {
                let first = first_hash(&page)?;
                builder.get_account_asset_transactions_paged(
                    &account_id,
                    &asset_id,
                    page.page_size,
                    first.as_deref(),
                )
            }
            Self::GetAccountAssets { account_id } => builder.get_account_assets(&account_id),
            Self::GetRoles => builder.get_roles(),
            Self::GetAssetInfo { asset_id } => builder.get_asset_info(&asset_id),
            Self::GetRolePermissions { role_id } => builder.get_role_permissions(&role_id),
            Self::GetTransactions { tx_hashes } => {
                let hashes = tx_hashes
                    .iter()
                    .map(|h| decode_hex("tx_hashes", h))
                    .collect::<Result<Vec<_>>>()?;
                builder.get_transactions(hashes)
            }
            Self::GetAccountDetail {
                account_id,
                key,
                writer,
            } => builder.get_account_detail(&account_id, key.as_deref(), writer.as_deref()),
        })
    }
}

impl QueryRequest {
    pub fn into_builder(self, config: ValidationConfig) -> Result<QueryBuilder> {
        let builder = QueryBuilder::new()
            .with_config(config)
            .creator_account_id(&self.creator_account_id)
            .created_time(self.created_time.unwrap_or_else(ledger_protocol::now_ms))
            .query_counter(self.query_counter);
        self.query.apply(builder)
    }
}
