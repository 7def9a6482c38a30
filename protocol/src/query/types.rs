//! The query model: every read a client can ask the ledger for.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::crypto::Hash;
use crate::transaction::types::{AccountId, AssetId, DetailKey, Name};
use crate::validation::{fields, ValidationError};

/// Page request for transaction listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// `[1, max_page_size]`, 100 by default.
    pub page_size: u32,

    /// Start the page at this transaction. `None` starts at the newest.
    pub first_tx_hash: Option<Hash>,
}

/// One read-only request against ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    GetAccount {
        account_id: AccountId,
    },
    GetSignatories {
        account_id: AccountId,
    },
    GetAccountTransactions {
        account_id: AccountId,
        pagination: Option<Pagination>,
    },
    GetAccountAssetTransactions {
        account_id: AccountId,
        asset_id: AssetId,
        pagination: Option<Pagination>,
    },
    GetAccountAssets {
        account_id: AccountId,
    },
    GetRoles,
    GetAssetInfo {
        asset_id: AssetId,
    },
    GetRolePermissions {
        role_id: Name,
    },
    /// Duplicate hashes collapse. The set must not be empty.
    GetTransactions {
        tx_hashes: BTreeSet<Hash>,
    },
    /// Details of `account_id`, optionally narrowed to one key and/or to
    /// the entries written by one account.
    GetAccountDetail {
        account_id: AccountId,
        key: Option<DetailKey>,
        writer: Option<AccountId>,
    },
}

impl Query {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAccount { .. } => "GetAccount",
            Self::GetSignatories { .. } => "GetSignatories",
            Self::GetAccountTransactions { .. } => "GetAccountTransactions",
            Self::GetAccountAssetTransactions { .. } => "GetAccountAssetTransactions",
            Self::GetAccountAssets { .. } => "GetAccountAssets",
            Self::GetRoles => "GetRoles",
            Self::GetAssetInfo { .. } => "GetAssetInfo",
            Self::GetRolePermissions { .. } => "GetRolePermissions",
            Self::GetTransactions { .. } => "GetTransactions",
            Self::GetAccountDetail { .. } => "GetAccountDetail",
        }
    }

    /// Rules the field types cannot carry: the page size range under
    /// `config`, and a non-empty hash set.
    pub fn violations(&self, config: &ValidationConfig) -> Vec<ValidationError> {
        match self {
            Self::GetAccountTransactions {
                pagination: Some(pagination),
                ..
            }
            | Self::GetAccountAssetTransactions {
                pagination: Some(pagination),
                ..
            } => fields::page_size("page_size", pagination.page_size, config.max_page_size)
                .err()
                .into_iter()
                .collect(),
            Self::GetTransactions { tx_hashes } if tx_hashes.is_empty() => {
                vec![ValidationError::EmptyRequiredField { field: "tx_hashes" }]
            }
            _ => Vec::new(),
        }
    }
}
