//! The command model: every ledger mutation a transaction can carry.

use serde::{Deserialize, Serialize};

use super::types::{AccountId, Amount, AssetId, DetailKey, DomainId, Name, PeerAddress, Quorum};
use crate::config::ValidationConfig;
use crate::crypto::PublicKey;
use crate::permissions::{GrantablePermission, RolePermissionSet};
use crate::validation::{fields, ValidationError};

/// One ledger-mutating instruction.
///
/// Variants carry only validated types, so identifier grammar, key lengths,
/// quorum range, and permission membership hold by construction. What is
/// left is checked by [`Command::violations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    AddPeer {
        address: PeerAddress,
        peer_key: PublicKey,
    },
    AddSignatory {
        account_id: AccountId,
        public_key: PublicKey,
    },
    RemoveSignatory {
        account_id: AccountId,
        public_key: PublicKey,
    },
    CreateAccount {
        account_name: Name,
        domain_id: DomainId,
        main_pubkey: PublicKey,
    },
    CreateDomain {
        domain_id: DomainId,
        default_role: Name,
    },
    SetAccountQuorum {
        account_id: AccountId,
        quorum: Quorum,
    },
    TransferAsset {
        src_account_id: AccountId,
        dest_account_id: AccountId,
        asset_id: AssetId,
        description: String,
        amount: Amount,
    },
    SetAccountDetail {
        account_id: AccountId,
        key: DetailKey,
        /// Opaque bytes; the ledger does not interpret them.
        value: Vec<u8>,
    },
    AppendRole {
        account_id: AccountId,
        role_name: Name,
    },
    DetachRole {
        account_id: AccountId,
        role_name: Name,
    },
    CreateAsset {
        asset_name: Name,
        domain_id: DomainId,
        precision: u8,
    },
    CreateRole {
        role_name: Name,
        permissions: RolePermissionSet,
    },
    GrantPermission {
        account_id: AccountId,
        permission: GrantablePermission,
    },
    RevokePermission {
        account_id: AccountId,
        permission: GrantablePermission,
    },
    AddAssetQuantity {
        asset_id: AssetId,
        amount: Amount,
    },
    SubtractAssetQuantity {
        asset_id: AssetId,
        amount: Amount,
    },
}

impl Command {
    /// Variant name, used as report context.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPeer { .. } => "AddPeer",
            Self::AddSignatory { .. } => "AddSignatory",
            Self::RemoveSignatory { .. } => "RemoveSignatory",
            Self::CreateAccount { .. } => "CreateAccount",
            Self::CreateDomain { .. } => "CreateDomain",
            Self::SetAccountQuorum { .. } => "SetAccountQuorum",
            Self::TransferAsset { .. } => "TransferAsset",
            Self::SetAccountDetail { .. } => "SetAccountDetail",
            Self::AppendRole { .. } => "AppendRole",
            Self::DetachRole { .. } => "DetachRole",
            Self::CreateAsset { .. } => "CreateAsset",
            Self::CreateRole { .. } => "CreateRole",
            Self::GrantPermission { .. } => "GrantPermission",
            Self::RevokePermission { .. } => "RevokePermission",
            Self::AddAssetQuantity { .. } => "AddAssetQuantity",
            Self::SubtractAssetQuantity { .. } => "SubtractAssetQuantity",
        }
    }

    /// Rules the field types cannot carry: configurable size limits and
    /// amount positivity.
    pub fn violations(&self, config: &ValidationConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        match self {
            Self::TransferAsset {
                description,
                amount,
                ..
            } => {
                errors.extend(
                    fields::max_bytes("description", description.len(), config.max_description_bytes)
                        .err(),
                );
                errors.extend(positive("amount", amount).err());
            }
            Self::SetAccountDetail { value, .. } => {
                errors.extend(
                    fields::max_bytes("value", value.len(), config.max_detail_value_bytes).err(),
                );
            }
            Self::AddAssetQuantity { amount, .. } | Self::SubtractAssetQuantity { amount, .. } => {
                errors.extend(positive("amount", amount).err());
            }
            _ => {}
        }
        errors
    }
}

fn positive(field: &'static str, amount: &Amount) -> Result<(), ValidationError> {
    fields::positive_amount(field, amount.mantissa(), &amount.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn transfer(description: &str, amount: &str) -> Command {
        Command::TransferAsset {
            src_account_id: "alice@test".parse().unwrap(),
            dest_account_id: "bob@test".parse().unwrap(),
            asset_id: "coin#test".parse().unwrap(),
            description: description.to_string(),
            amount: amount.parse().unwrap(),
        }
    }

    #[test]
    fn transfer_limits() {
        let config = ValidationConfig::default();
        assert!(transfer("", "1").violations(&config).is_empty());
        assert!(transfer(&"a".repeat(64), "1").violations(&config).is_empty());

        let errors = transfer(&"a".repeat(65), "0").violations(&config);
        let kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![ValidationErrorKind::ValueTooLarge, ValidationErrorKind::OutOfRangeAmount]
        );
    }

    #[test]
    fn detail_value_limit_follows_config() {
        let command = Command::SetAccountDetail {
            account_id: "alice@test".parse().unwrap(),
            key: "key".parse().unwrap(),
            value: vec![0xff; 11],
        };
        assert!(command.violations(&ValidationConfig::default()).is_empty());

        let tight = ValidationConfig {
            max_detail_value_bytes: 10,
            ..ValidationConfig::default()
        };
        assert_eq!(command.violations(&tight).len(), 1);
    }

    #[test]
    fn quantity_must_be_positive() {
        let command = Command::SubtractAssetQuantity {
            asset_id: "coin#test".parse().unwrap(),
            amount: "0.00".parse().unwrap(),
        };
        assert_eq!(command.name(), "SubtractAssetQuantity");
        assert_eq!(command.violations(&ValidationConfig::default()).len(), 1);
    }
}
