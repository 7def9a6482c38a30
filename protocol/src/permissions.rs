//! # Permissions
//!
//! The ledger knows a fixed, closed set of role permissions. Roles are built
//! from them (`CreateRole`), and a small subset of account-scoped
//! permissions can additionally be granted from one account to another
//! (`GrantPermission` / `RevokePermission`).
//!
//! Both sets are plain enums, so the relationship between a grantable
//! permission and the role permission that protects it is a `match`, not a
//! string comparison scattered across call sites.
//!
//! Permission lists are parsed as sets. Order never matters and duplicates
//! collapse.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

// ---------------------------------------------------------------------------
// RolePermission
// ---------------------------------------------------------------------------

macro_rules! role_permissions {
    ($($variant:ident => $name:literal,)+) => {
        /// A permission that can be attached to a role.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum RolePermission {
            $($variant,)+
        }

        impl RolePermission {
            /// Every role permission, in declaration order.
            pub const ALL: &'static [RolePermission] = &[$(RolePermission::$variant,)+];

            /// Wire name, e.g. `can_transfer`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(RolePermission::$variant => $name,)+
                }
            }

            fn lookup(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(RolePermission::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

role_permissions! {
    AppendRole => "can_append_role",
    CreateRole => "can_create_role",
    DetachRole => "can_detach_role",
    AddAssetQty => "can_add_asset_qty",
    SubtractAssetQty => "can_subtract_asset_qty",
    AddPeer => "can_add_peer",
    AddSignatory => "can_add_signatory",
    RemoveSignatory => "can_remove_signatory",
    SetQuorum => "can_set_quorum",
    CreateAccount => "can_create_account",
    SetDetail => "can_set_detail",
    CreateAsset => "can_create_asset",
    Transfer => "can_transfer",
    Receive => "can_receive",
    CreateDomain => "can_create_domain",
    ReadAssets => "can_read_assets",
    GetRoles => "can_get_roles",
    GetMyAccount => "can_get_my_account",
    GetAllAccounts => "can_get_all_accounts",
    GetDomainAccounts => "can_get_domain_accounts",
    GetMySignatories => "can_get_my_signatories",
    GetAllSignatories => "can_get_all_signatories",
    GetDomainSignatories => "can_get_domain_signatories",
    GetMyAccAst => "can_get_my_acc_ast",
    GetAllAccAst => "can_get_all_acc_ast",
    GetDomainAccAst => "can_get_domain_acc_ast",
    GetMyAccDetail => "can_get_my_acc_detail",
    GetAllAccDetail => "can_get_all_acc_detail",
    GetDomainAccDetail => "can_get_domain_acc_detail",
    GetMyAccTxs => "can_get_my_acc_txs",
    GetAllAccTxs => "can_get_all_acc_txs",
    GetDomainAccTxs => "can_get_domain_acc_txs",
    GetMyAccAstTxs => "can_get_my_acc_ast_txs",
    GetAllAccAstTxs => "can_get_all_acc_ast_txs",
    GetDomainAccAstTxs => "can_get_domain_acc_ast_txs",
    GetMyTxs => "can_get_my_txs",
    GetAllTxs => "can_get_all_txs",
    GetBlocks => "can_get_blocks",
    SetMyQuorum => "can_set_my_quorum",
    AddMySignatory => "can_add_my_signatory",
    RemoveMySignatory => "can_remove_my_signatory",
    TransferMyAssets => "can_transfer_my_assets",
    SetMyAccountDetail => "can_set_my_account_detail",
    GrantAddMySignatory => "can_grant_can_add_my_signatory",
    GrantRemoveMySignatory => "can_grant_can_remove_my_signatory",
    GrantSetMyQuorum => "can_grant_can_set_my_quorum",
    GrantSetMyAccountDetail => "can_grant_can_set_my_account_detail",
    GrantTransferMyAssets => "can_grant_can_transfer_my_assets",
}

impl RolePermission {
    /// Parse a permission name, reporting failures against `field`.
    pub fn parse(field: &'static str, name: &str) -> Result<Self, ValidationError> {
        Self::lookup(name).ok_or_else(|| ValidationError::UnknownPermission {
            field,
            value: name.to_string(),
        })
    }
}

impl fmt::Display for RolePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RolePermission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("permission", s)
    }
}

impl TryFrom<String> for RolePermission {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RolePermission> for String {
    fn from(value: RolePermission) -> Self {
        value.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// GrantablePermission
// ---------------------------------------------------------------------------

/// A permission one account can grant to another over its own resources.
///
/// This is a strict subset of the recognized permission names. Read
/// permissions such as `can_read_assets` are valid role permissions but
/// never grantable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GrantablePermission {
    AddMySignatory,
    RemoveMySignatory,
    SetMyQuorum,
    SetMyAccountDetail,
    TransferMyAssets,
}

impl GrantablePermission {
    /// Every grantable permission.
    pub const ALL: [GrantablePermission; 5] = [
        GrantablePermission::AddMySignatory,
        GrantablePermission::RemoveMySignatory,
        GrantablePermission::SetMyQuorum,
        GrantablePermission::SetMyAccountDetail,
        GrantablePermission::TransferMyAssets,
    ];

    /// Wire name. Shares its spelling with the matching role permission.
    pub fn as_str(&self) -> &'static str {
        self.role_permission().as_str()
    }

    /// The role permission guarding the same action.
    pub fn role_permission(&self) -> RolePermission {
        match self {
            Self::AddMySignatory => RolePermission::AddMySignatory,
            Self::RemoveMySignatory => RolePermission::RemoveMySignatory,
            Self::SetMyQuorum => RolePermission::SetMyQuorum,
            Self::SetMyAccountDetail => RolePermission::SetMyAccountDetail,
            Self::TransferMyAssets => RolePermission::TransferMyAssets,
        }
    }

    /// The role permission an account needs in order to grant this one.
    pub fn grant_permission(&self) -> RolePermission {
        match self {
            Self::AddMySignatory => RolePermission::GrantAddMySignatory,
            Self::RemoveMySignatory => RolePermission::GrantRemoveMySignatory,
            Self::SetMyQuorum => RolePermission::GrantSetMyQuorum,
            Self::SetMyAccountDetail => RolePermission::GrantSetMyAccountDetail,
            Self::TransferMyAssets => RolePermission::GrantTransferMyAssets,
        }
    }

    /// Parse a grantable permission name.
    ///
    /// A recognized role permission that is not grantable fails with
    /// `NonGrantablePermission`; anything else fails with
    /// `UnknownPermission`.
    pub fn parse(field: &'static str, name: &str) -> Result<Self, ValidationError> {
        let role = RolePermission::parse(field, name)?;
        Self::ALL
            .into_iter()
            .find(|grantable| grantable.role_permission() == role)
            .ok_or_else(|| ValidationError::NonGrantablePermission {
                field,
                value: name.to_string(),
            })
    }
}

impl fmt::Display for GrantablePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantablePermission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("permission", s)
    }
}

impl TryFrom<String> for GrantablePermission {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GrantablePermission> for String {
    fn from(value: GrantablePermission) -> Self {
        value.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// RolePermissionSet
// ---------------------------------------------------------------------------

/// The non-empty permission set of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeSet<RolePermission>")]
pub struct RolePermissionSet(BTreeSet<RolePermission>);

impl RolePermissionSet {
    /// Parse a list of permission names.
    ///
    /// Every name is checked, so the first unknown name is reported no
    /// matter where it sits in the list. An empty list is rejected.
    pub fn parse<S: AsRef<str>>(field: &'static str, names: &[S]) -> Result<Self, ValidationError> {
        let set = names
            .iter()
            .map(|name| RolePermission::parse(field, name.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Self::from_set(field, set)
    }

    fn from_set(field: &'static str, set: BTreeSet<RolePermission>) -> Result<Self, ValidationError> {
        if set.is_empty() {
            return Err(ValidationError::EmptyRequiredField { field });
        }
        Ok(Self(set))
    }

    pub fn contains(&self, permission: RolePermission) -> bool {
        self.0.contains(&permission)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RolePermission> {
        self.0.iter()
    }
}

impl TryFrom<BTreeSet<RolePermission>> for RolePermissionSet {
    type Error = ValidationError;

    fn try_from(set: BTreeSet<RolePermission>) -> Result<Self, Self::Error> {
        Self::from_set("permissions", set)
    }
}
