//! Query construction.
//!
//! [`QueryBuilder`] mirrors the transaction builder, except that it holds
//! exactly one query variant (setting another replaces it) and requires a
//! non-zero query counter.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Pagination, Query};
use crate::config::ValidationConfig;
use crate::crypto::{sha256, Hash};
use crate::transaction::types::{AccountId, AssetId, DetailKey, Name};
use crate::validation::staged::{Staged, StagedFields};
use crate::validation::{fields, ValidationError, ValidationReport};
use crate::wire::{self, EncodeError};

const CONTEXT: &str = "Query";

// ---------------------------------------------------------------------------
// UnsignedQuery
// ---------------------------------------------------------------------------

/// A validated, not-yet-signed query. Canonical bytes are bincode, exactly
/// as for transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedQuery {
    pub creator_account_id: AccountId,
    pub created_time: u64,

    /// Client-side sequence number, strictly positive.
    pub query_counter: u64,

    pub query: Query,
}

impl UnsignedQuery {
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        wire::canonical_bytes(self)
    }

    pub fn hash(&self) -> Result<Hash, EncodeError> {
        Ok(sha256(&self.canonical_bytes()?))
    }

    /// Freshness window, counter, and the query's own limits.
    pub fn validate(&self, now_ms: u64, config: &ValidationConfig) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.check(
            CONTEXT,
            fields::created_time("created_time", Some(self.created_time), now_ms, config),
        );
        report.check(CONTEXT, fields::counter("query_counter", Some(self.query_counter)));
        for error in self.query.violations(config) {
            report.push(self.query.name(), error);
        }
        report
    }
}

// ---------------------------------------------------------------------------
// QueryBuilder
// ---------------------------------------------------------------------------

/// Accumulator for [`UnsignedQuery`].
///
/// ```
/// use ledger_protocol::query::QueryBuilder;
///
/// let query = QueryBuilder::new()
///     .creator_account_id("admin@test")
///     .created_time(ledger_protocol::now_ms())
///     .query_counter(1)
///     .get_account("alice@test")
///     .build()
///     .unwrap();
///
/// assert_eq!(query.query.name(), "GetAccount");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    config: ValidationConfig,
    creator: Option<String>,
    created_time: Option<u64>,
    query_counter: Option<u64>,
    query: Option<Staged<Query>>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn creator_account_id(mut self, account_id: &str) -> Self {
        self.creator = Some(account_id.to_string());
        self
    }

    pub fn created_time(mut self, created_time: u64) -> Self {
        self.created_time = Some(created_time);
        self
    }

    pub fn query_counter(mut self, counter: u64) -> Self {
        self.query_counter = Some(counter);
        self
    }

    // -- Queries ------------------------------------------------------------

    pub fn get_account(self, account_id: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        self.set(f.finish("GetAccount", || {
            Some(Query::GetAccount {
                account_id: account_id?,
            })
        }))
    }

    pub fn get_signatories(self, account_id: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        self.set(f.finish("GetSignatories", || {
            Some(Query::GetSignatories {
                account_id: account_id?,
            })
        }))
    }

    pub fn get_account_transactions(self, account_id: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        self.set(f.finish("GetAccountTransactions", || {
            Some(Query::GetAccountTransactions {
                account_id: account_id?,
                pagination: None,
            })
        }))
    }

    pub fn get_account_transactions_paged(
        self,
        account_id: &str,
        page_size: u32,
        first_tx_hash: Option<&[u8]>,
    ) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let first_tx_hash = f.take(parse_first_hash(first_tx_hash));
        self.set(f.finish("GetAccountTransactions", || {
            Some(Query::GetAccountTransactions {
                account_id: account_id?,
                pagination: Some(Pagination {
                    page_size,
                    first_tx_hash: first_tx_hash?,
                }),
            })
        }))
    }

    pub fn get_account_asset_transactions(self, account_id: &str, asset_id: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let asset_id = f.take(AssetId::parse("asset_id", asset_id));
        self.set(f.finish("GetAccountAssetTransactions", || {
            Some(Query::GetAccountAssetTransactions {
                account_id: account_id?,
                asset_id: asset_id?,
                pagination: None,
            })
        }))
    }

    pub fn get_account_asset_transactions_paged(
        self,
        account_id: &str,
        asset_id: &str,
        page_size: u32,
        first_tx_hash: Option<&[u8]>,
    ) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let asset_id = f.take(AssetId::parse("asset_id", asset_id));
        let first_tx_hash = f.take(parse_first_hash(first_tx_hash));
        self.set(f.finish("GetAccountAssetTransactions", || {
            Some(Query::GetAccountAssetTransactions {
                account_id: account_id?,
                asset_id: asset_id?,
                pagination: Some(Pagination {
                    page_size,
                    first_tx_hash: first_tx_hash?,
                }),
            })
        }))
    }

    pub fn get_account_assets(self, account_id: &str) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        self.set(f.finish("GetAccountAssets", || {
            Some(Query::GetAccountAssets {
                account_id: account_id?,
            })
        }))
    }

    pub fn get_roles(self) -> Self {
        self.set(StagedFields::new().finish("GetRoles", || Some(Query::GetRoles)))
    }

    pub fn get_asset_info(self, asset_id: &str) -> Self {
        let mut f = StagedFields::new();
        let asset_id = f.take(AssetId::parse("asset_id", asset_id));
        self.set(f.finish("GetAssetInfo", || {
            Some(Query::GetAssetInfo {
                asset_id: asset_id?,
            })
        }))
    }

    pub fn get_role_permissions(self, role_id: &str) -> Self {
        let mut f = StagedFields::new();
        let role_id = f.take(Name::parse("role_id", role_id));
        self.set(f.finish("GetRolePermissions", || {
            Some(Query::GetRolePermissions { role_id: role_id? })
        }))
    }

    /// Look up transactions by hash. Every hash must be exactly 32 bytes and
    /// at least one is required.
    pub fn get_transactions<I, B>(self, tx_hashes: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut f = StagedFields::new();
        let parsed: Vec<_> = tx_hashes
            .into_iter()
            .map(|bytes| f.take(fields::hash("tx_hashes", bytes.as_ref())))
            .collect();
        self.set(f.finish("GetTransactions", || {
            Some(Query::GetTransactions {
                tx_hashes: parsed.into_iter().collect::<Option<_>>()?,
            })
        }))
    }

    pub fn get_account_detail(
        self,
        account_id: &str,
        key: Option<&str>,
        writer: Option<&str>,
    ) -> Self {
        let mut f = StagedFields::new();
        let account_id = f.take(AccountId::parse("account_id", account_id));
        let key = f.take(key.map(|k| DetailKey::parse("key", k)).transpose());
        let writer = f.take(writer.map(|w| AccountId::parse("writer", w)).transpose());
        self.set(f.finish("GetAccountDetail", || {
            Some(Query::GetAccountDetail {
                account_id: account_id?,
                key: key?,
                writer: writer?,
            })
        }))
    }

    /// Set an already-typed query.
    pub fn query(self, query: Query) -> Self {
        let name = query.name();
        self.set(Staged {
            name,
            result: Ok(query),
        })
    }

    fn set(mut self, staged: Staged<Query>) -> Self {
        self.query = Some(staged);
        self
    }

    // -- Finalization -------------------------------------------------------

    pub fn build(&self) -> Result<UnsignedQuery, ValidationError> {
        self.build_at(crate::now_ms())
    }

    /// # Errors
    ///
    /// The first violation found. Use [`Self::report_at`] for all of them.
    pub fn build_at(&self, now_ms: u64) -> Result<UnsignedQuery, ValidationError> {
        match self.finalize(now_ms) {
            Ok(query) => {
                debug!(
                    creator = %query.creator_account_id,
                    query = query.query.name(),
                    counter = query.query_counter,
                    "query built"
                );
                Ok(query)
            }
            Err(report) => {
                debug!(violations = report.len(), first = ?report.first(), "query rejected");
                Err(report
                    .into_first()
                    .unwrap_or(ValidationError::EmptyRequiredField { field: "query" }))
            }
        }
    }

    pub fn report(&self) -> ValidationReport {
        self.report_at(crate::now_ms())
    }

    pub fn report_at(&self, now_ms: u64) -> ValidationReport {
        self.finalize(now_ms).err().unwrap_or_default()
    }

    fn finalize(&self, now_ms: u64) -> Result<UnsignedQuery, ValidationReport> {
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
        let query_counter =
            report.check(CONTEXT, fields::counter("query_counter", self.query_counter));

        let query = match &self.query {
            None => {
                report.push(CONTEXT, ValidationError::EmptyRequiredField { field: "query" });
                None
            }
            Some(staged) => match &staged.result {
                Ok(query) => {
                    for error in query.violations(&self.config) {
                        report.push(staged.name, error);
                    }
                    Some(query.clone())
                }
                Err(errors) => {
                    for error in errors {
                        report.push(staged.name, error.clone());
                    }
                    None
                }
            },
        };

        match (creator, created_time, query_counter, query) {
            (Some(creator_account_id), Some(created_time), Some(query_counter), Some(query))
                if report.is_empty() =>
            {
                Ok(UnsignedQuery {
                    creator_account_id,
                    created_time,
                    query_counter,
                    query,
                })
            }
            _ => Err(report),
        }
    }
}

fn parse_first_hash(bytes: Option<&[u8]>) -> Result<Option<Hash>, ValidationError> {
    bytes.map(|b| fields::hash("first_tx_hash", b)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    const NOW: u64 = 1_700_000_000_000;

    fn base() -> QueryBuilder {
        QueryBuilder::new()
            .creator_account_id("admin@test")
            .created_time(NOW)
            .query_counter(1)
    }

    #[test]
    fn builds_get_account() {
        let query = base().get_account("alice@test").build_at(NOW).unwrap();
        assert_eq!(query.query_counter, 1);
        assert_eq!(
            query.query,
            Query::GetAccount {
                account_id: "alice@test".parse().unwrap()
            }
        );
    }

    #[test]
    fn missing_query_and_counter() {
        let builder = QueryBuilder::new()
            .creator_account_id("admin@test")
            .created_time(NOW);
        let report = builder.report_at(NOW);
        let fields: Vec<_> = report.violations().iter().map(|v| v.error.field()).collect();
        assert_eq!(fields, ["query_counter", "query"]);
        assert_eq!(
            builder.build_at(NOW).unwrap_err().kind(),
            ValidationErrorKind::EmptyRequiredField
        );
    }

    #[test]
    fn zero_counter_rejected() {
        let err = base().query_counter(0).get_roles().build_at(NOW).unwrap_err();
        assert_eq!(err, ValidationError::EmptyRequiredField { field: "query_counter" });
    }

    #[test]
    fn later_query_replaces_earlier() {
        let query = base()
            .get_account("not valid")
            .get_roles()
            .build_at(NOW)
            .unwrap();
        assert_eq!(query.query, Query::GetRoles);
    }

    #[test]
    fn get_transactions_policies() {
        let ok = base()
            .get_transactions([[1u8; 32], [2u8; 32], [1u8; 32]])
            .build_at(NOW)
            .unwrap();
        match ok.query {
            Query::GetTransactions { tx_hashes } => assert_eq!(tx_hashes.len(), 2),
            other => panic!("expected GetTransactions, got {:?}", other),
        }

        let empty: [&[u8]; 0] = [];
        let err = base().get_transactions(empty).build_at(NOW).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::EmptyRequiredField);

        let bad: [&[u8]; 2] = [&[1u8; 32], &[2u8; 31]];
        let err = base().get_transactions(bad).build_at(NOW).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidHashLength);
    }

    #[test]
    fn pagination_is_checked() {
        let hash = [3u8; 32];
        assert!(base()
            .get_account_transactions_paged("admin@test", 100, Some(&hash[..]))
            .build_at(NOW)
            .is_ok());

        let err = base()
            .get_account_asset_transactions_paged("admin@test", "coin#test", 101, None)
            .build_at(NOW)
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::ValueTooLarge);

        let err = base()
            .get_account_transactions_paged("admin@test", 10, Some(&[0u8; 3][..]))
            .build_at(NOW)
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidHashLength);
    }

    #[test]
    fn account_detail_filters() {
        assert!(base()
            .get_account_detail("admin@test", Some("age"), Some("bob@test"))
            .build_at(NOW)
            .is_ok());
        assert!(base()
            .get_account_detail("admin@test", None, None)
            .build_at(NOW)
            .is_ok());

        let report = base()
            .get_account_detail("admin@test", Some("bad key"), Some("bob"))
            .report_at(NOW);
        assert_eq!(report.len(), 2);
        assert_eq!(report.violations()[0].context, "GetAccountDetail");
    }

    #[test]
    fn build_is_idempotent() {
        let builder = base().get_signatories("admin@test");
        assert_eq!(builder.build_at(NOW).unwrap(), builder.build_at(NOW).unwrap());
    }

    #[test]
    fn validate_rechecks_counter() {
        let mut query = base().get_roles().build_at(NOW).unwrap();
        assert!(query.validate(NOW, &ValidationConfig::default()).is_empty());
        query.query_counter = 0;
        assert_eq!(query.validate(NOW, &ValidationConfig::default()).len(), 1);
    }
}
