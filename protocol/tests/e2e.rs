//! End-to-end integration tests for the ledger protocol.
//!
//! These tests take a request from raw client input to bytes on the wire and
//! back: build, sign, encode, decode, verify. They also pin down the
//! boundary values that clients most often trip over (amount bounds, detail
//! value size, description length, timestamps).
//!
//! Every test uses a fixed reference time, so nothing depends on the clock.

use ledger_protocol::config::ValidationConfig;
use ledger_protocol::crypto::{sha256, Keypair};
use ledger_protocol::query::{sign_query, verify_query, QueryBuilder, QueryError, SignedQuery};
use ledger_protocol::transaction::{
    assemble_batch, sign_transaction, validate_batch, verify_transaction, BatchError, BatchKind,
    Command, SignedTransaction, TransactionBuilder, TransactionError,
};
use ledger_protocol::validation::{ValidationError, ValidationErrorKind};
use ledger_protocol::wire::{self, DecodeError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const NOW: u64 = 1_700_000_000_000;

/// 2^256 - 1, the largest amount mantissa a ledger will accept.
const UINT256_MAX: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

/// 2^256.
const UINT256_OVERFLOW: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639936";

fn admin_builder() -> TransactionBuilder {
    TransactionBuilder::new()
        .creator_account_id("admin@test")
        .created_time(NOW)
}

/// Build, sign, encode, decode, and verify. Returns the decoded payload.
fn round_trip(builder: TransactionBuilder, keypair: &Keypair) -> SignedTransaction {
    let tx = builder.build_at(NOW).expect("transaction builds");
    let signed = sign_transaction(tx, keypair).unwrap();
    let bytes = wire::encode(&signed).unwrap();
    let decoded: SignedTransaction = wire::decode(&bytes).expect("wire decode");
    verify_transaction(&decoded, NOW, &ValidationConfig::default()).expect("verifies");
    assert_eq!(decoded, signed);
    decoded
}

// ---------------------------------------------------------------------------
// Transaction Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn add_peer_end_to_end() {
    let keypair = Keypair::generate();
    let peer_key = [0x11u8; 32];
    let decoded = round_trip(
        admin_builder().add_peer("123.123.123.123:123", &peer_key),
        &keypair,
    );

    assert_eq!(decoded.payload.creator_account_id.as_str(), "admin@test");
    assert_eq!(decoded.payload.created_time, NOW);
    assert_eq!(decoded.payload.quorum.get(), 1);
    match &decoded.payload.commands[..] {
        [Command::AddPeer { address, peer_key: key }] => {
            assert_eq!(address.as_str(), "123.123.123.123:123");
            assert_eq!(key.as_bytes(), &peer_key);
        }
        other => panic!("expected a single AddPeer, got {:?}", other),
    }
}

#[test]
fn multi_signature_transaction_reaches_quorum() {
    let alice = Keypair::generate();
    let bob = Keypair::generate();

    let tx = admin_builder()
        .quorum(2)
        .transfer_asset("admin@test", "alice@test", "coin#test", "split bill", "12.34")
        .build_at(NOW)
        .unwrap();

    let mut signed = sign_transaction(tx, &alice).unwrap();
    assert!(!signed.has_quorum());
    signed.add_signature(&bob).unwrap();
    assert!(signed.has_quorum());

    let decoded: SignedTransaction = wire::decode(&wire::encode(&signed).unwrap()).unwrap();
    assert_eq!(decoded.signatures.len(), 2);
    assert!(verify_transaction(&decoded, NOW, &ValidationConfig::default()).is_ok());
}

#[test]
fn building_twice_gives_the_same_transaction() {
    let builder = admin_builder()
        .create_domain("test", "user")
        .create_asset("coin", "test", 2)
        .add_asset_quantity("coin#test", "100.00");

    let first = builder.build_at(NOW).unwrap();
    let second = builder.build_at(NOW).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.canonical_bytes().unwrap(), second.canonical_bytes().unwrap());
    assert_eq!(first.hash().unwrap(), second.hash().unwrap());
}

#[test]
fn command_order_is_preserved_and_hashed() {
    let forward = admin_builder()
        .create_domain("test", "user")
        .create_asset("coin", "test", 2)
        .build_at(NOW)
        .unwrap();
    let reversed = admin_builder()
        .create_asset("coin", "test", 2)
        .create_domain("test", "user")
        .build_at(NOW)
        .unwrap();

    assert_eq!(forward.commands[0].name(), "CreateDomain");
    assert_eq!(reversed.commands[0].name(), "CreateAsset");
    assert_ne!(forward.hash().unwrap(), reversed.hash().unwrap());
}

#[test]
fn tampering_after_signing_is_caught() {
    let keypair = Keypair::generate();
    let tx = admin_builder()
        .transfer_asset("admin@test", "bob@test", "coin#test", "", "1")
        .build_at(NOW)
        .unwrap();
    let mut signed = sign_transaction(tx, &keypair).unwrap();
    signed.payload.commands.push(Command::CreateDomain {
        domain_id: "evil".parse().unwrap(),
        default_role: "user".parse().unwrap(),
    });

    let decoded: SignedTransaction = wire::decode(&wire::encode(&signed).unwrap()).unwrap();
    match verify_transaction(&decoded, NOW, &ValidationConfig::default()) {
        Err(TransactionError::Signature(_)) => {}
        other => panic!("expected signature failure, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Boundary Values
// ---------------------------------------------------------------------------

#[test]
fn empty_builder_is_rejected() {
    match TransactionBuilder::new().build_at(NOW) {
        Err(ValidationError::EmptyRequiredField { .. }) => {}
        other => panic!("expected EmptyRequiredField, got {:?}", other),
    }
}

#[test]
fn description_of_65_bytes_is_rejected() {
    let description = "a".repeat(65);
    match admin_builder()
        .transfer_asset("admin@test", "bob@test", "coin#test", &description, "1")
        .build_at(NOW)
    {
        Err(ValidationError::ValueTooLarge { field, size, max }) => {
            assert_eq!(field, "description");
            assert_eq!((size, max), (65, 64));
        }
        other => panic!("expected ValueTooLarge, got {:?}", other),
    }
}

#[test]
fn uint256_amount_boundary() {
    let keypair = Keypair::generate();
    let decoded = round_trip(
        admin_builder().add_asset_quantity("coin#test", UINT256_MAX),
        &keypair,
    );
    match &decoded.payload.commands[0] {
        Command::AddAssetQuantity { amount, .. } => assert_eq!(amount.to_string(), UINT256_MAX),
        other => panic!("expected AddAssetQuantity, got {:?}", other),
    }

    match admin_builder()
        .add_asset_quantity("coin#test", UINT256_OVERFLOW)
        .build_at(NOW)
    {
        Err(e) => assert_eq!(e.kind(), ValidationErrorKind::OutOfRangeAmount),
        other => panic!("expected OutOfRangeAmount, got {:?}", other),
    }
}

#[test]
fn detail_value_boundary() {
    let limit = 4 * 1024 * 1024;
    let keypair = Keypair::generate();
    round_trip(
        admin_builder().set_account_detail("admin@test", "blob", &vec![b'v'; limit]),
        &keypair,
    );

    match admin_builder()
        .set_account_detail("admin@test", "blob", &vec![b'v'; limit + 1])
        .build_at(NOW)
    {
        Err(ValidationError::ValueTooLarge { field, .. }) => assert_eq!(field, "value"),
        other => panic!("expected ValueTooLarge, got {:?}", other),
    }
}

#[test]
fn created_time_outside_window_is_rejected() {
    for created_time in [0, NOW - 100_000_000, NOW + 1] {
        match TransactionBuilder::new()
            .creator_account_id("admin@test")
            .created_time(created_time)
            .create_domain("test", "user")
            .build_at(NOW)
        {
            Err(ValidationError::StaleOrFutureTimestamp { value, now, .. }) => {
                assert_eq!(value, created_time);
                assert_eq!(now, NOW);
            }
            other => panic!("expected StaleOrFutureTimestamp for {}, got {:?}", created_time, other),
        }
    }
}

#[test]
fn non_grantable_permission_is_rejected() {
    for builder in [
        admin_builder().grant_permission("bob@test", "can_create_account"),
        admin_builder().revoke_permission("bob@test", "can_create_account"),
    ] {
        match builder.build_at(NOW) {
            Err(ValidationError::NonGrantablePermission { value, .. }) => {
                assert_eq!(value, "can_create_account")
            }
            other => panic!("expected NonGrantablePermission, got {:?}", other),
        }
    }
}

#[test]
fn report_lists_every_violation_in_context() {
    let report = TransactionBuilder::new()
        .created_time(0)
        .add_peer("257.257.257.257", &[0u8; 3])
        .set_account_quorum("admin@test", 0)
        .report_at(NOW);

    let contexts: Vec<&str> = report.violations().iter().map(|v| v.context.as_str()).collect();
    assert_eq!(
        contexts,
        [
            "Transaction",
            "Transaction",
            "Command #1 AddPeer",
            "Command #1 AddPeer",
            "Command #2 SetAccountQuorum",
        ]
    );
    assert_eq!(
        report.kinds(),
        [
            ValidationErrorKind::EmptyRequiredField,
            ValidationErrorKind::StaleOrFutureTimestamp,
            ValidationErrorKind::MalformedHost,
            ValidationErrorKind::InvalidKeyLength,
            ValidationErrorKind::QuorumOutOfRange,
        ]
    );
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[test]
fn query_end_to_end() {
    let keypair = Keypair::generate();
    let query = QueryBuilder::new()
        .creator_account_id("admin@test")
        .created_time(NOW)
        .query_counter(7)
        .get_transactions([sha256(b"one").as_bytes(), sha256(b"two").as_bytes()])
        .build_at(NOW)
        .unwrap();

    let signed = sign_query(query, &keypair).unwrap();
    let decoded: SignedQuery = wire::decode(&wire::encode(&signed).unwrap()).unwrap();
    assert_eq!(decoded, signed);
    assert_eq!(decoded.payload.query_counter, 7);
    assert!(verify_query(&decoded, NOW, &ValidationConfig::default()).is_ok());
}

#[test]
fn query_signature_is_bound_to_signer() {
    let query = QueryBuilder::new()
        .creator_account_id("admin@test")
        .created_time(NOW)
        .query_counter(1)
        .get_roles()
        .build_at(NOW)
        .unwrap();
    let mut signed = sign_query(query, &Keypair::generate()).unwrap();
    signed.signature.public_key = Keypair::generate().public_key();

    match verify_query(&signed, NOW, &ValidationConfig::default()) {
        Err(QueryError::Signature(_)) => {}
        other => panic!("expected signature failure, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

#[test]
fn atomic_batch_survives_the_wire() {
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let members = vec![
        admin_builder()
            .transfer_asset("admin@test", "alice@test", "coin#test", "", "10")
            .build_at(NOW)
            .unwrap(),
        admin_builder()
            .transfer_asset("alice@test", "bob@test", "coin#test", "", "4")
            .build_at(NOW)
            .unwrap(),
    ];

    let signed: Vec<SignedTransaction> = assemble_batch(BatchKind::Atomic, members)
        .unwrap()
        .into_iter()
        .zip([&alice, &bob])
        .map(|(tx, key)| sign_transaction(tx, key).unwrap())
        .collect();

    let decoded: Vec<SignedTransaction> = signed
        .iter()
        .map(|tx| wire::decode(&wire::encode(tx).unwrap()).unwrap())
        .collect();
    assert_eq!(decoded, signed);
    assert_eq!(validate_batch(&decoded), Ok(()));
    for tx in &decoded {
        verify_transaction(tx, NOW, &ValidationConfig::default()).unwrap();
    }

    // Dropping a member breaks the batch.
    assert_eq!(
        validate_batch(&decoded[..1]),
        Err(BatchError::SizeMismatch {
            hashes: 2,
            transactions: 1
        })
    );
}

#[test]
fn batch_meta_from_another_batch_is_caught() {
    let build = |amount: &str| {
        admin_builder()
            .add_asset_quantity("coin#test", amount)
            .build_at(NOW)
            .unwrap()
    };
    let first = assemble_batch(BatchKind::Ordered, vec![build("1"), build("2")]).unwrap();
    let second = assemble_batch(BatchKind::Ordered, vec![build("3"), build("4")]).unwrap();

    let keypair = Keypair::generate();
    let mixed = vec![
        sign_transaction(first[0].clone(), &keypair).unwrap(),
        sign_transaction(second[1].clone(), &keypair).unwrap(),
    ];
    assert_eq!(validate_batch(&mixed), Err(BatchError::HashMismatch { index: 1 }));
}

// ---------------------------------------------------------------------------
// Wire Format
// ---------------------------------------------------------------------------

#[test]
fn transaction_bytes_do_not_decode_as_query() {
    let tx = admin_builder().create_domain("test", "user").build_at(NOW).unwrap();
    let bytes = wire::encode(&sign_transaction(tx, &Keypair::generate()).unwrap()).unwrap();
    assert!(wire::decode::<SignedQuery>(&bytes).is_err());
}

#[test]
fn unknown_version_is_rejected() {
    let tx = admin_builder().create_domain("test", "user").build_at(NOW).unwrap();
    let mut bytes = wire::encode(&sign_transaction(tx, &Keypair::generate()).unwrap()).unwrap();
    bytes[0] = 0xFF;
    match wire::decode::<SignedTransaction>(&bytes) {
        Err(DecodeError::UnsupportedVersion(0xFF)) => {}
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}
