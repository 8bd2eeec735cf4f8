use assert_matches::assert_matches;

use shared_database::{MemoryTokenLedger, TokenLedger};
use shared_models::error::{AppError, AuthError};
use shared_utils::extractor::authenticate;
use shared_utils::test_utils::JwtTestUtils;

const SECRET: &str = JwtTestUtils::SECRET;

#[tokio::test]
async fn missing_token_is_rejected_first() {
    let ledger = MemoryTokenLedger::new();

    let result = authenticate(None, &ledger, SECRET).await;

    assert_matches!(
        result.unwrap_err(),
        AppError::Auth(AuthError::TokenMissing)
    );
}

#[tokio::test]
async fn valid_token_yields_context_with_claims() {
    let ledger = MemoryTokenLedger::new();
    let token = JwtTestUtils::create_test_token("paul", true);

    let context = authenticate(Some(&token), &ledger, SECRET).await.unwrap();

    assert_eq!(context.username, "paul");
    assert!(context.admin);
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() {
    let ledger = MemoryTokenLedger::new();
    let token = JwtTestUtils::create_expired_token("paul", false);

    let result = authenticate(Some(&token), &ledger, SECRET).await;

    assert_matches!(
        result.unwrap_err(),
        AppError::Auth(AuthError::TokenExpired)
    );
}

#[tokio::test]
async fn bad_signature_and_malformed_tokens_are_invalid() {
    let ledger = MemoryTokenLedger::new();

    for token in [
        JwtTestUtils::create_invalid_signature_token("paul"),
        JwtTestUtils::create_malformed_token(),
    ] {
        let result = authenticate(Some(&token), &ledger, SECRET).await;
        assert_matches!(
            result.unwrap_err(),
            AppError::Auth(AuthError::TokenInvalid)
        );
    }
}

#[tokio::test]
async fn revoked_token_is_blacklisted_regardless_of_ttl() {
    let ledger = MemoryTokenLedger::new();
    let token = JwtTestUtils::create_test_token("paul", true);

    ledger.revoke(&token).await.unwrap();

    let result = authenticate(Some(&token), &ledger, SECRET).await;
    assert_matches!(
        result.unwrap_err(),
        AppError::Auth(AuthError::TokenBlacklisted)
    );
}

#[tokio::test]
async fn ledger_check_precedes_expiry_check() {
    let ledger = MemoryTokenLedger::new();
    let token = JwtTestUtils::create_expired_token("paul", false);

    ledger.revoke(&token).await.unwrap();

    // An expired-and-revoked token reports the revocation, since the
    // ledger is consulted before any cryptographic inspection.
    let result = authenticate(Some(&token), &ledger, SECRET).await;
    assert_matches!(
        result.unwrap_err(),
        AppError::Auth(AuthError::TokenBlacklisted)
    );
}

#[tokio::test]
async fn revocation_is_idempotent_and_permanent() {
    let ledger = MemoryTokenLedger::new();
    let token = JwtTestUtils::create_test_token("paul", false);

    ledger.revoke(&token).await.unwrap();
    ledger.revoke(&token).await.unwrap();

    assert!(ledger.is_revoked(&token).await.unwrap());

    // Every subsequent validation keeps failing the same way.
    for _ in 0..3 {
        let result = authenticate(Some(&token), &ledger, SECRET).await;
        assert_matches!(
            result.unwrap_err(),
            AppError::Auth(AuthError::TokenBlacklisted)
        );
    }
}
