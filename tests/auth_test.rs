//! JWT validation in shared-secret mode.
//!
//! Tokens are minted locally with the same HS256 secret the server would be
//! configured with. No running server or database is needed.
//!
//! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use crm_backend::auth::jwt::{Claims, UserMetadata, validate_with_secret};
use crm_backend::auth::{AuthError, TokenVerifier};
use crm_backend::config::{AuthConfig, supabase_project_ref};

/// A fake secret for testing — never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims(sub: &str, exp: usize) -> Claims {
    Claims {
        sub: sub.to_string(),
        exp,
        iat: Some(Utc::now().timestamp() as usize),
        iss: None,
        email: None,
        role: Some("authenticated".to_string()),
        name: None,
        picture: None,
        user_metadata: None,
    }
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

/// Helper: mint a JWT carrying OAuth metadata, signed with the test secret.
fn mint_test_token(sub: &str, email: &str, full_name: &str) -> String {
    let now = Utc::now().timestamp() as usize;
    let mut claims = claims(sub, now + 3600);
    claims.user_metadata = Some(UserMetadata {
        full_name: Some(full_name.to_string()),
        name: None,
        avatar_url: Some("https://example.com/avatar.png".to_string()),
        picture: None,
        email: Some(email.to_string()),
    });
    sign(&claims, TEST_SECRET)
}

#[test]
fn test_valid_token_decodes_correctly() {
    let user_id = Uuid::new_v4();
    let token = mint_test_token(&user_id.to_string(), "alice@example.com", "Alice Smith");

    let claims = validate_with_secret(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.user_email().unwrap(), "alice@example.com");
    assert_eq!(claims.display_name().unwrap(), "Alice Smith");
    assert_eq!(
        claims.avatar_url().unwrap(),
        "https://example.com/avatar.png"
    );
}

#[test]
fn test_expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;
    // Well past the 60s default leeway.
    let token = sign(&claims(&Uuid::new_v4().to_string(), now - 300), TEST_SECRET);

    match validate_with_secret(&token, TEST_SECRET) {
        Err(AuthError::InvalidToken(e)) => {
            assert!(matches!(e.kind(), ErrorKind::ExpiredSignature))
        }
        other => panic!("expected an expired token error, got {other:?}"),
    }
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = mint_test_token(&Uuid::new_v4().to_string(), "bob@example.com", "Bob Jones");

    match validate_with_secret(&token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx") {
        Err(AuthError::InvalidToken(e)) => {
            assert!(matches!(e.kind(), ErrorKind::InvalidSignature))
        }
        other => panic!("expected a signature error, got {other:?}"),
    }
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(validate_with_secret("not.a.valid.jwt", TEST_SECRET).is_err());
}

#[test]
fn test_non_uuid_subject_is_rejected() {
    let now = Utc::now().timestamp() as usize;
    let token = sign(&claims("not-a-uuid", now + 3600), TEST_SECRET);

    let claims = validate_with_secret(&token, TEST_SECRET).unwrap();
    assert!(matches!(claims.user_id(), Err(AuthError::InvalidClaims(_))));
}

#[test]
fn test_top_level_claims_win_over_metadata() {
    let now = Utc::now().timestamp() as usize;
    let mut claims = claims(&Uuid::new_v4().to_string(), now + 3600);
    claims.email = Some("top@example.com".to_string());
    claims.name = Some("Top Level".to_string());
    claims.picture = Some("https://example.com/top.png".to_string());
    claims.user_metadata = Some(UserMetadata {
        full_name: Some("Meta Name".to_string()),
        name: None,
        avatar_url: Some("https://example.com/meta.png".to_string()),
        picture: None,
        email: Some("meta@example.com".to_string()),
    });

    assert_eq!(claims.user_email().unwrap(), "top@example.com");
    assert_eq!(claims.display_name().unwrap(), "Top Level");
    assert_eq!(claims.avatar_url().unwrap(), "https://example.com/top.png");
}

#[test]
fn test_claims_helpers_with_missing_metadata() {
    let now = Utc::now().timestamp() as usize;
    let mut claims = claims(&Uuid::new_v4().to_string(), now + 3600);
    claims.email = Some("bare@example.com".to_string());

    assert_eq!(claims.user_email().unwrap(), "bare@example.com");
    assert!(claims.display_name().is_none());
    assert!(claims.avatar_url().is_none());
}

#[tokio::test]
async fn test_secret_verifier_accepts_signed_tokens() {
    let verifier = TokenVerifier::from_config(&AuthConfig::Secret(TEST_SECRET.to_string()));
    assert_eq!(verifier.provider(), "jwt");

    let user_id = Uuid::new_v4();
    let token = mint_test_token(&user_id.to_string(), "carol@example.com", "Carol");

    let claims = verifier.verify(&token).await.expect("Token should be valid");
    assert_eq!(claims.user_id().unwrap(), user_id);
}

#[test]
fn test_supabase_project_ref_parsing() {
    assert_eq!(
        supabase_project_ref("https://abcdefg.supabase.co").unwrap(),
        "abcdefg"
    );
    assert_eq!(
        supabase_project_ref("https://abcdefg.supabase.co/").unwrap(),
        "abcdefg"
    );
    assert!(supabase_project_ref("http://abcdefg.supabase.co").is_err());
    assert!(supabase_project_ref("https://example.com").is_err());
}
