use recipebox_auth_types::token::is_well_formed;
use recipebox_server::error::RecipeboxError;
use recipebox_server::usecase::token::{AuthenticateUseCase, IssueTokenInput, IssueTokenUseCase};

use crate::helpers::{MemoryDb, MockTokenRepo, MockUserRepo, test_hasher, test_user};

fn issue(db: &MemoryDb) -> IssueTokenUseCase<MockUserRepo, MockTokenRepo> {
    IssueTokenUseCase {
        users: db.users(),
        tokens: db.tokens(),
        hasher: test_hasher(),
    }
}

fn credentials(email: &str, password: &str) -> IssueTokenInput {
    IssueTokenInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

// ── IssueToken ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_token_for_valid_credentials() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("test@example.com", "testpass123"));

    let token = issue(&db)
        .execute(credentials("test@example.com", "testpass123"))
        .await
        .unwrap();

    assert_eq!(token.user_id, user.id);
    assert!(is_well_formed(&token.key));
}

#[tokio::test]
async fn should_reuse_existing_token() {
    let db = MemoryDb::new();
    db.insert_user(test_user("test@example.com", "testpass123"));
    let uc = issue(&db);

    let first = uc
        .execute(credentials("test@example.com", "testpass123"))
        .await
        .unwrap();
    let second = uc
        .execute(credentials("test@EXAMPLE.COM", "testpass123"))
        .await
        .unwrap();

    assert_eq!(first.key, second.key);
    assert_eq!(db.token_count(), 1);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let db = MemoryDb::new();
    db.insert_user(test_user("test@example.com", "goodpass"));

    let err = issue(&db)
        .execute(credentials("test@example.com", "badpass"))
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::InvalidCredentials));
    assert_eq!(db.token_count(), 0);
}

#[tokio::test]
async fn should_reject_unknown_email() {
    let db = MemoryDb::new();

    let err = issue(&db)
        .execute(credentials("nobody@example.com", "testpass123"))
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::InvalidCredentials));
}

#[tokio::test]
async fn should_reject_inactive_user() {
    let db = MemoryDb::new();
    let mut user = test_user("test@example.com", "testpass123");
    user.is_active = false;
    db.insert_user(user);

    let err = issue(&db)
        .execute(credentials("test@example.com", "testpass123"))
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::InvalidCredentials));
}

#[tokio::test]
async fn should_reject_blank_password() {
    let db = MemoryDb::new();
    db.insert_user(test_user("test@example.com", "testpass123"));

    let err = issue(&db)
        .execute(credentials("test@example.com", ""))
        .await
        .unwrap_err();

    match err {
        RecipeboxError::Validation(fields) => assert!(fields.contains("password")),
        other => panic!("expected Validation, got {other:?}"),
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_authenticate_known_token() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("test@example.com", "testpass123"));
    let key = "a".repeat(40);
    db.insert_token(user.id, &key);
    let uc = AuthenticateUseCase {
        users: db.users(),
        tokens: db.tokens(),
    };

    let found = uc.execute(&key).await.unwrap();

    assert_eq!(found.id, user.id);
}

#[tokio::test]
async fn should_reject_unknown_or_malformed_token() {
    let db = MemoryDb::new();
    let uc = AuthenticateUseCase {
        users: db.users(),
        tokens: db.tokens(),
    };

    let unknown = uc.execute(&"b".repeat(40)).await.unwrap_err();
    let malformed = uc.execute("not-a-token").await.unwrap_err();

    assert!(matches!(unknown, RecipeboxError::Unauthorized));
    assert!(matches!(malformed, RecipeboxError::Unauthorized));
}

#[tokio::test]
async fn should_reject_token_of_inactive_user() {
    let db = MemoryDb::new();
    let mut user = test_user("test@example.com", "testpass123");
    user.is_active = false;
    let user = db.insert_user(user);
    let key = "c".repeat(40);
    db.insert_token(user.id, &key);
    let uc = AuthenticateUseCase {
        users: db.users(),
        tokens: db.tokens(),
    };

    let err = uc.execute(&key).await.unwrap_err();

    assert!(matches!(err, RecipeboxError::Unauthorized));
}
