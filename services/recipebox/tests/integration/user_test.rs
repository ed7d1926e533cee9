use recipebox_server::domain::repository::UserRepository;
use recipebox_server::error::RecipeboxError;
use recipebox_server::usecase::user::{
    AdminCreateUserInput, AdminCreateUserUseCase, CreateSuperuserUseCase, CreateUserInput,
    CreateUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateMeInput, UpdateMeUseCase,
};

use crate::helpers::{MemoryDb, test_hasher, test_user};

fn input(email: &str, password: &str, name: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_owned(),
        password: password.to_owned(),
        name: name.to_owned(),
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_user_with_hashed_password() {
    let db = MemoryDb::new();
    let uc = CreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let user = uc
        .execute(input("test@example.com", "testpass123", "Test Name"))
        .await
        .unwrap();

    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.name, "Test Name");
    assert!(user.is_active);
    assert!(!user.is_staff);
    assert_ne!(user.password, "testpass123");
    let stored = db.user(user.id).unwrap();
    assert!(test_hasher().verify("testpass123", &stored.password).unwrap());
}

#[tokio::test]
async fn should_normalize_email_domain() {
    let db = MemoryDb::new();
    let uc = CreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let user = uc
        .execute(input("Test2@EXAMPLE.COM", "testpass123", "Test"))
        .await
        .unwrap();

    assert_eq!(user.email, "Test2@example.com");
}

#[tokio::test]
async fn should_reject_empty_email() {
    let db = MemoryDb::new();
    let uc = CreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let err = uc.execute(input("", "testpass123", "Test")).await.unwrap_err();

    match err {
        RecipeboxError::Validation(fields) => assert!(fields.contains("email")),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_short_password_and_blank_name() {
    let db = MemoryDb::new();
    let uc = CreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let err = uc
        .execute(input("test@example.com", "pw", "  "))
        .await
        .unwrap_err();

    match err {
        RecipeboxError::Validation(fields) => {
            assert!(fields.contains("password"));
            assert!(fields.contains("name"));
            assert!(!fields.contains("email"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(db.users().find_by_email("test@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let db = MemoryDb::new();
    let uc = CreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };
    uc.execute(input("test@example.com", "testpass123", "First"))
        .await
        .unwrap();

    let err = uc
        .execute(input("test@EXAMPLE.com", "otherpass", "Second"))
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::UserAlreadyExists));
}

// ── CreateSuperuser ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_superuser_with_staff_flags() {
    let db = MemoryDb::new();
    let uc = CreateSuperuserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let user = uc.execute("admin@example.com", "adminpass").await.unwrap();

    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert!(user.is_active);
}

#[tokio::test]
async fn should_reject_superuser_without_email() {
    let db = MemoryDb::new();
    let uc = CreateSuperuserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let err = uc.execute("", "adminpass").await.unwrap_err();

    assert_eq!(err.kind(), "VALIDATION");
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_name_and_password() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("me@example.com", "oldpass123"));
    let uc = UpdateMeUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let updated = uc
        .execute(
            user.clone(),
            UpdateMeInput {
                name: Some("Updated name".to_owned()),
                password: Some("newpass123".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Updated name");
    let stored = db.user(user.id).unwrap();
    assert_eq!(stored.name, "Updated name");
    assert!(test_hasher().verify("newpass123", &stored.password).unwrap());
    assert!(!test_hasher().verify("oldpass123", &stored.password).unwrap());
}

#[tokio::test]
async fn should_return_user_unchanged_on_empty_update() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("me@example.com", "oldpass123"));
    let uc = UpdateMeUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let same = uc
        .execute(user.clone(), UpdateMeInput::default())
        .await
        .unwrap();

    assert_eq!(same.updated_at, user.updated_at);
    assert_eq!(same.password, user.password);
}

#[tokio::test]
async fn should_reject_email_taken_by_another_user() {
    let db = MemoryDb::new();
    db.insert_user(test_user("other@example.com", "otherpass"));
    let user = db.insert_user(test_user("me@example.com", "mypass123"));
    let uc = UpdateMeUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let err = uc
        .execute(
            user,
            UpdateMeInput {
                email: Some("other@example.com".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::UserAlreadyExists));
}

#[tokio::test]
async fn should_reject_short_new_password() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("me@example.com", "mypass123"));
    let uc = UpdateMeUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let err = uc
        .execute(
            user.clone(),
            UpdateMeInput {
                password: Some("pw".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "VALIDATION");
    let stored = db.user(user.id).unwrap();
    assert_eq!(stored.password, user.password);
}

// ── Admin ────────────────────────────────────────────────────────────────────

fn staff_user(db: &MemoryDb) -> recipebox_server::domain::types::User {
    let mut admin = test_user("admin@example.com", "testpass123");
    admin.is_staff = true;
    admin.is_superuser = true;
    db.insert_user(admin)
}

fn admin_input(email: &str, is_staff: bool, is_superuser: bool) -> AdminCreateUserInput {
    AdminCreateUserInput {
        email: email.to_owned(),
        password: "testpass123".to_owned(),
        name: String::new(),
        is_staff,
        is_superuser,
    }
}

#[tokio::test]
async fn should_list_users_for_staff() {
    let db = MemoryDb::new();
    let admin = staff_user(&db);
    let user = db.insert_user(test_user("user@example.com", "testpass123"));
    let uc = ListUsersUseCase { repo: db.users() };

    let users = uc.execute(&admin).await.unwrap();

    assert_eq!(users.len(), 2);
    let listed = users.iter().find(|u| u.id == user.id).unwrap();
    assert_eq!(listed.email, "user@example.com");
    assert_eq!(listed.name, "Test User");
}

#[tokio::test]
async fn should_get_user_by_id_for_staff() {
    let db = MemoryDb::new();
    let admin = staff_user(&db);
    let user = db.insert_user(test_user("user@example.com", "testpass123"));
    let uc = GetUserUseCase { repo: db.users() };

    let found = uc.execute(&admin, user.id).await.unwrap();
    assert_eq!(found.email, "user@example.com");

    let err = uc.execute(&admin, uuid::Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, RecipeboxError::UserNotFound));
}

#[tokio::test]
async fn should_forbid_admin_operations_for_non_staff() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("user@example.com", "testpass123"));

    let err = ListUsersUseCase { repo: db.users() }
        .execute(&user)
        .await
        .unwrap_err();
    assert!(matches!(err, RecipeboxError::Forbidden));

    let err = GetUserUseCase { repo: db.users() }
        .execute(&user, user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, RecipeboxError::Forbidden));

    let err = AdminCreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    }
    .execute(&user, admin_input("new@example.com", false, false))
    .await
    .unwrap_err();
    assert!(matches!(err, RecipeboxError::Forbidden));
    assert!(db.users().find_by_email("new@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn should_create_user_as_admin_with_blank_name() {
    let db = MemoryDb::new();
    let admin = staff_user(&db);
    let uc = AdminCreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let user = uc
        .execute(&admin, admin_input("New@EXAMPLE.com", false, true))
        .await
        .unwrap();

    assert_eq!(user.email, "New@example.com");
    assert_eq!(user.name, "");
    assert!(user.is_superuser);
    assert!(user.is_staff);
    let stored = db.user(user.id).unwrap();
    assert!(test_hasher().verify("testpass123", &stored.password).unwrap());
}

#[tokio::test]
async fn should_reject_duplicate_email_as_admin() {
    let db = MemoryDb::new();
    let admin = staff_user(&db);
    let uc = AdminCreateUserUseCase {
        repo: db.users(),
        hasher: test_hasher(),
    };

    let err = uc
        .execute(&admin, admin_input("admin@example.com", true, false))
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::UserAlreadyExists));
}
