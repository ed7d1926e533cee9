use recipebox_server::domain::types::AttrKind;
use recipebox_server::error::RecipeboxError;
use recipebox_server::usecase::attr::{
    CreateAttrUseCase, DeleteAttrUseCase, GetAttrUseCase, ListAttrsUseCase, UpdateAttrUseCase,
};

use crate::helpers::{MemoryDb, test_user};

// ── ListAttrs ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_own_tags_by_name_descending() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));
    let other = db.insert_user(test_user("b@example.com", "testpass"));
    db.insert_attr(AttrKind::Tag, user.id, "Dessert");
    db.insert_attr(AttrKind::Tag, user.id, "Vegan");
    db.insert_attr(AttrKind::Tag, other.id, "Fruity");

    let tags = ListAttrsUseCase { repo: db.tags() }
        .execute(user.id, false)
        .await
        .unwrap();

    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Vegan", "Dessert"]);
}

#[tokio::test]
async fn should_list_only_assigned_ingredients_once() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));
    let eggs = db.insert_attr(AttrKind::Ingredient, user.id, "Eggs");
    db.insert_attr(AttrKind::Ingredient, user.id, "Lentils");
    db.insert_recipe(user.id, "Eggs benedict", &[], &[eggs.id]);
    db.insert_recipe(user.id, "Herb eggs", &[], &[eggs.id]);

    let items = ListAttrsUseCase {
        repo: db.ingredients(),
    }
    .execute(user.id, true)
    .await
    .unwrap();

    assert_eq!(items, vec![eggs]);
}

// ── GetAttr ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_other_users_tag() {
    let db = MemoryDb::new();
    let owner = db.insert_user(test_user("a@example.com", "testpass"));
    let intruder = db.insert_user(test_user("b@example.com", "testpass"));
    let tag = db.insert_attr(AttrKind::Tag, owner.id, "Breakfast");

    let err = GetAttrUseCase { repo: db.tags() }
        .execute(intruder.id, tag.id)
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::TagNotFound));
}

#[tokio::test]
async fn should_report_missing_ingredient_by_kind() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));

    let err = GetAttrUseCase {
        repo: db.ingredients(),
    }
    .execute(user.id, 999)
    .await
    .unwrap_err();

    assert!(matches!(err, RecipeboxError::IngredientNotFound));
}

// ── CreateAttr ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_tag_with_trimmed_name() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));

    let tag = CreateAttrUseCase { repo: db.tags() }
        .execute(user.id, "  Test tag  ")
        .await
        .unwrap();

    assert_eq!(tag.name, "Test tag");
    assert_eq!(tag.user_id, user.id);
}

#[tokio::test]
async fn should_reject_blank_name() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));

    let err = CreateAttrUseCase { repo: db.tags() }
        .execute(user.id, "")
        .await
        .unwrap_err();

    match err {
        RecipeboxError::Validation(fields) => assert!(fields.contains("name")),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_overlong_name() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));

    let err = CreateAttrUseCase {
        repo: db.ingredients(),
    }
    .execute(user.id, &"x".repeat(256))
    .await
    .unwrap_err();

    assert_eq!(err.kind(), "VALIDATION");
}

// ── UpdateAttr ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_rename_tag() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));
    let tag = db.insert_attr(AttrKind::Tag, user.id, "Dinner");

    let renamed = UpdateAttrUseCase { repo: db.tags() }
        .execute(user.id, tag.id, Some("Supper"), false)
        .await
        .unwrap();

    assert_eq!(renamed.id, tag.id);
    assert_eq!(renamed.name, "Supper");
}

#[tokio::test]
async fn should_keep_name_on_empty_patch() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));
    let tag = db.insert_attr(AttrKind::Tag, user.id, "Dinner");

    let same = UpdateAttrUseCase { repo: db.tags() }
        .execute(user.id, tag.id, None, true)
        .await
        .unwrap();

    assert_eq!(same, tag);
}

#[tokio::test]
async fn should_require_name_on_put() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));
    let tag = db.insert_attr(AttrKind::Tag, user.id, "Dinner");

    let err = UpdateAttrUseCase { repo: db.tags() }
        .execute(user.id, tag.id, None, false)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "VALIDATION");
}

#[tokio::test]
async fn should_not_rename_other_users_ingredient() {
    let db = MemoryDb::new();
    let owner = db.insert_user(test_user("a@example.com", "testpass"));
    let intruder = db.insert_user(test_user("b@example.com", "testpass"));
    let salt = db.insert_attr(AttrKind::Ingredient, owner.id, "Salt");

    let err = UpdateAttrUseCase {
        repo: db.ingredients(),
    }
    .execute(intruder.id, salt.id, Some("Pepper"), true)
    .await
    .unwrap_err();

    assert!(matches!(err, RecipeboxError::IngredientNotFound));
}

// ── DeleteAttr ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_own_tag() {
    let db = MemoryDb::new();
    let user = db.insert_user(test_user("a@example.com", "testpass"));
    let tag = db.insert_attr(AttrKind::Tag, user.id, "Breakfast");

    DeleteAttrUseCase { repo: db.tags() }
        .execute(user.id, tag.id)
        .await
        .unwrap();

    assert!(!db.attr_exists(AttrKind::Tag, tag.id));
}

#[tokio::test]
async fn should_not_delete_other_users_tag() {
    let db = MemoryDb::new();
    let owner = db.insert_user(test_user("a@example.com", "testpass"));
    let intruder = db.insert_user(test_user("b@example.com", "testpass"));
    let tag = db.insert_attr(AttrKind::Tag, owner.id, "Breakfast");

    let err = DeleteAttrUseCase { repo: db.tags() }
        .execute(intruder.id, tag.id)
        .await
        .unwrap_err();

    assert!(matches!(err, RecipeboxError::TagNotFound));
    assert!(db.attr_exists(AttrKind::Tag, tag.id));
}
