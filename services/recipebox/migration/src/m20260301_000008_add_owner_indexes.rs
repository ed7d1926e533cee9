use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Tags::Table)
                    .col(Tags::UserId)
                    .name("idx_tags_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Ingredients::Table)
                    .col(Ingredients::UserId)
                    .name("idx_ingredients_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .name("idx_recipes_user_id")
                    .to_owned(),
            )
            .await?;
        // Reverse lookups for `assigned_only` and the recipe id-list filters.
        manager
            .create_index(
                Index::create()
                    .table(RecipeTags::Table)
                    .col(RecipeTags::TagId)
                    .name("idx_recipe_tags_tag_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(RecipeIngredients::Table)
                    .col(RecipeIngredients::IngredientId)
                    .name("idx_recipe_ingredients_ingredient_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_recipe_ingredients_ingredient_id",
            "idx_recipe_tags_tag_id",
            "idx_recipes_user_id",
            "idx_ingredients_user_id",
            "idx_tags_user_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Tags {
    Table,
    UserId,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    UserId,
}

#[derive(Iden)]
enum Recipes {
    Table,
    UserId,
}

#[derive(Iden)]
enum RecipeTags {
    Table,
    TagId,
}

#[derive(Iden)]
enum RecipeIngredients {
    Table,
    IngredientId,
}
