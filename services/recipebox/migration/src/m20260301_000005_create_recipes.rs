use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipes::UserId).uuid().not_null())
                    .col(ColumnDef::new(Recipes::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Recipes::TimeMinutes).integer().not_null())
                    .col(
                        ColumnDef::new(Recipes::Price)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipes::Link).string_len(255).null())
                    .col(ColumnDef::new(Recipes::Image).string_len(255).null())
                    .check(Expr::col(Recipes::TimeMinutes).gte(0))
                    .check(Expr::col(Recipes::Price).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Recipes::Table, Recipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
    UserId,
    Title,
    TimeMinutes,
    Price,
    Link,
    Image,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
