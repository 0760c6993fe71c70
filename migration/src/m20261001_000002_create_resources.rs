use sea_orm_migration::prelude::*;

use super::m20261001_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Resources::Table)
          .if_not_exists()
          .col(ColumnDef::new(Resources::Id).uuid().not_null().primary_key())
          .col(ColumnDef::new(Resources::OwnerId).uuid().not_null())
          .col(ColumnDef::new(Resources::Title).string().not_null())
          .col(
            ColumnDef::new(Resources::ResourceType)
              .string()
              .not_null()
              .default("note"),
          )
          .col(
            ColumnDef::new(Resources::Upvotes).integer().not_null().default(0),
          )
          .col(
            ColumnDef::new(Resources::Downloads)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Resources::IsVerified)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Resources::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_resources_owner")
              .from(Resources::Table, Resources::OwnerId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_resources_owner")
          .table(Resources::Table)
          .col(Resources::OwnerId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Resources::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Resources {
  Table,
  Id,
  OwnerId,
  Title,
  ResourceType,
  Upvotes,
  Downloads,
  IsVerified,
  CreatedAt,
}
