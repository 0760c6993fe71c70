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
          .table(Collections::Table)
          .if_not_exists()
          .col(ColumnDef::new(Collections::Id).uuid().not_null().primary_key())
          .col(ColumnDef::new(Collections::OwnerId).uuid().not_null())
          .col(ColumnDef::new(Collections::Title).string().not_null())
          .col(
            ColumnDef::new(Collections::IsPublic)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Collections::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_collections_owner")
              .from(Collections::Table, Collections::OwnerId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_collections_owner")
          .table(Collections::Table)
          .col(Collections::OwnerId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Collections::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Collections {
  Table,
  Id,
  OwnerId,
  Title,
  IsPublic,
  CreatedAt,
}
