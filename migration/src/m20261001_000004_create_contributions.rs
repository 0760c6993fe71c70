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
          .table(Contributions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Contributions::Id).uuid().not_null().primary_key(),
          )
          .col(ColumnDef::new(Contributions::UserId).uuid().not_null())
          .col(ColumnDef::new(Contributions::Kind).string().not_null())
          .col(ColumnDef::new(Contributions::ResourceId).uuid().null())
          .col(
            ColumnDef::new(Contributions::PointsEarned)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Contributions::Metadata).json().null())
          .col(ColumnDef::new(Contributions::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_contributions_user")
              .from(Contributions::Table, Contributions::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_contributions_user_created")
          .table(Contributions::Table)
          .col(Contributions::UserId)
          .col(Contributions::CreatedAt)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Contributions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Contributions {
  Table,
  Id,
  UserId,
  Kind,
  ResourceId,
  PointsEarned,
  Metadata,
  CreatedAt,
}
