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
          .table(Notifications::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Notifications::Id).uuid().not_null().primary_key(),
          )
          .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
          .col(ColumnDef::new(Notifications::Kind).string().not_null())
          .col(ColumnDef::new(Notifications::Title).string().not_null())
          .col(ColumnDef::new(Notifications::Message).string().not_null())
          .col(ColumnDef::new(Notifications::Data).json().null())
          .col(
            ColumnDef::new(Notifications::IsRead)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Notifications::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_notifications_user")
              .from(Notifications::Table, Notifications::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Notifications::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Notifications {
  Table,
  Id,
  UserId,
  Kind,
  Title,
  Message,
  Data,
  IsRead,
  CreatedAt,
}
