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
          .table(UserAchievements::Table)
          .if_not_exists()
          .col(ColumnDef::new(UserAchievements::UserId).uuid().not_null())
          .col(
            ColumnDef::new(UserAchievements::AchievementId).string().not_null(),
          )
          .col(
            ColumnDef::new(UserAchievements::PointsEarned)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(UserAchievements::EarnedAt).date_time().not_null(),
          )
          .primary_key(
            Index::create()
              .col(UserAchievements::UserId)
              .col(UserAchievements::AchievementId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_achievements_user")
              .from(UserAchievements::Table, UserAchievements::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(UserAchievements::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum UserAchievements {
  Table,
  UserId,
  AchievementId,
  PointsEarned,
  EarnedAt,
}
